//! Directory probe.
//!
//! Some backends report certain directory entries as zero-length files
//! instead of directories. When a lookup returns such a descriptor for a
//! path without a trailing '/', re-querying with the separator appended
//! reveals whether a directory actually lives there.

use tracing::debug;

use crate::resolve::backend::{ResourceBackend, ResourceDescriptor};

/// Re-classifies a suspicious descriptor by probing `path + "/"`.
///
/// Runs before the welcome-file search so that directory requests without a
/// trailing separator are classified correctly. Descriptors that are already
/// directories, have content, or were requested with a trailing separator
/// pass through unchanged.
pub fn probe(
    backend: &dyn ResourceBackend,
    path: &str,
    descriptor: ResourceDescriptor,
) -> ResourceDescriptor {
    if descriptor.is_directory || path.ends_with('/') {
        return descriptor;
    }
    if descriptor.content_length.unwrap_or(0) != 0 {
        return descriptor;
    }

    let probed_path = format!("{path}/");
    match backend.lookup(&probed_path) {
        Some(probed) if probed.is_directory => {
            debug!(path = %probed_path, "empty file is really a directory");
            probed
        }
        _ => descriptor,
    }
}

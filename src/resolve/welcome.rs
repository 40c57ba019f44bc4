//! Welcome-file search.
//!
//! When a direct lookup fails, or resolves to a directory reached without a
//! trailing separator, the configured welcome files are tried at the deepest
//! matching directory first, then at each shorter ancestor prefix of the
//! request path, down to the root. The walk is bounded by the request path's
//! segment count; lookups stay relative to the backend root throughout.
//!
//! Trying ancestors lets a server configured with e.g. `index.html` act as a
//! catch-all for arbitrary sub-paths (single-page-application routing) while
//! still preferring the most specific directory's own index file. With
//! `resolve_parent_resource_if_not_found` off the search is restricted to
//! the deepest directory.

use tracing::debug;

use crate::config::ResolutionConfig;
use crate::resolve::backend::{ResourceBackend, ResourceDescriptor};
use crate::resolve::path::{ancestor_prefix, canonicalize, slashify, split_segments};
use crate::resolve::probe::probe;

/// Searches for a welcome file covering `path`. Deterministic: ancestors are
/// visited deepest first and welcome files in configured order, so the first
/// hit wins.
pub fn search(
    backend: &dyn ResourceBackend,
    config: &ResolutionConfig,
    path: &str,
) -> Option<ResourceDescriptor> {
    let directory_path = slashify(path);
    let segments = split_segments(&directory_path);
    debug!(path = %directory_path, welcome_files = ?config.welcome_files, "welcome file search");

    let deepest = segments.len().saturating_sub(1);
    let lowest = if config.resolve_parent_resource_if_not_found {
        0
    } else {
        deepest
    };

    for depth in (lowest..=deepest).rev() {
        let ancestor = ancestor_prefix(&segments, depth);
        if let Some(found) = welcome_file_at(backend, config, &ancestor) {
            return Some(found);
        }
    }
    None
}

/// Tries each configured welcome file directly under `base`.
fn welcome_file_at(
    backend: &dyn ResourceBackend,
    config: &ResolutionConfig,
    base: &str,
) -> Option<ResourceDescriptor> {
    for name in &config.welcome_files {
        let candidate = canonicalize(&format!("{}{name}", slashify(base)));
        if let Some(descriptor) = backend.lookup(&candidate) {
            let descriptor = probe(backend, &candidate, descriptor);
            if !descriptor.is_directory {
                debug!(base = %base, candidate = %candidate, "welcome file found");
                return Some(descriptor);
            }
        }
    }
    None
}

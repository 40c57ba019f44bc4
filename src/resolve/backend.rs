//! The backend lookup contract.

use std::path::PathBuf;
use std::time::SystemTime;

/// A pluggable source of resources behind a uniform lookup contract.
///
/// Paths are root-relative, '/'-separated logical paths; escaping sequences
/// are normalized away before they reach the underlying storage. Lookups are
/// read-only and report I/O failures as a miss, so backends are safe to share
/// across concurrent requests without locking.
pub trait ResourceBackend: Send + Sync {
    /// Looks up a logical path and describes the resource behind it, or
    /// `None` when nothing resolvable lives there.
    fn lookup(&self, path: &str) -> Option<ResourceDescriptor>;

    /// Enumerates the direct children of a directory, for the listing
    /// renderer. `None` when the path is not a directory.
    fn list(&self, path: &str) -> Option<Vec<ListingEntry>>;

    /// Human readable description of the backend root, for logging.
    fn root_description(&self) -> String;
}

/// A located resource. Created per lookup, immutable, discarded after the
/// response is written; the backend stays the source of truth per request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDescriptor {
    /// Canonical logical path of the resource.
    pub path: String,
    /// Whether the resource is a directory. Some backends misreport empty
    /// files here; see the directory probe.
    pub is_directory: bool,
    /// Content length in bytes. `None` means unknown, which the probe treats
    /// like zero.
    pub content_length: Option<u64>,
    /// Last modification time, when the backend knows it.
    pub last_modified: Option<SystemTime>,
    /// Where the content actually lives.
    pub locator: ResourceLocator,
}

/// Backend-specific location of a resource's content.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceLocator {
    /// A file on disk.
    File(PathBuf),
    /// Content compiled into the binary. Empty for directories.
    Embedded(&'static [u8]),
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_directory: bool,
    /// File size, `None` for directories.
    pub size: Option<u64>,
}

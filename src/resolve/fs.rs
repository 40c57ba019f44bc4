//! Backend rooted at a directory on disk.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;

use crate::resolve::backend::{ListingEntry, ResourceBackend, ResourceDescriptor, ResourceLocator};
use crate::resolve::path::canonicalize;

/// Serves resources from a directory tree on the filesystem.
///
/// The root is canonicalized once at construction; a missing or unreadable
/// root is fatal at startup. Lookups re-query the filesystem every time and
/// map I/O errors to a miss.
#[derive(Debug)]
pub struct FilesystemBackend {
    root: PathBuf,
}

impl FilesystemBackend {
    pub fn new(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root: PathBuf = root.into();
        let root = root
            .canonicalize()
            .with_context(|| format!("resource directory {} is not accessible", root.display()))?;
        anyhow::ensure!(
            root.is_dir(),
            "resource root {} is not a directory",
            root.display()
        );
        Ok(Self { root })
    }

    /// Maps a logical path onto the real filesystem path under the root.
    /// Returns the canonical logical path alongside, with escaping sequences
    /// already collapsed.
    fn real_path(&self, path: &str) -> (String, PathBuf) {
        let logical = canonicalize(path);
        let full = self.root.join(logical.trim_start_matches('/'));
        (logical, full)
    }
}

impl ResourceBackend for FilesystemBackend {
    fn lookup(&self, path: &str) -> Option<ResourceDescriptor> {
        let wants_directory = path.len() > 1 && path.ends_with('/');
        let (mut logical, full) = self.real_path(path);

        let meta = fs::metadata(&full).ok()?;
        if wants_directory && !meta.is_dir() {
            return None;
        }
        if logical.is_empty() {
            logical = "/".to_string();
        }

        Some(ResourceDescriptor {
            path: logical,
            is_directory: meta.is_dir(),
            content_length: if meta.is_dir() { None } else { Some(meta.len()) },
            last_modified: meta.modified().ok(),
            locator: ResourceLocator::File(full),
        })
    }

    fn list(&self, path: &str) -> Option<Vec<ListingEntry>> {
        let (_, full) = self.real_path(path);
        let entries = fs::read_dir(&full).ok()?;

        let mut listing: Vec<ListingEntry> = entries
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let meta = entry.metadata().ok()?;
                Some(ListingEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    is_directory: meta.is_dir(),
                    size: if meta.is_dir() { None } else { Some(meta.len()) },
                })
            })
            .collect();
        listing.sort_by(|a, b| a.name.cmp(&b.name));
        Some(listing)
    }

    fn root_description(&self) -> String {
        self.root.display().to_string()
    }
}

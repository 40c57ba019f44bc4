//! Backend rooted inside an asset tree compiled into the binary.

use include_dir::{Dir, include_dir};

use crate::resolve::backend::{ListingEntry, ResourceBackend, ResourceDescriptor, ResourceLocator};
use crate::resolve::path::canonicalize;

/// The asset tree bundled into the binary for `--embedded` mode.
pub static BUNDLED_ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Serves resources from a bundled asset tree, addressed by the bundle and
/// a prefix inside it.
///
/// The bundle is immutable by construction, so lookups are pure map walks;
/// there is no I/O and no state beyond the root.
pub struct EmbeddedBackend {
    assets: &'static Dir<'static>,
    prefix: String,
}

impl EmbeddedBackend {
    pub fn new(assets: &'static Dir<'static>, prefix: &str) -> anyhow::Result<Self> {
        let prefix = prefix.trim_matches('/').to_string();
        let prefix = if prefix == "." { String::new() } else { prefix };
        if !prefix.is_empty() && assets.get_dir(&prefix).is_none() {
            anyhow::bail!("embedded asset prefix {prefix:?} is not present in the bundle");
        }
        Ok(Self { assets, prefix })
    }

    /// Maps a logical path onto a path inside the bundle, under the prefix.
    fn bundle_path(&self, path: &str) -> (String, String) {
        let logical = canonicalize(path);
        let relative = logical.trim_start_matches('/');
        let full = match (self.prefix.is_empty(), relative.is_empty()) {
            (true, _) => relative.to_string(),
            (false, true) => self.prefix.clone(),
            (false, false) => format!("{}/{relative}", self.prefix),
        };
        (logical, full)
    }

    fn dir_at(&self, full: &str) -> Option<&'static Dir<'static>> {
        if full.is_empty() {
            Some(self.assets)
        } else {
            self.assets.get_dir(full)
        }
    }
}

impl ResourceBackend for EmbeddedBackend {
    fn lookup(&self, path: &str) -> Option<ResourceDescriptor> {
        let wants_directory = path.len() > 1 && path.ends_with('/');
        let (mut logical, full) = self.bundle_path(path);
        if logical.is_empty() || logical == "/" {
            logical = "/".to_string();
        }

        if let Some(file) = self.assets.get_file(&full) {
            if wants_directory {
                return None;
            }
            let contents = file.contents();
            return Some(ResourceDescriptor {
                path: logical,
                is_directory: false,
                content_length: Some(contents.len() as u64),
                last_modified: None,
                locator: ResourceLocator::Embedded(contents),
            });
        }

        self.dir_at(&full).map(|_| ResourceDescriptor {
            path: logical,
            is_directory: true,
            content_length: None,
            last_modified: None,
            locator: ResourceLocator::Embedded(&[]),
        })
    }

    fn list(&self, path: &str) -> Option<Vec<ListingEntry>> {
        let (_, full) = self.bundle_path(path);
        let dir = self.dir_at(&full)?;

        let mut listing: Vec<ListingEntry> = dir
            .entries()
            .iter()
            .filter_map(|entry| {
                let name = entry.path().file_name()?.to_string_lossy().into_owned();
                let size = entry.as_file().map(|f| f.contents().len() as u64);
                Some(ListingEntry {
                    name,
                    is_directory: entry.as_dir().is_some(),
                    size,
                })
            })
            .collect();
        listing.sort_by(|a, b| a.name.cmp(&b.name));
        Some(listing)
    }

    fn root_description(&self) -> String {
        if self.prefix.is_empty() {
            "bundled assets".to_string()
        } else {
            format!("bundled assets under {}/", self.prefix)
        }
    }
}

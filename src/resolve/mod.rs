//! Resource resolution engine.
//!
//! Maps a request path to a concrete servable resource, in a file tree on
//! disk or in an asset bundle compiled into the binary.
//!
//! # Architecture
//!
//! - **`backend`**: the `ResourceBackend` lookup contract and descriptors
//! - **`fs`**: backend rooted at a directory on disk
//! - **`embedded`**: backend rooted inside a bundled asset tree
//! - **`probe`**: disambiguates empty files that are really directories
//! - **`welcome`**: ancestor-walking search for a directory-index file
//! - **`resolver`**: orchestrates the above into `resolve(path)`
//! - **`path`**: logical path helpers (slashify, canonicalize)

pub mod backend;
pub mod embedded;
pub mod fs;
pub mod path;
pub mod probe;
pub mod resolver;
pub mod welcome;

pub use backend::{ListingEntry, ResourceBackend, ResourceDescriptor, ResourceLocator};
pub use embedded::EmbeddedBackend;
pub use fs::FilesystemBackend;
pub use resolver::{ResolutionResult, ResourceResolver};

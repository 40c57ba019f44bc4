//! Resolution orchestration.

use std::sync::Arc;

use tracing::debug;

use crate::config::ResolutionConfig;
use crate::resolve::backend::{ResourceBackend, ResourceDescriptor};
use crate::resolve::probe::probe;
use crate::resolve::welcome;

/// Outcome of one resolution call. Produced per request, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionResult {
    Found(ResourceDescriptor),
    NotFound,
}

/// Maps a request path to a servable resource.
///
/// The pipeline per call: direct lookup, then extension fallback for dot-less
/// misses, then the directory probe, then the welcome-file search when the
/// lookup missed or hit a directory. The welcome search runs for plain
/// misses on both backend kinds; this is the lenient of the two historical
/// triggers, chosen so filesystem and embedded trees resolve identically.
/// Directories reached with a trailing separator get the same welcome
/// treatment, so `/docs` and `/docs/` resolve to the same resource.
///
/// Resolution is total: lookups never propagate errors, and calling twice
/// without backend mutation yields the same result.
pub struct ResourceResolver {
    backend: Arc<dyn ResourceBackend>,
    config: ResolutionConfig,
}

impl ResourceResolver {
    pub fn new(backend: Arc<dyn ResourceBackend>, config: ResolutionConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    pub fn backend(&self) -> &Arc<dyn ResourceBackend> {
        &self.backend
    }

    pub fn resolve(&self, path: &str) -> ResolutionResult {
        let mut resource = self.backend.lookup(path);
        debug!(path = %path, found = resource.is_some(), "direct lookup");

        // In case nothing was found, try the configured file extensions.
        if resource.is_none()
            && !path.contains('.')
            && !self.config.supported_file_extensions.is_empty()
        {
            for extension in &self.config.supported_file_extensions {
                let candidate = format!("{path}{extension}");
                resource = self.backend.lookup(&candidate);
                if resource.is_some() {
                    debug!(path = %candidate, "resolved via extension fallback");
                    break;
                }
            }
        }

        let resource = resource.map(|descriptor| {
            let found_at = descriptor.path.clone();
            probe(self.backend.as_ref(), &found_at, descriptor)
        });

        let needs_welcome = match &resource {
            None => true,
            Some(descriptor) => descriptor.is_directory,
        };
        if needs_welcome {
            if let Some(found) = welcome::search(self.backend.as_ref(), &self.config, path) {
                return ResolutionResult::Found(found);
            }
        }

        match resource {
            Some(descriptor) => ResolutionResult::Found(descriptor),
            None => {
                debug!(path = %path, "resource not found");
                ResolutionResult::NotFound
            }
        }
    }
}

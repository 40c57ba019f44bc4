//! Listener and request handling.

pub mod handler;
pub mod listener;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use crate::config::Config;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::proxy::{BackendPool, ProxyHandler};
use crate::resolve::embedded::BUNDLED_ASSETS;
use crate::resolve::{EmbeddedBackend, FilesystemBackend, ResourceBackend, ResourceResolver};
use crate::server::handler::StaticHandler;

/// Application state shared by all connections: either a static-file handler
/// or a reverse proxy.
pub enum App {
    Static(StaticHandler),
    Proxy(ProxyHandler),
}

impl App {
    pub async fn handle(&self, req: &Request) -> Response {
        match self {
            App::Static(handler) => handler.handle(req).await,
            App::Proxy(proxy) => match proxy.forward_request(req).await {
                Ok(response) => response,
                Err(_) => Response::internal_error(),
            },
        }
    }
}

/// Builds the application from its configuration. Configuration errors are
/// fatal here, before the listener binds.
pub fn build(cfg: &Config) -> anyhow::Result<Arc<App>> {
    if cfg.proxy.enabled {
        anyhow::ensure!(
            !cfg.proxy.backends.is_empty(),
            "proxy mode requires at least one backend"
        );
        let pool = BackendPool::new(cfg.proxy.backends.clone());
        let proxy = ProxyHandler::new(
            pool,
            Duration::from_millis(cfg.proxy.connection_timeout_ms),
            Duration::from_millis(cfg.proxy.request_timeout_ms),
        );
        info!(backends = cfg.proxy.backends.len(), "Proxy mode");
        return Ok(Arc::new(App::Proxy(proxy)));
    }

    let backend: Arc<dyn ResourceBackend> = if cfg.resources.from_embedded {
        Arc::new(EmbeddedBackend::new(&BUNDLED_ASSETS, &cfg.resources.directory)?)
    } else {
        Arc::new(
            FilesystemBackend::new(cfg.resources.directory.as_str())
                .context("invalid resource directory")?,
        )
    };
    info!(root = %backend.root_description(), mount = %cfg.server.resource_path, "Serving resources");

    let resolver = ResourceResolver::new(backend, cfg.resources.clone());
    let handler = StaticHandler::new(
        resolver,
        cfg.server.resource_path.clone(),
        cfg.server.health_path.clone(),
    );
    Ok(Arc::new(App::Static(handler)))
}

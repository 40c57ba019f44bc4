//! Server configuration.
//!
//! Loaded from an optional YAML file, then overridden by CLI flags. All
//! values are normalized here, once, before the server starts; nothing
//! mutates the configuration afterwards.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::cli::Cli;

/// Top level configuration, one per server instance.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub resources: ResolutionConfig,

    #[serde(default)]
    pub proxy: ProxyConfig,
}

/// Listener and routing settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address, host:port.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Mount prefix under which resources are served.
    #[serde(default = "default_resource_path")]
    pub resource_path: String,

    /// Health-check endpoint path. A blank value disables the endpoint.
    #[serde(default = "default_health_path")]
    pub health_path: String,
}

/// Resolution policy, owned by the resolver and immutable after startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolutionConfig {
    /// Root directory on disk, or the prefix inside the embedded bundle.
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Serve from the asset tree compiled into the binary.
    #[serde(default)]
    pub from_embedded: bool,

    /// Welcome file names, in order of preference.
    #[serde(default = "default_welcome_files")]
    pub welcome_files: Vec<String>,

    /// Extensions appended to dot-less paths that miss; each entry is
    /// normalized to start with '.'.
    #[serde(default)]
    pub supported_file_extensions: Vec<String>,

    /// Render an HTML index for directories without a welcome file.
    #[serde(default)]
    pub directory_listing: bool,

    /// Walk ancestor directories for a welcome file when a path misses.
    /// Turning this off trades fallback flexibility for strict 404s.
    #[serde(default = "default_true")]
    pub resolve_parent_resource_if_not_found: bool,
}

/// Reverse-proxy settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyConfig {
    /// Forward all requests to the backend pool instead of serving files.
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub backends: Vec<BackendConfig>,

    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// One upstream server in the proxy pool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Backend URL (e.g., "http://localhost:3000")
    pub url: String,

    /// Optional backend name for logging
    #[serde(default)]
    pub name: Option<String>,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_resource_path() -> String {
    "/".to_string()
}

fn default_health_path() -> String {
    "/q/health".to_string()
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_welcome_files() -> Vec<String> {
    ["index.html", "index.htm", "default.html", "default.htm"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_true() -> bool {
    true
}

fn default_connection_timeout_ms() -> u64 {
    5_000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            resource_path: default_resource_path(),
            health_path: default_health_path(),
        }
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            from_embedded: false,
            welcome_files: default_welcome_files(),
            supported_file_extensions: Vec::new(),
            directory_listing: false,
            resolve_parent_resource_if_not_found: true,
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            backends: Vec::new(),
            connection_timeout_ms: default_connection_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Config {
    /// Load the configuration from a YAML file, or defaults when no file is
    /// given. Unreadable or malformed files are fatal.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("cannot read configuration file {}", path.display()))?;
                serde_yaml::from_str(&raw)
                    .with_context(|| format!("malformed configuration file {}", path.display()))?
            }
            None => Config::default(),
        };
        cfg.resources = cfg.resources.normalized();
        cfg.server.resource_path = normalize_resource_path(&cfg.server.resource_path);
        Ok(cfg)
    }

    /// Apply CLI overrides on top of the loaded configuration.
    pub fn merge_cli(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if cli.bind.is_some() || cli.port.is_some() {
            let (host, port) = split_listen_addr(&self.server.listen_addr)?;
            let host = cli.bind.as_deref().unwrap_or(host);
            let port = cli.port.unwrap_or(port);
            self.server.listen_addr = format!("{host}:{port}");
        }
        if let Some(path) = &cli.resource_path {
            self.server.resource_path = normalize_resource_path(path);
        }
        if let Some(path) = &cli.health_path {
            self.server.health_path = path.trim().to_string();
        }
        if let Some(directory) = &cli.directory {
            self.resources.directory = directory.clone();
        }
        if cli.embedded {
            self.resources.from_embedded = true;
        }
        if cli.listing {
            self.resources.directory_listing = true;
        }
        if let Some(names) = &cli.welcome_files {
            self.resources.welcome_files = parse_list(names);
        }
        if let Some(extensions) = &cli.supported_file_extensions {
            self.resources.supported_file_extensions = parse_list(extensions);
        }
        if let Some(resolve_parent) = cli.resolve_parent_resource_if_not_found {
            self.resources.resolve_parent_resource_if_not_found = resolve_parent;
        }
        self.resources = self.resources.normalized();
        Ok(self)
    }
}

impl ResolutionConfig {
    /// Normalize list entries: trimmed, empties dropped, extensions with a
    /// leading dot. Returns a new value so shared configs are never mutated
    /// in place.
    pub fn normalized(mut self) -> Self {
        self.welcome_files = self
            .welcome_files
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        self.supported_file_extensions = self
            .supported_file_extensions
            .into_iter()
            .map(|ext| ext.trim().to_string())
            .filter(|ext| !ext.is_empty())
            .map(|ext| {
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{ext}")
                }
            })
            .collect();
        self
    }

    pub fn with_welcome_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.welcome_files = names.into_iter().map(Into::into).collect();
        self.normalized()
    }

    pub fn with_supported_file_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_file_extensions = extensions.into_iter().map(Into::into).collect();
        self.normalized()
    }

    pub fn with_directory_listing(mut self, enabled: bool) -> Self {
        self.directory_listing = enabled;
        self
    }

    pub fn with_resolve_parent_resource_if_not_found(mut self, enabled: bool) -> Self {
        self.resolve_parent_resource_if_not_found = enabled;
        self
    }
}

/// Parse a comma-separated, order-significant list option.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Mount prefixes always start with '/' and never end with one, except the
/// root itself.
pub fn normalize_resource_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "/" {
        return "/".to_string();
    }
    let mut path = String::new();
    if !trimmed.starts_with('/') {
        path.push('/');
    }
    path.push_str(trimmed.trim_end_matches('/'));
    path
}

fn split_listen_addr(addr: &str) -> anyhow::Result<(&str, u16)> {
    let (host, port) = addr
        .rsplit_once(':')
        .with_context(|| format!("listen address {addr:?} is missing a port"))?;
    let port = port
        .parse()
        .with_context(|| format!("listen address {addr:?} has an invalid port"))?;
    Ok((host, port))
}

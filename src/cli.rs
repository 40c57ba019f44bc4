//! Command line interface.
//!
//! Every flag overrides the corresponding value from the YAML configuration
//! file; comma-separated list options are order-significant.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "alcove",
    version,
    about = "Small static-file and embedded-asset server"
)]
pub struct Cli {
    /// The bind address, by default 127.0.0.1
    #[arg(short, long, value_name = "address")]
    pub bind: Option<String>,

    /// The port, by default 8080
    #[arg(short, long, value_name = "port")]
    pub port: Option<u16>,

    /// The served directory, by default the working path. In embedded mode
    /// this is the prefix inside the bundled asset tree.
    #[arg(short, long, value_name = "directory")]
    pub directory: Option<String>,

    /// Serve the asset tree compiled into the binary instead of the filesystem
    #[arg(long)]
    pub embedded: bool,

    /// Enable directory listing
    #[arg(short, long)]
    pub listing: bool,

    /// The resource mount path, by default /
    #[arg(long, value_name = "path")]
    pub resource_path: Option<String>,

    /// The health path, by default /q/health; an empty value disables it
    #[arg(long, value_name = "path")]
    pub health_path: Option<String>,

    /// Comma-separated welcome file names, in order of preference
    #[arg(long, value_name = "names")]
    pub welcome_files: Option<String>,

    /// Comma-separated file extensions tried when a dot-less path misses
    #[arg(long, value_name = "extensions")]
    pub supported_file_extensions: Option<String>,

    /// Walk ancestor directories for a welcome file when a path misses
    #[arg(long, value_name = "bool")]
    pub resolve_parent_resource_if_not_found: Option<bool>,

    /// Configuration file (YAML)
    #[arg(short, long, value_name = "file")]
    pub config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(long)]
    pub verbose: bool,
}

//! Alcove - Small static-file and embedded-asset server
//!
//! Core library: resource resolution, HTTP layer and the optional
//! reverse-proxy mode.

pub mod cli;
pub mod config;
pub mod http;
pub mod proxy;
pub mod resolve;
pub mod server;

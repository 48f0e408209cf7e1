//! Builds the Sentinel API server and web proxy Docker images.

pub mod api_server;
pub mod config;
pub mod docker;
pub mod env;
pub mod error;
pub mod launcher;
pub mod logging;
pub mod process;
pub mod web_proxy;

pub use config::{ApiServerArgs, ApiServerConfig, Tools, WebProxyArgs, WebProxyConfig};
pub use error::{BuildError, Result};

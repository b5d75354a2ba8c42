//! Server module
//!
//! HTTP server, startup/shutdown plumbing, and static pages.

pub mod http;
pub mod pages;
pub mod startup;

pub use http::{build_http_config, create_router, AppState, HttpConfig};
pub use startup::{run_server_with_config, ServerConfig, ServerHandle};

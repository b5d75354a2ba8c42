//! mirrorbot library
//!
//! Answers a chat platform's slash-command webhook: rewrites recognized
//! link patterns in the submitted text to privacy-friendly mirror domains
//! and returns the result as a chat response.

pub mod auth;
pub mod commands;
pub mod config;
pub mod logging;
pub mod rewrite;
pub mod server;

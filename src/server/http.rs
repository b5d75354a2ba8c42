//! HTTP server implementation
//!
//! Implements:
//! - Slash command endpoint (POST /nit)
//! - Static pages (GET /, GET /style.css, 404 fallback)
//! - Health check (GET /health)
//!
//! The slash command handler owns the full per-invocation state machine:
//! validate headers, authenticate the shared-secret token, extract the
//! `text` form field, rewrite, respond. Every failure is resolved here
//! into an HTTP response; the auth and rewrite modules only return values.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::auth;
use crate::commands::{run_rewrite_command, SlashForm};
use crate::rewrite::{RuleSet, SubstitutionRule};
use crate::server::pages;

/// Default max body size for slash command requests (64KB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 65536;

/// Generic message returned on any authentication failure. Never reveals
/// whether the token was absent or wrong.
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid request";

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Shared secret the chat platform sends with each slash command
    pub slash_token: Option<String>,
    /// Ordered substitution rules for the link rewriter
    pub rules: RuleSet,
    /// Max body size for command requests in bytes
    pub max_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            slash_token: None,
            rules: RuleSet::standard(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Build an `HttpConfig` from the loaded JSON configuration.
///
/// Maps commands.* and rewrite.* keys, with the MM_SLASH_TOKEN environment
/// variable taking precedence over commands.token. Rules listed under
/// rewrite.rules are appended after the built-in table, in file order.
pub fn build_http_config(cfg: &Value) -> Result<HttpConfig, String> {
    let commands = cfg.get("commands").and_then(|v| v.as_object());
    let rewrite = cfg.get("rewrite").and_then(|v| v.as_object());

    let cfg_token = commands
        .and_then(|c| c.get("token"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());
    let slash_token = std::env::var("MM_SLASH_TOKEN").ok().or(cfg_token);

    let mut rules = RuleSet::standard();
    if let Some(extra) = rewrite.and_then(|r| r.get("rules")) {
        let parsed: Vec<SubstitutionRule> = serde_json::from_value(extra.clone())
            .map_err(|e| format!("invalid rewrite.rules entry: {}", e))?;
        rules.extend(parsed);
    }

    let max_body_bytes = commands
        .and_then(|c| c.get("maxBodyBytes"))
        .and_then(|v| v.as_u64())
        .map(|n| n as usize)
        .unwrap_or(DEFAULT_MAX_BODY_BYTES);

    Ok(HttpConfig {
        slash_token,
        rules,
        max_body_bytes,
    })
}

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<HttpConfig>,
    /// Server start time (Unix timestamp)
    pub start_time: i64,
}

/// Error body for validation and authentication failures
#[derive(Debug, Serialize)]
pub struct CommandErrorResponse {
    pub error: String,
}

impl CommandErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

/// Create the HTTP router with all endpoints
pub fn create_router(config: HttpConfig) -> Router {
    let max_body_bytes = config.max_body_bytes;
    let state = AppState {
        config: Arc::new(config),
        start_time: chrono::Utc::now().timestamp(),
    };

    Router::new()
        .route("/", get(pages::home_handler))
        .route("/style.css", get(pages::style_handler))
        .route("/health", get(health_handler))
        .route("/nit", post(slash_command_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .fallback(pages::not_found_handler)
        .with_state(state)
}

/// GET /health - Lightweight liveness probe.
async fn health_handler(State(state): State<AppState>) -> Response {
    let uptime = chrono::Utc::now().timestamp() - state.start_time;
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "uptimeSeconds": uptime,
        })),
    )
        .into_response()
}

/// POST /nit - Rewrite recognized links in the submitted text.
async fn slash_command_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Validate required headers before touching the body
    if let Some(err) = check_required_headers(&headers) {
        return err;
    }

    // Check the token
    if let Some(err) = check_slash_auth(&state.config, &headers) {
        return err;
    }

    // Extract the text form field; a malformed body is fatal for this
    // request only and surfaces a generic error without detail
    let form: SlashForm = match serde_urlencoded::from_bytes(&body) {
        Ok(form) => form,
        Err(e) => {
            debug!("rejecting malformed command body: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(CommandErrorResponse::new("malformed request body")),
            )
                .into_response();
        }
    };

    let response = run_rewrite_command(&state.config.rules, form.text.as_deref());
    (StatusCode::OK, Json(response)).into_response()
}

/// Confirm the headers the slash command contract requires are present.
/// Returns a 400 response naming the first missing header.
fn check_required_headers(headers: &HeaderMap) -> Option<Response> {
    for name in ["authorization", "content-type"] {
        if !headers.contains_key(name) {
            return Some(
                (
                    StatusCode::BAD_REQUEST,
                    Json(CommandErrorResponse::new(&format!(
                        "missing required header: {}",
                        name
                    ))),
                )
                    .into_response(),
            );
        }
    }
    None
}

/// Authenticate the request token. Fails closed when no token is
/// configured, and answers every failure with the same generic 401.
fn check_slash_auth(config: &HttpConfig, headers: &HeaderMap) -> Option<Response> {
    if config.slash_token.is_none() {
        warn!("slash token not configured; rejecting command request");
    }

    let provided = auth::extract_slash_token(headers).unwrap_or_default();
    if auth::verify_slash_token(&provided, config.slash_token.as_deref()) {
        None
    } else {
        Some(unauthorized_response())
    }
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(CommandErrorResponse::new(INVALID_REQUEST_MESSAGE)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config_with_token(token: &str) -> HttpConfig {
        HttpConfig {
            slash_token: Some(token.to_string()),
            ..Default::default()
        }
    }

    fn headers_with(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(
                axum::http::header::HeaderName::try_from(*name).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        headers
    }

    #[test]
    fn test_required_headers_present() {
        let headers = headers_with(&[
            ("authorization", "Token x"),
            ("content-type", "application/x-www-form-urlencoded"),
        ]);
        assert!(check_required_headers(&headers).is_none());
    }

    #[test]
    fn test_missing_authorization_header_rejected() {
        let headers = headers_with(&[("content-type", "application/x-www-form-urlencoded")]);
        let response = check_required_headers(&headers).unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_content_type_header_rejected() {
        let headers = headers_with(&[("authorization", "Token x")]);
        let response = check_required_headers(&headers).unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_auth_accepts_matching_token() {
        let config = config_with_token("s3cret");
        let headers = headers_with(&[("authorization", "Token s3cret")]);
        assert!(check_slash_auth(&config, &headers).is_none());
    }

    #[test]
    fn test_auth_rejects_wrong_token() {
        let config = config_with_token("s3cret");
        let headers = headers_with(&[("authorization", "Token nope")]);
        let response = check_slash_auth(&config, &headers).unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_auth_rejects_wrong_scheme() {
        let config = config_with_token("s3cret");
        let headers = headers_with(&[("authorization", "Bearer s3cret")]);
        let response = check_slash_auth(&config, &headers).unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_auth_fails_closed_without_configured_token() {
        let config = HttpConfig::default();
        let headers = headers_with(&[("authorization", "Token anything")]);
        let response = check_slash_auth(&config, &headers).unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_build_http_config_appends_config_rules() {
        let cfg = json!({
            "rewrite": {
                "rules": [
                    { "pattern": "reddit.com", "replacement": "redlib.example" }
                ]
            }
        });
        let http_config = build_http_config(&cfg).unwrap();
        assert_eq!(
            http_config.rules.rewrite("twitter.com reddit.com"),
            "nitter.net redlib.example"
        );
    }

    #[test]
    fn test_build_http_config_rejects_malformed_rules() {
        let cfg = json!({
            "rewrite": { "rules": [{ "pattern": "no replacement" }] }
        });
        assert!(build_http_config(&cfg).is_err());
    }

    #[test]
    fn test_build_http_config_reads_body_limit() {
        let cfg = json!({ "commands": { "maxBodyBytes": 1024 } });
        let http_config = build_http_config(&cfg).unwrap();
        assert_eq!(http_config.max_body_bytes, 1024);
    }
}

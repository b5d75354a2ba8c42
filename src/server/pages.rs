//! Static pages
//!
//! Informational home page listing the available slash commands, the
//! stylesheet it references, and the catch-all 404 page. These are plain
//! collaborators around the command handler; no state, no templating.

use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};

const HOME_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Mirrorbot</title>
    <link rel="stylesheet" href="style.css" />
  </head>
  <body>
    <article>
      <main>
        <h1>&#129302; Mirrorbot</h1>
        <h2>Available Commands</h2>
        <ul>
          <li><code>/nit</code> &mdash; Rewrite links to privacy-friendly mirrors</li>
        </ul>
      </main>
    </article>
  </body>
</html>
"#;

const NOT_FOUND_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Mirrorbot</title>
    <link rel="stylesheet" href="style.css" />
  </head>
  <body>
    <article>
      <main>
        <h1>Not Found</h1>
        <p>&#129302; Bleep Bloop. This page could not be found.</p>
      </main>
    </article>
  </body>
</html>
"#;

const STYLE_CSS: &str = r#"body {
  font-family: system-ui, sans-serif;
  margin: 0 auto;
  max-width: 40rem;
  padding: 2rem 1rem;
  line-height: 1.5;
}

code {
  background: #eee;
  border-radius: 3px;
  padding: 0.1rem 0.3rem;
}
"#;

/// GET / - Informational page listing available commands.
pub async fn home_handler() -> Html<&'static str> {
    Html(HOME_HTML)
}

/// GET /style.css - Stylesheet for the static pages.
pub async fn style_handler() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLE_CSS,
    )
        .into_response()
}

/// Catch-all 404 page.
pub async fn not_found_handler() -> Response {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML)).into_response()
}

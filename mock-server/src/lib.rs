//! Canned-response HTTP server used to exercise the raw client end to end.
//!
//! Each route produces one framing case the client has to handle: a
//! Content-Length body, a chunked body, bodiless statuses, repeated headers,
//! and an echo of the request as the server saw it.

use std::convert::Infallible;

use axum::{
    body::Body,
    http::{header::SET_COOKIE, HeaderMap, Method, StatusCode, Uri},
    response::{AppendHeaders, IntoResponse},
    routing::{any, get},
    Json, Router,
};
use futures_util::stream;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

/// Pieces streamed by `/chunked`; each becomes one chunk on the wire.
pub const CHUNKS: [&str; 2] = ["Wiki", "pedia"];

pub const HELLO_BODY: &str = "hello, world";

pub const COOKIES: [&str; 2] = ["session=abc123", "theme=dark"];

/// What `/echo` saw of the incoming request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoReport {
    pub method: String,
    /// Path plus query string.
    pub target: String,
    /// Header names as the server normalized them (lower-case), in order.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl EchoReport {
    /// First value of `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route("/chunked", get(chunked))
        .route("/no-content", get(no_content))
        .route("/not-modified", get(not_modified))
        .route("/cookies", get(cookies))
        .route("/echo", any(echo))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn hello() -> &'static str {
    HELLO_BODY
}

async fn chunked() -> Body {
    let pieces = CHUNKS.map(Ok::<_, Infallible>);
    Body::from_stream(stream::iter(pieces))
}

async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn not_modified() -> StatusCode {
    StatusCode::NOT_MODIFIED
}

async fn cookies() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, COOKIES[0]), (SET_COOKIE, COOKIES[1])]),
        "cookies set",
    )
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<EchoReport> {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    debug!(%method, %target, "echo");

    Json(EchoReport {
        method: method.to_string(),
        target,
        headers,
        body,
    })
}

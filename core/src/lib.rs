//! Minimal blocking HTTP/1.1 client over raw TCP sockets.
//!
//! # Overview
//! Each request dials a fresh `TcpStream`, writes the request line and
//! headers by hand, and parses the server's raw byte stream into an
//! `HttpResponse`, decoding chunked transfer-encoding when present.
//!
//! # Design
//! - `parse` works on any `BufRead`, so protocol handling is tested against
//!   in-memory bytes with no network involved.
//! - `transport` owns the socket for exactly one call and closes it on
//!   every exit path. No pooling, TLS, redirects, retries or timeouts.
//! - `Client` is an explicit handle built from a validated `ClientConfig`
//!   rather than global state.
//! - Diagnostics go through `tracing`; nothing is printed.

pub mod client;
pub mod error;
pub mod http;
pub mod parse;
pub mod transport;

pub use client::{Client, ClientConfig};
pub use error::{ConfigError, FetchError, ParseError};
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse};
pub use parse::parse_response;
pub use transport::{fetch, write_request, Target};

//! Error types for the raw HTTP client.
//!
//! # Design
//! Each stage gets its own enum: `ParseError` for reading the response off
//! the wire, `FetchError` for the full round-trip (URL, dial, write, then
//! parse), and `ConfigError` for rejecting a bad `ClientConfig` up front.
//! Every variant keeps the underlying cause so callers can inspect it; none
//! of them is retried inside this crate.

use std::io;
use std::num::ParseIntError;

use thiserror::Error;

/// Failures while reading a response from a byte stream.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The stream failed or hit EOF before a full status line (includes an empty stream).
    #[error("failed to read status line: {0}")]
    StatusLineRead(#[source] io::Error),

    /// The status line has fewer than two space-separated fields.
    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),

    /// The protocol field does not start with `HTTP/`.
    #[error("invalid protocol: {0:?}")]
    InvalidProtocol(String),

    /// The status code is not a base-10 integer that fits in `u16`.
    #[error("invalid status code {code:?}: {source}")]
    InvalidStatusCode {
        code: String,
        #[source]
        source: ParseIntError,
    },

    /// The stream failed or ended before the blank line closing the headers.
    #[error("failed to read headers: {0}")]
    HeaderRead(#[source] io::Error),

    /// A header line has no colon.
    #[error("malformed header line: {0:?}")]
    MalformedHeaderLine(String),

    /// A chunk-size line is not a bare hexadecimal number.
    #[error("invalid chunk size {line:?}: {source}")]
    InvalidChunkSize {
        line: String,
        #[source]
        source: ParseIntError,
    },

    /// Chunk data, its CRLF, or the final trailer line could not be read in full.
    #[error("failed to read chunk: {0}")]
    ChunkRead(#[source] io::Error),

    /// `Content-Length` is not an unsigned integer.
    #[error("invalid Content-Length {value:?}: {source}")]
    InvalidContentLength {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// The body was shorter than `Content-Length`, or reading to EOF failed.
    #[error("failed to read body: {0}")]
    BodyRead(#[source] io::Error),
}

/// Failures of a complete request/response round-trip.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL string could not be parsed.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL parsed but names no host to dial.
    #[error("URL {0:?} has no host")]
    MissingHost(String),

    /// The TCP connection to `addr` could not be opened.
    #[error("failed to connect to {addr}: {source}")]
    Dial {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Writing the request to the socket failed.
    #[error("failed to send request: {0}")]
    Write(#[source] io::Error),

    /// The response could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Rejected `ClientConfig` values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A header name is empty or contains `:`, whitespace or control characters.
    #[error("invalid header name {0:?}")]
    InvalidHeaderName(String),

    /// A header value contains CR or LF.
    #[error("invalid value for header {name:?}")]
    InvalidHeaderValue { name: String },
}

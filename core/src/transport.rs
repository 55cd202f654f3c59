//! One-shot HTTP/1.1 transport over a plain TCP socket.
//!
//! # Design
//! `fetch` resolves the URL, dials a fresh `TcpStream`, writes the request,
//! then hands a `BufReader` over the same stream to `parse_response`. The
//! stream is owned by the `fetch` frame, so it is closed on every return
//! path. There is no pooling, TLS, redirect handling, retry or timeout.
//!
//! Serialization is split out into `write_request` so the exact wire bytes
//! can be checked against an in-memory `Vec<u8>`.

use std::io::{self, BufReader, Write};
use std::net::TcpStream;

use tracing::debug;
use url::{Host, Url};

use crate::error::FetchError;
use crate::http::{HttpRequest, HttpResponse};
use crate::parse::parse_response;

/// Port used when the URL does not name one. The scheme is never consulted.
pub const DEFAULT_PORT: u16 = 80;

/// Where a request goes: the dial target and the request-target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Host as written in the `Host` header (IPv6 keeps its brackets).
    pub host: String,
    pub port: u16,
    /// Path plus query, `/` when empty.
    pub path: String,
    dial_host: String,
}

impl Target {
    /// Resolve an absolute URL string into its dial target.
    pub fn from_url(raw: &str) -> Result<Self, FetchError> {
        let url = Url::parse(raw).map_err(|source| FetchError::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;

        let (host, dial_host) = match url.host() {
            Some(Host::Ipv6(addr)) => (format!("[{addr}]"), addr.to_string()),
            Some(host) => (host.to_string(), host.to_string()),
            None => return Err(FetchError::MissingHost(raw.to_string())),
        };
        if dial_host.is_empty() {
            return Err(FetchError::MissingHost(raw.to_string()));
        }

        let mut path = url.path().to_string();
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }
        if path.is_empty() {
            path.push('/');
        }

        Ok(Self {
            host,
            port: url.port().or_else(|| written_port(raw)).unwrap_or(DEFAULT_PORT),
            path,
            dial_host,
        })
    }

    /// `host:port` as used for dialing and in error messages.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Port spelled out in the authority of `raw`.
///
/// `Url::port` drops a port equal to the scheme's default (`https://h:443`),
/// but a written port must still be dialed as written.
fn written_port(raw: &str) -> Option<u16> {
    let rest = raw.trim().split_once("://")?.1;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit('@').next()?;
    let (_, port) = host_port.rsplit_once(':')?;
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    port.parse().ok()
}

/// Serialize `request` for `target` and write it with a single `write_all`.
///
/// Wire layout: request line, `Host`, caller headers in order,
/// `Content-Length` when a body is present, `Connection: close`, blank line,
/// body.
pub fn write_request<W: Write>(
    writer: &mut W,
    request: &HttpRequest,
    target: &Target,
) -> io::Result<()> {
    let mut wire = Vec::with_capacity(256);
    wire.extend_from_slice(
        format!("{} {} HTTP/1.1\r\n", request.method, target.path).as_bytes(),
    );
    wire.extend_from_slice(format!("Host: {}\r\n", target.host).as_bytes());
    for (name, value) in &request.headers {
        wire.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
    }
    if let Some(body) = &request.body {
        wire.extend_from_slice(format!("Content-Length: {}\r\n", body.len()).as_bytes());
    }
    wire.extend_from_slice(b"Connection: close\r\n\r\n");
    if let Some(body) = &request.body {
        wire.extend_from_slice(body);
    }

    writer.write_all(&wire)?;
    writer.flush()
}

/// Perform one request on a freshly dialed connection and read the response.
///
/// The connection is closed before this returns, whatever the outcome.
pub fn fetch(request: &HttpRequest) -> Result<HttpResponse, FetchError> {
    let target = Target::from_url(&request.url)?;
    let addr = target.address();

    debug!(%addr, method = %request.method, path = %target.path, "dialing");
    let mut stream = TcpStream::connect((target.dial_host.as_str(), target.port))
        .map_err(|source| FetchError::Dial {
            addr: addr.clone(),
            source,
        })?;

    write_request(&mut stream, request, &target).map_err(FetchError::Write)?;
    debug!(%addr, "request sent");

    let response = parse_response(BufReader::new(&stream))?;
    debug!(%addr, status = response.status_code, "response received");
    Ok(response)
}

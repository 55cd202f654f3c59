//! HTTP/1.1 response parser over any buffered byte source.
//!
//! # Design
//! The parser only needs two capabilities: read a `\n`-terminated line and
//! read exactly N bytes. Both come from `std::io::BufRead`, so the same code
//! runs against a `BufReader<TcpStream>` in production and a `&[u8]` in
//! tests.
//!
//! Parsing is a strict sequence with no backtracking:
//! status line, header block, body framing, body. The first failure aborts
//! the whole parse and no partial `HttpResponse` escapes.

use std::io::{self, BufRead, Read};

use tracing::{debug, trace};

use crate::error::ParseError;
use crate::http::{Headers, HttpResponse};

/// Read one complete response from `reader`.
///
/// Body framing, in priority order:
/// 1. 1xx, 204 and 304 responses have no body.
/// 2. `Transfer-Encoding: chunked` is decoded.
/// 3. `Content-Length` bytes are read.
/// 4. If nothing was read so far, everything up to EOF is the body.
pub fn parse_response<R: BufRead>(mut reader: R) -> Result<HttpResponse, ParseError> {
    let (proto, status_code) = read_status_line(&mut reader)?;
    let headers = read_headers(&mut reader)?;
    let body = read_body(&mut reader, status_code, &headers)?;

    debug!(
        status = status_code,
        %proto,
        headers = headers.len(),
        body_len = body.len(),
        "parsed response"
    );

    Ok(HttpResponse {
        status_code,
        proto,
        headers,
        body,
    })
}

/// Read a `\n`-terminated line. Hitting EOF before `\n` is an error.
fn read_line<R: BufRead>(reader: &mut R) -> io::Result<String> {
    let mut buf = Vec::new();
    reader.read_until(b'\n', &mut buf)?;
    if buf.last() != Some(&b'\n') {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed before end of line",
        ));
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Append exactly `len` bytes to `out`, failing on a short read.
fn read_exact_len<R: Read>(reader: &mut R, len: u64, out: &mut Vec<u8>) -> io::Result<()> {
    let read = reader.take(len).read_to_end(out)? as u64;
    if read < len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {len} bytes, got {read}"),
        ));
    }
    Ok(())
}

fn read_status_line<R: BufRead>(reader: &mut R) -> Result<(String, u16), ParseError> {
    let line = read_line(reader).map_err(ParseError::StatusLineRead)?;
    let line = line.trim();

    // proto, code, optional reason phrase
    let parts: Vec<&str> = line.splitn(3, ' ').collect();
    if parts.len() < 2 {
        return Err(ParseError::MalformedStatusLine(line.to_string()));
    }

    let proto = parts[0];
    if !proto.starts_with("HTTP/") {
        return Err(ParseError::InvalidProtocol(proto.to_string()));
    }

    let status_code = parts[1]
        .parse::<u16>()
        .map_err(|source| ParseError::InvalidStatusCode {
            code: parts[1].to_string(),
            source,
        })?;

    Ok((proto.to_string(), status_code))
}

fn read_headers<R: BufRead>(reader: &mut R) -> Result<Headers, ParseError> {
    let mut headers = Headers::new();
    loop {
        let line = read_line(reader).map_err(ParseError::HeaderRead)?;
        if line == "\r\n" {
            return Ok(headers);
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::MalformedHeaderLine(line.trim_end().to_string()))?;
        headers.append(name.trim(), value.trim());
    }
}

fn read_body<R: BufRead>(
    reader: &mut R,
    status_code: u16,
    headers: &Headers,
) -> Result<Vec<u8>, ParseError> {
    if !status_allows_body(status_code) {
        trace!(status = status_code, "status forbids a body");
        return Ok(Vec::new());
    }

    let mut body = Vec::new();
    if is_chunked(headers) {
        trace!("reading chunked body");
        body = read_chunked_body(reader)?;
    } else if let Some(value) = headers.get("content-length") {
        let len = value
            .parse::<u64>()
            .map_err(|source| ParseError::InvalidContentLength {
                value: value.to_string(),
                source,
            })?;
        trace!(len, "reading content-length body");
        read_exact_len(reader, len, &mut body).map_err(ParseError::BodyRead)?;
    }

    if body.is_empty() {
        trace!("reading body until EOF");
        reader
            .read_to_end(&mut body)
            .map_err(ParseError::BodyRead)?;
    }

    Ok(body)
}

fn read_chunked_body<R: BufRead>(reader: &mut R) -> Result<Vec<u8>, ParseError> {
    let mut body = Vec::new();
    loop {
        let line = read_line(reader).map_err(ParseError::ChunkRead)?;
        let size_text = line.trim();
        let size = u64::from_str_radix(size_text, 16).map_err(|source| {
            ParseError::InvalidChunkSize {
                line: size_text.to_string(),
                source,
            }
        })?;

        if size == 0 {
            // trailer block terminator
            read_line(reader).map_err(ParseError::ChunkRead)?;
            return Ok(body);
        }

        read_exact_len(reader, size, &mut body).map_err(ParseError::ChunkRead)?;
        read_line(reader).map_err(ParseError::ChunkRead)?;
        trace!(size, total = body.len(), "read chunk");
    }
}

fn is_chunked(headers: &Headers) -> bool {
    headers
        .get_all("transfer-encoding")
        .iter()
        .any(|encoding| encoding.eq_ignore_ascii_case("chunked"))
}

/// 1xx, 204 and 304 responses never carry a body.
fn status_allows_body(status_code: u16) -> bool {
    !(status_code == 204 || status_code == 304 || (100..200).contains(&status_code))
}

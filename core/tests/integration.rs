//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every framing case
//! through `Client` over a real TCP connection. Bodies are cross-checked
//! against what ureq reads from the same routes.

use std::net::SocketAddr;
use std::sync::Arc;

use mock_server::{EchoReport, CHUNKS, COOKIES, HELLO_BODY};
use wirefetch_core::{Client, ClientConfig, HttpMethod, HttpRequest};

/// Spawn the mock server on its own runtime thread and return its address.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client() -> Client {
    Client::new(ClientConfig::default()).unwrap()
}

/// Body of `url` as read by ureq, for comparison.
fn reference_body(url: &str) -> Vec<u8> {
    let mut response = ureq::get(url).call().expect("ureq transport error");
    response.body_mut().read_to_vec().unwrap()
}

#[test]
fn content_length_body() {
    let addr = start_server();
    let url = format!("http://{addr}/hello");

    let response = client().get(&url).unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.proto, "HTTP/1.1");
    assert_eq!(response.header("content-length"), Some("12"));
    assert_eq!(response.text().unwrap(), HELLO_BODY);
    assert_eq!(response.body, reference_body(&url));
}

#[test]
fn chunked_body() {
    let addr = start_server();
    let url = format!("http://{addr}/chunked");

    let response = client().get(&url).unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.header("Transfer-Encoding"), Some("chunked"));
    assert_eq!(response.body, CHUNKS.concat().as_bytes());
    assert_eq!(response.body, reference_body(&url));
}

#[test]
fn bodiless_statuses() {
    let addr = start_server();
    let c = client();

    let response = c.get(&format!("http://{addr}/no-content")).unwrap();
    assert_eq!(response.status_code, 204);
    assert!(response.body.is_empty());

    let response = c.get(&format!("http://{addr}/not-modified")).unwrap();
    assert_eq!(response.status_code, 304);
    assert!(response.body.is_empty());
}

#[test]
fn repeated_headers() {
    let addr = start_server();

    let response = client().get(&format!("http://{addr}/cookies")).unwrap();
    assert_eq!(response.headers.get_all("Set-Cookie"), COOKIES);
    assert_eq!(response.text().unwrap(), "cookies set");
}

#[test]
fn not_found_is_a_response_not_an_error() {
    let addr = start_server();

    let response = client().get(&format!("http://{addr}/missing")).unwrap();
    assert_eq!(response.status_code, 404);
    assert!(!response.is_success());
}

#[test]
fn server_sees_request_as_written() {
    let addr = start_server();
    let request = HttpRequest::get(format!("http://{addr}/echo?city=Paris&days=2"))
        .header("X-Trace", "abc");

    let response = client().fetch(request).unwrap();
    let report: EchoReport = response.json().unwrap();
    assert_eq!(report.method, "GET");
    assert_eq!(report.target, "/echo?city=Paris&days=2");
    assert_eq!(report.header("host"), Some("127.0.0.1"));
    assert_eq!(report.header("connection"), Some("close"));
    assert_eq!(report.header("x-trace"), Some("abc"));
    assert_eq!(report.header("accept"), Some("*/*"));
    assert!(report.header("user-agent").unwrap().starts_with("wirefetch/"));
    assert!(report.body.is_empty());
}

#[test]
fn request_body_is_delivered() {
    let addr = start_server();
    let request = HttpRequest::new(HttpMethod::Put, format!("http://{addr}/echo"))
        .header("Content-Type", "text/plain")
        .body("new contents");

    let response = client().fetch(request).unwrap();
    let report: EchoReport = response.json().unwrap();
    assert_eq!(report.method, "PUT");
    assert_eq!(report.header("content-length"), Some("12"));
    assert_eq!(report.body, "new contents");
}

#[test]
fn concurrent_calls_share_one_client() {
    let addr = start_server();
    let client = Arc::new(client());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = Arc::clone(&client);
            let url = format!("http://{addr}/chunked");
            std::thread::spawn(move || client.get(&url).unwrap().body)
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), b"Wikipedia");
    }
}

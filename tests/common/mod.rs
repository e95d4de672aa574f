#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

/// Canned ipgeolocation.io reply for 8.8.8.8.
pub const GOOGLE_DNS_REPLY: &str = include_str!("../fixtures/ipgeo_8.8.8.8.json");

/// Canned ipgeolocation.io reply for a bogon address.
pub const BOGON_REPLY: &str = include_str!("../fixtures/ipgeo_bogon.json");

/// UUID carried by `fixtures/request_ip_dst.json`.
pub const FIXTURE_UUID: &str = "0a8a4b9e-4c1b-4f55-9a51-3c6b4d3a2e10";

pub fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(name);
    path
}

/// A local HTTP server that answers exactly one request.
pub struct MockServer {
    pub base_url: String,
    handle: JoinHandle<String>,
}

impl MockServer {
    /// Wait for the request to be served and return its request line,
    /// e.g. `GET /ipgeo?apiKey=k&ip=8.8.8.8 HTTP/1.1`.
    ///
    /// Only call this when a request is known to have been sent.
    pub fn request_line(self) -> String {
        self.handle.join().expect("mock server thread panicked")
    }
}

/// Serve one request with the given status line (e.g. `403 Forbidden`) and
/// JSON body.
pub fn serve_once(status: &str, body: &str) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
    let addr = listener.local_addr().expect("mock server address");
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept connection");
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).expect("read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }
        stream
            .write_all(response.as_bytes())
            .expect("write response");
        stream.flush().expect("flush response");

        String::from_utf8_lossy(&request)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    });

    MockServer {
        base_url: format!("http://{addr}/ipgeo"),
        handle,
    }
}

/// A base URL nothing is listening on.
pub fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);
    format!("http://{addr}/ipgeo")
}

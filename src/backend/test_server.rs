//! One-shot HTTP server for exercising the client against canned responses.

use std::io::{self, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

/// What the server saw: request line and decoded JSON body (if any).
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub body: String,
}

impl CapturedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("captured body should be json")
    }
}

pub fn json_response(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// Serves exactly one connection with `response`, returning the base URL and a
/// receiver that yields the captured request.
pub fn spawn_single_response_server(response: String) -> (String, mpsc::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("listener should bind");
    let port = listener
        .local_addr()
        .expect("listener should have local addr")
        .port();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("server should accept one socket");
        let captured = read_request(&mut stream).expect("server should read request");
        let _ = tx.send(captured);
        stream
            .write_all(response.as_bytes())
            .expect("server should write response");
    });

    (format!("http://127.0.0.1:{port}"), rx)
}

/// Base URL of a port nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("listener should bind");
    let port = listener
        .local_addr()
        .expect("listener should have local addr")
        .port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

fn read_request(stream: &mut impl Read) -> io::Result<CapturedRequest> {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let read = stream.read(&mut chunk)?;
        if read == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "request ended early"));
        }
        raw.extend_from_slice(&chunk[..read]);
        if let Some(position) = raw.windows(4).position(|window| window == b"\r\n\r\n") {
            break position + 4;
        }
    };

    let head = String::from_utf8_lossy(&raw[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while raw.len() < header_end + content_length {
        let read = stream.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        raw.extend_from_slice(&chunk[..read]);
    }

    let request_line = head.lines().next().unwrap_or_default().to_string();
    let body_end = raw.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&raw[header_end..body_end]).to_string();

    Ok(CapturedRequest { request_line, body })
}

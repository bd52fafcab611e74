//! Minimal scripted HTTP server for exercising the fetch engine.
//!
//! Serves one scripted response per connection, in order; once the script
//! is exhausted the last entry repeats. Records request paths and
//! authorization headers so tests can assert on the wire format. Every
//! response carries `Connection: close`, so each fetch attempt shows up
//! as its own connection.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// One scripted HTTP response.
#[derive(Debug, Clone)]
pub struct StubResponse {
    status: u16,
    reason: &'static str,
    body: String,
    location: Option<&'static str>,
}

impl StubResponse {
    /// 200 with a JSON body.
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            reason: "OK",
            body: body.to_string(),
            location: None,
        }
    }

    /// A bare status with an empty body.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            reason: reason_for(status),
            body: String::new(),
            location: None,
        }
    }

    /// A redirect to the HTML settings page, as the buggy API produces.
    pub fn redirect(status: u16) -> Self {
        Self {
            status,
            reason: reason_for(status),
            body: String::new(),
            location: Some("/account/gh/settings"),
        }
    }
}

fn reason_for(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        307 => "Temporary Redirect",
        404 => "Not Found",
        418 => "I'm a teapot",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Status",
    }
}

/// A request observed by the stub.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    /// Request path, e.g. `/api/v2/github/acme/repos/widget/config/`.
    pub path: String,
    /// Value of the `Authorization` header, if sent.
    pub authorization: Option<String>,
}

/// Handle to a running stub server.
pub struct StubApi {
    /// Base URL of the listener, e.g. `http://127.0.0.1:49152`.
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl StubApi {
    /// Number of requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Requests observed so far, in arrival order.
    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

/// Starts a stub serving `script`, one response per connection.
pub fn start(script: Vec<StubResponse>) -> StubApi {
    assert!(
        !script.is_empty(),
        "script must contain at least one response"
    );

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");
    let hits = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));

    {
        let hits = Arc::clone(&hits);
        let seen = Arc::clone(&seen);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let index = hits.fetch_add(1, Ordering::SeqCst);
                let response = script
                    .get(index)
                    .unwrap_or_else(|| script.last().expect("script is non-empty"));
                serve_one(stream, response, &seen);
            }
        });
    }

    StubApi {
        base_url: format!("http://{addr}"),
        hits,
        seen,
    }
}

fn serve_one(mut stream: TcpStream, response: &StubResponse, seen: &Mutex<Vec<SeenRequest>>) {
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string();

    let mut authorization = None;
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) => break,
            Ok(_) if header.trim().is_empty() => break,
            Ok(_) => {
                if let Some((name, value)) = header.split_once(':') {
                    if name.eq_ignore_ascii_case("authorization") {
                        authorization = Some(value.trim().to_string());
                    }
                }
            }
            Err(_) => return,
        }
    }

    seen.lock().unwrap().push(SeenRequest {
        path,
        authorization,
    });

    let mut head = format!("HTTP/1.1 {} {}\r\n", response.status, response.reason);
    if let Some(location) = response.location {
        head.push_str(&format!("Location: {location}\r\n"));
    }
    head.push_str(&format!(
        "Content-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.body.len()
    ));

    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(response.body.as_bytes());
    let _ = stream.flush();
}

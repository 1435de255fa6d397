//! Minimal HTTP/1.1 hub stand-in for integration tests.
//!
//! Routes GET requests by path (query string ignored). A route can refuse its
//! first `failures` requests with 503 before serving its body. Every request
//! line is recorded so tests can assert what the client asked for.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub struct Route {
    pub path: String,
    pub body: Vec<u8>,
    /// Requests answered with 503 before the body is served.
    pub failures: u32,
    /// Basic-auth header value required, if any.
    pub require_auth: Option<String>,
}

impl Route {
    pub fn ok(path: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.to_string(),
            body: body.into(),
            failures: 0,
            require_auth: None,
        }
    }

    pub fn failing(mut self, failures: u32) -> Self {
        self.failures = failures;
        self
    }

    pub fn with_auth(mut self, header_value: &str) -> Self {
        self.require_auth = Some(header_value.to_string());
        self
    }
}

pub struct Hub {
    /// e.g. "http://127.0.0.1:12345"
    pub base: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl Hub {
    pub fn requested_paths(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts the server in a background thread. It runs until the process exits.
pub fn start(routes: Vec<Route>) -> Hub {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(Mutex::new(routes));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, &routes, &seen));
        }
    });
    Hub {
        base: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn handle(mut stream: TcpStream, routes: &Mutex<Vec<Route>>, seen: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let (target, auth) = parse_request(request);
    seen.lock().unwrap().push(target.to_string());
    let path = target.split('?').next().unwrap_or("");

    let mut routes = routes.lock().unwrap();
    let Some(route) = routes.iter_mut().find(|r| r.path == path) else {
        respond(&mut stream, "404 Not Found", b"");
        return;
    };
    if let Some(expected) = &route.require_auth {
        if auth.as_deref() != Some(expected.as_str()) {
            respond(&mut stream, "401 Unauthorized", b"");
            return;
        }
    }
    if route.failures > 0 {
        route.failures -= 1;
        respond(&mut stream, "503 Service Unavailable", b"maintenance");
        return;
    }
    let body = route.body.clone();
    drop(routes);
    respond(&mut stream, "200 OK", &body);
}

fn respond(stream: &mut TcpStream, status: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}

/// Returns (request target, optional Authorization header value).
fn parse_request(request: &str) -> (&str, Option<String>) {
    let mut target = "";
    let mut auth = None;
    for (i, line) in request.lines().enumerate() {
        let line = line.trim();
        if i == 0 {
            target = line.split_whitespace().nth(1).unwrap_or("");
            continue;
        }
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("authorization") {
                auth = Some(value.trim().to_string());
            }
        }
    }
    (target, auth)
}

//! Minimal HTTP/1.1 server standing in for the hindcast archive in integration tests.
//!
//! Answers every GET with a body derived from the request path, except paths
//! ending in one of the configured "missing" suffixes, which get 404. Counts
//! GET requests so tests can assert how many network calls were made.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

pub struct ArchiveServer {
    /// Archive root to hand to the resolver, e.g. `http://127.0.0.1:12345/archive/`.
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    paths: Arc<Mutex<Vec<String>>>,
}

impl ArchiveServer {
    /// Number of GET requests served so far (200 or 404).
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn requested_paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

/// Deterministic body for a path, large enough to span several receive chunks.
pub fn body_for(path: &str) -> Vec<u8> {
    path.as_bytes().iter().copied().cycle().take(20 * 1024 + path.len()).collect()
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start() -> ArchiveServer {
    start_with_missing(&[])
}

/// Like `start` but answers 404 for request paths ending in any of `missing`.
pub fn start_with_missing(missing: &[&str]) -> ArchiveServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let paths = Arc::new(Mutex::new(Vec::new()));
    let missing: Arc<Vec<String>> = Arc::new(missing.iter().map(|s| s.to_string()).collect());
    {
        let hits = Arc::clone(&hits);
        let paths = Arc::clone(&paths);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let hits = Arc::clone(&hits);
                let paths = Arc::clone(&paths);
                let missing = Arc::clone(&missing);
                thread::spawn(move || handle(stream, &hits, &paths, &missing));
            }
        });
    }
    ArchiveServer {
        base_url: format!("http://127.0.0.1:{}/archive/", port),
        hits,
        paths,
    }
}

fn handle(mut stream: TcpStream, hits: &AtomicUsize, paths: &Mutex<Vec<String>>, missing: &[String]) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let request = String::from_utf8_lossy(&request);
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("").to_string();
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }
    hits.fetch_add(1, Ordering::SeqCst);
    paths.lock().unwrap().push(path.clone());

    if missing.iter().any(|m| path.ends_with(m.as_str())) {
        let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }
    let body = body_for(&path);
    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
}

//! Test doubles: a scripted `QuoteSource` and a throwaway HTTP server.
#![allow(dead_code)]

use std::collections::HashSet;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use stock_common::{Provider, QuoteError, QuoteRecord, Result};
use stock_store::QuoteSource;

/// Counts fetches and answers with `"<TICKER> Inc."` records whose price is
/// the running fetch count.
#[derive(Default)]
pub struct ScriptedSource {
    calls: AtomicUsize,
    failing: Mutex<HashSet<String>>,
    delay: Mutex<Duration>,
}

impl ScriptedSource {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail(&self, ticker: &str) {
        self.failing.lock().unwrap().insert(ticker.to_string());
    }

    pub fn recover(&self, ticker: &str) {
        self.failing.lock().unwrap().remove(ticker);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }
}

impl QuoteSource for ScriptedSource {
    fn fetch(&self, ticker: &str, provider: Provider, credential: &str) -> Result<QuoteRecord> {
        // Delay is read first so a counted call has already picked its delay.
        let delay = *self.delay.lock().unwrap();
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        if self.failing.lock().unwrap().contains(ticker) {
            return Err(QuoteError::unavailable(provider, "scripted failure"));
        }
        Ok(QuoteRecord::new(
            format!("{} Inc.", ticker),
            n as f64,
            n as f64 / 100.0,
            credential,
        ))
    }
}

/// What the stub server does with one connection.
#[derive(Clone)]
pub enum Reply {
    /// Read the request, then close without answering.
    Drop,
    /// Answer with a status and body, then close.
    Respond(u16, String),
}

pub struct StubServer {
    pub base_url: String,
    connections: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Serves `script[i]` to the i-th connection; the last reply repeats.
    pub fn start(script: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let connections = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let counter = Arc::clone(&connections);
        let log = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let index = counter.fetch_add(1, Ordering::SeqCst);
                let reply = script
                    .get(index)
                    .or_else(|| script.last())
                    .cloned()
                    .unwrap_or(Reply::Drop);

                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                loop {
                    let mut header = String::new();
                    match reader.read_line(&mut header) {
                        Ok(0) => break,
                        Ok(_) if header == "\r\n" => break,
                        Ok(_) => {}
                        Err(_) => break,
                    }
                }
                log.lock().unwrap().push(request_line.trim().to_string());

                if let Reply::Respond(status, body) = reply {
                    let response = format!(
                        "HTTP/1.1 {} STUB\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = stream.write_all(response.as_bytes());
                    let _ = stream.flush();
                }
            }
        });

        StubServer {
            base_url,
            connections,
            requests,
        }
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

//! Long-lived HTTP connection to one provider host.
//!
//! Providers drop idle keep-alive connections, which surfaces as a reset or an
//! incomplete response on the next request. `PersistentConnection::get` then
//! reopens the connection and retries the request once.

use std::error::Error as StdError;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use stock_common::{Provider, QuoteError, Result};

/// Pooled blocking client bound to one base URL.
pub struct PersistentConnection {
    base_url: String,
    timeout: Duration,
    system_proxy: bool,
    client: Mutex<Client>,
}

impl PersistentConnection {
    /// Opens a connection pool for `base_url`.
    pub fn new(base_url: &str, timeout: Duration, system_proxy: bool) -> Result<Self> {
        let client = build_client(timeout, system_proxy)
            .map_err(|e| QuoteError::unavailable(base_url, e))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            system_proxy,
            client: Mutex::new(client),
        })
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues `GET base_url + path` with `query` and returns the body text.
    ///
    /// A connection-level failure triggers one reconnect and retry. Timeouts
    /// and non-success statuses are returned as `ProviderUnavailable` at once.
    pub fn get(&self, provider: Provider, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let client = self.client.lock()?.clone();

        let (status, body) = match self.round_trip(&client, path, query) {
            Ok(reply) => reply,
            Err(e) if is_disconnect(&e) => {
                warn!("{}: connection dropped ({}), reconnecting", provider, e);
                let fresh = self.reconnect(provider)?;
                self.round_trip(&fresh, path, query)
                    .map_err(|e| QuoteError::unavailable(provider, e))?
            }
            Err(e) => return Err(QuoteError::unavailable(provider, e)),
        };

        if !status.is_success() {
            return Err(QuoteError::unavailable(provider, format!("HTTP {}", status)));
        }
        Ok(body)
    }

    fn round_trip(
        &self,
        client: &Client,
        path: &str,
        query: &[(&str, &str)],
    ) -> reqwest::Result<(reqwest::StatusCode, String)> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);
        let response = client.get(&url).query(query).send()?;
        let status = response.status();
        let body = response.text()?;
        Ok((status, body))
    }

    fn reconnect(&self, provider: Provider) -> Result<Client> {
        let fresh = build_client(self.timeout, self.system_proxy)
            .map_err(|e| QuoteError::unavailable(provider, e))?;
        *self.client.lock()? = fresh.clone();
        Ok(fresh)
    }
}

fn build_client(timeout: Duration, system_proxy: bool) -> reqwest::Result<Client> {
    let builder = Client::builder().timeout(timeout);
    let builder = if system_proxy { builder } else { builder.no_proxy() };
    builder.build()
}

/// Whether the error means the peer went away rather than answered badly.
fn is_disconnect(err: &reqwest::Error) -> bool {
    if err.is_timeout() {
        return false;
    }
    if err.is_connect() || err.is_request() {
        return true;
    }

    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return matches!(
                io_err.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::UnexpectedEof
            );
        }
        source = cause.source();
    }
    false
}

//! HTTP transport seam and the blocking reqwest implementation.
//!
//! The session hands a [`TransportRequest`] and a [`BodySink`] to a
//! [`Transport`]; the transport streams the response body into the sink in
//! order and reports a coarse success or failure.

use std::collections::BTreeMap;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{COOKIE, SET_COOKIE};

use crate::global;
use crate::types::{TranslateError, TranslateResult};

/// User-Agent sent with every request. The mobile endpoint serves the plain
/// HTML result page to this browser.
pub const USER_AGENT: &str = "Mozilla/5.0 (S60; SymbOS; Opera Mobi/SYB-1103211396; U; es-LA; rv:1.9.1.6) Gecko/20091201 Firefox/3.5.6 Opera 11.00";

/// Name of the cookie file kept inside the cookie directory.
pub const COOKIE_FILE_NAME: &str = "gtranslate.cookie";

/// Size of each chunk handed to the body sink.
const CHUNK_SIZE: usize = 16 * 1024;

/// Maximum number of redirects followed.
const MAX_REDIRECTS: usize = 5;

/// Receives the response body, chunk by chunk, in order.
pub trait BodySink {
    /// Accept one chunk. An error aborts the transfer.
    fn write(&mut self, chunk: &[u8]) -> TranslateResult<()>;
}

/// Everything a transport needs to perform one request.
#[derive(Debug, Clone, Copy)]
pub struct TransportRequest<'a> {
    pub url: &'a str,
    pub headers: &'a [(&'a str, &'a str)],
    /// File used to load and persist cookies, if any.
    pub cookie_file: Option<&'a Path>,
}

/// Performs a request and streams the body into a sink.
pub trait Transport {
    /// Errors from the sink are returned unchanged; anything else the
    /// transport detects is a [`TranslateError::Transport`].
    fn perform(
        &mut self,
        request: &TransportRequest<'_>,
        sink: &mut dyn BodySink,
    ) -> TranslateResult<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn perform(
        &mut self,
        request: &TransportRequest<'_>,
        sink: &mut dyn BodySink,
    ) -> TranslateResult<()> {
        (**self).perform(request, sink)
    }
}

pub(crate) fn build_client(timeout: Option<Duration>) -> Client {
    let mut builder = Client::builder().redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_default()
}

/// Blocking HTTP transport backed by reqwest.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Use the process-wide client when [`crate::global_init`] has run,
    /// otherwise build a private one.
    pub fn new() -> Self {
        let client = global::shared_client().unwrap_or_else(|| build_client(None));
        Self { client }
    }

    /// Build a private client with a whole-request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: build_client(Some(timeout)),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn perform(
        &mut self,
        request: &TransportRequest<'_>,
        sink: &mut dyn BodySink,
    ) -> TranslateResult<()> {
        let mut builder = self.client.get(request.url);
        for (name, value) in request.headers {
            builder = builder.header(*name, *value);
        }

        let mut jar = request.cookie_file.map(CookieJar::load).unwrap_or_default();
        if let Some(cookie) = jar.header_value() {
            builder = builder.header(COOKIE, cookie);
        }

        let mut response = builder
            .send()
            .map_err(|e| TranslateError::Transport(e.to_string()))?;

        if let Some(path) = request.cookie_file {
            let set_cookies = response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok());
            if jar.merge_set_cookies(set_cookies) {
                jar.save(path);
            }
        }

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Transport(format!(
                "unexpected HTTP status {status}"
            )));
        }

        let mut chunk = vec![0u8; CHUNK_SIZE];
        let mut total = 0usize;
        loop {
            let n = match response.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(TranslateError::Transport(format!(
                        "failed reading response body: {e}"
                    )))
                }
            };
            sink.write(&chunk[..n])?;
            total += n;
        }

        tracing::debug!("Received {total} body bytes with status {status}");
        Ok(())
    }
}

/// Cookies persisted as `name=value` lines.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
}

impl CookieJar {
    /// Load cookies from `path`. A missing or unreadable file yields an
    /// empty jar.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable cookie file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Self {
        let cookies = contents
            .lines()
            .filter_map(|line| line.trim().split_once('='))
            .filter(|(name, _)| !name.trim().is_empty())
            .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
            .collect();
        Self { cookies }
    }

    /// Write the jar to `path`; failures are logged, not returned.
    pub fn save(&self, path: &Path) {
        if let Err(e) = std::fs::write(path, self.serialize()) {
            tracing::warn!("Failed to write cookie file {}: {e}", path.display());
        }
    }

    pub fn serialize(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}\n"))
            .collect()
    }

    /// Value for a `Cookie` request header, or `None` when empty.
    pub fn header_value(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        Some(pairs.join("; "))
    }

    /// Merge `Set-Cookie` header values. Returns whether anything changed.
    pub fn merge_set_cookies<'h>(&mut self, headers: impl IntoIterator<Item = &'h str>) -> bool {
        let mut changed = false;
        for header in headers {
            let pair = header.split(';').next().unwrap_or("");
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let value = value.trim();
            if self.cookies.get(name).map(String::as_str) != Some(value) {
                self.cookies.insert(name.to_string(), value.to_string());
                changed = true;
            }
        }
        changed
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

//! Translation session: configuration, request execution and result ownership.

use std::path::{Path, PathBuf};

use crate::buffer::{ResponseBuffer, DEFAULT_CAPACITY};
use crate::dirs::validate_dir;
use crate::extract::extract;
use crate::transport::{HttpTransport, Transport, TransportRequest, COOKIE_FILE_NAME, USER_AGENT};
use crate::types::{LangCode, TextSource, TranslateError, TranslateResult, Translation};
use crate::url::{build_url, DEFAULT_ENDPOINT};

/// A translation session.
///
/// Holds the languages and text to translate, a response buffer reused
/// across executions, and the last extracted result. Text set by reference
/// borrows the caller's bytes for `'a`.
///
/// Every fallible operation returns its error and also records the message,
/// readable through [`Session::last_error`]. A failed operation leaves the
/// previous configuration and result untouched.
pub struct Session<'a, T = HttpTransport> {
    transport: T,
    endpoint: String,
    source_lang: LangCode,
    target_lang: Option<LangCode>,
    text: TextSource<'a>,
    buffer: ResponseBuffer,
    result: Option<Vec<u8>>,
    last_translation: Option<Translation>,
    last_error: Option<String>,
    cache_dir: Option<PathBuf>,
    cookie_dir: Option<PathBuf>,
}

impl Session<'_, HttpTransport> {
    /// Create a session over the default HTTP transport.
    pub fn new() -> Self {
        Self::with_transport(HttpTransport::new())
    }
}

impl Default for Session<'_, HttpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Transport> Session<'a, T> {
    /// Create a session over a custom transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            source_lang: LangCode::auto(),
            target_lang: None,
            text: TextSource::default(),
            buffer: ResponseBuffer::new(),
            result: None,
            last_translation: None,
            last_error: None,
            cache_dir: None,
            cookie_dir: None,
        }
    }

    fn fail(&mut self, err: TranslateError) -> TranslateError {
        tracing::debug!("Session operation failed: {err}");
        self.last_error = Some(err.to_string());
        err
    }

    /// Message of the most recent failure.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ─────────────────────── configuration ───────────────────────

    /// Accept `dir` as the cache directory after validating it.
    pub fn set_cache_dir(&mut self, dir: impl AsRef<Path>) -> TranslateResult<()> {
        let dir = validate_dir(dir).map_err(|e| self.fail(e))?;
        self.cache_dir = Some(dir);
        Ok(())
    }

    /// Accept `dir` as the cookie directory after validating it.
    pub fn set_cookie_dir(&mut self, dir: impl AsRef<Path>) -> TranslateResult<()> {
        let dir = validate_dir(dir).map_err(|e| self.fail(e))?;
        self.cookie_dir = Some(dir);
        Ok(())
    }

    /// Override the endpoint base, e.g. `http://localhost:8080/m?`.
    pub fn set_endpoint(&mut self, base: &str) -> TranslateResult<()> {
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(self.fail(TranslateError::Configuration(format!(
                "endpoint must be an http(s) URL: {base:?}"
            ))));
        }
        self.endpoint = base.to_string();
        Ok(())
    }

    /// Set source and target languages.
    ///
    /// A missing or empty `from` means `auto`. A missing or empty `to` is
    /// rejected and leaves both languages unchanged.
    pub fn set_lang(&mut self, from: Option<&str>, to: Option<&str>) -> TranslateResult<()> {
        let Some(to) = to.filter(|t| !t.is_empty()) else {
            return Err(self.fail(TranslateError::Configuration(
                "Target language cannot be empty".to_string(),
            )));
        };

        self.source_lang = from
            .filter(|f| !f.is_empty())
            .map(LangCode::new)
            .unwrap_or_else(LangCode::auto);
        self.target_lang = Some(LangCode::new(to));
        Ok(())
    }

    /// Borrow `text` up to its first NUL byte, or all of it if there is none.
    pub fn set_text_ref(&mut self, text: &'a [u8]) {
        self.text = TextSource::Borrowed(&text[..nul_len(text)]);
    }

    /// Borrow the first `len` bytes of `text`.
    pub fn set_text_ref_len(&mut self, text: &'a [u8], len: usize) -> TranslateResult<()> {
        let Some(text) = text.get(..len) else {
            return Err(self.fail(length_error(len, text.len())));
        };
        self.text = TextSource::Borrowed(text);
        Ok(())
    }

    pub fn set_text_ref_str(&mut self, text: &'a str) {
        self.text = TextSource::Borrowed(text.as_bytes());
    }

    /// Copy `text` up to its first NUL byte into a session-owned buffer.
    pub fn set_text_copy(&mut self, text: &[u8]) -> TranslateResult<()> {
        self.set_text_copy_len(text, nul_len(text))
    }

    /// Copy the first `len` bytes of `text` into a session-owned buffer.
    pub fn set_text_copy_len(&mut self, text: &[u8], len: usize) -> TranslateResult<()> {
        let Some(text) = text.get(..len) else {
            return Err(self.fail(length_error(len, text.len())));
        };

        let mut owned = Vec::new();
        if let Err(e) = owned.try_reserve_exact(len) {
            return Err(self.fail(e.into()));
        }
        owned.extend_from_slice(text);
        self.text = TextSource::Owned(owned);
        Ok(())
    }

    pub fn set_text_copy_str(&mut self, text: &str) -> TranslateResult<()> {
        self.set_text_copy_len(text.as_bytes(), text.len())
    }

    // ─────────────────────── execution ───────────────────────

    /// The URL the next execution would request.
    pub fn url(&self) -> TranslateResult<String> {
        let target = self.target_lang.as_ref().ok_or_else(target_unset)?;
        build_url(&self.endpoint, &self.source_lang, target, self.text.as_bytes())
    }

    /// Perform one request and extract its result.
    ///
    /// On success the previous result is replaced. On failure it is kept and
    /// the error is recorded.
    pub fn execute(&mut self) -> TranslateResult<()> {
        match self.run() {
            Ok(result) => {
                let translation = Translation {
                    source_lang: self.source_lang.to_string(),
                    target_lang: self
                        .target_lang
                        .as_ref()
                        .map(LangCode::to_string)
                        .unwrap_or_default(),
                    text: String::from_utf8_lossy(self.text.as_bytes()).into_owned(),
                    result: String::from_utf8_lossy(&result).into_owned(),
                };
                tracing::info!(
                    "Translated {} bytes {} -> {} into {} bytes",
                    self.text.len(),
                    translation.source_lang,
                    translation.target_lang,
                    result.len()
                );
                self.result = Some(result);
                self.last_translation = Some(translation);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn run(&mut self) -> TranslateResult<Vec<u8>> {
        let url = self.url()?;

        if !self.buffer.is_allocated() {
            self.buffer.reserve(DEFAULT_CAPACITY)?;
        }
        self.buffer.reset();

        let cookie_file = self.cookie_file();
        let headers = [("User-Agent", USER_AGENT)];
        let request = TransportRequest {
            url: &url,
            headers: &headers,
            cookie_file: cookie_file.as_deref(),
        };

        tracing::debug!("Requesting {url}");
        self.transport.perform(&request, &mut self.buffer)?;
        tracing::debug!("Response body is {} bytes", self.buffer.len());

        extract(self.buffer.as_bytes())
    }

    // ─────────────────────── results ───────────────────────

    /// The last extracted result, borrowed.
    pub fn result(&self) -> Option<&[u8]> {
        self.result.as_deref()
    }

    /// The last extracted result as UTF-8, if it is valid UTF-8.
    pub fn result_str(&self) -> Option<&str> {
        self.result().and_then(|r| std::str::from_utf8(r).ok())
    }

    /// Take ownership of the last result, leaving the session without one.
    pub fn detach_result(&mut self) -> Option<Vec<u8>> {
        self.result.take()
    }

    /// Record of the last successful execution.
    pub fn last_translation(&self) -> Option<&Translation> {
        self.last_translation.as_ref()
    }

    // ─────────────────────── accessors ───────────────────────

    pub fn source_lang(&self) -> &LangCode {
        &self.source_lang
    }

    pub fn target_lang(&self) -> Option<&LangCode> {
        self.target_lang.as_ref()
    }

    pub fn text(&self) -> &TextSource<'a> {
        &self.text
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }

    pub fn cookie_dir(&self) -> Option<&Path> {
        self.cookie_dir.as_deref()
    }

    /// Cookie file inside the cookie directory, when one is set.
    pub fn cookie_file(&self) -> Option<PathBuf> {
        self.cookie_dir.as_ref().map(|d| d.join(COOKIE_FILE_NAME))
    }

    pub fn response_buffer(&self) -> &ResponseBuffer {
        &self.buffer
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

fn nul_len(text: &[u8]) -> usize {
    text.iter().position(|&b| b == 0).unwrap_or(text.len())
}

fn length_error(len: usize, available: usize) -> TranslateError {
    TranslateError::Configuration(format!(
        "text length {len} exceeds the {available} bytes supplied"
    ))
}

fn target_unset() -> TranslateError {
    TranslateError::Configuration("Target language is not set".to_string())
}

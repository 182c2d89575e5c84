//! Core data types for translation sessions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of meaningful bytes in a language code.
pub const LANG_CODE_MAX: usize = 7;

/// Source language used when none is given.
pub const AUTO_LANG: &str = "auto";

/// A short language code such as `en`, `ja` or `zh-CN`.
///
/// Values longer than [`LANG_CODE_MAX`] bytes are truncated, never splitting
/// a UTF-8 character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LangCode(String);

impl LangCode {
    pub fn new(code: &str) -> Self {
        let mut end = code.len().min(LANG_CODE_MAX);
        while !code.is_char_boundary(end) {
            end -= 1;
        }
        Self(code[..end].to_string())
    }

    /// The `auto` sentinel used for source-language detection.
    pub fn auto() -> Self {
        Self(AUTO_LANG.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for LangCode {
    fn default() -> Self {
        Self::auto()
    }
}

impl fmt::Display for LangCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text to translate, either borrowed from the caller or owned by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource<'a> {
    Borrowed(&'a [u8]),
    Owned(Vec<u8>),
}

impl TextSource<'_> {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            TextSource::Borrowed(bytes) => bytes,
            TextSource::Owned(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, TextSource::Owned(_))
    }
}

impl Default for TextSource<'_> {
    fn default() -> Self {
        TextSource::Borrowed(&[])
    }
}

/// Record of one successful translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub source_lang: String,
    pub target_lang: String,
    pub text: String,
    pub result: String,
}

/// Coarse category of a [`TranslateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Allocation,
    Transport,
    MalformedResponse,
}

/// Errors that can occur in a translation session.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Out of memory: {0}")]
    Allocation(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl TranslateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslateError::Configuration(_) => ErrorKind::Configuration,
            TranslateError::Allocation(_) => ErrorKind::Allocation,
            TranslateError::Transport(_) => ErrorKind::Transport,
            TranslateError::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }
}

impl From<std::collections::TryReserveError> for TranslateError {
    fn from(e: std::collections::TryReserveError) -> Self {
        TranslateError::Allocation(e.to_string())
    }
}

/// Convenience result type.
pub type TranslateResult<T> = Result<T, TranslateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_code_truncates() {
        assert_eq!(LangCode::new("zh-CN").as_str(), "zh-CN");
        assert_eq!(LangCode::new("abcdefghij").as_str(), "abcdefg");
    }

    #[test]
    fn test_lang_code_keeps_char_boundary() {
        // "ééé" is 6 bytes; "éééé" is 8 and must drop the last char whole.
        assert_eq!(LangCode::new("éééé").as_str(), "ééé");
    }

    #[test]
    fn test_text_source_views() {
        let borrowed = TextSource::Borrowed(b"hi");
        assert_eq!(borrowed.as_bytes(), b"hi");
        assert!(!borrowed.is_owned());

        let owned = TextSource::Owned(b"hey".to_vec());
        assert_eq!(owned.len(), 3);
        assert!(owned.is_owned());
        assert!(TextSource::default().is_empty());
    }

    #[test]
    fn test_error_kind() {
        let err = TranslateError::MalformedResponse("x".into());
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        assert_eq!(err.to_string(), "Malformed response: x");
    }

    #[test]
    fn test_translation_json() {
        let t = Translation {
            source_lang: "en".into(),
            target_lang: "ja".into(),
            text: "Good morning".into(),
            result: "おはよう".into(),
        };
        let json = serde_json::to_string(&t).unwrap();
        let back: Translation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}

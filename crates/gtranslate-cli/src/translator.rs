//! Translation session lifecycle for the command-line driver.

use std::path::Path;
use std::time::Duration;

use gtranslate::{HttpTransport, Session, Transport, TranslateError, Translation, AUTO_LANG};

use crate::config::{prepare_data_dirs, ConfigError};

/// Errors surfaced by the driver.
#[derive(thiserror::Error, Debug)]
pub enum TranslatorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error("Cannot swap languages while the source is auto-detected")]
    SwapAuto,

    #[error("Nothing to translate")]
    EmptyText,
}

pub type TranslatorResult<T> = Result<T, TranslatorError>;

/// Options for opening a [`Translator`].
#[derive(Debug, Clone, Default)]
pub struct TranslatorOptions<'p> {
    pub from: Option<&'p str>,
    pub to: &'p str,
    pub data_dir: Option<&'p Path>,
    pub endpoint: Option<&'p str>,
    pub timeout: Option<Duration>,
}

/// Owns a [`Session`] configured from command-line options.
pub struct Translator<T = HttpTransport> {
    session: Session<'static, T>,
}

impl Translator<HttpTransport> {
    /// Open a translator over the HTTP transport.
    pub fn open(options: &TranslatorOptions<'_>) -> TranslatorResult<Self> {
        let transport = match options.timeout {
            Some(timeout) => HttpTransport::with_timeout(timeout),
            None => HttpTransport::new(),
        };
        Self::open_with_transport(options, transport)
    }
}

impl<T: Transport> Translator<T> {
    pub fn open_with_transport(options: &TranslatorOptions<'_>, transport: T) -> TranslatorResult<Self> {
        let mut session = Session::with_transport(transport);

        if let Some(root) = options.data_dir {
            let dirs = prepare_data_dirs(root)?;
            session.set_cache_dir(&dirs.cache)?;
            session.set_cookie_dir(&dirs.cookie)?;
            tracing::debug!("Data dir: {}", root.display());
        }

        if let Some(endpoint) = options.endpoint {
            session.set_endpoint(endpoint)?;
            tracing::info!("Using endpoint override: {endpoint}");
        }

        session.set_lang(options.from, Some(options.to))?;

        Ok(Self { session })
    }

    /// Translate `text` with the current languages.
    pub fn translate(&mut self, text: &str) -> TranslatorResult<Translation> {
        if text.trim().is_empty() {
            return Err(TranslatorError::EmptyText);
        }
        self.session.set_text_copy_str(text)?;
        self.session.execute()?;
        self.session
            .last_translation()
            .cloned()
            .ok_or_else(|| TranslateError::MalformedResponse("no result recorded".to_string()).into())
    }

    /// URL that translating `text` would request.
    pub fn preview_url(&mut self, text: &str) -> TranslatorResult<String> {
        self.session.set_text_copy_str(text)?;
        Ok(self.session.url()?)
    }

    pub fn set_source(&mut self, from: Option<&str>) -> TranslatorResult<()> {
        let to = self.target().to_string();
        self.session.set_lang(from, Some(&to))?;
        Ok(())
    }

    pub fn set_target(&mut self, to: &str) -> TranslatorResult<()> {
        let from = self.source().to_string();
        self.session.set_lang(Some(&from), Some(to))?;
        Ok(())
    }

    /// Exchange source and target.
    pub fn swap(&mut self) -> TranslatorResult<()> {
        let from = self.source().to_string();
        if from == AUTO_LANG {
            return Err(TranslatorError::SwapAuto);
        }
        let to = self.target().to_string();
        self.session.set_lang(Some(&to), Some(&from))?;
        Ok(())
    }

    pub fn source(&self) -> &str {
        self.session.source_lang().as_str()
    }

    pub fn target(&self) -> &str {
        self.session.target_lang().map(|l| l.as_str()).unwrap_or_default()
    }

    pub fn session(&self) -> &Session<'static, T> {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtranslate::{BodySink, TranslateResult, TransportRequest};

    struct Echo;

    impl Transport for Echo {
        fn perform(
            &mut self,
            request: &TransportRequest<'_>,
            sink: &mut dyn BodySink,
        ) -> TranslateResult<()> {
            let q = request.url.rsplit("q=").next().unwrap_or_default();
            let body = format!("<div class=\"result-container\">[{q}]</div>");
            sink.write(body.as_bytes())
        }
    }

    fn options(to: &str) -> TranslatorOptions<'_> {
        TranslatorOptions {
            from: Some("en"),
            to,
            ..TranslatorOptions::default()
        }
    }

    #[test]
    fn test_translate_with_stub() {
        let mut translator = Translator::open_with_transport(&options("ja"), Echo).unwrap();
        let t = translator.translate("Good morning").unwrap();
        assert_eq!(t.result, "[Good+morning]");
        assert_eq!(t.source_lang, "en");
        assert_eq!(t.target_lang, "ja");
    }

    #[test]
    fn test_empty_text_rejected() {
        let mut translator = Translator::open_with_transport(&options("ja"), Echo).unwrap();
        assert!(matches!(translator.translate("  "), Err(TranslatorError::EmptyText)));
    }

    #[test]
    fn test_missing_target_rejected() {
        let result = Translator::open_with_transport(&options(""), Echo);
        assert!(matches!(
            result,
            Err(TranslatorError::Translate(TranslateError::Configuration(_)))
        ));
    }

    #[test]
    fn test_language_changes_and_swap() {
        let mut translator = Translator::open_with_transport(&options("ja"), Echo).unwrap();
        translator.swap().unwrap();
        assert_eq!((translator.source(), translator.target()), ("ja", "en"));

        translator.set_target("de").unwrap();
        assert_eq!(translator.source(), "ja");
        translator.set_source(None).unwrap();
        assert_eq!(translator.source(), AUTO_LANG);
        assert!(matches!(translator.swap(), Err(TranslatorError::SwapAuto)));
        assert_eq!(translator.target(), "de");
    }

    #[test]
    fn test_data_dir_sets_session_dirs() {
        let root = tempfile::tempdir().unwrap();
        let opts = TranslatorOptions {
            data_dir: Some(root.path()),
            ..options("ja")
        };
        let translator = Translator::open_with_transport(&opts, Echo).unwrap();
        assert_eq!(translator.session().cache_dir(), Some(root.path().join("cache").as_path()));
        assert!(translator.session().cookie_file().unwrap().ends_with("cookie/gtranslate.cookie"));
    }

    #[test]
    fn test_preview_url_uses_endpoint() {
        let opts = TranslatorOptions {
            endpoint: Some("http://localhost:8080/m?"),
            ..options("fr")
        };
        let mut translator = Translator::open_with_transport(&opts, Echo).unwrap();
        assert_eq!(
            translator.preview_url("a b").unwrap(),
            "http://localhost:8080/m?sl=en&tl=fr&hl=en&q=a+b"
        );
    }
}

//! gtranslate: session-based scraping client for the Google Translate mobile page.
//!
//! A [`Session`] percent-encodes the request URL, streams the HTML response
//! into a reusable [`ResponseBuffer`], and extracts the translated text
//! without an HTML parser.
//!
//! ```no_run
//! use gtranslate::Session;
//!
//! gtranslate::global_init();
//! let mut session = Session::new();
//! session.set_lang(Some("en"), Some("ja"))?;
//! session.set_text_ref_str("Good morning");
//! session.execute()?;
//! println!("{}", session.result_str().unwrap_or_default());
//! gtranslate::global_cleanup();
//! # Ok::<(), gtranslate::TranslateError>(())
//! ```

pub mod buffer;
pub mod dirs;
pub mod encode;
pub mod extract;
pub mod global;
pub mod session;
pub mod transport;
pub mod types;
pub mod url;

pub use buffer::ResponseBuffer;
pub use dirs::validate_dir;
pub use encode::{decode, encode, encode_into, encoded_len_bound};
pub use extract::{extract, MARKER};
pub use global::{global_cleanup, global_init, is_initialized};
pub use session::Session;
pub use transport::{BodySink, CookieJar, HttpTransport, Transport, TransportRequest, USER_AGENT};
pub use types::*;
pub use url::{build_url, DEFAULT_ENDPOINT};

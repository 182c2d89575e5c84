//! Request URL construction.

use crate::encode::encode_into;
use crate::types::{LangCode, TranslateError, TranslateResult};

/// Public mobile endpoint, including the query separator.
pub const DEFAULT_ENDPOINT: &str = "https://translate.google.com/m?";

/// Room reserved for the endpoint, parameter names and both language codes.
pub const FIXED_OVERHEAD: usize = 512;

/// Build `{base}sl={source}&tl={target}&hl=en&q={text}` with every value
/// percent-encoded.
///
/// The destination is allocated once as `text.len() * 3 + FIXED_OVERHEAD`.
/// Language codes are at most seven bytes, so they fit the fixed overhead.
pub fn build_url(
    base: &str,
    source: &LangCode,
    target: &LangCode,
    text: &[u8],
) -> TranslateResult<String> {
    let capacity = text
        .len()
        .checked_mul(3)
        .and_then(|n| n.checked_add(FIXED_OVERHEAD))
        .ok_or_else(|| TranslateError::Allocation("text too long to encode".to_string()))?;

    let mut url = String::new();
    url.try_reserve_exact(capacity)?;

    url.push_str(base);
    url.push_str("sl=");
    encode_into(&mut url, source.as_str().as_bytes(), false);
    url.push_str("&tl=");
    encode_into(&mut url, target.as_str().as_bytes(), false);
    url.push_str("&hl=en&q=");
    encode_into(&mut url, text, false);

    tracing::debug!("Built request URL ({} bytes)", url.len());
    Ok(url)
}

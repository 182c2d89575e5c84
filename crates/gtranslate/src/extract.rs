//! Result extraction from the endpoint's HTML page.
//!
//! No HTML parsing: the translated text is the run of bytes between the
//! result container's opening tag and the next `<`.

use crate::types::{TranslateError, TranslateResult};

/// Opening tag of the element holding the translated text.
pub const MARKER: &[u8] = b"<div class=\"result-container\">";

const NOT_FOUND: &str = "Cannot find translated result";

/// Index of the first occurrence of `needle` in `haystack`.
pub fn find_marker(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Index of the first `<` at or after `from`, bounded by `haystack.len()`.
pub fn find_tag_open(haystack: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .iter()
        .position(|&b| b == b'<')
        .map(|offset| from + offset)
}

/// Copy out the text following [`MARKER`] up to the next tag.
///
/// A missing marker and a missing closing `<` are the same failure: the page
/// is not a result page, or it was truncated.
pub fn extract(response: &[u8]) -> TranslateResult<Vec<u8>> {
    let not_found = || TranslateError::MalformedResponse(NOT_FOUND.to_string());

    let start = find_marker(response, MARKER).ok_or_else(not_found)? + MARKER.len();
    let end = find_tag_open(response, start).ok_or_else(not_found)?;

    let text = &response[start..end];
    let mut out = Vec::new();
    out.try_reserve_exact(text.len())?;
    out.extend_from_slice(text);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_hello() {
        let page = b"<html><body><div class=\"result-container\">HELLO</div></body></html>";
        assert_eq!(extract(page).unwrap(), b"HELLO");
    }

    #[test]
    fn test_extracts_utf8() {
        let page = "x<div class=\"result-container\">おはよう<".as_bytes();
        assert_eq!(extract(page).unwrap(), "おはよう".as_bytes());
    }

    #[test]
    fn test_missing_marker() {
        let err = extract(b"<html><div class=\"other\">HELLO</div></html>").unwrap_err();
        assert!(matches!(err, TranslateError::MalformedResponse(_)));
    }

    #[test]
    fn test_unterminated_result() {
        let err = extract(b"<div class=\"result-container\">HELLO and no tag").unwrap_err();
        assert!(matches!(err, TranslateError::MalformedResponse(_)));
    }

    #[test]
    fn test_marker_at_end_of_buffer() {
        let err = extract(MARKER).unwrap_err();
        assert!(matches!(err, TranslateError::MalformedResponse(_)));
    }

    #[test]
    fn test_empty_result_is_ok() {
        let page = b"<div class=\"result-container\"></div>";
        assert_eq!(extract(page).unwrap(), b"");
    }

    #[test]
    fn test_first_marker_wins() {
        let page = b"<div class=\"result-container\">one</div><div class=\"result-container\">two</div>";
        assert_eq!(extract(page).unwrap(), b"one");
    }

    #[test]
    fn test_does_not_read_past_slice() {
        // The `<` lies beyond the slice handed to the extractor.
        let page = b"<div class=\"result-container\">cut<";
        let truncated = &page[..page.len() - 1];
        assert!(extract(truncated).is_err());
    }

    #[test]
    fn test_index_helpers() {
        assert_eq!(find_marker(b"abcabc", b"ca"), Some(2));
        assert_eq!(find_marker(b"ab", b"abc"), None);
        assert_eq!(find_tag_open(b"a<b<", 2), Some(3));
        assert_eq!(find_tag_open(b"ab", 5), None);
    }
}

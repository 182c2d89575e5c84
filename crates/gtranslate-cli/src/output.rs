//! Rendering of translation results.

use gtranslate::Translation;
use serde::Serialize;

#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    translation: &'a Translation,
    url: &'a str,
}

/// Human-readable block, mirroring what the library example printed.
pub fn render_plain(translation: &Translation) -> String {
    format!(
        "Source language: {}\nTarget language: {}\nText source: {}\nTranslate result = {}",
        translation.source_lang, translation.target_lang, translation.text, translation.result
    )
}

/// Pretty JSON including the requested URL.
pub fn render_json(translation: &Translation, url: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Report { translation, url })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Translation {
        Translation {
            source_lang: "en".into(),
            target_lang: "ja".into(),
            text: "Good morning".into(),
            result: "おはよう".into(),
        }
    }

    #[test]
    fn test_plain() {
        let out = render_plain(&sample());
        assert!(out.starts_with("Source language: en\n"));
        assert!(out.ends_with("Translate result = おはよう"));
    }

    #[test]
    fn test_json_flattens_translation() {
        let out = render_json(&sample(), "https://example/m?q=x").unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["result"], "おはよう");
        assert_eq!(value["source_lang"], "en");
        assert_eq!(value["url"], "https://example/m?q=x");
    }
}

//! Decoding of backend response bodies
//!
//! The backend answers in Windows-1254 with object keys and values wrapped in
//! single quotes. Bodies are decoded to text, every `'` is rewritten to `"`,
//! and the result is parsed as ordinary JSON. An apostrophe inside a value
//! therefore breaks the body; the official app has the same limitation.

use crate::{Error, Result};
use encoding_rs::WINDOWS_1254;
use serde::de::DeserializeOwned;

/// Decode a Windows-1254 body into text
pub fn decode_text(body: &[u8]) -> String {
    let (text, had_errors) = WINDOWS_1254.decode_without_bom_handling(body);
    if had_errors {
        tracing::debug!("Response body contained bytes outside Windows-1254");
    }
    text.into_owned()
}

/// Rewrite the single-quoted pseudo-JSON into standard JSON text
pub fn normalize_quotes(text: &str) -> String {
    text.replace('\'', "\"")
}

/// Decode a raw body into an untyped JSON value
pub fn parse_value(body: &[u8]) -> Result<serde_json::Value> {
    parse(body)
}

/// Decode a raw body into `T`, reporting the failing field path on error
pub fn parse<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let text = normalize_quotes(&decode_text(body));
    tracing::debug!("Decoded response body: {}", text);

    let deserializer = &mut serde_json::Deserializer::from_str(&text);
    serde_path_to_error::deserialize(deserializer).map_err(|e| {
        let path = e.path().to_string();
        Error::protocol(format!("{} (at `{}`)", e.into_inner(), path))
    })
}

/// Convert an already decoded JSON value into `T`, reporting the failing field path
pub fn from_value<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_path_to_error::deserialize(value).map_err(|e| {
        let path = e.path().to_string();
        Error::protocol(format!("{} (at `{}`)", e.into_inner(), path))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn encode(text: &str) -> Vec<u8> {
        let (bytes, _, had_errors) = WINDOWS_1254.encode(text);
        assert!(!had_errors);
        bytes.into_owned()
    }

    #[test]
    fn test_decode_turkish_characters() {
        // ş, ı, ğ, İ occupy code points that differ from Latin-1
        let body = [0xFE, 0xFD, 0xF0, 0xDD];
        assert_eq!(decode_text(&body), "şığİ");
    }

    #[test]
    fn test_normalize_quotes() {
        assert_eq!(normalize_quotes("{'a':'b'}"), r#"{"a":"b"}"#);
    }

    #[test]
    fn test_encoded_single_quoted_body_matches_json() {
        let expected = json!({
            "data": [{
                "table": [{
                    "kart": "1234567890123456",
                    "tarih": "01.02.2020 17:55:00",
                    "bakiye": "42.50",
                    "result": "0",
                    "message": "Sorgulama Başarılı"
                }],
                "status": "TRUE",
                "message": "İşlem başarılı"
            }]
        });
        let body = encode(&expected.to_string().replace('"', "'"));

        let parsed = parse_value(&body).unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_reports_field_path() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Row {
            kart: String,
        }
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Body {
            table: Vec<Row>,
        }

        let err = parse::<Body>(b"{'table':[{'kart':5}]}").unwrap_err();
        match err {
            Error::Protocol { reason, .. } => assert!(reason.contains("table[0].kart")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_html() {
        let err = parse_value(b"<html>Service Unavailable</html>").unwrap_err();
        assert!(matches!(err, Error::Protocol { .. }));
    }
}

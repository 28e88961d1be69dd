//! Common test utilities and helpers
//!
//! A wiremock server standing in for the EGO mobile backend, answering in
//! Windows-1254 with single-quoted bodies like the real one.

#![allow(dead_code)]

use ankarakart::{config::Settings, session::DeviceIdentity};
use encoding_rs::WINDOWS_1254;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CARD: &str = "1234567890123456";

/// Encode a JSON value the way the backend does: single quotes, Windows-1254
pub fn backend_body(value: &Value) -> Vec<u8> {
    let text = value.to_string().replace('"', "'");
    let (bytes, _, had_errors) = WINDOWS_1254.encode(&text);
    assert!(!had_errors, "body not representable in Windows-1254");
    bytes.into_owned()
}

/// Response with a backend-encoded body
pub fn backend_response(value: &Value) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_raw(backend_body(value), "text/html; charset=windows-1254")
}

/// Fixed identity for tests
pub fn test_identity() -> DeviceIdentity {
    DeviceIdentity::new("{TEST-GUID}-123456789", "3.0.6", "Nexus 5X", "8.0.0")
}

/// Settings pointing at the mock backend
pub fn test_settings(server: &MockServer) -> Settings {
    let mut settings = Settings::default();
    settings.backend.primary_host = server.uri();
    settings.network.connect_timeout = 5;
    settings.network.request_timeout = 10;
    settings
}

/// Test data factory
pub struct MockData;

impl MockData {
    pub fn connect(server: &str, version: &str) -> Value {
        json!({
            "data": [{
                "version": version,
                "servis": "TRUE",
                "server": server,
                "status": "TRUE",
                "userid": "",
                "message": ""
            }]
        })
    }

    pub fn start() -> Value {
        json!({
            "data": [{
                "reklam_count": "0",
                "status": "TRUE",
                "message": ""
            }]
        })
    }

    pub fn balance(result: &str) -> Value {
        json!({
            "data": [{
                "table": [{
                    "kart": CARD,
                    "tarih": "01.02.2020 17:55:00",
                    "bakiye": "42.50",
                    "result": result,
                    "message": "Sorgulama Başarılı"
                }],
                "status": "TRUE",
                "message": ""
            }]
        })
    }

    pub fn usage() -> Value {
        json!({
            "data": [{
                "table": [
                    {
                        "kart_no": CARD,
                        "no_kart": "00112233",
                        "tarih": "01/02/2020 17:55",
                        "arac": "Otobüs",
                        "arac_no": "06 ABC 123",
                        "hat": "413",
                        "dusen": "2.50",
                        "kalan": "40.00",
                        "islem": "İLK BİNİŞ"
                    },
                    {
                        "kart_no": CARD,
                        "no_kart": "00112233",
                        "tarih": "01/02/2020 18:20",
                        "arac": "Metro",
                        "arac_no": "",
                        "hat": "",
                        "dusen": "0.00",
                        "kalan": "40.00",
                        "islem": "Aktarma"
                    }
                ],
                "status": "TRUE",
                "message": ""
            }]
        })
    }

    pub fn rejected(message: &str) -> Value {
        json!({ "data": [{ "table": [], "status": "FALSE", "message": message }] })
    }
}

/// Mount `Connect` and `Start` handlers; `Connect` names the mock itself as
/// the secondary host. Each handler expects `handshakes` calls.
pub async fn mount_handshake(server: &MockServer, version: &str, handshakes: u64) {
    Mock::given(method("POST"))
        .and(path("/mbl/android/connect.asp"))
        .and(query_param("FNC", "Connect"))
        .respond_with(backend_response(&MockData::connect(&server.uri(), version)))
        .expect(handshakes)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/mbl/android/connect.asp"))
        .and(query_param("FNC", "Start"))
        .respond_with(backend_response(&MockData::start()))
        .expect(handshakes)
        .mount(server)
        .await;
}

/// Mount a handler for one query function
pub async fn mount_query(server: &MockServer, function: &str, body: &Value) {
    Mock::given(method("POST"))
        .and(path("/mbl/android/action.asp"))
        .and(query_param("FNC", function))
        .respond_with(backend_response(body))
        .mount(server)
        .await;
}

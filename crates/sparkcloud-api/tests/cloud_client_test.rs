#![allow(clippy::unwrap_used)]
// Integration tests for `CloudClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{basic_auth, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

use sparkcloud_api::{AccessToken, ClientCredentials, CloudClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

const TOKEN: &str = "254406f79c1999af65a7df4388971354f85cfee9";
const DEVICE_ID: &str = "53ff6f0650723534";

async fn setup() -> (MockServer, CloudClient) {
    let server = MockServer::start().await;
    let client = CloudClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn token() -> AccessToken {
    AccessToken::new(TOKEN)
}

/// Matches a form-encoded body containing `key=value` (after decoding).
struct FormField(&'static str, &'static str);

impl Match for FormField {
    fn matches(&self, request: &Request) -> bool {
        url::form_urlencoded::parse(&request.body).any(|(k, v)| k == self.0 && v == self.1)
    }
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(basic_auth("spark", "spark"))
        .and(FormField("username", "hamster@example.com"))
        .and(FormField("password", "s3cret"))
        .and(FormField("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "bearer",
            "access_token": TOKEN,
            "expires_in": 7_776_000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let password: secrecy::SecretString = "s3cret".to_string().into();
    let token = client
        .login("hamster@example.com", &password, &ClientCredentials::default())
        .await
        .unwrap();

    assert_eq!(token.expose(), TOKEN);
}

#[tokio::test]
async fn test_login_uses_configured_client_credentials() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(basic_auth("my-app", "my-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "abc" })))
        .expect(1)
        .mount(&server)
        .await;

    let password: secrecy::SecretString = "pw".to_string().into();
    let token = client
        .login("user", &password, &ClientCredentials::new("my-app", "my-secret"))
        .await
        .unwrap();

    assert_eq!(token.expose(), "abc");
}

#[tokio::test]
async fn test_login_failure_reports_error_and_description() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "User credentials are invalid"
        })))
        .mount(&server)
        .await;

    let password: secrecy::SecretString = "wrong".to_string().into();
    let result = client
        .login("hamster@example.com", &password, &ClientCredentials::default())
        .await;

    match result {
        Err(Error::Authentication { message }) => {
            assert!(message.contains("invalid_grant"), "{message}");
            assert!(message.contains("User credentials are invalid"), "{message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

// ── Device tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/devices"))
        .and(query_param("access_token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": DEVICE_ID,
                "name": "captain_hamster",
                "connected": true,
                "last_heard": "2014-12-15T20:12:51.974Z",
                "last_app": null
            },
            {
                "id": "48ff6a065067555008342387",
                "name": "sleepy_otter",
                "connected": false,
                "cellular": true
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.list_devices(&token()).await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].id, DEVICE_ID);
    assert_eq!(devices[0].name.as_deref(), Some("captain_hamster"));
    assert!(devices[0].connected);
    assert!(!devices[1].connected);
    assert_eq!(devices[1].extra.get("cellular"), Some(&json!(true)));
}

#[tokio::test]
async fn test_list_devices_invalid_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/devices"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_token",
            "error_description": "The access token provided is invalid."
        })))
        .mount(&server)
        .await;

    let err = client.list_devices(&token()).await.unwrap_err();

    assert!(err.is_auth_failure());
    assert_eq!(err.api_error_code(), Some("invalid_token"));
    let rendered = err.to_string();
    assert!(rendered.contains("invalid_token: The access token provided is invalid."), "{rendered}");
}

#[tokio::test]
async fn test_ok_false_on_success_status_is_an_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/devices/{DEVICE_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": false,
            "error": "Timed out.",
            "error_description": "device did not answer"
        })))
        .mount(&server)
        .await;

    let err = client.get_device(&token(), DEVICE_ID).await.unwrap_err();

    match err {
        Error::CloudApi { message, status, .. } => {
            assert_eq!(status, 200);
            assert_eq!(message, "Timed out.: device did not answer");
        }
        other => panic!("expected CloudApi error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_failure_keeps_raw_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/devices"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client.list_devices(&token()).await.unwrap_err();

    assert!(
        matches!(&err, Error::CloudApi { status: 502, message, .. } if message == "Bad Gateway"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_get_device_detail() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/devices/{DEVICE_ID}")))
        .and(query_param("access_token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": DEVICE_ID,
            "name": "captain_hamster",
            "connected": true,
            "variables": { "game_state": "string", "temperature": "double" },
            "functions": ["digitalread", "digitalwrite", "analogread", "analogwrite"],
            "status": "normal",
            "requires_deep_update": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let info = client.get_device(&token(), DEVICE_ID).await.unwrap();

    let functions = info.functions.unwrap();
    assert_eq!(functions.len(), 4);
    assert!(functions.iter().any(|f| f == "digitalwrite"));
    let variables = info.variables.unwrap();
    assert_eq!(variables.get("game_state").map(String::as_str), Some("string"));
    assert_eq!(info.status.as_deref(), Some("normal"));
    assert_eq!(info.requires_deep_update, Some(false));
}

#[tokio::test]
async fn test_call_function_joins_params() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/devices/{DEVICE_ID}/digitalwrite")))
        .and(query_param("access_token", TOKEN))
        .and(FormField("params", "D7,HIGH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": DEVICE_ID,
            "name": "captain_hamster",
            "connected": true,
            "return_value": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .call_function(&token(), DEVICE_ID, "digitalwrite", &["D7", "HIGH"])
        .await
        .unwrap();

    assert_eq!(resp.return_value, json!(1));
    assert_eq!(resp.connected, Some(true));
}

#[tokio::test]
async fn test_call_function_without_args_sends_empty_params() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/devices/{DEVICE_ID}/reset")))
        .and(FormField("params", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "return_value": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .call_function(&token(), DEVICE_ID, "reset", &[])
        .await
        .unwrap();

    assert_eq!(resp.return_value, json!(0));
}

#[tokio::test]
async fn test_get_variable() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/devices/{DEVICE_ID}/game_state")))
        .and(query_param("access_token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cmd": "VarReturn",
            "name": "game_state",
            "result": "{\"round\":3,\"score\":[2,1]}",
            "coreInfo": { "connected": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .get_variable(&token(), DEVICE_ID, "game_state")
        .await
        .unwrap();

    assert_eq!(resp.result, json!("{\"round\":3,\"score\":[2,1]}"));
    assert_eq!(resp.name.as_deref(), Some("game_state"));
}

use std::time::Duration;

use httpmock::prelude::*;
use pocketbase_users::config::BASE_URL_ENV;
use pocketbase_users::{ConfigError, PocketBase, RequestError, UserRecord};
use serde_json::json;

fn user_json() -> serde_json::Value {
    json!({
        "id": "abc",
        "collectionId": "_pb_users_auth_",
        "collectionName": "users",
        "username": "ann",
        "verified": true,
        "emailVisibility": true,
        "created": "2022-01-01 10:00:00.000Z",
        "updated": "2022-01-01 10:00:00.000Z"
    })
}

#[tokio::test]
async fn slow_response_hits_request_timeout() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/collections/users/records/abc");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(user_json());
        })
        .await;

    let pb = PocketBase::builder(&server.base_url())
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();

    let error = pb
        .users()
        .get_one::<UserRecord>("abc")
        .call()
        .await
        .unwrap_err();

    match error {
        RequestError::Transport(error) => assert!(error.is_timeout()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn requests_carry_the_configured_user_agent() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/collections/users/records/abc")
                .header("user-agent", "users-dashboard/1.0");
            then.status(200).json_body(user_json());
        })
        .await;

    let pb = PocketBase::builder(&server.base_url())
        .user_agent("users-dashboard/1.0")
        .build()
        .unwrap();

    pb.users()
        .get_one::<UserRecord>("abc")
        .call()
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn custom_client_is_used_for_requests() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/collections/users/records/abc")
                .header("x-tenant", "acme");
            then.status(200).json_body(user_json());
        })
        .await;

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert("x-tenant", reqwest::header::HeaderValue::from_static("acme"));
    let reqwest_client = reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .unwrap();

    let pb = PocketBase::new_with_client(&format!("{}/", server.base_url()), reqwest_client)
        .unwrap();

    pb.users()
        .get_one::<UserRecord>("abc")
        .call()
        .await
        .unwrap();

    mock.assert_async().await;
}

#[test]
fn from_env_reads_base_url() {
    // The only test touching the variable.
    std::env::remove_var(BASE_URL_ENV);
    assert!(matches!(
        PocketBase::from_env(),
        Err(ConfigError::MissingEnv(name)) if name == BASE_URL_ENV
    ));

    std::env::set_var(BASE_URL_ENV, "http://pb.internal:8090/");
    let pb = PocketBase::from_env().unwrap();
    assert_eq!(pb.base_url(), "http://pb.internal:8090");

    std::env::set_var(BASE_URL_ENV, "pb.internal");
    assert!(matches!(
        PocketBase::from_env(),
        Err(ConfigError::InvalidBaseUrl(_))
    ));

    std::env::remove_var(BASE_URL_ENV);
}

#[test]
fn invalid_base_urls_are_rejected() {
    assert!(matches!(
        PocketBase::new("not a url"),
        Err(ConfigError::InvalidBaseUrl(_))
    ));
    assert!(matches!(
        PocketBase::new_with_client("ftp://pb.internal", reqwest::Client::new()),
        Err(ConfigError::InvalidBaseUrl(_))
    ));
}

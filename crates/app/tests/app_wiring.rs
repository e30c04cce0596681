//! Wiring tests: every service shares one storage file and one backend.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use marquee::{App, AppError};
use marquee_application::ProfileDraft;
use marquee_infrastructure::ClientConfig;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer, temp: &TempDir, api_key: Option<&str>) -> ClientConfig {
    let storage = temp.path().join("storage.json");
    let uri = server.uri();
    ClientConfig::from_lookup(|name| match name {
        "MARQUEE_BACKEND_URL" | "MARQUEE_APP_URL" => Some(uri.clone()),
        "MARQUEE_STORAGE_PATH" => Some(storage.display().to_string()),
        "MARQUEE_TMDB_API_KEY" => api_key.map(str::to_string),
        _ => None,
    })
    .expect("valid config")
}

#[tokio::test]
async fn test_login_is_visible_to_a_new_app_instance() {
    let server = MockServer::start().await;
    let temp = TempDir::new().expect("temp dir");

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t1" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/session"))
        .and(header("Authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "_id": "u1",
                "profiles": [{ "_id": "p1", "slug": "ana", "name": "Ana", "preferences": ["28"] }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let first = App::from_config(&config(&server, &temp, None)).unwrap();
    assert!(first.auth.login("ana@example.com", "secret").await.unwrap().is_ok());

    let second = App::from_config(&config(&server, &temp, None)).unwrap();
    let session = second.auth.get_session(None).await.unwrap();
    let profile = session.profile("ana").unwrap();
    second.profiles.set(profile).await.unwrap();

    let third = App::from_config(&config(&server, &temp, None)).unwrap();
    let active = third.profiles.load().await.unwrap().unwrap();
    assert_eq!(active.id.as_deref(), Some("p1"));
    assert_eq!(active.preferences, vec!["28".to_string()]);
}

#[tokio::test]
async fn test_movies_require_api_key() {
    let server = MockServer::start().await;
    let temp = TempDir::new().expect("temp dir");

    let without = App::from_config(&config(&server, &temp, None)).unwrap();
    assert!(matches!(without.movies(), Err(AppError::MissingApiKey)));

    let with = App::from_config(&config(&server, &temp, Some("k3y"))).unwrap();
    assert!(with.movies().is_ok());
}

#[tokio::test]
async fn test_update_profile_targets_the_session_profile() {
    let server = MockServer::start().await;
    let temp = TempDir::new().expect("temp dir");

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t1" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "_id": "u1",
                "profiles": [{ "_id": "p1", "slug": "ana", "name": "Ana", "preferences": ["28"] }]
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/user/profile/p1"))
        .and(header("Authorization", "Bearer t1"))
        .and(body_partial_json(json!({ "slug": "ana", "name": "Ana Paula", "userId": "u1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "updated" })))
        .expect(1)
        .mount(&server)
        .await;

    let app = App::from_config(&config(&server, &temp, None)).unwrap();
    assert!(app.auth.login("ana@example.com", "secret").await.unwrap().is_ok());

    let draft = ProfileDraft {
        name: "Ana Paula".to_string(),
        genres: vec!["Ação".to_string()],
        image_id: "img-1".to_string(),
    };
    let response = app.update_profile(None, "ana", &draft).await.unwrap();
    assert!(response.is_ok());

    let missing = app.update_profile(None, "kids", &draft).await;
    assert!(matches!(missing, Err(AppError::UnknownProfile(slug)) if slug == "kids"));
}

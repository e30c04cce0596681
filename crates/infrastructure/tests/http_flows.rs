//! End-to-end auth and catalog flows over real HTTP against a mock server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use marquee_application::{
    ActiveProfileStore, AuthService, AuthServiceError, AuthenticatedClient, ClientStorage,
    Endpoints, LoadMovieModal, MovieModalError, TokenStore,
};
use marquee_domain::{ACCESS_TOKEN_KEY, Profile, Token};
use marquee_infrastructure::{FileStorage, ReqwestTransport, TmdbCatalog};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    service: AuthService,
    tokens: TokenStore,
    storage: Arc<FileStorage>,
    _temp: TempDir,
}

fn harness(base_url: &str) -> Harness {
    let temp = TempDir::new().expect("temp dir");
    let storage = Arc::new(FileStorage::new(temp.path().join("storage.json")));
    let tokens = TokenStore::new(storage.clone());
    let endpoints = Endpoints::new(base_url, base_url).expect("endpoints");
    let transport = Arc::new(ReqwestTransport::new().expect("transport"));
    let client = AuthenticatedClient::new(transport, tokens.clone(), endpoints);
    Harness {
        service: AuthService::new(Arc::new(client)),
        tokens,
        storage,
        _temp: temp,
    }
}

#[tokio::test]
async fn test_login_then_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .and(body_json(json!({ "email": "ana@example.com", "password": "secret" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "token": "t1", "refresh_token": "r1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/refresh"))
        .and(body_json(json!({ "refresh_token": "r1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/session"))
        .and(header("Authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "_id": "u1", "profiles": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server.uri());

    let response = h.service.login("ana@example.com", "secret").await.unwrap();
    assert!(response.is_ok());

    let session = h.service.get_session(None).await.unwrap();
    assert_eq!(session.id, "u1");

    // The token survives a fresh store over the same file.
    let reopened = TokenStore::new(Arc::new(FileStorage::new(h.storage.path())));
    assert_eq!(reopened.get(None).await.unwrap().as_deref(), Some("t1"));
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_retried_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/session"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "_id": "u1", "profiles": [{ "slug": "ana", "name": "Ana" }] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/refresh"))
        .and(body_json(json!({ "refresh_token": "r1" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "access_token": "fresh" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    let stale = Token::new("stale").unwrap().with_refresh(Some("r1".to_string()));
    h.tokens.save(&stale).await.unwrap();

    let session = h.service.get_session(None).await.unwrap();

    assert_eq!(session.profiles[0].slug, "ana");
    let stored = h.tokens.load().await.unwrap().unwrap();
    assert_eq!(stored.access_token(), "fresh");
    assert_eq!(stored.refresh_token(), Some("r1"));
}

#[tokio::test]
async fn test_refresh_failure_surfaces_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "expired" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "revoked" })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    let stale = Token::new("stale").unwrap().with_refresh(Some("r1".to_string()));
    h.tokens.save(&stale).await.unwrap();

    let err = h.service.get_session(None).await.unwrap_err();

    match err {
        AuthServiceError::Unauthorized { response } => {
            assert_eq!(response.status(), Some(401));
            assert_eq!(response.message().as_deref(), Some("expired"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_logout_clears_token_but_keeps_profile() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/logout"))
        .and(header("Authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": "bye" })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    h.tokens.save(&Token::new("t1").unwrap()).await.unwrap();
    let profiles = ActiveProfileStore::new(h.storage.clone());
    profiles.set(&Profile::new("Ana")).await.unwrap();

    let data = h.service.logout(None).await.unwrap();

    assert_eq!(data, json!("bye"));
    assert_eq!(h.storage.get(ACCESS_TOKEN_KEY).await.unwrap(), None);
    assert_eq!(profiles.load().await.unwrap().map(|p| p.slug), Some("ana".to_string()));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_failure() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let h = harness(&format!("http://127.0.0.1:{port}"));

    let response = h.service.login("ana@example.com", "secret").await.unwrap();

    assert!(!response.is_ok());
    assert_eq!(response.status(), None);
}

#[tokio::test]
async fn test_movie_modal_over_tmdb() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/3/movie/438631"))
        .and(query_param("api_key", "k3y"))
        .and(query_param("language", "pt-BR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 438_631,
            "title": "Duna",
            "runtime": 155,
            "backdrop_path": "/bd.jpg",
            "genres": [{ "id": 878, "name": "Ficção científica" }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/3/movie/438631/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 438_631,
            "results": [
                { "key": "teaser1", "site": "YouTube", "name": "Teaser", "type": "Teaser" },
                { "key": "trailer1", "site": "YouTube", "name": "Trailer", "type": "Trailer" }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/3/movie/1/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "results": [] })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/3/movie/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "title": "Sem vídeo" })))
        .mount(&server)
        .await;

    let base = Url::parse(&format!("{}/3", server.uri())).unwrap();
    let transport = Arc::new(ReqwestTransport::new().unwrap());
    let modal = LoadMovieModal::new(TmdbCatalog::new(transport, base, "k3y", "pt-BR"));

    let output = modal.execute(438_631).await.unwrap();
    assert_eq!(output.video.key, "trailer1");
    assert_eq!(output.movie.runtime_label().as_deref(), Some("2h 35min"));
    assert_eq!(
        output.movie.backdrop_url().as_deref(),
        Some("https://image.tmdb.org/t/p/original/bd.jpg")
    );

    let err = modal.execute(1).await.unwrap_err();
    assert!(matches!(err, MovieModalError::MissingTrailer { id: 1 }));
}

//! Integration tests: the two HTTP endpoints driven through the router in-process.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use base64::prelude::*;
use http_body_util::BodyExt;
use p384::{
    ecdsa::{signature::Signer, Signature, SigningKey},
    pkcs8::EncodePublicKey,
};
use rand::rngs::OsRng;
use serde_json::{json, Value};
use tower::ServiceExt;

use eid_auth::{
    routing::{create_router, ChallengeResponse},
    AuthService, ChallengeStore, PublicKeyMaterial, StaticKeyResolver,
};

/// Router backed by a fresh store and a freshly generated client key.
fn test_app() -> (Router, SigningKey) {
    let signing_key = SigningKey::random(&mut OsRng);
    let der = signing_key.verifying_key().to_public_key_der().unwrap();
    let key = PublicKeyMaterial::from_der(der.as_bytes()).unwrap();
    let service = AuthService::new(ChallengeStore::new(), Arc::new(StaticKeyResolver::new(key)));
    (create_router(Arc::new(service), None), signing_key)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_challenge(app: &Router, client_id: &str) -> Vec<u8> {
    let request = Request::builder()
        .uri(format!("/auth/challenge?clientId={client_id}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);

    let response: ChallengeResponse = serde_json::from_slice(&body).unwrap();
    response.challenge.as_bytes().to_vec()
}

async fn post_authenticate(app: &Router, body: Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri("/auth/authenticate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

fn sign(signing_key: &SigningKey, challenge: &[u8]) -> String {
    let signature: Signature = signing_key.sign(challenge);
    BASE64_STANDARD.encode(signature.to_bytes())
}

#[tokio::test]
async fn challenge_without_client_id_is_rejected() {
    let (app, _) = test_app();

    for uri in ["/auth/challenge", "/auth/challenge?clientId="] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "error": "ClientId is required." }));
    }
}

#[tokio::test]
async fn challenge_is_sixteen_base64_bytes() {
    let (app, _) = test_app();
    let request = Request::builder()
        .uri("/auth/challenge?clientId=client-1")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    let encoded = body["challenge"].as_str().unwrap();
    assert_eq!(BASE64_STANDARD.decode(encoded).unwrap().len(), 16);
}

#[tokio::test]
async fn full_flow_then_replay() {
    let (app, signing_key) = test_app();
    let challenge = get_challenge(&app, "client-1").await;
    let signature = sign(&signing_key, &challenge);
    let body = json!({ "clientId": "client-1", "signature": signature });

    let (status, response) = post_authenticate(&app, body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_slice(&response).unwrap();
    assert_eq!(response, json!({ "authenticated": true }));

    let (status, response) = post_authenticate(&app, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        String::from_utf8(response).unwrap(),
        "Invalid request: No challenge found for this client."
    );
}

#[tokio::test]
async fn wrong_signature_reports_false_and_keeps_challenge() {
    let (app, signing_key) = test_app();
    let challenge = get_challenge(&app, "client-1").await;

    let wrong = sign(&SigningKey::random(&mut OsRng), &challenge);
    let (status, response) =
        post_authenticate(&app, json!({ "clientId": "client-1", "signature": wrong })).await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_slice(&response).unwrap();
    assert_eq!(response, json!({ "authenticated": false }));

    let right = sign(&signing_key, &challenge);
    let (status, response) =
        post_authenticate(&app, json!({ "clientId": "client-1", "signature": right })).await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_slice(&response).unwrap();
    assert_eq!(response, json!({ "authenticated": true }));
}

#[tokio::test]
async fn unknown_client_is_rejected() {
    let (app, signing_key) = test_app();
    let signature = sign(&signing_key, b"anything");

    let (status, response) = post_authenticate(
        &app,
        json!({ "clientId": "unknown-client", "signature": signature }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        String::from_utf8(response).unwrap(),
        "Invalid request: No challenge found for this client."
    );
}

#[tokio::test]
async fn unparsable_body_is_rejected() {
    let (app, _) = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/auth/authenticate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, response) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(String::from_utf8(response).unwrap(), "Invalid request.");

    let (status, response) =
        post_authenticate(&app, json!({ "clientId": "client-1", "signature": "%%%" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(String::from_utf8(response).unwrap(), "Invalid request.");
}

#[tokio::test]
async fn malformed_signature_bytes_are_not_authenticated() {
    let (app, _) = test_app();
    get_challenge(&app, "client-1").await;

    let garbage = BASE64_STANDARD.encode([0xFFu8; 12]);
    let (status, response) =
        post_authenticate(&app, json!({ "clientId": "client-1", "signature": garbage })).await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_slice(&response).unwrap();
    assert_eq!(response, json!({ "authenticated": false }));
}

#[tokio::test]
async fn repeated_client_id_uses_first_value() {
    let (app, signing_key) = test_app();
    let request = Request::builder()
        .uri("/auth/challenge?clientId=a&clientId=b")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    let challenge: ChallengeResponse = serde_json::from_slice(&body).unwrap();

    // Bound to the first value only
    let signature = sign(&signing_key, challenge.challenge.as_bytes());
    let (status, _) =
        post_authenticate(&app, json!({ "clientId": "b", "signature": signature.clone() })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, response) =
        post_authenticate(&app, json!({ "clientId": "a", "signature": signature })).await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_slice(&response).unwrap();
    assert_eq!(response, json!({ "authenticated": true }));
}

#[tokio::test]
async fn client_id_parameter_name_ignores_case() {
    let (app, _) = test_app();

    for uri in ["/auth/challenge?clientid=a", "/auth/challenge?CLIENTID=a"] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }

    let request = Request::builder()
        .uri("/auth/challenge?clientId=&clientId=a")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "error": "ClientId is required." }));
}

#[tokio::test]
async fn authenticate_body_keys_ignore_case() {
    let (app, signing_key) = test_app();
    let challenge = get_challenge(&app, "client-1").await;
    let signature = sign(&signing_key, &challenge);

    let (status, response) =
        post_authenticate(&app, json!({ "clientid": "client-1", "SIGNATURE": signature })).await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_slice(&response).unwrap();
    assert_eq!(response, json!({ "authenticated": true }));
}

//! HTTP routing configuration

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::debug;

use crate::{
    auth::{AuthRequest, AuthService},
    crypto::challenge::Challenge,
    error::AuthError,
};

const INVALID_REQUEST: &str = "Invalid request.";
const CLIENT_ID_PARAM: &str = "clientId";

#[derive(Debug, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub challenge: Challenge,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthenticateResponse {
    pub authenticated: bool,
}

/// Create the application router
///
/// `cors_origins` is a comma-separated allow-list; `None` allows any origin.
pub fn create_router(service: Arc<AuthService>, cors_origins: Option<&str>) -> Router {
    Router::new()
        .route("/auth/challenge", get(issue_challenge))
        .route("/auth/authenticate", post(authenticate))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(cors_origins))
}

/// Build CORS layer from config. Permissive when no origins are configured.
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some(list) if !list.trim().is_empty() => {
            let parsed: Vec<_> = list
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(parsed))
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any)
        }
        _ => CorsLayer::permissive(),
    }
}

async fn issue_challenge(
    State(service): State<Arc<AuthService>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let client_id = query
        .ok()
        .and_then(|Query(params)| first_client_id(params))
        .unwrap_or_default();

    match service.request_challenge(&client_id) {
        Ok(challenge) => Json(ChallengeResponse { challenge }).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// First `clientId` value, matching the key without regard to ASCII case
fn first_client_id(params: Vec<(String, String)>) -> Option<String> {
    params
        .into_iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(CLIENT_ID_PARAM))
        .map(|(_, value)| value)
}

async fn authenticate(
    State(service): State<Arc<AuthService>>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(error = %rejection, "unparsable authenticate request");
            return (StatusCode::BAD_REQUEST, INVALID_REQUEST).into_response();
        }
    };

    match service.authenticate(&request) {
        Ok(authenticated) => Json(AuthenticateResponse { authenticated }).into_response(),
        Err(e @ AuthError::NoChallengeForClient) => {
            (StatusCode::BAD_REQUEST, format!("Invalid request: {e}")).into_response()
        }
        Err(_) => (StatusCode::BAD_REQUEST, INVALID_REQUEST).into_response(),
    }
}

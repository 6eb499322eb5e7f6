//! Bearer authentication layer for the HTTP transport.
//!
//! Requests to the RPC path must carry `Authorization: Bearer <token>`.
//! A validated token becomes a [`Principal`] in the request extensions;
//! anything else is answered with 401 and a `WWW-Authenticate` challenge
//! pointing at the protected-resource metadata.

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::TokenValidator;

/// State handed to the auth layer.
#[derive(Clone)]
pub struct AuthLayerState {
    /// Token validator pinned at startup.
    pub validator: Arc<TokenValidator>,

    /// `WWW-Authenticate` challenge value sent on rejection.
    pub challenge: String,
}

impl AuthLayerState {
    /// Build the layer state, deriving the challenge from the server URL.
    pub fn new(validator: Arc<TokenValidator>, server_url: &str) -> Self {
        let challenge = format!(
            "Bearer resource_metadata=\"{}/.well-known/oauth-protected-resource\"",
            server_url.trim_end_matches('/')
        );
        Self {
            validator,
            challenge,
        }
    }
}

/// Middleware: validate the bearer token and attach the caller identity.
pub async fn require_bearer(
    State(state): State<AuthLayerState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        debug!("Rejecting request without bearer token");
        return unauthorized(&state, "missing bearer token");
    };

    match state.validator.validate(token) {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => {
            warn!("Bearer token rejected: {}", e);
            unauthorized(&state, "invalid bearer token")
        }
    }
}

fn unauthorized(state: &AuthLayerState, description: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, state.challenge.clone())],
        Json(serde_json::json!({
            "error": "unauthorized",
            "error_description": description,
        })),
    )
        .into_response()
}

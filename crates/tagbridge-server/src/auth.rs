//! Admin Authentication
//!
//! HTTP basic auth (user `admin`) over the admin pages, enabled only when an
//! admin password is configured.

use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::state::AppState;

/// Basic-auth user name for the admin pages
pub const ADMIN_USER: &str = "admin";

/// Reject admin requests without valid credentials
pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(password) = state.admin_password.as_deref() else {
        return next.run(request).await;
    };

    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .and_then(|encoded| STANDARD.decode(encoded.trim()).ok())
        .and_then(|decoded| String::from_utf8(decoded).ok())
        .is_some_and(|pair| pair.split_once(':') == Some((ADMIN_USER, password)));

    if authorized {
        return next.run(request).await;
    }

    tracing::warn!(path = %request.uri().path(), "Rejected admin request");
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"tagbridge admin\"")],
        "Unauthorized",
    )
        .into_response()
}

//! Route Table

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::auth::require_admin;
use crate::handlers::{
    admin::{API_SETTINGS_PATH, PRODUCT_TAGS_PATH},
    api_settings_page, health_check, product_tags_page, save_api_settings, save_product_tag,
    stripe_webhook,
};
use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState, webhook_path: &str) -> Router {
    let admin = Router::new()
        .route(
            PRODUCT_TAGS_PATH,
            get(product_tags_page).post(save_product_tag),
        )
        .route(
            API_SETTINGS_PATH,
            get(api_settings_page).post(save_api_settings),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(health_check))
        .route(webhook_path, post(stripe_webhook))
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

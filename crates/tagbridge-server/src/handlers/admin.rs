//! Admin Pages
//!
//! Server-rendered product/tag mapping editor and API credential form.

use askama::Template;
use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tagbridge_core::{Credentials, ProductTagRule, sanitize_text_field};
use tagbridge_payments::{ProductSummary, fetch_products};

use crate::state::AppState;

pub const PRODUCT_TAGS_PATH: &str = "/admin/product-tags";
pub const API_SETTINGS_PATH: &str = "/admin/api-settings";

// ============================================================================
// Templates
// ============================================================================

#[derive(Template)]
#[template(path = "product_tags.html")]
struct ProductTagsTemplate {
    notice: String,
    products: Vec<ProductSummary>,
    tags: Vec<String>,
    rules: Vec<ProductTagRule>,
}

#[derive(Template)]
#[template(path = "api_settings.html")]
struct ApiSettingsTemplate {
    notice: String,
    stripe_api_key: String,
    mailchimp_api_key: String,
    mailchimp_list_id: String,
}

fn render(template: &impl Template) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render admin template");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ProductTagsQuery {
    #[serde(default)]
    pub delete: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewRuleForm {
    #[serde(default)]
    pub product_title: String,
    #[serde(default)]
    pub product_tag: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiSettingsForm {
    #[serde(default)]
    pub ptm_stripe_api_key: String,
    #[serde(default)]
    pub ptm_mailchimp_api_key: String,
    #[serde(default)]
    pub ptm_mailchimp_list_id: String,
}

// ============================================================================
// Product tags
// ============================================================================

/// GET /admin/product-tags[?delete=<index>]
pub async fn product_tags_page(
    State(state): State<AppState>,
    Query(query): Query<ProductTagsQuery>,
) -> Response {
    if let Some(index) = query.delete.and_then(|raw| raw.trim().parse::<usize>().ok()) {
        match state.settings.delete_rule(index) {
            Ok(true) => tracing::info!(index, "Deleted product tag"),
            Ok(false) => tracing::debug!(index, "No product tag at index"),
            Err(e) => tracing::error!(error = %e, index, "Failed to delete product tag"),
        }
        return Redirect::to(PRODUCT_TAGS_PATH).into_response();
    }

    render_product_tags(&state, String::new()).await
}

/// POST /admin/product-tags
pub async fn save_product_tag(
    State(state): State<AppState>,
    Form(form): Form<NewRuleForm>,
) -> Response {
    let title = sanitize_text_field(&form.product_title);
    let tag = sanitize_text_field(&form.product_tag);

    if title.is_empty() || tag.is_empty() {
        return render_product_tags(&state, String::new()).await;
    }

    let notice = match state.settings.add_rule(ProductTagRule::new(title, tag)) {
        Ok(()) => {
            tracing::info!("Saved product tag");
            "Product tag saved successfully!".to_string()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to save product tag");
            e.user_message()
        }
    };

    render_product_tags(&state, notice).await
}

async fn render_product_tags(state: &AppState, notice: String) -> Response {
    let credentials = state.settings.load_credentials().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Could not load credentials");
        Credentials::default()
    });

    let products = fetch_products(state.gateway.as_ref(), &credentials)
        .await
        .unwrap_or_else(|e| {
            if !e.is_missing_credentials() {
                tracing::warn!(error = %e, "Could not list Stripe products");
            }
            Vec::new()
        });

    let tags = state
        .mailchimp
        .fetch_tags(&credentials)
        .await
        .unwrap_or_else(|e| {
            if !e.is_missing_credentials() {
                tracing::warn!(error = %e, "Could not list Mailchimp tags");
            }
            Vec::new()
        });

    let rules = state.settings.load_rules().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Could not load product tags");
        Vec::new()
    });

    render(&ProductTagsTemplate {
        notice,
        products,
        tags,
        rules,
    })
}

// ============================================================================
// API settings
// ============================================================================

/// GET /admin/api-settings
pub async fn api_settings_page(State(state): State<AppState>) -> Response {
    render_api_settings(&state, String::new())
}

/// POST /admin/api-settings
pub async fn save_api_settings(
    State(state): State<AppState>,
    Form(form): Form<ApiSettingsForm>,
) -> Response {
    let credentials = Credentials {
        stripe_api_key: Some(sanitize_text_field(&form.ptm_stripe_api_key)),
        mailchimp_api_key: Some(sanitize_text_field(&form.ptm_mailchimp_api_key)),
        mailchimp_list_id: Some(sanitize_text_field(&form.ptm_mailchimp_list_id)),
    };

    let notice = match state.settings.save_credentials(&credentials) {
        Ok(()) => {
            tracing::info!("Saved API settings");
            "Settings saved.".to_string()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to save API settings");
            e.user_message()
        }
    };

    render_api_settings(&state, notice)
}

fn render_api_settings(state: &AppState, notice: String) -> Response {
    let credentials = state.settings.load_credentials().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Could not load credentials");
        Credentials::default()
    });

    render(&ApiSettingsTemplate {
        notice,
        stripe_api_key: credentials.stripe_api_key.unwrap_or_default(),
        mailchimp_api_key: credentials.mailchimp_api_key.unwrap_or_default(),
        mailchimp_list_id: credentials.mailchimp_list_id.unwrap_or_default(),
    })
}

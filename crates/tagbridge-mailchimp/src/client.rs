//! Mailchimp Client
//!
//! Tag catalog retrieval and contact create-or-update for one audience.

use md5::{Digest, Md5};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tagbridge_core::{ContactRecord, Credentials, DailyLog};

use crate::error::{MailchimpError, Result};
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

/// Tags requested per tag-search page
pub const TAG_PAGE_SIZE: usize = 500;

/// Timeout applied to member create/update calls
pub const UPSERT_TIMEOUT: Duration = Duration::from_secs(10);

/// Datacenter used for member upserts unless configured otherwise
pub const DEFAULT_MEMBER_DATACENTER: &str = "us21";

/// Basic-auth user for tag search
const TAG_SEARCH_USER: &str = "user";

/// Basic-auth user for member upserts
const MEMBER_USER: &str = "apikey";

/// Client configuration
#[derive(Clone, Debug)]
pub struct MailchimpConfig {
    /// Datacenter of the member endpoint (`https://<dc>.api.mailchimp.com`)
    pub member_datacenter: String,

    /// Tag-search page size
    pub page_size: usize,

    /// Timeout for member create/update
    pub upsert_timeout: Duration,
}

impl Default for MailchimpConfig {
    fn default() -> Self {
        Self {
            member_datacenter: DEFAULT_MEMBER_DATACENTER.into(),
            page_size: TAG_PAGE_SIZE,
            upsert_timeout: UPSERT_TIMEOUT,
        }
    }
}

/// What happened to a contact upsert
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// POST succeeded
    Created,

    /// POST answered 400 and the PATCH succeeded
    Updated,

    /// POST answered 400 and the PATCH answered a non-2xx status
    UpdateRejected { status: u16 },

    /// POST answered a non-2xx, non-400 status; nothing else was tried
    Rejected { status: u16 },

    /// A request never got a response; the error was written to the failure log
    TransportFailed,
}

#[derive(Deserialize)]
struct TagSearchPage {
    #[serde(default)]
    tags: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}

/// Mailchimp API client
#[derive(Clone)]
pub struct MailchimpClient {
    transport: Arc<dyn Transport>,
    config: MailchimpConfig,
}

impl MailchimpClient {
    pub fn new(transport: Arc<dyn Transport>, config: MailchimpConfig) -> Self {
        Self { transport, config }
    }

    /// Fetch every tag defined in the audience.
    ///
    /// Pages of `page_size` are requested until one comes back short. A page
    /// that fails or cannot be decoded counts as empty, which also ends the
    /// walk, so a mid-way failure truncates the list rather than erroring.
    pub async fn fetch_tags(&self, credentials: &Credentials) -> Result<Vec<String>> {
        let (api_key, list_id) = credentials
            .mailchimp()
            .ok_or(MailchimpError::MissingCredentials)?;
        let dc = datacenter(api_key)?;

        let mut all_tags = Vec::new();
        let mut offset = 0;

        loop {
            let request = ApiRequest {
                method: Method::GET,
                url: format!(
                    "https://{dc}.api.mailchimp.com/3.0/lists/{list_id}/tag-search?count={}&offset={offset}",
                    self.config.page_size
                ),
                username: TAG_SEARCH_USER.into(),
                password: api_key.into(),
                body: None,
                timeout: None,
            };

            let page = match self.transport.send(request).await {
                Ok(response) => parse_tag_page(&response, offset),
                Err(e) => {
                    tracing::warn!(error = %e, offset, "Tag search request failed");
                    Vec::new()
                }
            };

            let fetched = page.len();
            all_tags.extend(page);
            offset += self.config.page_size;

            if fetched < self.config.page_size {
                break;
            }
        }

        tracing::debug!(count = all_tags.len(), "Fetched Mailchimp tags");
        Ok(all_tags)
    }

    /// Create the contact, or update it if Mailchimp reports it already exists.
    ///
    /// A POST answered with 400 is retried once as a PATCH to the member's
    /// hash endpoint with the same body. Connection failures are appended to
    /// `failure_log`; other error statuses are only traced.
    pub async fn upsert_contact(
        &self,
        contact: &ContactRecord,
        credentials: &Credentials,
        failure_log: &DailyLog,
    ) -> Result<UpsertOutcome> {
        let (api_key, list_id) = credentials
            .mailchimp()
            .ok_or(MailchimpError::MissingCredentials)?;
        let body = serde_json::to_string(contact)?;

        let members_url = format!(
            "https://{}.api.mailchimp.com/3.0/lists/{list_id}/members",
            self.config.member_datacenter
        );

        let created = self
            .send_member(Method::POST, members_url.clone(), api_key, &body)
            .await;
        let response = match created {
            Ok(response) => response,
            Err(e) => return Ok(transport_failed(&e, failure_log).await),
        };

        if response.is_success() {
            tracing::info!(email = %contact.email_address, "Created Mailchimp contact");
            return Ok(UpsertOutcome::Created);
        }

        if response.status != 400 {
            tracing::warn!(
                status = response.status,
                email = %contact.email_address,
                "Mailchimp rejected contact"
            );
            return Ok(UpsertOutcome::Rejected {
                status: response.status,
            });
        }

        let member_url = format!(
            "{members_url}/{}",
            subscriber_hash(&contact.email_address)
        );
        let updated = self
            .send_member(Method::PATCH, member_url, api_key, &body)
            .await;

        match updated {
            Ok(response) if response.is_success() => {
                tracing::info!(email = %contact.email_address, "Updated Mailchimp contact");
                Ok(UpsertOutcome::Updated)
            }
            Ok(response) => {
                tracing::warn!(
                    status = response.status,
                    email = %contact.email_address,
                    "Mailchimp rejected contact update"
                );
                Ok(UpsertOutcome::UpdateRejected {
                    status: response.status,
                })
            }
            Err(e) => Ok(transport_failed(&e, failure_log).await),
        }
    }

    async fn send_member(
        &self,
        method: Method,
        url: String,
        api_key: &str,
        body: &str,
    ) -> Result<ApiResponse> {
        self.transport
            .send(ApiRequest {
                method,
                url,
                username: MEMBER_USER.into(),
                password: api_key.into(),
                body: Some(body.to_string()),
                timeout: Some(self.config.upsert_timeout),
            })
            .await
    }
}

async fn transport_failed(error: &MailchimpError, failure_log: &DailyLog) -> UpsertOutcome {
    tracing::error!(error = %error, "Mailchimp upsert transport failure");
    failure_log.record(&error.to_string()).await;
    UpsertOutcome::TransportFailed
}

fn parse_tag_page(response: &ApiResponse, offset: usize) -> Vec<String> {
    match serde_json::from_str::<TagSearchPage>(&response.body) {
        Ok(page) => page.tags.into_iter().map(|t| t.name).collect(),
        Err(e) => {
            tracing::warn!(
                status = response.status,
                offset,
                error = %e,
                "Unreadable tag search page"
            );
            Vec::new()
        }
    }
}

/// Datacenter suffix of an API key (`<key>-<dc>`)
pub fn datacenter(api_key: &str) -> Result<&str> {
    api_key
        .split_once('-')
        .map(|(_, dc)| dc)
        .filter(|dc| !dc.is_empty())
        .ok_or_else(|| MailchimpError::InvalidApiKey("missing datacenter suffix".into()))
}

/// Member id: lowercase hex MD5 of the lowercased email
pub fn subscriber_hash(email: &str) -> String {
    hex::encode(Md5::digest(email.to_lowercase().as_bytes()))
}

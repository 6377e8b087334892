//! HTTP Transport
//!
//! The Mailchimp client speaks to the network through [`Transport`], so tag
//! pagination and the upsert fallback can be driven by scripted responses.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

pub use reqwest::Method;

use crate::error::{MailchimpError, Result};

/// Outbound request with basic auth
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub username: String,
    pub password: String,
    pub body: Option<String>,
    /// `None` leaves the client default in place
    pub timeout: Option<Duration>,
}

/// Any HTTP response, successful or not
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests; only connection-level failures are errors.
///
/// Non-2xx statuses come back as `Ok` so callers can branch on them.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Transport backed by `reqwest`
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a fresh HTTP client
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| MailchimpError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .basic_auth(&request.username, Some(&request.password))
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| MailchimpError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| MailchimpError::Transport(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

/// Scripted transport for tests.
///
/// Replies are consumed in order; an exhausted script is a transport error.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<std::result::Result<ApiResponse, String>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an HTTP response
    pub fn reply(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Ok(ApiResponse::new(status, body)));
        self
    }

    /// Queue a connection-level failure
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.push(Err(message.into()));
        self
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn push(&self, reply: std::result::Result<ApiResponse, String>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        let reply = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());

        match reply {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(MailchimpError::Transport(message)),
            None => Err(MailchimpError::Transport("no scripted reply".into())),
        }
    }
}

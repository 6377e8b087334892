//! # tagbridge-mailchimp
//!
//! Mailchimp side of the tag bridge.
//!
//! - **Tag catalog**: every tag in the audience, via paginated tag search
//! - **Contact upsert**: POST to the members endpoint, falling back to a
//!   PATCH of `members/<md5(lowercase email)>` when Mailchimp answers 400
//!
//! ## API Reference
//!
//! - Tag search: `GET https://<dc>.api.mailchimp.com/3.0/lists/<list>/tag-search?count=500&offset=<n>`
//!   (`<dc>` is the API key's suffix after `-`), basic auth `user:<key>`
//! - Members: `POST`/`PATCH https://us21.api.mailchimp.com/3.0/lists/<list>/members[/<hash>]`,
//!   basic auth `apikey:<key>`, 10 second timeout
//!
//! All network access goes through [`Transport`]; [`ReqwestTransport`] is the
//! live implementation and [`MockTransport`] replays scripted responses.

mod client;
mod error;
mod transport;

pub use client::{
    DEFAULT_MEMBER_DATACENTER, MailchimpClient, MailchimpConfig, TAG_PAGE_SIZE, UPSERT_TIMEOUT,
    UpsertOutcome, datacenter, subscriber_hash,
};
pub use error::{MailchimpError, Result};
pub use transport::{ApiRequest, ApiResponse, Method, MockTransport, ReqwestTransport, Transport};

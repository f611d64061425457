//! Client for the Airtable REST and OAuth APIs.
//!
//! Record writes and metadata reads live in [`api`]; the OAuth2 PKCE
//! handshake lives in [`oauth`]. No retry or backoff here: every call is a
//! single fallible request and the caller decides what a failure means.

pub mod api;
pub mod oauth;

pub use api::{AirtableClient, AirtableError, FieldMeta};
pub use oauth::{OauthTokens, PkcePair};

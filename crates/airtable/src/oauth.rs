//! Airtable OAuth2 authorization-code flow with PKCE (S256).
//!
//! The server generates a `state` token and a PKCE verifier per login
//! attempt, stores both server-side, and redirects the owner to Airtable.
//! The callback consumes the stored pair and exchanges the code for tokens.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::Rng;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::api::{AirtableClient, AirtableError};

/// Scopes requested for a form owner: record writes plus schema reads.
pub const OAUTH_SCOPE: &str = "data.records:read data.records:write schema.bases:read";

/// Authorization endpoint path on airtable.com.
const AUTHORIZE_URL: &str = "https://airtable.com/oauth2/v1/authorize";

/// A PKCE verifier and its S256 challenge.
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    /// Generate a fresh random verifier and derive its challenge.
    pub fn generate() -> Self {
        let bytes: [u8; 32] = rand::rng().random();
        let verifier = URL_SAFE_NO_PAD.encode(bytes);
        let challenge = Self::challenge_for(&verifier);
        Self {
            verifier,
            challenge,
        }
    }

    /// S256: base64url(sha256(verifier)), no padding.
    fn challenge_for(verifier: &str) -> String {
        let digest = Sha256::digest(verifier.as_bytes());
        URL_SAFE_NO_PAD.encode(digest)
    }
}

/// Generate an unguessable `state` token for CSRF protection.
pub fn generate_state() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    let mut out = String::with_capacity(32);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// Tokens returned by the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OauthTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Build the provider authorize URL the owner is redirected to.
///
/// The base URL is a constant and query parameters are percent-encoded by
/// the URL builder, so this cannot fail for any input.
pub fn authorize_url(client_id: &str, redirect_uri: &str, state: &str, challenge: &str) -> String {
    let mut url = reqwest::Url::parse(AUTHORIZE_URL).expect("static authorize URL parses");
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("scope", OAUTH_SCOPE)
        .append_pair("state", state)
        .append_pair("code_challenge", challenge)
        .append_pair("code_challenge_method", "S256");
    url.into()
}

impl AirtableClient {
    /// Exchange an authorization code for tokens.
    ///
    /// `POST {meta_base}/oauth2/v1/token` with form-encoded params and HTTP
    /// basic auth (client id/secret).
    pub async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        code: &str,
        code_verifier: &str,
    ) -> Result<OauthTokens, AirtableError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", client_id),
            ("code_verifier", code_verifier),
        ];
        self.token_request(client_id, client_secret, &params).await
    }

    /// Exchange a refresh token for a new token pair.
    pub async fn refresh_access_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<OauthTokens, AirtableError> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id),
        ];
        self.token_request(client_id, client_secret, &params).await
    }

    async fn token_request(
        &self,
        client_id: &str,
        client_secret: &str,
        params: &[(&str, &str)],
    ) -> Result<OauthTokens, AirtableError> {
        let response = self
            .http()
            .post(format!("{}/oauth2/v1/token", self.meta_base()))
            .basic_auth(client_id, Some(client_secret))
            .form(params)
            .send()
            .await?;

        Self::parse_response(response).await
    }
}

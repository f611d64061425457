use formbase_core::submission::SubmissionPolicy;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the Airtable client credentials and `JWT_SECRET` have
/// defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Airtable OAuth client and endpoint configuration.
    pub airtable: AirtableConfig,
    /// Whether answers to currently-hidden questions are still forwarded
    /// at submit time (default: true; see DESIGN.md).
    pub submission_policy: SubmissionPolicy,
}

/// Airtable OAuth client settings and endpoint origins.
#[derive(Debug, Clone)]
pub struct AirtableConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Our callback URL, registered with the OAuth client.
    pub redirect_uri: String,
    /// Where owners are sent after a completed login.
    pub frontend_url: String,
    /// Data API origin; override in tests to point at a stub.
    pub api_base: String,
    /// Metadata/OAuth origin; override in tests to point at a stub.
    pub meta_base: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                         |
    /// |--------------------------|---------------------------------|
    /// | `HOST`                   | `0.0.0.0`                       |
    /// | `PORT`                   | `3000`                          |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`         |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                            |
    /// | `RETAIN_HIDDEN_ANSWERS`  | `true`                          |
    ///
    /// # Panics
    ///
    /// Panics on malformed values or missing required secrets; startup
    /// misconfiguration should fail fast.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let retain_hidden_answers: bool = std::env::var("RETAIN_HIDDEN_ANSWERS")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("RETAIN_HIDDEN_ANSWERS must be true or false");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            airtable: AirtableConfig::from_env(),
            submission_policy: SubmissionPolicy {
                retain_hidden_answers,
            },
        }
    }
}

impl AirtableConfig {
    /// Load Airtable settings from environment variables.
    ///
    /// | Env Var                   | Required | Default                                  |
    /// |---------------------------|----------|------------------------------------------|
    /// | `AIRTABLE_CLIENT_ID`      | **yes**  | --                                       |
    /// | `AIRTABLE_CLIENT_SECRET`  | **yes**  | --                                       |
    /// | `REDIRECT_URI`            | no       | `http://localhost:3000/api/v1/auth/callback` |
    /// | `FRONTEND_URL`            | no       | `http://localhost:5173`                  |
    /// | `AIRTABLE_API_BASE`       | no       | production origin                        |
    /// | `AIRTABLE_META_BASE`      | no       | production origin                        |
    pub fn from_env() -> Self {
        let client_id =
            std::env::var("AIRTABLE_CLIENT_ID").expect("AIRTABLE_CLIENT_ID must be set");
        let client_secret =
            std::env::var("AIRTABLE_CLIENT_SECRET").expect("AIRTABLE_CLIENT_SECRET must be set");

        let redirect_uri = std::env::var("REDIRECT_URI")
            .unwrap_or_else(|_| "http://localhost:3000/api/v1/auth/callback".into());
        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".into());

        let api_base = std::env::var("AIRTABLE_API_BASE")
            .unwrap_or_else(|_| formbase_airtable::api::DEFAULT_API_BASE.into());
        let meta_base = std::env::var("AIRTABLE_META_BASE")
            .unwrap_or_else(|_| formbase_airtable::api::DEFAULT_META_BASE.into());

        Self {
            client_id,
            client_secret,
            redirect_uri,
            frontend_url,
            api_base,
            meta_base,
        }
    }
}

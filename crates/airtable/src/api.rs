//! REST client for Airtable record writes and schema metadata.

use serde::Deserialize;
use serde_json::Value;

/// Default Airtable data API origin.
pub const DEFAULT_API_BASE: &str = "https://api.airtable.com";
/// Default Airtable metadata/OAuth origin.
pub const DEFAULT_META_BASE: &str = "https://login.airtable.com";

/// Field types a form question can bind to; everything else is filtered
/// out of metadata listings.
const SUPPORTED_FIELD_TYPES: &[&str] = &[
    "singleLineText",
    "multilineText",
    "email",
    "phoneNumber",
    "number",
    "date",
    "singleSelect",
    "multipleSelects",
    "attachment",
];

/// Errors from the Airtable REST layer.
#[derive(Debug, thiserror::Error)]
pub enum AirtableError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Airtable returned a non-2xx status code.
    #[error("Airtable API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// HTTP client for the Airtable API, shared across requests.
pub struct AirtableClient {
    client: reqwest::Client,
    api_base: String,
    meta_base: String,
}

/// Response from a record-create call.
#[derive(Debug, Deserialize)]
struct CreateRecordResponse {
    id: String,
}

/// A base visible to the owner's token.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct BaseMeta {
    pub id: String,
    pub name: String,
}

/// A table within a base.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct TableMeta {
    pub id: String,
    pub name: String,
}

/// A field within a table, reduced to what the form builder needs.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FieldMeta {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BasesEnvelope {
    bases: Vec<BaseMeta>,
}

#[derive(Debug, Deserialize)]
struct TablesEnvelope {
    tables: Vec<TableMeta>,
}

#[derive(Debug, Deserialize)]
struct FieldsEnvelope {
    fields: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    id: String,
    name: String,
    #[serde(rename = "type")]
    field_type: String,
    #[serde(default)]
    options: Option<RawFieldOptions>,
}

#[derive(Debug, Deserialize)]
struct RawFieldOptions {
    #[serde(default)]
    choices: Vec<RawChoice>,
}

#[derive(Debug, Deserialize)]
struct RawChoice {
    name: String,
}

impl AirtableClient {
    /// Create a client against the production Airtable endpoints.
    pub fn new() -> Self {
        Self::with_bases(DEFAULT_API_BASE.to_string(), DEFAULT_META_BASE.to_string())
    }

    /// Create a client with overridden origins (tests point these at a
    /// local stub server).
    pub fn with_bases(api_base: String, meta_base: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            meta_base,
        }
    }

    // ---- record writes ----

    /// Create a record with the given scalar field mapping.
    ///
    /// Sends `POST /v0/{base}/{table}` with `{ "fields": ... }` and returns
    /// the server-assigned record id.
    pub async fn create_record(
        &self,
        access_token: &str,
        base_id: &str,
        table_id: &str,
        fields: &serde_json::Map<String, Value>,
    ) -> Result<String, AirtableError> {
        let body = serde_json::json!({ "fields": fields });
        let response = self
            .client
            .post(format!("{}/v0/{}/{}", self.api_base, base_id, table_id))
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;

        let created: CreateRecordResponse = Self::parse_response(response).await?;
        Ok(created.id)
    }

    /// Write one uploaded file as an attachment record.
    ///
    /// Airtable ingests attachments by URL, so the upload is forwarded as a
    /// single-element attachment array on the target field. Each attachment
    /// question becomes its own record write, independent of the scalar
    /// record and of other attachments.
    pub async fn create_attachment_record(
        &self,
        access_token: &str,
        base_id: &str,
        table_id: &str,
        field_id: &str,
        url: &str,
        filename: &str,
    ) -> Result<String, AirtableError> {
        let mut fields = serde_json::Map::new();
        fields.insert(
            field_id.to_string(),
            serde_json::json!([{ "url": url, "filename": filename }]),
        );
        self.create_record(access_token, base_id, table_id, &fields)
            .await
    }

    // ---- schema metadata ----

    /// List the bases the owner's token can read.
    pub async fn list_bases(&self, access_token: &str) -> Result<Vec<BaseMeta>, AirtableError> {
        let response = self
            .client
            .get(format!("{}/api/meta/bases", self.meta_base))
            .bearer_auth(access_token)
            .send()
            .await?;

        let envelope: BasesEnvelope = Self::parse_response(response).await?;
        Ok(envelope.bases)
    }

    /// List the tables in a base.
    pub async fn list_tables(
        &self,
        access_token: &str,
        base_id: &str,
    ) -> Result<Vec<TableMeta>, AirtableError> {
        let response = self
            .client
            .get(format!("{}/api/meta/bases/{}/tables", self.meta_base, base_id))
            .bearer_auth(access_token)
            .send()
            .await?;

        let envelope: TablesEnvelope = Self::parse_response(response).await?;
        Ok(envelope.tables)
    }

    /// List a table's fields, filtered to the types a form can bind to,
    /// with select choices flattened to their names.
    pub async fn list_fields(
        &self,
        access_token: &str,
        base_id: &str,
        table_id: &str,
    ) -> Result<Vec<FieldMeta>, AirtableError> {
        let response = self
            .client
            .get(format!(
                "{}/api/meta/bases/{}/tables/{}/fields",
                self.meta_base, base_id, table_id
            ))
            .bearer_auth(access_token)
            .send()
            .await?;

        let envelope: FieldsEnvelope = Self::parse_response(response).await?;
        Ok(envelope
            .fields
            .into_iter()
            .filter(|f| SUPPORTED_FIELD_TYPES.contains(&f.field_type.as_str()))
            .map(|f| FieldMeta {
                id: f.id,
                name: f.name,
                field_type: f.field_type,
                options: f
                    .options
                    .map(|o| o.choices.into_iter().map(|c| c.name).collect())
                    .unwrap_or_default(),
            })
            .collect())
    }

    /// Meta-API origin, exposed for the OAuth module.
    pub(crate) fn meta_base(&self) -> &str {
        &self.meta_base
    }

    /// Shared reqwest client, exposed for the OAuth module.
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or an [`AirtableError::Api`] containing the
    /// status and body text on failure.
    pub(crate) async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AirtableError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), %body, "Airtable returned an error");
            return Err(AirtableError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AirtableError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

impl Default for AirtableClient {
    fn default() -> Self {
        Self::new()
    }
}

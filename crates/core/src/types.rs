/// Primary key type for every table (PostgreSQL BIGSERIAL).
pub type DbId = i64;

/// UTC timestamp used across models and analytics.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

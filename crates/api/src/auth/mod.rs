//! Authentication: JWT session tokens issued after Airtable OAuth.

pub mod jwt;

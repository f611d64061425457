//! Domain logic for Formbase: form model, conditional visibility,
//! submission validation, form-definition checks, and response analytics.
//!
//! Everything in this crate is pure and synchronous. The HTTP layer and the
//! Airtable client live in their own crates and consume these functions.

pub mod analytics;
pub mod definition;
pub mod error;
pub mod form;
pub mod submission;
pub mod types;
pub mod visibility;

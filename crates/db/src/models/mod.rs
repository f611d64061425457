//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - An update DTO (all `Option` fields) where partial updates exist

pub mod form;
pub mod oauth_state;
pub mod response;
pub mod user;

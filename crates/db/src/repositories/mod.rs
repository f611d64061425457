//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod form_repo;
pub mod oauth_state_repo;
pub mod response_repo;
pub mod user_repo;

pub use form_repo::FormRepo;
pub use oauth_state_repo::OauthStateRepo;
pub use response_repo::ResponseRepo;
pub use user_repo::UserRepo;

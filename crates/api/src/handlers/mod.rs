//! Request handlers, grouped by resource.

pub mod forms;
pub mod meta;
pub mod oauth;
pub mod responses;
pub mod submissions;
pub mod webhooks;

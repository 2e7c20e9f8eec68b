//! Request extractors: caller identity, request URL, list parameters.

pub mod auth;
pub mod request;

pub use auth::CurrentUser;
pub use request::{ListRequest, RequestUrl};

//! # API Agent Library
//!
//! Calls HTTP APIs with Basic or OAuth2 authorization, keeps the OAuth2
//! bearer token cached and persisted between runs, and decodes restaurant
//! search results for a presentation layer.
//!
//! Modules:
//! - `cache`: token type and token stores (memory, file)
//! - `auth`: credentials, authorization resolver, token refresher
//! - `client`: request descriptor, HTTP caller, call outcome
//! - `search`: restaurant models and the search fetcher
//! - `config`: service configuration loading and validation

pub mod agent;
pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod helpers;
pub mod observability;
pub mod search;
pub mod server;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::auth::credentials::{AuthScheme, Credentials};
pub use crate::client::caller::ApiCaller;
pub use crate::client::request::RequestDescriptor;
pub use crate::client::response::{ApiFailure, ApiOutcome, FailureKind};
pub use crate::config::service::ServiceConfig;
pub use crate::error::{ApiError, ApiResult};

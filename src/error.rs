use http::StatusCode;
use thiserror::Error;

use crate::client::response::ApiFailure;

/// Failures of the token lifecycle and of domain fetches.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network, DNS, TLS or body read failure.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Authorization server answered with anything other than 200.
    #[error("Error from authorization server : {}", .0.as_u16())]
    AuthServer(StatusCode),

    /// Required field absent from the authorization response, or not of
    /// the expected JSON type.
    #[error("{}", malformed_message(.0))]
    MalformedTokenResponse(&'static str),

    #[error("Error parsing result from Authorization server: {0}")]
    TokenParse(#[source] serde_json::Error),

    #[error("invalid value for header '{0}'")]
    InvalidHeader(&'static str),

    #[error("response has no body")]
    NoBody,

    /// Token file could not be read or written.
    #[error("token store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("response body does not match the expected shape: {0}")]
    Decode(#[source] serde_json::Error),

    /// A call completed with a failed outcome.
    #[error("{}", .0.message)]
    Call(ApiFailure),
}

pub type ApiResult<T> = Result<T, ApiError>;

fn malformed_message(field: &str) -> &'static str {
    match field {
        "access_token" => "No Access token",
        "expires_in" => "No expiration interval",
        _ => "Malformed authorization response",
    }
}

use http::{HeaderMap, StatusCode};

/// Terminal state of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Authorization header could not be produced; nothing was sent.
    AuthFailed,
    /// The request did not complete (connect, DNS, TLS, body read).
    Transport,
    /// The server answered outside 200..=299.
    Http,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match *self {
            FailureKind::AuthFailed => "auth_failed",
            FailureKind::Transport => "transport_error",
            FailureKind::Http => "http_error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiFailure {
    pub kind: FailureKind,
    pub status: Option<StatusCode>,
    /// Human readable label: the numeric status for plain HTTP errors, the
    /// refresh outcome after a 403 under OAuth2, otherwise the error text.
    pub message: String,
    pub headers: Option<HeaderMap>,
    /// Set only when a 403 triggered a token refresh.
    pub token_refreshed: Option<bool>,
}

impl ApiFailure {
    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::AuthFailed,
            status: None,
            message: message.into(),
            headers: None,
            token_refreshed: None,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transport,
            status: None,
            message: message.into(),
            headers: None,
            token_refreshed: None,
        }
    }

    pub fn http(status: StatusCode, headers: HeaderMap) -> Self {
        Self {
            kind: FailureKind::Http,
            status: Some(status),
            message: status.as_u16().to_string(),
            headers: Some(headers),
            token_refreshed: None,
        }
    }

    /// 403 answered under OAuth2 after the forced refresh ran.
    pub fn forbidden(headers: HeaderMap, refresh_message: String, token_refreshed: bool) -> Self {
        Self {
            kind: FailureKind::Http,
            status: Some(StatusCode::FORBIDDEN),
            message: refresh_message,
            headers: Some(headers),
            token_refreshed: Some(token_refreshed),
        }
    }
}

/// Result of exactly one call.
#[derive(Debug, Clone)]
pub enum ApiOutcome {
    Success {
        status: StatusCode,
        headers: HeaderMap,
        /// `None` when the server sent an empty body
        body: Option<Vec<u8>>,
    },
    Failure(ApiFailure),
}

impl ApiOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiOutcome::Success { .. })
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiOutcome::Success { status, .. } => Some(*status),
            ApiOutcome::Failure(failure) => failure.status,
        }
    }

    /// Numeric status for successes, the failure message otherwise.
    pub fn status_label(&self) -> String {
        match self {
            ApiOutcome::Success { status, .. } => status.as_u16().to_string(),
            ApiOutcome::Failure(failure) => failure.message.clone(),
        }
    }

    pub fn body(&self) -> Option<&[u8]> {
        match self {
            ApiOutcome::Success { body, .. } => body.as_deref(),
            ApiOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ApiFailure> {
        match self {
            ApiOutcome::Success { .. } => None,
            ApiOutcome::Failure(failure) => Some(failure),
        }
    }

    pub fn into_body(self) -> Result<Option<Vec<u8>>, ApiFailure> {
        match self {
            ApiOutcome::Success { body, .. } => Ok(body),
            ApiOutcome::Failure(failure) => Err(failure),
        }
    }

    pub(crate) fn result_label(&self) -> &'static str {
        match self {
            ApiOutcome::Success { .. } => "success",
            ApiOutcome::Failure(failure) => failure.kind.as_str(),
        }
    }
}

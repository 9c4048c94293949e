use reqwest::StatusCode;

/// Shown for any failure caused by a missing or rejected credential.
pub const AUTH_REQUIRED_MESSAGE: &str = "Authentication required";

/// Error types for backend operations
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Backend returned {status}: {message}")]
    Backend { status: StatusCode, message: String },

    /// The backend answered 2xx but reported `success: false`.
    #[error("{0}")]
    Rejected(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn is_auth(&self) -> bool {
        match self {
            ApiError::Unauthenticated => true,
            ApiError::Backend { status, .. } => *status == StatusCode::UNAUTHORIZED,
            _ => false,
        }
    }

    /// Message to surface to the user.
    ///
    /// Auth failures always read the same; anything the backend explained
    /// is passed through; transport and decoding failures use `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        if self.is_auth() {
            return AUTH_REQUIRED_MESSAGE.to_string();
        }
        match self {
            ApiError::InvalidRequest(message)
            | ApiError::Rejected(message)
            | ApiError::Backend { message, .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Pull a human-readable message out of a backend error body.
///
/// Looks at `error` first, then `message`, and gives up on anything that
/// is not a JSON object with a non-empty string there.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .filter_map(|key| value.get(key).and_then(|v| v.as_str()))
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}

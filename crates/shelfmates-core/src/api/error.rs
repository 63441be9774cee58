use thiserror::Error;

/// Failures talking to the Steam Web API.
///
/// Steam answers an invalid or revoked key with 403 and an HTML body, so
/// `AccessDenied` is the usual "bad key" case; 401 is rarer.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Steam API refused the request (check API_KEY): {0}")]
    AccessDenied(String),

    #[error("Unauthorized - check the Steam API key")]
    Unauthorized,

    #[error("Steam API endpoint not found: {0}")]
    NotFound(String),

    #[error("Rate limited by the Steam API")]
    RateLimited,

    #[error("Steam API server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unexpected Steam API response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

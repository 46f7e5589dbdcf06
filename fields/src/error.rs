use thiserror::Error;

/// Failure talking to one of the validation endpoints.
///
/// Controllers never surface these to callers; they log them and render a
/// default negative result instead.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Transport error: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    #[error("Endpoint {endpoint} answered with HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Malformed response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl ValidationError {
    /// Endpoint path the failure came from, when the request got that far.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ValidationError::Status { endpoint, .. } | ValidationError::Decode { endpoint, .. } => {
                Some(endpoint)
            }
            ValidationError::Transport { .. } => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ValidationError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

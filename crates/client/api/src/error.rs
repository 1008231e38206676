/// Failures surfaced by a [`crate::GameApi`] implementation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Engine returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The engine answered `ok: false`.
    #[error("Engine rejected request: {0}")]
    Server(String),

    #[error("Malformed engine response: {0}")]
    Decode(String),

    #[error("Engine response is missing `{0}`")]
    MissingField(&'static str),
}

impl ApiError {
    /// Short text suitable for a transient on-screen notice.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server(message) if !message.trim().is_empty() => message.clone(),
            ApiError::Status { body, .. } if !body.trim().is_empty() && body.len() <= 120 => {
                body.clone()
            }
            ApiError::Network(_) => "Cannot reach the game engine".to_string(),
            _ => "Request failed".to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

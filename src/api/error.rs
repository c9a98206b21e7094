use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {detail}")]
    Http { status: u16, detail: String },

    #[error("session expired - please sign in again")]
    AuthExpired,

    #[error("invalid response payload: {0}")]
    Validation(String),
}

/// Error payload shape used by the backend for non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

impl ApiError {
    /// Consume a non-2xx response into an `Http` error, preferring the
    /// server-supplied `detail` field over the generic message.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Self::from_parts(status, &body)
    }

    pub fn from_parts(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail)
            .unwrap_or_else(|| format!("API Error: {}", status));
        ApiError::Http { status, detail }
    }

    /// Status code for `Http` errors, `None` for the other variants.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

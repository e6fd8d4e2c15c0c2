use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FluxClientError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unauthorized: sign in first")]
    Unauthorized,
    #[error("server rejected the request ({status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl FluxClientError {
    /// Turns a non-2xx response into an error, preferring the server's
    /// `{success:false, message}` body when it parses.
    pub(crate) async fn from_http_response(response: reqwest::Response) -> Self {
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return FluxClientError::Unauthorized;
        }
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| status.to_string());
        FluxClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

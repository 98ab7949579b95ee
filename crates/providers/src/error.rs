use callpilot_core::error::CoreError;

/// Errors from the provider HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        /// Provider-supplied message when the body carried one, else the raw body.
        message: String,
    },

    /// The provider answered 2xx with a body we cannot use.
    #[error("Invalid {provider} response: {reason}")]
    InvalidResponse {
        provider: &'static str,
        reason: String,
    },
}

impl From<ProviderError> for CoreError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Api { message, .. } => CoreError::Provider(message),
            other => CoreError::Provider(other.to_string()),
        }
    }
}

/// Ensure the response has a success status, turning failures into
/// [`ProviderError::Api`] with the provider's own message when present.
pub(crate) async fn ensure_success(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(ProviderError::Api {
        provider,
        status: status.as_u16(),
        message: extract_error_message(&body).unwrap_or(body),
    })
}

/// Pull a human-readable message out of a provider error body.
///
/// Handles both `{"message": ...}` (Twilio) and
/// `{"error": {"message": ...}}` (OpenAI).
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error").and_then(|e| e.get("message")))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

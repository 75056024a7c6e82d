//! REST client for the image-edit provider's HTTP endpoint.
//!
//! Wraps the provider's edit endpoint (multipart: source image + prompt)
//! using [`reqwest`]. The client carries an explicit request timeout; a
//! hung provider fails the request instead of pinning the handler.

use std::time::Duration;

/// HTTP client for the image-edit provider.
pub struct ImageEditApi {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

/// A successfully generated image.
#[derive(Debug, Clone)]
pub struct EditedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Errors from the image-edit API layer.
#[derive(Debug, thiserror::Error)]
pub enum ImageEditApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Image-edit API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider returned 2xx with an empty body.
    #[error("Image-edit API returned an empty image")]
    EmptyOutput,
}

impl ImageEditApi {
    /// Create a new client for the provider.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `https://api.provider.test`.
    /// * `api_key` - Bearer token for the provider account.
    /// * `timeout` - Whole-request timeout applied to every call.
    pub fn new(api_url: String, api_key: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            api_url,
            api_key,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`] (useful for
    /// connection pooling; the caller owns the timeout policy).
    pub fn with_client(client: reqwest::Client, api_url: String, api_key: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
        }
    }

    /// Apply an edit prompt to a source image.
    ///
    /// Sends `POST /v1/edits` as multipart form data with the source image
    /// bytes and the prompt, and returns the generated image bytes.
    pub async fn edit_image(
        &self,
        prompt: &str,
        source: Vec<u8>,
    ) -> Result<EditedImage, ImageEditApiError> {
        let image_part = reqwest::multipart::Part::bytes(source)
            .file_name("source")
            .mime_str("application/octet-stream")?;
        let form = reqwest::multipart::Form::new()
            .part("image", image_part)
            .text("prompt", prompt.to_string());

        let response = self
            .client
            .post(format!("{}/v1/edits", self.api_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ImageEditApiError::EmptyOutput);
        }

        tracing::debug!(len = bytes.len(), %content_type, "Received edited image");
        Ok(EditedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or an [`ImageEditApiError::Api`] containing
    /// the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ImageEditApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageEditApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

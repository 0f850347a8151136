// ABOUTME: HTTP transport seam shared by all provider clients
// ABOUTME: Pooled reqwest client with fixed-backoff retry on transient transport failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::errors::ProviderError;
use crate::constants::limits::RETRY_BACKOFF_MS;
use crate::errors::AppError;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Transport abstraction behind the provider clients. Production code
/// uses [`HttpClient`]; tests substitute recording stubs.
#[async_trait::async_trait]
pub trait HttpFetch: Send + Sync {
    /// GET a URL with query parameters and extra headers, parsing the
    /// body as JSON
    async fn get_json(
        &self,
        url: &str,
        query: &[(String, String)],
        headers: &[(String, String)],
    ) -> Result<Value, ProviderError>;

    /// POST a form body, parsing the response as JSON
    async fn post_form_json(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<Value, ProviderError>;
}

/// Retrying HTTP transport over a pooled `reqwest::Client`.
///
/// Retries only transient transport failures (timeouts and connection
/// errors) with a short fixed backoff. HTTP 429 is classified as
/// [`ProviderError::RateLimited`] and never retried.
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Build a transport with a per-request timeout and retry budget
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be constructed.
    pub fn new(timeout: Duration, max_retries: u32) -> Result<Self, AppError> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("peak-planner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_retries,
        })
    }

    fn is_transient(error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect()
    }

    async fn decode(response: reqwest::Response) -> Result<Value, ProviderError> {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited(
                "upstream temporarily rate-limited the request, retry shortly".into(),
            ));
        }
        if !status.is_success() {
            return Err(ProviderError::RequestFailed(format!(
                "upstream returned HTTP {status}"
            )));
        }
        response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("invalid JSON body: {e}")))
    }

    /// Run a request-producing closure with the retry policy applied
    async fn send_with_retry<F>(&self, build: F) -> Result<Value, ProviderError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut attempt: u32 = 0;
        loop {
            match build().send().await {
                Ok(response) => return Self::decode(response).await,
                Err(error) if Self::is_transient(&error) && attempt < self.max_retries => {
                    attempt += 1;
                    debug!(attempt, error = %error, "transient transport failure, retrying");
                    tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS * u64::from(attempt)))
                        .await;
                }
                Err(error) => {
                    warn!(error = %error, "provider request failed");
                    return Err(ProviderError::RequestFailed(format!(
                        "request failed: {error}"
                    )));
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl HttpFetch for HttpClient {
    async fn get_json(
        &self,
        url: &str,
        query: &[(String, String)],
        headers: &[(String, String)],
    ) -> Result<Value, ProviderError> {
        self.send_with_retry(|| {
            let mut request = self.client.get(url).query(query);
            for (name, value) in headers {
                request = request.header(name, value);
            }
            request
        })
        .await
    }

    async fn post_form_json(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<Value, ProviderError> {
        self.send_with_retry(|| self.client.post(url).form(form)).await
    }
}

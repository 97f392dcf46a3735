use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use medassist_types::api::ErrorBody;

use crate::error::ApiError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client bound to one API base URL (e.g. `http://localhost:8001/api`).
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Send and decode a JSON body, mapping non-2xx replies to
    /// [`ApiError::Status`].
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let response = self.dispatch(req).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send and discard whatever body comes back.
    pub(crate) async fn send_unit(&self, req: RequestBuilder) -> Result<(), ApiError> {
        self.dispatch(req).await?;
        Ok(())
    }

    async fn dispatch(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let response = req.send().await?;
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url().path());

        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are best effort; a proxy may answer with HTML.
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message());

        Err(ApiError::Status { status, detail })
    }
}

use axum::body::Bytes;
use reqwest::{header, Client, RequestBuilder, Response};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ServiceError;

/// Longest error body kept in an error message
const MAX_ERROR_BODY: usize = 256;

/// Thin wrapper around a shared `reqwest::Client` bound to one collaborator endpoint
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ServiceClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            api_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let request = self.client.post(self.url(path));
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// POST a raw body, with optional query parameters
    pub async fn post_bytes(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: Bytes,
        content_type: &str,
    ) -> Result<Response, ServiceError> {
        debug!("POST {} ({} bytes, {})", self.url(path), body.len(), content_type);
        let response = self
            .post(path)
            .query(query)
            .header(header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        check_status(response).await
    }

    /// POST a JSON body
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, ServiceError> {
        debug!("POST {} (json)", self.url(path));
        let response = self.post(path).json(body).send().await?;
        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut message = response.text().await.unwrap_or_default();
    if message.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        message.truncate(cut);
    }
    warn!("Service responded with {}: {}", status, message);
    Err(ServiceError::Status {
        status: status.as_u16(),
        message,
    })
}

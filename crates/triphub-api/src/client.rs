//! Bearer-authenticated REST client for the admin backend.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use triphub_core::config::api::ApiConfig;
use triphub_core::types::response::{ApiEnvelope, ApiErrorResponse};
use triphub_core::{AppError, AppResult, ErrorKind};

/// Shared HTTP client carrying the base URL and the admin's bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    /// Builds a client from configuration and the admin's token.
    pub fn new(config: &ApiConfig, token: impl Into<String>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build HTTP client",
                    e,
                )
            })?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// `GET {base_url}{path}`, decoding the standard envelope.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<ApiEnvelope<T>> {
        self.request(Method::GET, path).await
    }

    /// `PUT {base_url}{path}` with an empty body.
    pub async fn put<T: DeserializeOwned>(&self, path: &str) -> AppResult<ApiEnvelope<T>> {
        self.request(Method::PUT, path).await
    }

    /// `POST {base_url}{path}` with an empty body.
    pub async fn post<T: DeserializeOwned>(&self, path: &str) -> AppResult<ApiEnvelope<T>> {
        self.request(Method::POST, path).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> AppResult<ApiEnvelope<T>> {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "API request");

        let response = self
            .http
            .request(method, &url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Connection, "Request to backend failed", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status, &body));
        }

        let envelope: ApiEnvelope<T> = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                "Failed to decode backend response",
                e,
            )
        })?;
        if !envelope.is_success() {
            return Err(AppError::external_service(format!(
                "Backend reported status {:?}",
                envelope.status
            )));
        }
        Ok(envelope)
    }

    fn status_error(status: StatusCode, body: &str) -> AppError {
        let message = serde_json::from_str::<ApiErrorResponse>(body)
            .map(|e| e.message)
            .unwrap_or_else(|_| format!("Backend returned {status}"));
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AppError::authentication(message)
            }
            StatusCode::NOT_FOUND => AppError::not_found(message),
            StatusCode::CONFLICT => AppError::conflict(message),
            _ => AppError::external_service(message),
        }
    }
}

//! HTTP implementation of [`DrawingBackend`].

use std::time::Duration;

use async_trait::async_trait;
use chartkit_annotations::DrawingRecord;
use chartkit_core::SyncError;
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::backend::DrawingBackend;
use crate::wire::{PropertiesResponse, ShapeProperties, StatusResponse};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl HttpBackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: reqwest::Client,
}

fn http_error(err: reqwest::Error) -> SyncError {
    SyncError::Http {
        reason: err.to_string(),
    }
}

impl HttpBackend {
    pub fn new(config: HttpBackendConfig) -> Result<Self, SyncError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| SyncError::Http {
            reason: format!("invalid base url '{}': {}", config.base_url, e),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SyncError::Http {
                reason: format!("invalid base url '{}'", config.base_url),
            });
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("chartkit-sync/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(http_error)?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL plus percent-encoded path segments.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SyncError> {
        let response = request.send().await.map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status {
                code: status.as_u16(),
            });
        }
        response.json::<T>().await.map_err(|e| SyncError::Decode {
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl DrawingBackend for HttpBackend {
    async fn delete_drawing(&self, symbol: &str, id: &str) -> Result<(), SyncError> {
        let url = self.endpoint(&["delete_drawing", symbol, id]);
        tracing::debug!("DELETE {}", url);
        self.send::<StatusResponse>(self.http.delete(url))
            .await?
            .into_result(symbol, id)
    }

    async fn delete_all_drawings(&self, symbol: &str) -> Result<(), SyncError> {
        let url = self.endpoint(&["delete_all_drawings", symbol]);
        tracing::debug!("DELETE {}", url);
        self.send::<StatusResponse>(self.http.delete(url))
            .await?
            .into_result(symbol, "*")
    }

    async fn update_drawing(&self, symbol: &str, id: &str, record: &DrawingRecord) -> Result<(), SyncError> {
        let url = self.endpoint(&["update_drawing", symbol, id]);
        tracing::debug!("PUT {}", url);
        self.send::<StatusResponse>(self.http.put(url).json(record))
            .await?
            .into_result(symbol, id)
    }

    async fn save_shape_properties(
        &self,
        symbol: &str,
        id: &str,
        properties: &ShapeProperties,
    ) -> Result<(), SyncError> {
        let url = self.endpoint(&["save_shape_properties", symbol, id]);
        tracing::debug!("POST {}", url);
        self.send::<StatusResponse>(self.http.post(url).json(properties))
            .await?
            .into_result(symbol, id)
    }

    async fn get_shape_properties(&self, symbol: &str, id: &str) -> Result<ShapeProperties, SyncError> {
        let url = self.endpoint(&["get_shape_properties", symbol, id]);
        tracing::debug!("GET {}", url);
        self.send::<PropertiesResponse>(self.http.get(url))
            .await?
            .into_result(symbol, id)
    }
}

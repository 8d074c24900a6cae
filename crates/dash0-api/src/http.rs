//! HTTP implementation of the asset service
//!
//! One request per call, bearer-token auth, no retries.

use async_trait::async_trait;
use dash0_core::{Asset, AssetId, AssetKind};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::Connection;
use crate::error::{ApiError, Result};
use crate::service::AssetService;

/// Request timeout applied to every call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Collection path of a native kind
pub fn endpoint(kind: AssetKind) -> Result<&'static str> {
    match kind {
        AssetKind::Dashboard => Ok("/api/dashboards"),
        AssetKind::CheckRule => Ok("/api/alerting/check-rules"),
        AssetKind::View => Ok("/api/views"),
        AssetKind::SyntheticCheck => Ok("/api/synthetic-checks"),
        AssetKind::PrometheusRule => Err(ApiError::UnsupportedKind { kind }),
    }
}

/// Asset service backed by the Dash0 HTTP API
pub struct HttpAssetService {
    client: reqwest::Client,
    base_url: Url,
    auth_token: String,
}

impl HttpAssetService {
    pub fn new(api_url: &str, auth_token: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(api_url.trim_end_matches('/'))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidConfig {
                message: format!("API URL must use http or https: {}", api_url),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("dash0-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url,
            auth_token: auth_token.into(),
        })
    }

    /// Build from a resolved connection
    pub fn from_connection(connection: &Connection) -> Result<Self> {
        Self::new(&connection.api_url, connection.auth_token.clone())
    }

    fn url(&self, kind: AssetKind, id: Option<&AssetId>) -> Result<Url> {
        let mut url = self.base_url.clone();
        let base_path = url.path().trim_end_matches('/').to_string();
        let mut path = format!("{}{}", base_path, endpoint(kind)?);
        if let Some(id) = id {
            path.push('/');
            path.push_str(id.as_str());
        }
        url.set_path(&path);
        Ok(url)
    }

    fn request(
        &self,
        method: reqwest::Method,
        url: Url,
        dataset: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(&self.auth_token)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(dataset) = dataset {
            request = request.query(&[("dataset", dataset)]);
        }
        request
    }

    /// Send a request and turn non-success statuses into classified errors
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        kind: AssetKind,
        id: Option<&AssetId>,
    ) -> Result<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body);

        tracing::debug!(status = status.as_u16(), %kind, %message, "API request failed");

        Err(ApiError::from_status(
            status.as_u16(),
            kind,
            id.map(AssetId::as_str),
            message,
            retry_after,
        ))
    }
}

/// Pull a human-readable message out of an error response body
fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let candidate = json
            .pointer("/error/message")
            .or_else(|| json.get("message"))
            .or_else(|| json.get("error"))
            .and_then(Value::as_str);
        if let Some(message) = candidate {
            return message.to_string();
        }
    }
    body.trim().to_string()
}

fn decode_list(kind: AssetKind, body: Value) -> Result<Vec<Asset>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(_) => {
                return Err(ApiError::Serialization(
                    "list response 'items' is not an array".to_string(),
                ));
            }
        },
        Value::Null => Vec::new(),
        _ => {
            return Err(ApiError::Serialization(
                "unexpected list response shape".to_string(),
            ));
        }
    };

    items
        .into_iter()
        .map(|item| Asset::from_json(kind, item).map_err(ApiError::from))
        .collect()
}

#[async_trait]
impl AssetService for HttpAssetService {
    async fn get(&self, kind: AssetKind, id: &AssetId, dataset: Option<&str>) -> Result<Asset> {
        let url = self.url(kind, Some(id))?;
        tracing::debug!(%kind, %id, "GET {}", url);

        let request = self.request(reqwest::Method::GET, url, dataset);
        let response = self.send(request, kind, Some(id)).await?;
        let body: Value = response.json().await?;
        Ok(Asset::from_json(kind, body)?)
    }

    async fn upsert(&self, asset: &Asset, dataset: Option<&str>) -> Result<Asset> {
        let kind = asset.kind();
        let id = asset.asset_id();
        let url = self.url(kind, id.as_ref())?;
        let method = if id.is_some() {
            reqwest::Method::PUT
        } else {
            reqwest::Method::POST
        };
        tracing::debug!(%kind, name = asset.name(), "{} {}", method, url);

        let payload = asset.to_json()?;
        let request = self.request(method, url, dataset).json(&payload);
        let response = self.send(request, kind, id.as_ref()).await?;
        let body: Value = response.json().await?;
        Ok(Asset::from_json(kind, body)?)
    }

    async fn list(&self, kind: AssetKind, dataset: Option<&str>) -> Result<Vec<Asset>> {
        let url = self.url(kind, None)?;
        tracing::debug!(%kind, "GET {}", url);

        let request = self.request(reqwest::Method::GET, url, dataset);
        let response = self.send(request, kind, None).await?;
        let body: Value = response.json().await?;
        decode_list(kind, body)
    }

    async fn delete(&self, kind: AssetKind, id: &AssetId, dataset: Option<&str>) -> Result<()> {
        let url = self.url(kind, Some(id))?;
        tracing::debug!(%kind, %id, "DELETE {}", url);

        let request = self.request(reqwest::Method::DELETE, url, dataset);
        self.send(request, kind, Some(id)).await?;
        Ok(())
    }
}

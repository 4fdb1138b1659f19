// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Komerce RajaOngkir v1 API.
//!
//! Every endpoint answers with a `{ "meta": {...}, "data": ... }` envelope.
//! A response counts as successful only when the HTTP status is 2xx and
//! `meta.code` is 200. Calls are never retried.

use std::time::Duration;

use async_trait::async_trait;
use kedai_config::model::ShippingConfig;
use kedai_core::{
    AdapterType, CostRequest, HealthStatus, KedaiError, PluginAdapter, RateOption, Region,
    ShippingAdapter,
};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Response envelope shared by all endpoints.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    meta: Meta,
    #[serde(default = "Option::default")]
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    code: u16,
    #[serde(default)]
    message: String,
}

/// A region row. Ids arrive as numbers, occasionally as numeric strings.
#[derive(Debug, Deserialize)]
struct RegionRow {
    #[serde(deserialize_with = "lenient_id")]
    id: i64,
    name: String,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(i64),
        Text(String),
    }

    match Id::deserialize(deserializer)? {
        Id::Number(n) => Ok(n),
        Id::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Client for province / city / district listings and domestic cost.
#[derive(Debug, Clone)]
pub struct RajaOngkirClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl RajaOngkirClient {
    /// Build a client from the `[shipping]` config section.
    pub fn new(config: &ShippingConfig) -> Result<Self, KedaiError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| KedaiError::Config("shipping.api_key is not set".into()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "key",
            HeaderValue::from_str(api_key)
                .map_err(|e| KedaiError::Config(format!("invalid shipping API key header value: {e}")))?,
        );

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| KedaiError::Shipping {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    async fn get_regions(&self, path: &str) -> Result<Vec<Region>, KedaiError> {
        let url = format!("{}/{path}", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| self.transport(e))?;
        let rows: Vec<RegionRow> = self.read_envelope(path, response).await?.unwrap_or_default();
        debug!(path, count = rows.len(), "region list received");
        Ok(rows
            .into_iter()
            .map(|r| Region { id: r.id, name: r.name })
            .collect())
    }

    async fn read_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<Option<T>, KedaiError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport(e))?;

        if !status.is_success() {
            warn!(path, status = %status, "shipping provider returned error status");
            return Err(KedaiError::Shipping {
                message: format!("{path} returned {status}: {}", truncate(&body)),
                source: None,
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| KedaiError::Shipping {
            message: format!("failed to parse {path} response: {e}"),
            source: Some(Box::new(e)),
        })?;

        if envelope.meta.code != 200 {
            warn!(path, code = envelope.meta.code, message = %envelope.meta.message, "shipping provider rejected request");
            return Err(KedaiError::Shipping {
                message: format!(
                    "{path} meta.code {}: {}",
                    envelope.meta.code, envelope.meta.message
                ),
                source: None,
            });
        }

        Ok(envelope.data)
    }

    fn transport(&self, e: reqwest::Error) -> KedaiError {
        if e.is_timeout() {
            KedaiError::Timeout {
                duration: self.timeout,
            }
        } else {
            KedaiError::Shipping {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }

    /// Overrides the base URL (for testing with wiremock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[async_trait]
impl PluginAdapter for RajaOngkirClient {
    fn name(&self) -> &str {
        "rajaongkir"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Shipping
    }

    async fn health_check(&self) -> Result<HealthStatus, KedaiError> {
        match self.list_provinces().await {
            Ok(list) if !list.is_empty() => Ok(HealthStatus::Healthy),
            Ok(_) => Ok(HealthStatus::Degraded("province list is empty".into())),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), KedaiError> {
        Ok(())
    }
}

#[async_trait]
impl ShippingAdapter for RajaOngkirClient {
    async fn list_provinces(&self) -> Result<Vec<Region>, KedaiError> {
        self.get_regions("destination/province").await
    }

    async fn list_cities(&self, province_id: i64) -> Result<Vec<Region>, KedaiError> {
        self.get_regions(&format!("destination/city/{province_id}")).await
    }

    async fn list_districts(&self, city_id: i64) -> Result<Vec<Region>, KedaiError> {
        self.get_regions(&format!("destination/district/{city_id}")).await
    }

    async fn calculate_cost(&self, request: CostRequest) -> Result<Vec<RateOption>, KedaiError> {
        let path = "calculate/district/domestic-cost";
        let url = format!("{}/{path}", self.base_url);
        let form = [
            ("origin", request.origin.to_string()),
            ("destination", request.destination.to_string()),
            ("weight", request.weight.grams().to_string()),
            ("courier", request.couriers.clone()),
        ];
        debug!(
            origin = request.origin,
            destination = request.destination,
            grams = request.weight.grams(),
            couriers = %request.couriers,
            "requesting domestic cost"
        );

        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| self.transport(e))?;
        let rates: Vec<RateOption> = self.read_envelope(path, response).await?.unwrap_or_default();
        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kedai_core::ParcelWeight;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> ShippingConfig {
        ShippingConfig {
            api_key: Some("test-key".into()),
            ..ShippingConfig::default()
        }
    }

    async fn client(server: &MockServer) -> RajaOngkirClient {
        RajaOngkirClient::new(&config()).unwrap().with_base_url(server.uri())
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let err = RajaOngkirClient::new(&ShippingConfig::default()).unwrap_err();
        assert!(matches!(err, KedaiError::Config(_)));
    }

    #[tokio::test]
    async fn lists_provinces_with_key_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/destination/province"))
            .and(header("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "meta": {"message": "Success Get Province", "code": 200, "status": "success"},
                "data": [{"id": 1, "name": "BANTEN"}, {"id": "2", "name": "JAWA BARAT"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provinces = client(&server).await.list_provinces().await.unwrap();
        assert_eq!(
            provinces,
            vec![
                Region { id: 1, name: "BANTEN".into() },
                Region { id: 2, name: "JAWA BARAT".into() },
            ]
        );
    }

    #[tokio::test]
    async fn non_200_meta_code_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/destination/city/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "meta": {"message": "Invalid Api key", "code": 401, "status": "error"},
                "data": null
            })))
            .mount(&server)
            .await;

        let err = client(&server).await.list_cities(9).await.unwrap_err();
        assert!(matches!(err, KedaiError::Shipping { ref message, .. } if message.contains("401")));
    }

    #[tokio::test]
    async fn http_error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/destination/district/5"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client(&server).await.list_districts(5).await.unwrap_err();
        assert!(matches!(err, KedaiError::Shipping { .. }));
    }

    #[tokio::test]
    async fn calculate_cost_posts_form_in_grams() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calculate/district/domestic-cost"))
            .and(body_string_contains("origin=1477"))
            .and(body_string_contains("destination=6120"))
            .and(body_string_contains("weight=450"))
            .and(body_string_contains("courier=jne%3Ajnt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "meta": {"message": "Success Calculate", "code": 200, "status": "success"},
                "data": [{
                    "name": "Jalur Nugraha Ekakurir (JNE)",
                    "code": "jne",
                    "service": "REG",
                    "description": "Layanan Reguler",
                    "cost": 11000,
                    "etd": "1-2 day"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let rates = client(&server)
            .await
            .calculate_cost(CostRequest {
                origin: 1477,
                destination: 6120,
                weight: ParcelWeight::for_items(3, 150),
                couriers: "jne:jnt".into(),
            })
            .await
            .unwrap();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].service, "REG");
        assert_eq!(rates[0].cost, 11000);
    }
}

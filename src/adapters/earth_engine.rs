use crate::config::earth_engine::EarthEngineConfig;
use crate::core::expression::Expression;
use crate::core::query::{QueryBuilder, VisualizationOptions, NDVI_BAND};
use crate::core::{CompositeQuery, ConfigProvider, Coordinate, ImageryService};
use crate::utils::error::{NdviError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct ComputeValueRequest<'a> {
    expression: &'a Expression,
}

#[derive(Deserialize)]
struct ComputeValueResponse {
    #[serde(default)]
    result: serde_json::Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateMapRequest<'a> {
    expression: &'a Expression,
    file_format: &'static str,
    visualization_options: VisualizationOptions,
}

#[derive(Deserialize)]
struct MapResponse {
    name: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Earth Engine REST API (v1) 用戶端
pub struct EarthEngineClient {
    client: Client,
    config: EarthEngineConfig,
    project: String,
    access_token: String,
}

impl EarthEngineClient {
    pub fn new(config: EarthEngineConfig) -> Result<Self> {
        let (project, access_token) = config.credentials()?;
        let (project, access_token) = (project.to_string(), access_token.to_string());
        Ok(Self {
            client: Client::new(),
            config,
            project,
            access_token,
        })
    }

    /// 建立用戶端並確認服務可用；只在啟動時呼叫一次
    pub async fn initialize(config: EarthEngineConfig) -> Result<Self> {
        let client = Self::new(config)?;
        client.probe().await?;
        Ok(client)
    }

    fn project_url(&self, method: &str) -> String {
        format!("{}/v1/projects/{}/{}", self.config.endpoint(), self.project, method)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let mut request = request.bearer_auth(&self.access_token);

        // 設定超時
        if let Some(timeout) = self.config.timeout_seconds() {
            request = request.timeout(std::time::Duration::from_secs(timeout));
        }
        request
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("unknown error").to_string()
                } else {
                    body
                }
            });

        tracing::warn!("🌍 Earth Engine request failed with status {}: {}", status, message);
        Err(NdviError::ServiceError {
            status: status.as_u16(),
            message,
        })
    }

    async fn probe(&self) -> Result<()> {
        let url = self.project_url("algorithms");
        tracing::debug!("🌍 Probing Earth Engine at: {}", url);
        let response = self.authorized(self.client.get(&url)).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn compute(&self, expression: &Expression) -> Result<serde_json::Value> {
        let url = self.project_url("value:compute");
        tracing::debug!("🌍 value:compute ({} nodes)", expression.values.len());

        let response = self
            .authorized(self.client.post(&url))
            .json(&ComputeValueRequest { expression })
            .send()
            .await?;
        let body: ComputeValueResponse = Self::check(response).await?.json().await?;
        Ok(body.result)
    }

    async fn create_map(&self, expression: &Expression) -> Result<String> {
        let url = self.project_url("maps");
        let request = CreateMapRequest {
            expression,
            file_format: "AUTO",
            visualization_options: VisualizationOptions::ndvi(),
        };

        let response = self
            .authorized(self.client.post(&url))
            .json(&request)
            .send()
            .await?;
        let map: MapResponse = Self::check(response).await?.json().await?;
        tracing::debug!("🗺️ Created map {}", map.name);

        Ok(format!("{}/v1/{}/tiles/{{z}}/{{x}}/{{y}}", self.config.endpoint(), map.name))
    }
}

#[async_trait]
impl ImageryService for EarthEngineClient {
    async fn composite_tile_url(&self, query: &CompositeQuery) -> Result<String> {
        let expression = QueryBuilder::new(self.config.collection(), query).composite_expression();
        self.create_map(&expression).await
    }

    async fn sample_at(&self, query: &CompositeQuery, point: Coordinate) -> Result<Option<f64>> {
        let expression = QueryBuilder::new(self.config.collection(), query)
            .sample_expression(point, self.config.sample_scale());
        let result = self.compute(&expression).await?;
        Ok(result.get(NDVI_BAND).and_then(serde_json::Value::as_f64))
    }

    async fn collection_size(&self, query: &CompositeQuery) -> Result<u64> {
        let expression = QueryBuilder::new(self.config.collection(), query).size_expression();
        let result = self.compute(&expression).await?;
        result.as_u64().ok_or_else(|| NdviError::ProcessingError {
            message: format!("Unexpected collection size: {}", result),
        })
    }
}

#![allow(dead_code)]

use amazon_ndvi::core::{CompositeQuery, Coordinate, ImageryService};
use amazon_ndvi::{AppState, EarthEngineConfig, NdviError};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month_of(query: &CompositeQuery) -> String {
    query.date_range.start.format("%Y-%m").to_string()
}

/// In-memory imagery service that records every query it receives.
#[derive(Default)]
pub struct MockImagery {
    pub tile_url: String,
    pub sample: Option<f64>,
    pub monthly_samples: HashMap<String, Option<f64>>,
    pub empty_months: HashSet<String>,
    pub fail_with: Option<String>,
    pub queries: Mutex<Vec<CompositeQuery>>,
    pub sampled_points: Mutex<Vec<Coordinate>>,
}

impl MockImagery {
    pub fn new() -> Self {
        Self {
            tile_url: "https://tiles.example.com/v1/maps/abc/tiles/{z}/{x}/{y}".to_string(),
            sample: Some(0.5),
            ..Self::default()
        }
    }

    pub fn with_sample(mut self, sample: Option<f64>) -> Self {
        self.sample = sample;
        self
    }

    pub fn with_monthly_sample(mut self, month: &str, sample: Option<f64>) -> Self {
        self.monthly_samples.insert(month.to_string(), sample);
        self
    }

    pub fn with_empty_month(mut self, month: &str) -> Self {
        self.empty_months.insert(month.to_string());
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }

    fn check_failure(&self) -> Result<(), NdviError> {
        match &self.fail_with {
            Some(message) => Err(NdviError::ServiceError {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    pub async fn recorded_queries(&self) -> Vec<CompositeQuery> {
        self.queries.lock().await.clone()
    }
}

#[async_trait]
impl ImageryService for MockImagery {
    async fn composite_tile_url(&self, query: &CompositeQuery) -> Result<String, NdviError> {
        self.queries.lock().await.push(*query);
        self.check_failure()?;
        Ok(self.tile_url.clone())
    }

    async fn sample_at(
        &self,
        query: &CompositeQuery,
        point: Coordinate,
    ) -> Result<Option<f64>, NdviError> {
        self.queries.lock().await.push(*query);
        self.sampled_points.lock().await.push(point);
        self.check_failure()?;
        Ok(self
            .monthly_samples
            .get(&month_of(query))
            .copied()
            .unwrap_or(self.sample))
    }

    async fn collection_size(&self, query: &CompositeQuery) -> Result<u64, NdviError> {
        self.check_failure()?;
        if self.empty_months.contains(&month_of(query)) {
            Ok(0)
        } else {
            Ok(7)
        }
    }
}

pub fn ready_state(mock: Arc<MockImagery>, today: NaiveDate) -> AppState {
    let imagery: Arc<dyn ImageryService> = mock;
    AppState::new(Some(imagery), &EarthEngineConfig::default()).with_clock(move || today)
}

pub fn demo_state(today: NaiveDate) -> AppState {
    AppState::new(None, &EarthEngineConfig::default()).with_clock(move || today)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_raw(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

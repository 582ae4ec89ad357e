use crate::app::state::AppState;
use crate::core::classify::{classify_region, interpret_ndvi};
use crate::core::demo::demo_ndvi;
use crate::core::query::NDVI_BAND;
use crate::core::statistics::{calculate_statistics, round3};
use crate::core::time_series::TimeSeriesAssembler;
use crate::domain::model::{
    AmazonRegion, CompositeQuery, CompositeResult, Coordinate, DataInfo, DateRange, Footprint,
    Interpretation, NdviStatistics, TimeSeriesEntry, AMAZON_BOUNDS, AMAZON_REGION_LABEL,
};
use crate::utils::error::{NdviError, Result};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const ENDPOINTS: [&str; 3] = [
    "GET /api/ndvi - Get NDVI tile data",
    "POST /api/pixel-value - Get pixel NDVI value",
    "POST /api/time-series - Get time series data",
];

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub earth_engine: bool,
    pub endpoints: Vec<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NdviParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProcessingInfo {
    pub start_date: String,
    pub end_date: String,
    pub processing_time: String,
}

#[derive(Debug, Serialize)]
pub struct NdviResponse {
    pub success: bool,
    pub data: CompositeResult,
    pub processing_info: ProcessingInfo,
}

#[derive(Debug, Default, Deserialize)]
pub struct PixelValueRequest {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PixelValueResponse {
    pub success: bool,
    pub ndvi: Option<f64>,
    pub coordinates: Coordinate,
    pub date_range: DateRange,
    pub interpretation: Interpretation,
    pub location_info: AmazonRegion,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub demo_mode: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimeSeriesRequest {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// 沒有資料時序列化為 `{}`
#[derive(Debug, Serialize)]
pub struct StatisticsView {
    #[serde(flatten)]
    pub summary: Option<NdviStatistics>,
}

#[derive(Debug, Serialize)]
pub struct TimeSeriesResponse {
    pub success: bool,
    pub coordinates: Coordinate,
    pub time_series: Vec<TimeSeriesEntry>,
    pub statistics: StatisticsView,
}

fn error_response(status: StatusCode, body: serde_json::Value) -> Response {
    (status, Json(body)).into_response()
}

fn client_error(err: &NdviError) -> Response {
    tracing::debug!("⚠️ Rejected request: {}", err);
    error_response(err.status_code(), json!({ "error": err.to_string() }))
}

fn body_error(rejection: JsonRejection) -> Response {
    tracing::debug!("⚠️ Rejected request body: {}", rejection);
    error_response(StatusCode::BAD_REQUEST, json!({ "error": rejection.body_text() }))
}

fn require_coordinates(lat: Option<f64>, lng: Option<f64>) -> Result<Coordinate> {
    match (lat, lng) {
        (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
            Ok(Coordinate::new(lat, lng))
        }
        _ => Err(NdviError::MissingParameter {
            field: "coordinates".to_string(),
        }),
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "Amazon NDVI Dashboard API",
        earth_engine: state.is_ready(),
        endpoints: ENDPOINTS.to_vec(),
    })
}

pub async fn ndvi_tiles(
    State(state): State<AppState>,
    Query(params): Query<NdviParams>,
) -> Response {
    let range = match DateRange::from_request(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        state.today(),
    ) {
        Ok(range) => range,
        Err(e) => return client_error(&e),
    };

    let Some(imagery) = state.imagery() else {
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "error": "Google Earth Engine not initialized",
                "demo_mode": true,
                "message": "Using fallback demo data",
            }),
        );
    };

    tracing::info!("🗺️ NDVI composite requested for {}", range.label());
    let query = CompositeQuery::new(
        range,
        Footprint::Region(AMAZON_BOUNDS),
        state.cloud_threshold(),
    );

    match imagery.composite_tile_url(&query).await {
        Ok(tile_url) => {
            let data = CompositeResult {
                tile_url,
                bounds: AMAZON_BOUNDS.to_geometry(),
                data_info: DataInfo {
                    dataset: state.dataset().to_string(),
                    parameter: NDVI_BAND.to_string(),
                    date_range: range.label(),
                    region: AMAZON_REGION_LABEL.to_string(),
                    cloud_threshold: format!("{}%", state.cloud_threshold()),
                },
            };
            Json(NdviResponse {
                success: true,
                data,
                processing_info: ProcessingInfo {
                    start_date: range.start_str(),
                    end_date: range.end_str(),
                    processing_time: chrono::Local::now().to_rfc3339(),
                },
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!("❌ NDVI composite failed: {}", e);
            let error = match &e {
                NdviError::ProcessingError { .. } => e.to_string(),
                _ => format!("Error processing NDVI data: {}", e),
            };
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": error,
                    "demo_mode": true,
                    "fallback_data": {
                        "message": "Using simulated Amazon NDVI data",
                        "region": "Amazon Rainforest (-74°W to -50°W, -10°S to 5°N)",
                    },
                }),
            )
        }
    }
}

pub async fn pixel_value(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PixelValueRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return body_error(rejection),
    };

    let point = match require_coordinates(request.lat, request.lng) {
        Ok(point) => point,
        Err(e) => return client_error(&e),
    };
    let range = match DateRange::from_request(
        request.start_date.as_deref(),
        request.end_date.as_deref(),
        state.today(),
    ) {
        Ok(range) => range,
        Err(e) => return client_error(&e),
    };

    let (ndvi, demo_mode) = match state.imagery() {
        Some(imagery) => {
            let query =
                CompositeQuery::new(range, Footprint::Point(point), state.cloud_threshold());
            match imagery.sample_at(&query, point).await {
                Ok(value) => (value.map(round3), false),
                Err(e) => {
                    tracing::error!(
                        "❌ Pixel sample at ({}, {}) failed: {}",
                        point.lat,
                        point.lng,
                        e
                    );
                    return error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({ "error": e.to_string() }),
                    );
                }
            }
        }
        None => (Some(demo_ndvi(point)), true),
    };

    tracing::info!(
        "📍 NDVI at ({}, {}) = {:?}{}",
        point.lat,
        point.lng,
        ndvi,
        if demo_mode { " (demo)" } else { "" }
    );

    Json(PixelValueResponse {
        success: true,
        ndvi,
        coordinates: point,
        date_range: range,
        interpretation: interpret_ndvi(ndvi),
        location_info: classify_region(point),
        demo_mode,
    })
    .into_response()
}

pub async fn time_series(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TimeSeriesRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return body_error(rejection),
    };

    let point = match require_coordinates(request.lat, request.lng) {
        Ok(point) => point,
        Err(e) => return client_error(&e),
    };

    let Some(imagery) = state.imagery() else {
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "Google Earth Engine not available" }),
        );
    };

    let assembler = TimeSeriesAssembler::new(imagery, state.cloud_threshold());
    match assembler.assemble(point, state.today()).await {
        Ok(series) => {
            tracing::info!(
                "📈 Time series at ({}, {}): {} months",
                point.lat,
                point.lng,
                series.len()
            );
            let statistics = StatisticsView {
                summary: calculate_statistics(&series),
            };
            Json(TimeSeriesResponse {
                success: true,
                coordinates: point,
                time_series: series,
                statistics,
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!("❌ Time series at ({}, {}) failed: {}", point.lat, point.lng, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": e.to_string() }),
            )
        }
    }
}

use crate::utils::error::{NdviError, Result};
use crate::utils::validation::{parse_request_date, DATE_FORMAT};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// 日期區間，兩端皆包含
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(NdviError::ValidationError {
                message: format!("start_date {} is after end_date {}", start, end),
            });
        }
        // 遠端服務需要 end 的下一天作為上界
        if end.succ_opt().is_none() {
            return Err(NdviError::ValidationError {
                message: format!("end_date {} is out of range", end),
            });
        }
        Ok(Self { start, end })
    }

    /// 以 `end` 為終點往回 `days` 天
    pub fn trailing_days(end: NaiveDate, days: i64) -> Self {
        Self {
            start: end - Duration::days(days),
            end,
        }
    }

    /// 從請求參數建立區間，缺少的一端使用預設值 (今天 / 今天 - 30 天)
    pub fn from_request(
        start_date: Option<&str>,
        end_date: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self> {
        let defaults = Self::trailing_days(today, 30);
        let start = match start_date {
            Some(value) => parse_request_date("start_date", value)?,
            None => defaults.start,
        };
        let end = match end_date {
            Some(value) => parse_request_date("end_date", value)?,
            None => defaults.end,
        };
        Self::new(start, end)
    }

    /// 遠端服務的日期過濾上界不包含當天，因此多加一天
    pub fn exclusive_end(&self) -> NaiveDate {
        self.end.succ_opt().unwrap_or(self.end)
    }

    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }

    pub fn label(&self) -> String {
        format!("{} to {}", self.start_str(), self.end_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.south..=self.north).contains(&point.lat)
            && (self.west..=self.east).contains(&point.lng)
    }

    /// `[west, south, east, north]`
    pub fn corners(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }

    pub fn to_geometry(&self) -> geojson::Geometry {
        let ring = vec![
            vec![self.west, self.south],
            vec![self.east, self.south],
            vec![self.east, self.north],
            vec![self.west, self.north],
            vec![self.west, self.south],
        ];
        geojson::Geometry::new(geojson::Value::Polygon(vec![ring]))
    }
}

pub const AMAZON_BOUNDS: BoundingBox = BoundingBox {
    west: -74.0,
    south: -10.0,
    east: -50.0,
    north: 5.0,
};

pub const AMAZON_REGION_LABEL: &str = "Amazon Rainforest";

/// 影像查詢的空間範圍
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Footprint {
    Region(BoundingBox),
    Point(Coordinate),
}

/// 一次合成影像查詢所需的參數
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeQuery {
    pub date_range: DateRange,
    pub footprint: Footprint,
    pub cloud_threshold: f64,
}

impl CompositeQuery {
    pub fn new(date_range: DateRange, footprint: Footprint, cloud_threshold: f64) -> Self {
        Self {
            date_range,
            footprint,
            cloud_threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesEntry {
    pub date: String,
    pub ndvi: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NdviStatistics {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataInfo {
    pub dataset: String,
    pub parameter: String,
    pub date_range: String,
    pub region: String,
    pub cloud_threshold: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompositeResult {
    pub tile_url: String,
    pub bounds: geojson::Geometry,
    pub data_info: DataInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Interpretation {
    #[serde(rename = "No data")]
    NoData,
    #[serde(rename = "Water or snow")]
    WaterOrSnow,
    #[serde(rename = "Bare soil or built areas")]
    BareSoil,
    #[serde(rename = "Sparse vegetation")]
    SparseVegetation,
    #[serde(rename = "Moderate vegetation")]
    ModerateVegetation,
    #[serde(rename = "Dense vegetation")]
    DenseVegetation,
}

impl Interpretation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interpretation::NoData => "No data",
            Interpretation::WaterOrSnow => "Water or snow",
            Interpretation::BareSoil => "Bare soil or built areas",
            Interpretation::SparseVegetation => "Sparse vegetation",
            Interpretation::ModerateVegetation => "Moderate vegetation",
            Interpretation::DenseVegetation => "Dense vegetation",
        }
    }
}

impl std::fmt::Display for Interpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AmazonRegion {
    #[serde(rename = "Northern Amazon Basin")]
    Northern,
    #[serde(rename = "Central Amazon Basin")]
    Central,
    #[serde(rename = "Southern Amazon Basin")]
    Southern,
    #[serde(rename = "Outside Amazon region")]
    Outside,
}

impl AmazonRegion {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmazonRegion::Northern => "Northern Amazon Basin",
            AmazonRegion::Central => "Central Amazon Basin",
            AmazonRegion::Southern => "Southern Amazon Basin",
            AmazonRegion::Outside => "Outside Amazon region",
        }
    }
}

impl std::fmt::Display for AmazonRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

use crate::core::statistics::round3;
use crate::domain::model::Coordinate;
use std::hash::{DefaultHasher, Hash, Hasher};

/// 服務不可用時的示範 NDVI，範圍 [0.1, 0.89]，同一座標永遠得到同一值
pub fn demo_ndvi(point: Coordinate) -> f64 {
    let mut hasher = DefaultHasher::new();
    format!("{}{}", point.lat, point.lng).hash(&mut hasher);
    let bucket = hasher.finish() % 80;
    round3(0.1 + bucket as f64 / 100.0)
}

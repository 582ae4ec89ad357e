use crate::domain::model::{AmazonRegion, Coordinate, Interpretation, AMAZON_BOUNDS};

/// 依 NDVI 門檻 (0, 0.2, 0.4, 0.6) 判讀地表類型
pub fn interpret_ndvi(ndvi: Option<f64>) -> Interpretation {
    match ndvi {
        None => Interpretation::NoData,
        Some(v) if v.is_nan() => Interpretation::NoData,
        Some(v) if v < 0.0 => Interpretation::WaterOrSnow,
        Some(v) if v < 0.2 => Interpretation::BareSoil,
        Some(v) if v < 0.4 => Interpretation::SparseVegetation,
        Some(v) if v < 0.6 => Interpretation::ModerateVegetation,
        Some(_) => Interpretation::DenseVegetation,
    }
}

pub fn classify_region(point: Coordinate) -> AmazonRegion {
    if !AMAZON_BOUNDS.contains(point) {
        return AmazonRegion::Outside;
    }

    if point.lat > 0.0 {
        AmazonRegion::Northern
    } else if point.lat > -5.0 {
        AmazonRegion::Central
    } else {
        AmazonRegion::Southern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpretation_thresholds_are_exact() {
        assert_eq!(interpret_ndvi(Some(-0.3)), Interpretation::WaterOrSnow);
        assert_eq!(interpret_ndvi(Some(0.0)), Interpretation::BareSoil);
        assert_eq!(interpret_ndvi(Some(0.19)), Interpretation::BareSoil);
        assert_eq!(interpret_ndvi(Some(0.2)), Interpretation::SparseVegetation);
        assert_eq!(interpret_ndvi(Some(0.4)), Interpretation::ModerateVegetation);
        assert_eq!(interpret_ndvi(Some(0.6)), Interpretation::DenseVegetation);
        assert_eq!(interpret_ndvi(Some(0.95)), Interpretation::DenseVegetation);
    }

    #[test]
    fn test_absent_value_is_no_data() {
        assert_eq!(interpret_ndvi(None), Interpretation::NoData);
        assert_eq!(interpret_ndvi(Some(f64::NAN)), Interpretation::NoData);
        assert_eq!(interpret_ndvi(None).to_string(), "No data");
    }

    #[test]
    fn test_region_bands() {
        assert_eq!(classify_region(Coordinate::new(3.0, -60.0)), AmazonRegion::Northern);
        assert_eq!(classify_region(Coordinate::new(-3.0, -60.0)), AmazonRegion::Central);
        assert_eq!(classify_region(Coordinate::new(-8.0, -60.0)), AmazonRegion::Southern);
        assert_eq!(classify_region(Coordinate::new(10.0, -60.0)), AmazonRegion::Outside);
        assert_eq!(classify_region(Coordinate::new(-3.0, -80.0)), AmazonRegion::Outside);
    }

    #[test]
    fn test_region_edges_are_inclusive() {
        assert_eq!(classify_region(Coordinate::new(5.0, -74.0)), AmazonRegion::Northern);
        assert_eq!(classify_region(Coordinate::new(0.0, -50.0)), AmazonRegion::Central);
        assert_eq!(classify_region(Coordinate::new(-5.0, -60.0)), AmazonRegion::Southern);
        assert_eq!(classify_region(Coordinate::new(-10.0, -60.0)), AmazonRegion::Southern);
    }
}

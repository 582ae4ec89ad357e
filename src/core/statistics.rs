use crate::domain::model::{NdviStatistics, TimeSeriesEntry};

/// 四捨五入到小數點後三位
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// 計算時間序列中有值項目的統計，沒有任何值時回傳 `None`
pub fn calculate_statistics(series: &[TimeSeriesEntry]) -> Option<NdviStatistics> {
    let values: Vec<f64> = series
        .iter()
        .filter_map(|entry| entry.ndvi)
        .filter(|v| v.is_finite())
        .collect();

    if values.is_empty() {
        return None;
    }

    let sum: f64 = values.iter().sum();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(NdviStatistics {
        mean: round3(sum / values.len() as f64),
        min: round3(min),
        max: round3(max),
        count: values.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, ndvi: Option<f64>) -> TimeSeriesEntry {
        TimeSeriesEntry {
            date: date.to_string(),
            ndvi,
        }
    }

    #[test]
    fn test_empty_series_has_no_statistics() {
        assert_eq!(calculate_statistics(&[]), None);
    }

    #[test]
    fn test_basic_statistics() {
        let series = vec![
            entry("2024-01", Some(0.2)),
            entry("2024-02", Some(0.4)),
            entry("2024-03", Some(0.6)),
        ];

        let stats = calculate_statistics(&series).unwrap();
        assert_eq!(stats.mean, 0.4);
        assert_eq!(stats.min, 0.2);
        assert_eq!(stats.max, 0.6);
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn test_absent_samples_are_skipped_but_zero_counts() {
        let series = vec![
            entry("2024-01", None),
            entry("2024-02", Some(0.0)),
            entry("2024-03", Some(0.5)),
        ];

        let stats = calculate_statistics(&series).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.mean, 0.25);

        let only_missing = vec![entry("2024-01", None), entry("2024-02", None)];
        assert_eq!(calculate_statistics(&only_missing), None);
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.123456), 0.123);
        assert_eq!(round3(0.6789), 0.679);
        assert_eq!(round3(-0.0004), 0.0);
    }
}

use crate::core::statistics::round3;
use crate::domain::model::{CompositeQuery, Coordinate, DateRange, Footprint, TimeSeriesEntry};
use crate::domain::ports::ImageryService;
use crate::utils::error::{NdviError, Result};
use chrono::{Datelike, Duration, NaiveDate};

pub const SERIES_MONTHS: usize = 12;
const LOOKBACK_DAYS: i64 = 365;

/// 一個完整的日曆月
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
}

impl MonthWindow {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// 下個月第一天的前一天
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.next().first_day()?.pred_opt()
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn date_range(&self) -> Result<DateRange> {
        let (Some(first), Some(last)) = (self.first_day(), self.last_day()) else {
            return Err(NdviError::ProcessingError {
                message: format!("Invalid calendar month {}", self.label()),
            });
        };
        DateRange::new(first, last)
    }

    /// `YYYY-MM`
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// 從 `today - 365 天` 所在月份開始，往後連續 12 個月
pub fn trailing_months(today: NaiveDate) -> Vec<MonthWindow> {
    let mut window = MonthWindow::containing(today - Duration::days(LOOKBACK_DAYS));
    let mut months = Vec::with_capacity(SERIES_MONTHS);
    for _ in 0..SERIES_MONTHS {
        months.push(window);
        window = window.next();
    }
    months
}

pub struct TimeSeriesAssembler<'a> {
    service: &'a dyn ImageryService,
    cloud_threshold: f64,
}

impl<'a> TimeSeriesAssembler<'a> {
    pub fn new(service: &'a dyn ImageryService, cloud_threshold: f64) -> Self {
        Self {
            service,
            cloud_threshold,
        }
    }

    /// 逐月取樣；沒有任何影像的月份直接略過，取樣無值則記為 `None`
    pub async fn assemble(
        &self,
        point: Coordinate,
        today: NaiveDate,
    ) -> Result<Vec<TimeSeriesEntry>> {
        let mut series = Vec::with_capacity(SERIES_MONTHS);

        for window in trailing_months(today) {
            let query = CompositeQuery::new(
                window.date_range()?,
                Footprint::Point(point),
                self.cloud_threshold,
            );

            let images = self.service.collection_size(&query).await?;
            if images == 0 {
                tracing::debug!("⏭️ {}: no qualifying images, skipping", window.label());
                continue;
            }

            let ndvi = self.service.sample_at(&query, point).await?;
            tracing::debug!("📈 {}: {} images, ndvi={:?}", window.label(), images, ndvi);

            series.push(TimeSeriesEntry {
                date: window.label(),
                ndvi: ndvi.map(round3),
            });
        }

        Ok(series)
    }
}

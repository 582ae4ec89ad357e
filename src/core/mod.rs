pub mod classify;
pub mod demo;
pub mod expression;
pub mod query;
pub mod statistics;
pub mod time_series;

pub use crate::domain::model::{
    CompositeQuery, CompositeResult, Coordinate, DateRange, Footprint, NdviStatistics,
    TimeSeriesEntry,
};
pub use crate::domain::ports::{ConfigProvider, ImageryService};
pub use crate::utils::error::Result;

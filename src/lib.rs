pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::earth_engine::EarthEngineClient;
pub use app::{router::build_router, state::AppState};
pub use config::{earth_engine::EarthEngineConfig, ServerConfig};
pub use domain::ports::ImageryService;
pub use utils::error::{NdviError, Result};

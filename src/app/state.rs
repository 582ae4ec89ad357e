use crate::adapters::earth_engine::EarthEngineClient;
use crate::config::earth_engine::EarthEngineConfig;
use crate::core::{ConfigProvider, ImageryService};
use chrono::NaiveDate;
use std::sync::Arc;

pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// 請求之間共用的唯讀狀態；`imagery` 在啟動時決定，之後不再變動
#[derive(Clone)]
pub struct AppState {
    imagery: Option<Arc<dyn ImageryService>>,
    dataset: String,
    cloud_threshold: f64,
    clock: Clock,
}

impl AppState {
    pub fn new(imagery: Option<Arc<dyn ImageryService>>, config: &dyn ConfigProvider) -> Self {
        Self {
            imagery,
            dataset: config.collection().to_string(),
            cloud_threshold: config.cloud_threshold(),
            clock: Arc::new(|| chrono::Local::now().date_naive()),
        }
    }

    /// 連線 Earth Engine，失敗時以示範模式啟動
    pub async fn initialize(config: EarthEngineConfig) -> Self {
        let imagery: Option<Arc<dyn ImageryService>> =
            match EarthEngineClient::initialize(config.clone()).await {
                Ok(client) => {
                    tracing::info!("✅ Google Earth Engine initialized successfully!");
                    Some(Arc::new(client))
                }
                Err(e) => {
                    tracing::error!("❌ Earth Engine initialization failed: {}", e);
                    tracing::warn!(
                        "📝 Note: set EE_PROJECT and EE_ACCESS_TOKEN \
                         (or an [earth_engine] config table) for live data"
                    );
                    None
                }
            };
        Self::new(imagery, &config)
    }

    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn imagery(&self) -> Option<&dyn ImageryService> {
        self.imagery.as_deref()
    }

    pub fn is_ready(&self) -> bool {
        self.imagery.is_some()
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    pub fn cloud_threshold(&self) -> f64 {
        self.cloud_threshold
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }
}

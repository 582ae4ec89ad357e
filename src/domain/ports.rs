use crate::domain::model::{CompositeQuery, Coordinate};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 遠端影像分析服務 (Earth Engine) 的能力介面
#[async_trait]
pub trait ImageryService: Send + Sync {
    /// 產生中位數 NDVI 合成影像的地圖圖磚 URL 模板
    async fn composite_tile_url(&self, query: &CompositeQuery) -> Result<String>;

    /// 在指定座標取樣合成影像的 NDVI，無資料時回傳 `None`
    async fn sample_at(&self, query: &CompositeQuery, point: Coordinate) -> Result<Option<f64>>;

    /// 通過日期、空間與雲量過濾後的影像數量
    async fn collection_size(&self, query: &CompositeQuery) -> Result<u64>;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn collection(&self) -> &str;
    fn cloud_threshold(&self) -> f64;
    fn sample_scale(&self) -> u32;
    fn timeout_seconds(&self) -> Option<u64>;
}

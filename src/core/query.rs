use crate::core::expression::{Expression, ExpressionBuilder, ValueNode};
use crate::domain::model::{CompositeQuery, Coordinate, Footprint};
use crate::utils::validation::DATE_FORMAT;
use serde::Serialize;
use serde_json::json;

pub const SENTINEL2_SR: &str = "COPERNICUS/S2_SR";
pub const CLOUD_PROPERTY: &str = "CLOUDY_PIXEL_PERCENTAGE";
pub const QA_BAND: &str = "QA60";
pub const NIR_BAND: &str = "B8";
pub const RED_BAND: &str = "B4";
pub const NDVI_BAND: &str = "NDVI";

/// QA60 第 10 位元：雲
pub const CLOUD_BIT_MASK: i64 = 1 << 10;
/// QA60 第 11 位元：卷雲
pub const CIRRUS_BIT_MASK: i64 = 1 << 11;

pub const DEFAULT_CLOUD_THRESHOLD: f64 = 20.0;
pub const DEFAULT_SAMPLE_SCALE: u32 = 30;

/// 紅 (低植被) 到藍 (高植被) 的九階色帶
pub const NDVI_PALETTE: [&str; 9] = [
    "d73027", "f46d43", "fdae61", "fee08b", "e6f598", "abdda4", "66c2a5", "3288bd", "5e4fa2",
];
pub const NDVI_VIS_MIN: f64 = 0.0;
pub const NDVI_VIS_MAX: f64 = 1.0;

const MAPPING_VAR: &str = "_MAPPING_VAR_0_0";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationOptions {
    pub ranges: Vec<ValueRange>,
    pub palette_colors: Vec<String>,
}

impl VisualizationOptions {
    pub fn ndvi() -> Self {
        Self {
            ranges: vec![ValueRange {
                min: NDVI_VIS_MIN,
                max: NDVI_VIS_MAX,
            }],
            palette_colors: NDVI_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// 將 `CompositeQuery` 轉成 Earth Engine 運算式圖
pub struct QueryBuilder<'a> {
    collection_id: &'a str,
    query: &'a CompositeQuery,
    exprs: ExpressionBuilder,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(collection_id: &'a str, query: &'a CompositeQuery) -> Self {
        Self {
            collection_id,
            query,
            exprs: ExpressionBuilder::new(),
        }
    }

    /// 合成影像 (用於地圖圖磚)
    pub fn composite_expression(mut self) -> Expression {
        let composite = self.median_composite();
        self.exprs.build(composite)
    }

    /// 日期、空間、雲量過濾後的影像數量
    pub fn size_expression(mut self) -> Expression {
        let collection = self.filtered_collection();
        let size = self.exprs.invoke("Collection.size", [("collection", collection)]);
        self.exprs.build(size)
    }

    /// 在單點以 `scale` 公尺解析度取樣合成影像，結果為 `{"NDVI": value | null}`
    pub fn sample_expression(mut self, point: Coordinate, scale: u32) -> Expression {
        let composite = self.median_composite();
        let geometry = self.point_geometry(point);
        let reducer = self
            .exprs
            .invoke("Reducer.first", std::iter::empty::<(&str, ValueNode)>());
        let sample = self.exprs.invoke(
            "Image.reduceRegion",
            [
                ("image", composite),
                ("reducer", reducer),
                ("geometry", geometry),
                ("scale", ExpressionBuilder::constant(scale)),
            ],
        );
        self.exprs.build(sample)
    }

    fn point_geometry(&mut self, point: Coordinate) -> ValueNode {
        self.exprs.invoke(
            "GeometryConstructors.Point",
            [("coordinates", ExpressionBuilder::constant(json!([point.lng, point.lat])))],
        )
    }

    fn footprint_geometry(&mut self) -> ValueNode {
        match self.query.footprint {
            Footprint::Region(bounds) => self.exprs.invoke(
                "GeometryConstructors.Rectangle",
                [
                    ("coordinates", ExpressionBuilder::constant(json!(bounds.corners()))),
                    ("geodesic", ExpressionBuilder::constant(false)),
                ],
            ),
            Footprint::Point(point) => self.point_geometry(point),
        }
    }

    fn image_constant(&mut self, value: i64) -> ValueNode {
        self.exprs
            .invoke("Image.constant", [("value", ExpressionBuilder::constant(value))])
    }

    fn filter(&mut self, collection: ValueNode, filter: ValueNode) -> ValueNode {
        self.exprs.invoke(
            "Collection.filter",
            [("collection", collection), ("filter", filter)],
        )
    }

    fn map(&mut self, collection: ValueNode, function: ValueNode) -> ValueNode {
        self.exprs.invoke(
            "Collection.map",
            [("collection", collection), ("baseAlgorithm", function)],
        )
    }

    fn filtered_collection(&mut self) -> ValueNode {
        let range = self.query.date_range;

        let collection = self.exprs.invoke(
            "ImageCollection.load",
            [("id", ExpressionBuilder::constant(self.collection_id))],
        );

        let date_range = self.exprs.invoke(
            "DateRange",
            [
                ("start", ExpressionBuilder::constant(range.start_str())),
                (
                    "end",
                    ExpressionBuilder::constant(
                        range.exclusive_end().format(DATE_FORMAT).to_string(),
                    ),
                ),
            ],
        );
        let by_date = self.exprs.invoke(
            "Filter.dateRangeContains",
            [
                ("leftValue", date_range),
                ("rightField", ExpressionBuilder::constant("system:time_start")),
            ],
        );
        let collection = self.filter(collection, by_date);

        let geometry = self.footprint_geometry();
        let by_bounds = self.exprs.invoke(
            "Filter.intersects",
            [
                ("leftField", ExpressionBuilder::constant(".all")),
                ("rightValue", geometry),
            ],
        );
        let collection = self.filter(collection, by_bounds);

        let by_cloud = self.exprs.invoke(
            "Filter.lessThan",
            [
                ("leftField", ExpressionBuilder::constant(CLOUD_PROPERTY)),
                ("rightValue", ExpressionBuilder::constant(self.query.cloud_threshold)),
            ],
        );
        self.filter(collection, by_cloud)
    }

    fn bit_clear(&mut self, qa: ValueNode, bit_mask: i64) -> ValueNode {
        let mask = self.image_constant(bit_mask);
        let flagged = self
            .exprs
            .invoke("Image.bitwiseAnd", [("image1", qa), ("image2", mask)]);
        let zero = self.image_constant(0);
        self.exprs
            .invoke("Image.eq", [("image1", flagged), ("image2", zero)])
    }

    /// 雲與卷雲位元皆為 0 的像素才保留
    fn cloud_mask_function(&mut self) -> ValueNode {
        let image = ExpressionBuilder::argument(MAPPING_VAR);
        let qa = self.exprs.invoke(
            "Image.select",
            [
                ("input", image.clone()),
                ("bandSelectors", ExpressionBuilder::constant(json!([QA_BAND]))),
            ],
        );

        let cloud_clear = self.bit_clear(qa.clone(), CLOUD_BIT_MASK);
        let cirrus_clear = self.bit_clear(qa, CIRRUS_BIT_MASK);

        let mask = self.exprs.invoke(
            "Image.and",
            [("image1", cloud_clear), ("image2", cirrus_clear)],
        );
        let body = self
            .exprs
            .invoke("Image.updateMask", [("image", image), ("mask", mask)]);
        self.exprs.function(&[MAPPING_VAR], body)
    }

    /// NDVI = (B8 - B4) / (B8 + B4)，作為新波段加入
    fn add_ndvi_function(&mut self) -> ValueNode {
        let image = ExpressionBuilder::argument(MAPPING_VAR);
        let difference = self.exprs.invoke(
            "Image.normalizedDifference",
            [
                ("input", image.clone()),
                ("bandNames", ExpressionBuilder::constant(json!([NIR_BAND, RED_BAND]))),
            ],
        );
        let ndvi = self.exprs.invoke(
            "Image.rename",
            [
                ("input", difference),
                ("names", ExpressionBuilder::constant(json!([NDVI_BAND]))),
            ],
        );
        let body = self
            .exprs
            .invoke("Image.addBands", [("dstImg", image), ("srcImg", ndvi)]);
        self.exprs.function(&[MAPPING_VAR], body)
    }

    fn select_ndvi_function(&mut self) -> ValueNode {
        let body = self.exprs.invoke(
            "Image.select",
            [
                ("input", ExpressionBuilder::argument(MAPPING_VAR)),
                ("bandSelectors", ExpressionBuilder::constant(json!([NDVI_BAND]))),
            ],
        );
        self.exprs.function(&[MAPPING_VAR], body)
    }

    fn median_composite(&mut self) -> ValueNode {
        let collection = self.filtered_collection();

        let mask = self.cloud_mask_function();
        let collection = self.map(collection, mask);

        let add_ndvi = self.add_ndvi_function();
        let collection = self.map(collection, add_ndvi);

        let select = self.select_ndvi_function();
        let collection = self.map(collection, select);

        self.exprs.invoke("reduce.median", [("collection", collection)])
    }
}

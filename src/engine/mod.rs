// ==========================================
// 电商数据生成系统 - 引擎层
// ==========================================
// 职责: 实现漏斗仿真的业务规则引擎
// 红线: 引擎间通过不可变记录交接;随机性一律经显式种子派生
// ==========================================

pub mod batch;
pub mod conversion;
pub mod pipeline;
pub mod scale;
pub mod tier_assigner;
pub mod traffic;

// 重导出核心引擎
pub use batch::{
    day_batch_size, derive_worker_seed, product_batch_size, IdCursor, IdRange, IdReservation,
};
pub use conversion::{
    allocate_quota, compute_weights, group_daily_traffic, traffic_by_day, ConversionEngine,
    ConversionStats, DailyGroup, SkipReason, WeightedGroup,
};
pub use pipeline::{date_span, FunnelPipeline, PipelineResult};
pub use scale::{BusinessScaleModel, ScaleSummary, ScaleTraffic};
pub use tier_assigner::CatalogTierAssigner;
pub use traffic::{TrafficDistributor, TrafficStats};

/// 金额/百分比统一保留两位小数
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// ==========================================
// 电商数据生成系统 - 核心库
// ==========================================
// 技术栈: Rust + rayon 并行
// 系统定位: 数仓分层测试数据的漏斗仿真管道
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 常量表与运行配置
pub mod config;

// 引擎层 - 漏斗仿真
pub mod engine;

// 校验层 - 层间一致性
pub mod verify;

// 错误类型
pub mod error;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{OrderStatus, PaymentMethod, Tier, TrafficSource, TrafficType};

// 领域实体
pub use domain::{build_product_index, Order, OrderDetail, Product, Store, TrafficEvent, User};

// 配置
pub use config::{GenerationConfig, TrafficCalibration};

// 引擎
pub use engine::{
    BusinessScaleModel, CatalogTierAssigner, ConversionEngine, ConversionStats, FunnelPipeline,
    PipelineResult, TrafficDistributor, TrafficStats,
};

// 校验
pub use verify::{ConsistencyVerifier, LayerMetrics, VerifyReport};

// 错误
pub use error::{GenError, GenResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "电商数据生成系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

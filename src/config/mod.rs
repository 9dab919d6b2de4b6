// ==========================================
// 电商数据生成系统 - 配置层
// ==========================================
// 职责: 常量表 (分层/渠道/体量) 与运行配置
// 红线: 引擎不得内嵌业务常量,一律经由本层取值
// ==========================================

pub mod business;
pub mod generation;
pub mod platform;
pub mod scale;

// 重导出核心配置
pub use business::{
    category_profit_bonus, fee_rate, shipping_fee_per_unit, tier_profile, FeeType, TierProfile,
    PROFIT_MARGIN_CEILING, TIER_ORDER,
};
pub use generation::{GenerationConfig, TrafficCalibration};
pub use platform::{paid_channels_for, FALLBACK_PAID_CHANNEL, NATURAL_CHANNELS};
pub use scale::{all_scales, scale_profile, ScaleProfile, DEFAULT_SCALE};

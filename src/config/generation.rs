// ==========================================
// 电商数据生成系统 - 生成运行配置
// ==========================================
// 职责: 单次生成运行的全部可调参数
// 红线: 投放概率/CPC区间是标定常量,不是业务真值;必须可配置
// ==========================================

use crate::error::{GenError, GenResult};
use serde::{Deserialize, Serialize};

// ==========================================
// TrafficCalibration - 流量标定常量
// ==========================================
// 默认值以 5-8% 推广费率(目标 6.5%)为标定目标
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficCalibration {
    // ===== 付费投放概率 =====
    pub paid_prob_hot: f64,     // 主推新品/引流品的投放概率
    pub paid_prob_default: f64, // 其余分层的投放概率

    // ===== 自然流量 =====
    pub natural_impressions_vehicle: (f64, f64),   // 整车类基础曝光区间
    pub natural_impressions_accessory: (f64, f64), // 配件类基础曝光区间
    pub natural_ctr: (f64, f64),                   // 自然点击率区间

    // ===== 付费流量 =====
    pub paid_impressions_vehicle: (f64, f64),   // 整车类付费曝光区间
    pub paid_impressions_accessory: (f64, f64), // 配件类付费曝光区间
    pub paid_ctr: (f64, f64),                   // 付费点击率区间
    pub cpc_vehicle: (f64, f64),                // 整车类CPC区间 (元)
    pub cpc_accessory: (f64, f64),              // 配件类CPC区间 (元)
    pub min_paid_budget: f64,                   // 单次投放最低预算 (元)
}

impl Default for TrafficCalibration {
    fn default() -> Self {
        Self {
            paid_prob_hot: 0.05,
            paid_prob_default: 0.02,
            natural_impressions_vehicle: (100.0, 500.0),
            natural_impressions_accessory: (50.0, 200.0),
            natural_ctr: (0.05, 0.15),
            paid_impressions_vehicle: (80.0, 180.0),
            paid_impressions_accessory: (40.0, 90.0),
            paid_ctr: (0.02, 0.04),
            cpc_vehicle: (0.45, 0.75),
            cpc_accessory: (0.28, 0.52),
            min_paid_budget: 12.0,
        }
    }
}

// ==========================================
// GenerationConfig - 生成运行配置
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    // ===== 体量输入 =====
    pub scale_name: String,  // 企业体量名称 (未知名称回落小型企业)
    pub store_count: u32,    // 店铺数
    pub time_span_days: u32, // 时间跨度 (天)

    // ===== 流量/订单目标 =====
    pub traffic_base: Option<u64>,       // 流量基数;None 时由体量模型推导
    pub target_order_count: Option<u64>, // 目标订单总数;None 时由点击量估算

    // ===== 并行控制 =====
    pub parallel: bool,               // 是否并行执行
    pub worker_count: Option<usize>,  // 工作线程数;None 时取可用核数

    // ===== 随机性 =====
    pub seed: u64, // 运行种子;工作线程种子由它派生并记录日志

    // ===== 标定常量 =====
    pub calibration: TrafficCalibration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            scale_name: "小型企业".to_string(),
            store_count: 6,
            time_span_days: 30,
            traffic_base: None,
            target_order_count: None,
            parallel: true,
            worker_count: None,
            seed: 42,
            calibration: TrafficCalibration::default(),
        }
    }
}

impl GenerationConfig {
    /// 校验配置合法性 (在分发任何批次之前调用)
    pub fn validate(&self) -> GenResult<()> {
        if self.store_count == 0 {
            return Err(GenError::InvalidConfig("店铺数必须大于0".to_string()));
        }
        if self.time_span_days == 0 {
            return Err(GenError::InvalidConfig("时间跨度必须大于0天".to_string()));
        }
        if let Some(0) = self.worker_count {
            return Err(GenError::InvalidConfig("工作线程数不能为0".to_string()));
        }
        let c = &self.calibration;
        if !(0.0..=1.0).contains(&c.paid_prob_hot) || !(0.0..=1.0).contains(&c.paid_prob_default) {
            return Err(GenError::InvalidConfig(
                "付费投放概率必须在[0,1]区间".to_string(),
            ));
        }
        Ok(())
    }

    /// 生效的工作线程数
    pub fn effective_workers(&self) -> usize {
        self.worker_count
            .unwrap_or_else(rayon::current_num_threads)
            .max(1)
    }
}

// ==========================================
// 电商数据生成系统 - 流量领域模型
// ==========================================
// 用途: TrafficDistributor 产出,ConversionEngine 只读消费
// 红线: 事件创建后不可变;跨批次合并依赖事件自描述 (日期/店铺/商品/渠道)
// ==========================================

use crate::domain::types::{Tier, TrafficType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// TrafficEvent - 流量事件
// ==========================================
// 一条记录 = 某商品某日在某渠道的曝光/点击聚合
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficEvent {
    // ===== 主键 =====
    pub traffic_id: String, // 流量记录 ID (T 前缀,批次预留区间内分配)

    // ===== 维度键 =====
    pub date: NaiveDate,     // 日期
    pub store_id: String,    // 店铺 ID
    pub platform: String,    // 平台
    pub sku_id: String,      // SKU ID
    pub product_id: String,  // 商品 ID
    pub category_l1: String, // 一级类目
    pub category_l2: String, // 二级类目
    pub tier: Tier,          // 商品分层

    // ===== 流量属性 =====
    pub traffic_type: TrafficType, // 自然/付费
    pub channel: String,           // 流量渠道

    // ===== 指标 =====
    pub impressions: u32,    // 曝光量
    pub clicks: u32,         // 点击量
    pub ctr: f64,            // 点击率 (百分比,保留2位小数)
    pub promotion_cost: f64, // 推广费用 (自然流量恒为 0)
    pub cpc: f64,            // 单次点击成本 (自然流量恒为 0)
}

/// 流量记录 ID 格式: T+9位序号
pub fn format_traffic_id(seq: u64) -> String {
    format!("T{:09}", seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traffic_id_format() {
        assert_eq!(format_traffic_id(1), "T000000001");
        assert_eq!(format_traffic_id(123_456_789), "T123456789");
        // 超出9位时自然扩展,不截断
        assert_eq!(format_traffic_id(1_234_567_890), "T1234567890");
    }
}

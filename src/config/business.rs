// ==========================================
// 电商数据生成系统 - 商品分层与业务配置
// ==========================================
// 依据: Datagen_Design_v1.0.md - 分层策略/利润率/费率
// 职责: 定义分层占比、利润率区间、转化率区间、流量权重等常量表
// ==========================================

use crate::domain::types::Tier;

// ==========================================
// TierProfile - 分层画像
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct TierProfile {
    pub ratio: f64,                    // 目录占比
    pub profit_margin: (f64, f64),     // 利润率区间
    pub traffic_weight: f64,           // 流量权重倍数
    pub conversion_rate: (f64, f64),   // 转化率区间
    pub description: &'static str,     // 业务描述
}

/// 分层遍历的固定顺序 (逆CDF抽样按此顺序累加占比)
pub const TIER_ORDER: [Tier; 5] = [
    Tier::Bestseller,
    Tier::Margin,
    Tier::PromotedNew,
    Tier::SlowMoving,
    Tier::LossLeader,
];

/// 获取分层画像
///
/// 占比合计 1.0;权重/转化率按真实电商模型标定
pub fn tier_profile(tier: Tier) -> TierProfile {
    match tier {
        Tier::Bestseller => TierProfile {
            ratio: 0.30,
            profit_margin: (0.28, 0.33),
            traffic_weight: 3.0,
            conversion_rate: (0.03, 0.08),
            description: "走量商品,中等利润",
        },
        Tier::Margin => TierProfile {
            ratio: 0.20,
            profit_margin: (0.40, 0.50),
            traffic_weight: 0.5,
            conversion_rate: (0.01, 0.03),
            description: "高毛利,销量少",
        },
        Tier::PromotedNew => TierProfile {
            ratio: 0.15,
            profit_margin: (0.28, 0.35),
            traffic_weight: 1.5,
            conversion_rate: (0.02, 0.05),
            description: "中等利润,推广费高",
        },
        Tier::SlowMoving => TierProfile {
            ratio: 0.20,
            profit_margin: (0.25, 0.40),
            traffic_weight: 0.3,
            conversion_rate: (0.005, 0.015),
            description: "销量低,利润不稳定",
        },
        Tier::LossLeader => TierProfile {
            ratio: 0.15,
            profit_margin: (0.20, 0.25),
            traffic_weight: 4.0,
            conversion_rate: (0.04, 0.10),
            description: "高销量,低利润",
        },
    }
}

// ==========================================
// 类别利润率加成
// ==========================================
// 品牌整车无加成;白牌与装备类逐档抬升
pub fn category_profit_bonus(category_type: &str) -> f64 {
    match category_type {
        "整车-品牌" => 0.00,
        "整车-白牌" => 0.05,
        "骑行装备-品牌" => 0.10,
        "骑行装备-白牌" => 0.15,
        _ => 0.0,
    }
}

/// 利润率全局上限
pub const PROFIT_MARGIN_CEILING: f64 = 0.65;

// ==========================================
// 运费配置 (元/件)
// ==========================================
pub const SHIPPING_FEE_VEHICLE: f64 = 30.0; // 整车
pub const SHIPPING_FEE_ACCESSORY: f64 = 3.0; // 配件

/// 按一级类目取单件运费
pub fn shipping_fee_per_unit(category_l1: &str) -> f64 {
    if category_l1.contains("整车") {
        SHIPPING_FEE_VEHICLE
    } else {
        SHIPPING_FEE_ACCESSORY
    }
}

// ==========================================
// 费用率配置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeType {
    AfterSale,  // 售后费
    Platform,   // 平台费
    Management, // 管理费
}

pub fn fee_rate(fee_type: FeeType) -> f64 {
    match fee_type {
        FeeType::AfterSale => 0.02,
        FeeType::Platform => 0.05,
        FeeType::Management => 0.10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ratios_sum_to_one() {
        let total: f64 = TIER_ORDER.iter().map(|t| tier_profile(*t).ratio).sum();
        assert!((total - 1.0).abs() < 1e-9, "分层占比合计应为1.0, 实际{}", total);
    }

    #[test]
    fn test_margin_ranges_below_ceiling_before_bonus() {
        for tier in TIER_ORDER {
            let (lo, hi) = tier_profile(tier).profit_margin;
            assert!(lo < hi, "{} 利润率区间无效", tier);
            assert!(hi <= PROFIT_MARGIN_CEILING, "{} 基础利润率超过全局上限", tier);
        }
    }

    #[test]
    fn test_category_bonus_lookup() {
        assert_eq!(category_profit_bonus("整车-品牌"), 0.00);
        assert_eq!(category_profit_bonus("骑行装备-白牌"), 0.15);
        assert_eq!(category_profit_bonus("未知类别"), 0.0);
    }

    #[test]
    fn test_shipping_fee_by_category() {
        assert_eq!(shipping_fee_per_unit("整车-品牌"), 30.0);
        assert_eq!(shipping_fee_per_unit("整车-白牌"), 30.0);
        assert_eq!(shipping_fee_per_unit("骑行装备"), 3.0);
    }
}

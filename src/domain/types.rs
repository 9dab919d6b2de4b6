// ==========================================
// 电商数据生成系统 - 领域类型定义
// ==========================================
// 依据: Datagen_Design_v1.0.md - 数据模型
// 序列化格式: 中文标签 (与数仓存储值一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 商品分层 (Product Tier)
// ==========================================
// 五档业务价值分层,同时驱动流量权重与利润率区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "畅销品")]
    Bestseller, // 走量商品,中等利润
    #[serde(rename = "利润品")]
    Margin, // 高毛利,销量少
    #[serde(rename = "主推新品")]
    PromotedNew, // 中等利润,推广费高
    #[serde(rename = "滞销品")]
    SlowMoving, // 销量低,利润不稳定
    #[serde(rename = "引流品")]
    LossLeader, // 高销量,低利润
}

impl Tier {
    /// 数仓存储的中文标签
    pub fn as_label(&self) -> &'static str {
        match self {
            Tier::Bestseller => "畅销品",
            Tier::Margin => "利润品",
            Tier::PromotedNew => "主推新品",
            Tier::SlowMoving => "滞销品",
            Tier::LossLeader => "引流品",
        }
    }

    /// 从中文标签解析分层
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "畅销品" => Some(Tier::Bestseller),
            "利润品" => Some(Tier::Margin),
            "主推新品" => Some(Tier::PromotedNew),
            "滞销品" => Some(Tier::SlowMoving),
            "引流品" => Some(Tier::LossLeader),
            _ => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

// ==========================================
// 流量类型 (Traffic Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrafficType {
    #[serde(rename = "自然")]
    Natural, // 自然流量,每日必有
    #[serde(rename = "付费")]
    Paid, // 付费投放,按概率触发
}

impl fmt::Display for TrafficType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrafficType::Natural => write!(f, "自然"),
            TrafficType::Paid => write!(f, "付费"),
        }
    }
}

// ==========================================
// 订单状态 (Order Status)
// ==========================================
// 分布约 92% 已完成 / 6% 已取消 / 2% 退款
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "已完成")]
    Completed,
    #[serde(rename = "已取消")]
    Cancelled,
    #[serde(rename = "退款")]
    Refunded,
}

impl OrderStatus {
    /// 只有已完成订单计入销售额/成本口径
    pub fn is_completed(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Completed => write!(f, "已完成"),
            OrderStatus::Cancelled => write!(f, "已取消"),
            OrderStatus::Refunded => write!(f, "退款"),
        }
    }
}

// ==========================================
// 支付方式 (Payment Method)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "支付宝")]
    Alipay,
    #[serde(rename = "微信")]
    Wechat,
    #[serde(rename = "银行卡")]
    BankCard,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Alipay => write!(f, "支付宝"),
            PaymentMethod::Wechat => write!(f, "微信"),
            PaymentMethod::BankCard => write!(f, "银行卡"),
        }
    }
}

// ==========================================
// 订单流量来源 (Traffic Source)
// ==========================================
// 付费流量命中时标记为付费推广,否则从自然来源随机取一
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrafficSource {
    #[serde(rename = "付费推广")]
    Paid,
    #[serde(rename = "搜索")]
    Search,
    #[serde(rename = "推荐")]
    Recommendation,
    #[serde(rename = "直接访问")]
    Direct,
}

impl fmt::Display for TrafficSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrafficSource::Paid => write!(f, "付费推广"),
            TrafficSource::Search => write!(f, "搜索"),
            TrafficSource::Recommendation => write!(f, "推荐"),
            TrafficSource::Direct => write!(f, "直接访问"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_label_roundtrip() {
        for tier in [
            Tier::Bestseller,
            Tier::Margin,
            Tier::PromotedNew,
            Tier::SlowMoving,
            Tier::LossLeader,
        ] {
            assert_eq!(Tier::from_label(tier.as_label()), Some(tier));
        }
        assert_eq!(Tier::from_label("未知分层"), None);
    }

    #[test]
    fn test_tier_serde_uses_chinese_labels() {
        let json = serde_json::to_string(&Tier::LossLeader).unwrap();
        assert_eq!(json, "\"引流品\"");
        let parsed: Tier = serde_json::from_str("\"畅销品\"").unwrap();
        assert_eq!(parsed, Tier::Bestseller);
    }

    #[test]
    fn test_order_status_serde() {
        let json = serde_json::to_string(&OrderStatus::Completed).unwrap();
        assert_eq!(json, "\"已完成\"");
        assert!(OrderStatus::Completed.is_completed());
        assert!(!OrderStatus::Refunded.is_completed());
    }
}

// ==========================================
// 电商数据生成系统 - 订单领域模型
// ==========================================
// 用途: ConversionEngine 产出,批量入库层 (外部) 只读消费
// 红线: 订单与明细创建后不可变;明细通过 order_id 外键归属唯一订单
// ==========================================

use crate::domain::types::{OrderStatus, PaymentMethod, TrafficSource};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Order - 订单主表
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    // ===== 主键 =====
    pub order_id: String, // 订单 ID (O+8位序号)

    // ===== 关联 =====
    pub user_id: String,  // 下单用户
    pub store_id: String, // 店铺 ID
    pub platform: String, // 平台

    // ===== 订单属性 =====
    pub order_time: NaiveDateTime,     // 下单时间 (日期 + 随机时分)
    pub status: OrderStatus,           // 订单状态
    pub payment_method: PaymentMethod, // 支付方式
    pub traffic_source: TrafficSource, // 流量来源标签

    // ===== 金额口径 =====
    pub total_amount: f64,    // 商品总额 = Σ 明细金额
    pub discount_amount: f64, // 优惠金额 (当前生成恒为 0)
    pub shipping_fee: f64,    // 运费 (整车 30元/件,配件 3元/件)
    pub final_amount: f64,    // 实付金额 (仅已完成订单,否则 0)
    pub total_cost: f64,      // 成本总额 (仅已完成订单,否则 0)

    // ===== 审计字段 =====
    pub created_at: NaiveDateTime, // 创建时间 (= 下单时间)
    pub updated_at: NaiveDateTime, // 更新时间 (下单后 0-7 天)
}

// ==========================================
// OrderDetail - 订单明细
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    // ===== 主键 =====
    pub order_detail_id: String, // 明细 ID (OD+8位序号)

    // ===== 外键 =====
    pub order_id: String, // 归属订单

    // ===== 商品引用 =====
    pub sku_id: String,     // SKU ID
    pub product_id: String, // 商品 ID

    // ===== 数量与金额 =====
    pub quantity: u32, // 数量 (1-3)
    pub price: f64,    // 单价
    pub amount: f64,   // 金额 = 单价 × 数量
}

/// 订单 ID 格式: O+8位序号
pub fn format_order_id(seq: u64) -> String {
    format!("O{:08}", seq)
}

/// 订单明细 ID 格式: OD+8位序号
pub fn format_detail_id(seq: u64) -> String {
    format!("OD{:08}", seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_formats() {
        assert_eq!(format_order_id(1), "O00000001");
        assert_eq!(format_order_id(99_999_999), "O99999999");
        assert_eq!(format_detail_id(42), "OD00000042");
    }
}

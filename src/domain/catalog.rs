// ==========================================
// 电商数据生成系统 - 商品目录领域模型
// ==========================================
// 用途: 外部协作方(目录/店铺/用户生成器)产出,流量与订单引擎只读引用
// 红线: Product 生成后不可变,流量/订单记录只持有 sku_id/product_id 引用
// ==========================================

use crate::domain::types::Tier;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// Product - 商品 (SKU 级)
// ==========================================
// SKU 为店铺维度的可售卖规格,全局唯一;product_id 为平台商品 ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    // ===== 主键 =====
    pub sku_id: String, // 平台 SKU ID (SK 前缀)

    // ===== 关联 =====
    pub product_id: String, // 平台商品 ID (P 前缀,一个商品含多个 SKU)
    pub store_id: String,   // 归属店铺
    pub platform: String,   // 平台 (京东/天猫/抖音/...)

    // ===== 类目与分层 =====
    pub category_l1: String, // 一级类目 (整车-品牌/整车-白牌/骑行装备)
    pub category_l2: String, // 二级类目
    pub tier: Tier,          // 商品分层 (CatalogTierAssigner 输出)

    // ===== 价格 =====
    pub price: f64, // 售价 (元)
    pub cost: f64,  // 成本 (元)
}

impl Product {
    /// 目录查找键: SKU 与店铺的复合键
    pub fn lookup_key(&self) -> (String, String) {
        (self.sku_id.clone(), self.store_id.clone())
    }

    /// 整车类商品 (一级类目以"整车"开头),影响流量基数/CPC/运费
    pub fn is_vehicle(&self) -> bool {
        self.category_l1.starts_with("整车")
    }
}

/// 以 (sku_id, store_id) 为键建立目录索引,供转化引擎查找
pub fn build_product_index(products: &[Product]) -> HashMap<(String, String), Product> {
    products
        .iter()
        .map(|p| (p.lookup_key(), p.clone()))
        .collect()
}

// ==========================================
// Store - 店铺
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub store_id: String,   // 店铺 ID
    pub store_type: String, // 店铺类型 (品牌/白牌)
    pub platform: String,   // 所在平台
}

// ==========================================
// User - 用户
// ==========================================
// 订单生成时随机取用,仅需 ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
}

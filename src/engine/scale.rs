// ==========================================
// 电商数据生成系统 - 企业体量模型
// ==========================================
// 职责: 体量标签 + 店铺数 + 天数 → 流量基线与订单估算
// 红线: 纯函数,无随机性,无失败路径;未知体量回落默认档
// ==========================================

use crate::config::scale::{scale_profile, ScaleProfile};
use serde::{Deserialize, Serialize};

// ==========================================
// ScaleTraffic - 流量基线
// ==========================================
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScaleTraffic {
    pub total_traffic: u64,   // 总流量 (曝光量)
    pub daily_traffic: u64,   // 日均流量
    pub daily_per_store: u64, // 每店每日流量
}

// ==========================================
// ScaleSummary - 体量摘要 (估算口径)
// ==========================================
// 估算假设: 点击率3%, 转化率5%, 客单价500元
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleSummary {
    pub scale_name: String,
    pub description: String,
    pub store_count: u32,
    pub time_span_days: u32,
    pub total_impressions: u64,
    pub total_clicks: u64,
    pub estimated_orders: u64,
    pub estimated_gmv: f64,
    pub monthly_gmv: f64,
    pub daily_traffic: u64,
    pub daily_per_store: u64,
}

/// 摘要估算常量
const SUMMARY_CTR: f64 = 0.03;
const SUMMARY_CVR: f64 = 0.05;
const SUMMARY_AVG_ORDER_VALUE: f64 = 500.0;

// ==========================================
// BusinessScaleModel - 企业体量模型
// ==========================================
pub struct BusinessScaleModel;

impl BusinessScaleModel {
    /// 根据企业体量计算流量基线
    ///
    /// 每店每日流量 = 基础流量 × 流量系数;
    /// 总流量 = 店铺数 × 每店每日流量 × 天数
    pub fn traffic_from_scale(scale_name: &str, store_count: u32, days: u32) -> ScaleTraffic {
        let profile = scale_profile(scale_name);
        let daily_per_store =
            (profile.daily_traffic_base as f64 * profile.traffic_multiplier) as u64;
        let daily_traffic = store_count as u64 * daily_per_store;

        ScaleTraffic {
            total_traffic: daily_traffic * days as u64,
            daily_traffic,
            daily_per_store,
        }
    }

    /// 根据总点击量估算订单数
    pub fn estimate_orders_from_traffic(total_clicks: u64, avg_cvr: f64) -> u64 {
        (total_clicks as f64 * avg_cvr) as u64
    }

    /// 体量摘要 (供外层展示/预估用)
    pub fn scale_summary(scale_name: &str, store_count: u32, days: u32) -> ScaleSummary {
        let profile: ScaleProfile = scale_profile(scale_name);
        let traffic = Self::traffic_from_scale(scale_name, store_count, days);

        let total_clicks = (traffic.total_traffic as f64 * SUMMARY_CTR) as u64;
        let estimated_orders = Self::estimate_orders_from_traffic(total_clicks, SUMMARY_CVR);
        let estimated_gmv = estimated_orders as f64 * SUMMARY_AVG_ORDER_VALUE;
        let monthly_gmv = estimated_gmv / (days as f64 / 30.0);

        ScaleSummary {
            scale_name: scale_name.to_string(),
            description: profile.description.to_string(),
            store_count,
            time_span_days: days,
            total_impressions: traffic.total_traffic,
            total_clicks,
            estimated_orders,
            estimated_gmv,
            monthly_gmv,
            daily_traffic: traffic.daily_traffic,
            daily_per_store: traffic.daily_per_store,
        }
    }
}

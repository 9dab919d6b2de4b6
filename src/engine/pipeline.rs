// ==========================================
// 电商数据生成系统 - 漏斗管道编排器
// ==========================================
// 用途: 协调 体量模型 → 流量分发 → 转化引擎 的执行顺序
// 红线: 快速失败,任一阶段出错即中止,无部分结果交付
// ==========================================

use crate::config::generation::GenerationConfig;
use crate::domain::catalog::{Product, Store, User};
use crate::domain::order::{Order, OrderDetail};
use crate::domain::traffic::TrafficEvent;
use crate::engine::conversion::{ConversionEngine, ConversionStats};
use crate::engine::scale::{BusinessScaleModel, ScaleTraffic};
use crate::engine::traffic::{TrafficDistributor, TrafficStats};
use crate::error::{GenError, GenResult};
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;
use tracing::{info, warn};
use uuid::Uuid;

/// 生成日期序列: [end - days + 1, end],升序
pub fn date_span(end_date: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days)
        .rev()
        .map(|i| end_date - Duration::days(i as i64))
        .collect()
}

// ==========================================
// PipelineResult - 管道运行结果
// ==========================================
#[derive(Debug)]
pub struct PipelineResult {
    pub run_id: Uuid,
    pub scale_traffic: ScaleTraffic,
    pub target_order_count: u64,
    pub traffic: Vec<TrafficEvent>,
    pub orders: Vec<Order>,
    pub details: Vec<OrderDetail>,
    pub traffic_stats: TrafficStats,
    pub conversion_stats: ConversionStats,
}

// ==========================================
// FunnelPipeline - 漏斗管道
// ==========================================
pub struct FunnelPipeline {
    config: GenerationConfig,
}

impl FunnelPipeline {
    /// 创建管道实例 (配置在此一次性校验)
    pub fn new(config: GenerationConfig) -> GenResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// 执行完整漏斗: 流量基线 → 流量事件 → 订单
    ///
    /// # 参数
    /// - products: 商品目录 (外部生成,只读)
    /// - stores: 店铺列表 (用于引用校验)
    /// - users: 用户池
    /// - end_date: 时间跨度的最后一天
    pub fn run(
        &self,
        products: &[Product],
        stores: &[Store],
        users: &[User],
        end_date: NaiveDate,
    ) -> GenResult<PipelineResult> {
        if products.is_empty() {
            return Err(GenError::EmptyCatalog);
        }
        if users.is_empty() {
            return Err(GenError::EmptyUserPool);
        }

        let run_id = Uuid::new_v4();
        info!(
            %run_id,
            scale = %self.config.scale_name,
            stores = stores.len(),
            products = products.len(),
            users = users.len(),
            days = self.config.time_span_days,
            seed = self.config.seed,
            "漏斗管道启动"
        );

        // 商品目录与店铺列表的引用校验 (仅告警,不中止)
        let known_stores: HashSet<&str> = stores.iter().map(|s| s.store_id.as_str()).collect();
        let orphan_products = products
            .iter()
            .filter(|p| !known_stores.contains(p.store_id.as_str()))
            .count();
        if orphan_products > 0 && !stores.is_empty() {
            warn!(orphan_products, "部分商品的店铺ID不在店铺列表中");
        }

        // ==========================================
        // 步骤1: 体量模型 - 流量基线
        // ==========================================
        let scale_traffic = BusinessScaleModel::traffic_from_scale(
            &self.config.scale_name,
            self.config.store_count,
            self.config.time_span_days,
        );
        let traffic_base = self
            .config
            .traffic_base
            .unwrap_or(scale_traffic.daily_per_store);
        info!(
            daily_per_store = scale_traffic.daily_per_store,
            total_traffic = scale_traffic.total_traffic,
            traffic_base,
            "步骤1: 流量基线确定"
        );

        // ==========================================
        // 步骤2: 流量分发
        // ==========================================
        let days = date_span(end_date, self.config.time_span_days);
        let distributor = TrafficDistributor::new(&self.config);
        let traffic = distributor.distribute(products, &days, traffic_base)?;
        let traffic_stats = TrafficStats::from_events(&traffic);
        info!(
            events = traffic.len(),
            impressions = traffic_stats.total_impressions,
            clicks = traffic_stats.total_clicks,
            promotion_cost = traffic_stats.promotion_cost,
            "步骤2: 流量分发完成"
        );

        // ==========================================
        // 步骤3: 转化引擎 - 订单生成
        // ==========================================
        let target_order_count = self.config.target_order_count.unwrap_or_else(|| {
            BusinessScaleModel::estimate_orders_from_traffic(traffic_stats.total_clicks, 0.05)
        });
        let engine = ConversionEngine::new(&self.config, products, users)?;
        let (orders, details, conversion_stats) =
            engine.generate_orders_from_traffic(&traffic, target_order_count)?;
        info!(
            target_order_count,
            orders = conversion_stats.orders,
            skipped_missing = conversion_stats.skipped_missing_product,
            skipped_zero_weight = conversion_stats.skipped_zero_weight_groups,
            "步骤3: 订单生成完成"
        );

        Ok(PipelineResult {
            run_id,
            scale_traffic,
            target_order_count,
            traffic,
            orders,
            details,
            traffic_stats,
            conversion_stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_span_ascending_inclusive() {
        let end = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let days = date_span(end, 7);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2026, 7, 30).unwrap());
        assert_eq!(days[6], end);
        assert!(days.windows(2).all(|w| w[0] < w[1]), "日期应严格升序");
    }
}

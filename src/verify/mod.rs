// ==========================================
// 电商数据生成系统 - 数据一致性校验
// ==========================================
// 职责: 逐对比较相邻层 (生成输出→ODS→DWD→DWS→ADS) 的聚合指标
// 口径: 订单数/销售额/成本/运费/推广费/销量,仅统计已完成订单
// 红线: 只做聚合比对,不做行级 diff
// ==========================================

use crate::domain::order::{Order, OrderDetail};
use crate::domain::traffic::TrafficEvent;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::info;

// ==========================================
// LayerMetrics - 单层聚合指标快照
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerMetrics {
    pub layer: String,        // 层名 (生成/ODS/DWD/DWS/ADS)
    pub derived: bool,        // 汇总派生层 (DWS/ADS) 使用放宽容差
    pub order_count: i64,     // 已完成订单数
    pub sales_amount: f64,    // 销售额 (实付金额合计)
    pub cost_amount: f64,     // 成本合计
    pub shipping_amount: f64, // 运费合计
    pub promotion_cost: f64,  // 推广费合计
    pub quantity: i64,        // 销量 (明细数量合计)
}

impl LayerMetrics {
    /// 从生成输出聚合指标 (管道内存交接物 → 快照)
    ///
    /// 与入库层同口径: 仅已完成订单计入订单数/金额/销量
    pub fn from_generation(
        layer: &str,
        orders: &[Order],
        details: &[OrderDetail],
        traffic: &[TrafficEvent],
    ) -> Self {
        let completed_ids: HashSet<&str> = orders
            .iter()
            .filter(|o| o.status.is_completed())
            .map(|o| o.order_id.as_str())
            .collect();

        let mut metrics = Self {
            layer: layer.to_string(),
            derived: false,
            order_count: completed_ids.len() as i64,
            sales_amount: 0.0,
            cost_amount: 0.0,
            shipping_amount: 0.0,
            promotion_cost: 0.0,
            quantity: 0,
        };

        for order in orders.iter().filter(|o| o.status.is_completed()) {
            metrics.sales_amount += order.final_amount;
            metrics.cost_amount += order.total_cost;
            metrics.shipping_amount += order.shipping_fee;
        }
        for detail in details {
            if completed_ids.contains(detail.order_id.as_str()) {
                metrics.quantity += detail.quantity as i64;
            }
        }
        for event in traffic {
            metrics.promotion_cost += event.promotion_cost;
        }

        metrics
    }

    /// 标记为汇总派生层 (DWS/ADS)
    pub fn as_derived(mut self) -> Self {
        self.derived = true;
        self
    }
}

// ==========================================
// Tolerance - 比对容差
// ==========================================
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tolerance {
    pub count: f64,  // 计数类指标 (订单数/销量)
    pub amount: f64, // 金额类指标
}

impl Default for Tolerance {
    fn default() -> Self {
        // 计数与金额均允许1个单位的舍入误差
        Self {
            count: 1.0,
            amount: 1.0,
        }
    }
}

// ==========================================
// MetricCheck - 单指标比对结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct MetricCheck {
    pub metric: String,
    pub layer_a: String,
    pub layer_b: String,
    pub value_a: f64,
    pub value_b: f64,
    pub diff: f64,
    pub tolerance: f64,
    pub passed: bool,
}

// ==========================================
// VerifyReport - 校验报告
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub checks: Vec<MetricCheck>,
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failures(&self) -> Vec<&MetricCheck> {
        self.checks.iter().filter(|c| !c.passed).collect()
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.checks {
            writeln!(
                f,
                "[{}] {} {}→{}: {:.2} vs {:.2} (差值 {:.2}, 容差 {:.2})",
                if c.passed { "通过" } else { "未通过" },
                c.metric,
                c.layer_a,
                c.layer_b,
                c.value_a,
                c.value_b,
                c.diff,
                c.tolerance
            )?;
        }
        Ok(())
    }
}

// ==========================================
// ConsistencyVerifier - 一致性校验器
// ==========================================
pub struct ConsistencyVerifier {
    tolerance: Tolerance,
    derived_tolerance: Tolerance,
}

impl Default for ConsistencyVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsistencyVerifier {
    pub fn new() -> Self {
        Self {
            tolerance: Tolerance::default(),
            // 汇总派生层跨表聚合,容差放宽
            derived_tolerance: Tolerance {
                count: 10.0,
                amount: 100.0,
            },
        }
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance, derived_tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self.derived_tolerance = derived_tolerance;
        self
    }

    /// 比对一对相邻层
    pub fn verify_adjacent(&self, a: &LayerMetrics, b: &LayerMetrics) -> Vec<MetricCheck> {
        let tol = if a.derived || b.derived {
            self.derived_tolerance
        } else {
            self.tolerance
        };

        let pairs: [(&str, f64, f64, f64); 6] = [
            ("订单数", a.order_count as f64, b.order_count as f64, tol.count),
            ("销售额", a.sales_amount, b.sales_amount, tol.amount),
            ("成本", a.cost_amount, b.cost_amount, tol.amount),
            ("运费", a.shipping_amount, b.shipping_amount, tol.amount),
            ("推广费", a.promotion_cost, b.promotion_cost, tol.amount),
            ("销量", a.quantity as f64, b.quantity as f64, tol.count),
        ];

        pairs
            .into_iter()
            .map(|(metric, value_a, value_b, tolerance)| {
                let diff = (value_a - value_b).abs();
                MetricCheck {
                    metric: metric.to_string(),
                    layer_a: a.layer.clone(),
                    layer_b: b.layer.clone(),
                    value_a,
                    value_b,
                    diff,
                    tolerance,
                    passed: diff < tolerance,
                }
            })
            .collect()
    }

    /// 按链路顺序逐对校验全部层
    pub fn verify_chain(&self, layers: &[LayerMetrics]) -> VerifyReport {
        let mut checks = Vec::new();
        for pair in layers.windows(2) {
            let pair_checks = self.verify_adjacent(&pair[0], &pair[1]);
            let failed = pair_checks.iter().filter(|c| !c.passed).count();
            info!(
                layer_a = %pair[0].layer,
                layer_b = %pair[1].layer,
                failed,
                "层间一致性比对"
            );
            checks.extend(pair_checks);
        }
        VerifyReport { checks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(layer: &str, order_count: i64, sales: f64) -> LayerMetrics {
        LayerMetrics {
            layer: layer.to_string(),
            derived: false,
            order_count,
            sales_amount: sales,
            cost_amount: 600.0,
            shipping_amount: 90.0,
            promotion_cost: 120.0,
            quantity: 150,
        }
    }

    #[test]
    fn test_identical_layers_pass() {
        let verifier = ConsistencyVerifier::new();
        let report = verifier.verify_chain(&[
            metrics("生成", 100, 1000.0),
            metrics("ODS", 100, 1000.0),
            metrics("DWD", 100, 1000.0),
        ]);
        assert!(report.passed());
        assert_eq!(report.checks.len(), 12, "两对相邻层 × 6项指标");
    }

    #[test]
    fn test_sub_tolerance_drift_passes() {
        let verifier = ConsistencyVerifier::new();
        let checks =
            verifier.verify_adjacent(&metrics("生成", 100, 1000.0), &metrics("ODS", 100, 1000.5));
        assert!(checks.iter().all(|c| c.passed), "0.5元漂移在容差内");
    }

    #[test]
    fn test_failure_pinpoints_offending_metric() {
        let verifier = ConsistencyVerifier::new();
        let report = verifier.verify_chain(&[
            metrics("生成", 100, 1000.0),
            metrics("ODS", 97, 1000.0),
        ]);
        assert!(!report.passed());
        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].metric, "订单数");
        assert_eq!(failures[0].diff, 3.0);
    }

    #[test]
    fn test_derived_layer_uses_relaxed_tolerance() {
        let verifier = ConsistencyVerifier::new();
        // DWS 汇总层销售额漂移 50 元: 默认容差不通过,派生容差通过
        let dws = metrics("DWS", 100, 1050.0).as_derived();
        let checks = verifier.verify_adjacent(&metrics("DWD", 100, 1000.0), &dws);
        let sales = checks.iter().find(|c| c.metric == "销售额").unwrap();
        assert!(sales.passed, "派生层应使用放宽容差");
    }

    #[test]
    fn test_from_generation_counts_completed_only() {
        use crate::domain::types::{OrderStatus, PaymentMethod, TrafficSource};
        use chrono::NaiveDate;

        let t0 = NaiveDate::from_ymd_opt(2026, 8, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let make_order = |id: &str, status: OrderStatus, amount: f64| Order {
            order_id: id.to_string(),
            user_id: "U1".to_string(),
            store_id: "S1".to_string(),
            platform: "京东".to_string(),
            order_time: t0,
            status,
            payment_method: PaymentMethod::Alipay,
            traffic_source: TrafficSource::Search,
            total_amount: amount,
            discount_amount: 0.0,
            shipping_fee: 30.0,
            final_amount: if status.is_completed() { amount } else { 0.0 },
            total_cost: if status.is_completed() { amount * 0.7 } else { 0.0 },
            created_at: t0,
            updated_at: t0,
        };
        let orders = vec![
            make_order("O00000001", OrderStatus::Completed, 100.0),
            make_order("O00000002", OrderStatus::Cancelled, 200.0),
        ];
        let details = vec![
            OrderDetail {
                order_detail_id: "OD00000001".to_string(),
                order_id: "O00000001".to_string(),
                sku_id: "SK1".to_string(),
                product_id: "P1".to_string(),
                quantity: 2,
                price: 50.0,
                amount: 100.0,
            },
            OrderDetail {
                order_detail_id: "OD00000002".to_string(),
                order_id: "O00000002".to_string(),
                sku_id: "SK1".to_string(),
                product_id: "P1".to_string(),
                quantity: 4,
                price: 50.0,
                amount: 200.0,
            },
        ];

        let m = LayerMetrics::from_generation("生成", &orders, &details, &[]);
        assert_eq!(m.order_count, 1, "已取消订单不计入");
        assert_eq!(m.sales_amount, 100.0);
        assert_eq!(m.quantity, 2, "销量仅统计已完成订单的明细");
    }
}

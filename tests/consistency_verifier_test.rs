// ==========================================
// 数据一致性校验测试
// ==========================================
// 覆盖: 五层链路比对 / 指标级失败定位 / 派生层容差
// ==========================================


use chrono::NaiveDate;
use ecom_funnel_datagen::verify::{ConsistencyVerifier, LayerMetrics};
use ecom_funnel_datagen::{FunnelPipeline, GenerationConfig};
use test_helpers::{base_config, make_catalog, make_users};

fn generation_metrics() -> LayerMetrics {
    let (stores, products) = make_catalog(2, 10);
    let users = make_users(100);
    let config = GenerationConfig {
        target_order_count: Some(70),
        ..base_config()
    };
    let pipeline = FunnelPipeline::new(config).unwrap();
    let result = pipeline
        .run(
            &products,
            &stores,
            &users,
            NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
        )
        .unwrap();

    LayerMetrics::from_generation("生成", &result.orders, &result.details, &result.traffic)
}

fn copy_as(m: &LayerMetrics, layer: &str) -> LayerMetrics {
    let mut copy = m.clone();
    copy.layer = layer.to_string();
    copy
}

#[test]
fn test_scenario_1_five_layer_chain_passes_when_loaded_faithfully() {
    // 场景1: 各层忠实装载 (派生层带微小聚合漂移) → 全链路通过
    let generation = generation_metrics();
    let ods = copy_as(&generation, "ODS");
    let dwd = copy_as(&generation, "DWD");

    let mut dws = copy_as(&generation, "DWS").as_derived();
    dws.sales_amount += 0.04; // 汇总表的舍入漂移
    let mut ads = copy_as(&generation, "ADS").as_derived();
    ads.sales_amount += 0.07;

    let report = ConsistencyVerifier::new().verify_chain(&[generation, ods, dwd, dws, ads]);
    assert!(report.passed(), "全链路应通过:\n{}", report);
    assert_eq!(report.checks.len(), 4 * 6, "4对相邻层 × 6项指标");
}

#[test]
fn test_scenario_2_lost_orders_detected_at_offending_pair() {
    // 场景2: ODS层丢单 → 生成→ODS比对失败,且指标定位到订单数/金额
    let generation = generation_metrics();
    let mut ods = copy_as(&generation, "ODS");
    ods.order_count -= 5;
    ods.sales_amount -= 3210.5;
    let dwd = copy_as(&ods, "DWD");

    let report = ConsistencyVerifier::new().verify_chain(&[generation, ods, dwd]);
    assert!(!report.passed());

    let failures = report.failures();
    assert!(failures.iter().all(|c| c.layer_a == "生成" && c.layer_b == "ODS"),
        "失败应集中在生成→ODS这一对");
    let failed_metrics: Vec<&str> = failures.iter().map(|c| c.metric.as_str()).collect();
    assert!(failed_metrics.contains(&"订单数"));
    assert!(failed_metrics.contains(&"销售额"));
}

#[test]
fn test_scenario_3_promotion_cost_tracks_traffic_only() {
    // 场景3: 推广费口径只来自流量表,与订单无关
    let generation = generation_metrics();
    assert!(generation.promotion_cost >= 0.0);

    let mut ods = copy_as(&generation, "ODS");
    ods.promotion_cost += 50.0;

    let report = ConsistencyVerifier::new().verify_chain(&[generation, ods]);
    let failures = report.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].metric, "推广费");
}

#[test]
fn test_scenario_4_derived_drift_beyond_relaxed_tolerance_fails() {
    // 场景4: 派生层漂移超过放宽容差仍应失败
    let generation = generation_metrics();
    let mut ads = copy_as(&generation, "ADS").as_derived();
    ads.sales_amount += 500.0; // 超过放宽容差(100)

    let report = ConsistencyVerifier::new().verify_chain(&[generation, ads]);
    assert!(!report.passed());
    assert_eq!(report.failures()[0].metric, "销售额");
}

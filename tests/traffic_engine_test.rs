// ==========================================
// 流量分发引擎测试
// ==========================================
// 覆盖: 事件字段口径 / 单线程与多线程 / ID唯一性 / 投放概率分层
// ==========================================


use chrono::NaiveDate;
use ecom_funnel_datagen::domain::types::{Tier, TrafficType};
use ecom_funnel_datagen::engine::date_span;
use ecom_funnel_datagen::{GenerationConfig, TrafficDistributor};
use std::collections::HashSet;
use test_helpers::{base_config, make_catalog};

fn end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
}

#[test]
fn test_scenario_1_event_fields_within_calibration() {
    // 场景1: 事件字段全部落在标定区间内
    let (_, products) = make_catalog(2, 10);
    let config = base_config();
    let days = date_span(end_date(), 7);

    let distributor = TrafficDistributor::new(&config);
    let events = distributor.distribute(&products, &days, 1000).unwrap();
    assert!(!events.is_empty());

    let skus: HashSet<&str> = products.iter().map(|p| p.sku_id.as_str()).collect();
    for e in &events {
        assert!(skus.contains(e.sku_id.as_str()), "事件引用了未知SKU");
        assert!(e.clicks <= e.impressions, "点击量不能超过曝光量");
        match e.traffic_type {
            TrafficType::Natural => {
                assert_eq!(e.promotion_cost, 0.0, "自然流量无推广费");
                assert_eq!(e.cpc, 0.0, "自然流量无CPC");
                // 自然CTR 5%-15%
                assert!(e.ctr >= 5.0 && e.ctr <= 15.0, "自然CTR越界: {}", e.ctr);
            }
            TrafficType::Paid => {
                assert!(e.promotion_cost >= 12.0, "付费投放最低预算12元: {}", e.promotion_cost);
                // 付费CTR 2%-4%
                assert!(e.ctr >= 2.0 && e.ctr <= 4.0, "付费CTR越界: {}", e.ctr);
                let (lo, hi) = if e.category_l1.starts_with("整车") {
                    (0.45, 0.75)
                } else {
                    (0.28, 0.52)
                };
                assert!(e.cpc >= lo && e.cpc <= hi, "CPC越界: {} ({})", e.cpc, e.category_l1);
            }
        }
    }
}

#[test]
fn test_scenario_2_natural_traffic_covers_every_product_day() {
    // 场景2: 每个 (商品,日) 至少有一条自然流量
    let (_, products) = make_catalog(2, 10);
    let config = base_config();
    let days = date_span(end_date(), 7);

    let distributor = TrafficDistributor::new(&config);
    let events = distributor.distribute(&products, &days, 1000).unwrap();

    let covered: HashSet<(String, String)> = events
        .iter()
        .filter(|e| e.traffic_type == TrafficType::Natural)
        .map(|e| (e.sku_id.clone(), e.date.to_string()))
        .collect();
    assert_eq!(
        covered.len(),
        products.len() * days.len(),
        "自然流量必须覆盖全部商品×日期组合"
    );
}

#[test]
fn test_scenario_3_traffic_ids_unique_across_many_small_batches() {
    // 场景3: 大量小批次并行时 traffic_id 仍全局唯一
    let (_, products) = make_catalog(4, 50); // 200个商品,超过并行阈值
    let config = GenerationConfig {
        parallel: true,
        worker_count: Some(16), // 强制批次尺寸 max(10, 200/16)=12 → 17个批次
        time_span_days: 3,
        ..base_config()
    };
    let days = date_span(end_date(), 3);

    let distributor = TrafficDistributor::new(&config);
    let events = distributor.distribute(&products, &days, 1000).unwrap();

    let ids: HashSet<&str> = events.iter().map(|e| e.traffic_id.as_str()).collect();
    assert_eq!(ids.len(), events.len(), "traffic_id 跨批次必须唯一");
}

#[test]
fn test_scenario_4_single_thread_below_parallel_threshold() {
    // 场景4: 商品数低于阈值时并行配置自动退化,仍保持ID唯一
    let (_, products) = make_catalog(2, 10); // 20个商品 < 100
    let config = GenerationConfig {
        parallel: true,
        ..base_config()
    };
    let days = date_span(end_date(), 7);

    let distributor = TrafficDistributor::new(&config);
    let events = distributor.distribute(&products, &days, 1000).unwrap();

    let ids: HashSet<&str> = events.iter().map(|e| e.traffic_id.as_str()).collect();
    assert_eq!(ids.len(), events.len());
}

#[test]
fn test_scenario_5_hot_tiers_get_more_paid_traffic() {
    // 场景5: 主推新品/引流品的投放率显著高于其他分层
    let (_, products) = make_catalog(4, 40); // 160个商品,分层均匀轮转
    let config = GenerationConfig {
        parallel: false,
        time_span_days: 30,
        ..base_config()
    };
    let days = date_span(end_date(), 30);

    let distributor = TrafficDistributor::new(&config);
    let events = distributor.distribute(&products, &days, 1000).unwrap();

    let is_hot = |t: Tier| matches!(t, Tier::PromotedNew | Tier::LossLeader);
    let hot_products = products.iter().filter(|p| is_hot(p.tier)).count();
    let cold_products = products.len() - hot_products;

    let hot_paid = events
        .iter()
        .filter(|e| e.traffic_type == TrafficType::Paid && is_hot(e.tier))
        .count();
    let cold_paid = events
        .iter()
        .filter(|e| e.traffic_type == TrafficType::Paid && !is_hot(e.tier))
        .count();

    let hot_rate = hot_paid as f64 / (hot_products * days.len()) as f64;
    let cold_rate = cold_paid as f64 / (cold_products * days.len()) as f64;

    assert!(
        hot_rate > cold_rate,
        "主推/引流投放率应更高: hot={:.4} cold={:.4}",
        hot_rate,
        cold_rate
    );
    // 标定值 5% / 2%,给出宽松统计界
    assert!(hot_rate > 0.02 && hot_rate < 0.09, "hot投放率异常: {:.4}", hot_rate);
    assert!(cold_rate > 0.005 && cold_rate < 0.04, "cold投放率异常: {:.4}", cold_rate);
}

#[test]
fn test_scenario_6_same_seed_same_worker_count_reproducible() {
    // 场景6: 相同种子 + 相同线程数 → 输出可复现
    let (_, products) = make_catalog(4, 30); // 120个商品,走并行路径
    let config = GenerationConfig {
        parallel: true,
        worker_count: Some(4),
        time_span_days: 5,
        seed: 7,
        ..base_config()
    };
    let days = date_span(end_date(), 5);

    let distributor = TrafficDistributor::new(&config);
    let run1 = distributor.distribute(&products, &days, 1000).unwrap();
    let run2 = distributor.distribute(&products, &days, 1000).unwrap();

    assert_eq!(run1.len(), run2.len());
    for (a, b) in run1.iter().zip(run2.iter()) {
        assert_eq!(a.traffic_id, b.traffic_id);
        assert_eq!(a.impressions, b.impressions);
        assert_eq!(a.clicks, b.clicks);
        assert_eq!(a.channel, b.channel);
    }
}

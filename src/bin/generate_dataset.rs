// Small dev utility: run the full funnel pipeline on a fabricated demo
// catalog and print layer-consistency checks for the in-memory handoff.
//
// Usage:
//   cargo run --bin generate-dataset -- [scale_name] [store_count] [days]
//
// This does not touch any database; output stays in memory.

use chrono::Local;
use ecom_funnel_datagen::engine::CatalogTierAssigner;
use ecom_funnel_datagen::verify::{ConsistencyVerifier, LayerMetrics};
use ecom_funnel_datagen::{logging, FunnelPipeline, GenerationConfig, Product, Store, User};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;

const PLATFORMS: [&str; 3] = ["京东", "天猫", "抖音"];
const VEHICLE_SUBCATS: [&str; 3] = ["山地车", "公路车", "折叠车"];
const GEAR_SUBCATS: [&str; 3] = ["头盔", "骑行服", "码表"];

/// 演示用目录: 每店一半整车一半装备,分层/利润率走指派器
fn build_demo_catalog(
    store_count: u32,
    products_per_store: u32,
    rng: &mut StdRng,
) -> (Vec<Store>, Vec<Product>, Vec<User>) {
    let mut stores = Vec::new();
    let mut products = Vec::new();
    let mut sku_seq = 1u64;
    let mut product_seq = 1u64;

    for s in 1..=store_count {
        let store_id = format!("S{:03}", s);
        let store_type = if s % 2 == 0 { "白牌" } else { "品牌" };
        let platform = PLATFORMS[(s as usize - 1) % PLATFORMS.len()];
        stores.push(Store {
            store_id: store_id.clone(),
            store_type: store_type.to_string(),
            platform: platform.to_string(),
        });

        for p in 0..products_per_store {
            let is_vehicle = p % 2 == 0;
            let (category_l1, category_l2, price_range): (String, _, (f64, f64)) = if is_vehicle {
                let l1 = format!("整车-{}", store_type);
                let l2 = VEHICLE_SUBCATS[p as usize % VEHICLE_SUBCATS.len()];
                let range = if store_type == "品牌" {
                    (800.0, 3000.0)
                } else {
                    (200.0, 800.0)
                };
                (l1, l2, range)
            } else {
                let l2 = GEAR_SUBCATS[p as usize % GEAR_SUBCATS.len()];
                ("骑行装备".to_string(), l2, (30.0, 300.0))
            };

            let tier = CatalogTierAssigner::assign_tier(rng);
            let category_type = if is_vehicle {
                category_l1.clone()
            } else {
                format!("骑行装备-{}", store_type)
            };
            let cost_rate = CatalogTierAssigner::cost_rate(rng, tier, &category_type);
            let price: f64 = (rng.gen_range(price_range.0..price_range.1) * 100.0).round() / 100.0;

            products.push(Product {
                sku_id: format!("SK{:08}", sku_seq),
                product_id: format!("P{:08}", product_seq),
                store_id: store_id.clone(),
                platform: platform.to_string(),
                category_l1,
                category_l2: category_l2.to_string(),
                tier,
                price,
                cost: (price * cost_rate * 100.0).round() / 100.0,
            });
            sku_seq += 1;
            product_seq += 1;
        }
    }

    let users = (1..=2000u32)
        .map(|u| User {
            user_id: format!("U{:06}", u),
        })
        .collect();

    (stores, products, users)
}

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let scale_name = args.next().unwrap_or_else(|| "小型企业".to_string());
    let store_count: u32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(6);
    let days: u32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(30);

    let config = GenerationConfig {
        scale_name,
        store_count,
        time_span_days: days,
        ..Default::default()
    };

    let mut rng = StdRng::seed_from_u64(config.seed);
    let (stores, products, users) = build_demo_catalog(store_count, 40, &mut rng);

    let pipeline = FunnelPipeline::new(config)?;
    let end_date = Local::now().date_naive();
    let result = pipeline.run(&products, &stores, &users, end_date)?;

    println!("==================================================");
    println!("运行ID: {}", result.run_id);
    println!("流量事件: {} 条", result.traffic.len());
    println!("  曝光 {} / 点击 {}", result.traffic_stats.total_impressions, result.traffic_stats.total_clicks);
    println!("  推广费 {:.2} 元", result.traffic_stats.promotion_cost);
    println!("目标订单: {} / 实际生成: {}", result.target_order_count, result.orders.len());
    println!(
        "跳过: 缺失商品 {} / 零权重组 {}",
        result.conversion_stats.skipped_missing_product,
        result.conversion_stats.skipped_zero_weight_groups
    );

    // 入库前的一致性自检: 生成输出与交接快照 (模拟ODS装载) 必须一致
    let generation = LayerMetrics::from_generation("生成", &result.orders, &result.details, &result.traffic);
    let mut ods = generation.clone();
    ods.layer = "ODS".to_string();

    let report = ConsistencyVerifier::new().verify_chain(&[generation, ods]);
    println!("==================================================");
    print!("{}", report);
    println!("一致性校验: {}", if report.passed() { "全部通过" } else { "存在未通过项" });

    Ok(())
}

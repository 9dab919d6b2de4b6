// ==========================================
// 电商数据生成系统 - 流量分发引擎
// ==========================================
// 依据: Datagen_Design_v1.0.md - 流量仿真
// 职责: 为每个 (商品,日) 生成自然流量,按概率生成付费流量
// 输入: 商品目录 + 日期序列 + 流量基数
// 输出: TrafficEvent 列表 (跨批次直接拼接,事件自描述)
// ==========================================

use crate::config::business::tier_profile;
use crate::config::generation::{GenerationConfig, TrafficCalibration};
use crate::config::platform::{paid_channels_for, NATURAL_CHANNELS};
use crate::domain::catalog::Product;
use crate::domain::traffic::{format_traffic_id, TrafficEvent};
use crate::domain::types::{Tier, TrafficType};
use crate::engine::batch::{
    derive_worker_seed, product_batch_size, IdCursor, IdRange, IdReservation,
    MAX_EVENTS_PER_PRODUCT_DAY, MIN_PRODUCTS_FOR_PARALLEL,
};
use crate::error::GenResult;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info};

use super::round2;

// ==========================================
// TrafficStats - 流量汇总指标
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct TrafficStats {
    pub natural_events: u64,
    pub paid_events: u64,
    pub total_impressions: u64,
    pub total_clicks: u64,
    pub promotion_cost: f64,
}

impl TrafficStats {
    pub fn from_events(events: &[TrafficEvent]) -> Self {
        let mut stats = Self::default();
        for e in events {
            match e.traffic_type {
                TrafficType::Natural => stats.natural_events += 1,
                TrafficType::Paid => stats.paid_events += 1,
            }
            stats.total_impressions += e.impressions as u64;
            stats.total_clicks += e.clicks as u64;
            stats.promotion_cost += e.promotion_cost;
        }
        stats
    }
}

// ==========================================
// TrafficDistributor - 流量分发器
// ==========================================
pub struct TrafficDistributor {
    parallel: bool,
    workers: usize,
    seed: u64,
    calibration: TrafficCalibration,
}

impl TrafficDistributor {
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            parallel: config.parallel,
            workers: config.effective_workers(),
            seed: config.seed,
            calibration: config.calibration.clone(),
        }
    }

    // ==========================================
    // 核心入口
    // ==========================================

    /// 为所有商品分配流量 (自然 + 付费)
    ///
    /// 商品数不足并行阈值时自动退化为单线程
    pub fn distribute(
        &self,
        products: &[Product],
        days: &[NaiveDate],
        traffic_base: u64,
    ) -> GenResult<Vec<TrafficEvent>> {
        if !self.parallel || products.len() < MIN_PRODUCTS_FOR_PARALLEL {
            return self.distribute_single(products, days, traffic_base);
        }
        self.distribute_multi(products, days, traffic_base)
    }

    /// 单线程模式: 整个目录视作 0 号批次
    fn distribute_single(
        &self,
        products: &[Product],
        days: &[NaiveDate],
        traffic_base: u64,
    ) -> GenResult<Vec<TrafficEvent>> {
        let mut reservation = IdReservation::new(1);
        let range = reservation.reserve(
            products.len() as u64 * days.len() as u64,
            MAX_EVENTS_PER_PRODUCT_DAY,
        );

        let events = Self::generate_batch(
            products,
            days,
            traffic_base,
            &self.calibration,
            0,
            range,
            self.seed,
        )?;

        info!(events = events.len(), "流量生成完成 (单线程)");
        Ok(events)
    }

    /// 多线程模式: 按商品连续分批,批间ID区间预先预留
    fn distribute_multi(
        &self,
        products: &[Product],
        days: &[NaiveDate],
        traffic_base: u64,
    ) -> GenResult<Vec<TrafficEvent>> {
        let batch_size = product_batch_size(products.len(), self.workers);
        let mut reservation = IdReservation::new(1);

        let batches: Vec<(usize, &[Product], IdRange, u64)> = products
            .chunks(batch_size)
            .enumerate()
            .map(|(batch_id, chunk)| {
                let range = reservation.reserve(
                    chunk.len() as u64 * days.len() as u64,
                    MAX_EVENTS_PER_PRODUCT_DAY,
                );
                let seed = derive_worker_seed(self.seed, batch_id);
                debug!(batch_id, worker_seed = seed, id_start = range.start, "流量批次种子派生");
                (batch_id, chunk, range, seed)
            })
            .collect();

        info!(
            workers = self.workers,
            batches = batches.len(),
            batch_size,
            "流量分发启动 (多线程)"
        );

        let started = Instant::now();
        let completed = AtomicUsize::new(0);
        let total = batches.len();

        let per_batch: Vec<Vec<TrafficEvent>> = batches
            .into_par_iter()
            .map(|(batch_id, chunk, range, seed)| {
                let events = Self::generate_batch(
                    chunk,
                    days,
                    traffic_base,
                    &self.calibration,
                    batch_id,
                    range,
                    seed,
                )?;

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                info!(
                    progress_pct = done * 100 / total,
                    batch_id,
                    batch_events = events.len(),
                    elapsed_s = started.elapsed().as_secs_f64(),
                    "流量批次完成"
                );
                Ok(events)
            })
            .collect::<GenResult<Vec<_>>>()?;

        // 合并即拼接: 事件自带 日期/店铺/商品/渠道 维度键,批间顺序无意义
        let events: Vec<TrafficEvent> = per_batch.into_iter().flatten().collect();

        info!(
            events = events.len(),
            elapsed_s = started.elapsed().as_secs_f64(),
            "流量生成完成 (多线程)"
        );
        Ok(events)
    }

    // ==========================================
    // 批内生成 (纯函数,工作线程执行)
    // ==========================================

    fn generate_batch(
        products: &[Product],
        days: &[NaiveDate],
        traffic_base: u64,
        calibration: &TrafficCalibration,
        batch_id: usize,
        id_range: IdRange,
        worker_seed: u64,
    ) -> GenResult<Vec<TrafficEvent>> {
        let mut rng = StdRng::seed_from_u64(worker_seed);
        let mut cursor = IdCursor::new(batch_id, id_range);
        let mut events = Vec::new();

        for product in products {
            let weight = tier_profile(product.tier).traffic_weight;

            for &date in days {
                // 自然流量: 每天必有
                Self::push_natural_events(
                    product,
                    date,
                    weight,
                    traffic_base,
                    calibration,
                    &mut rng,
                    &mut cursor,
                    &mut events,
                )?;

                // 付费流量: 主推新品/引流品高概率投放,其余低概率
                let paid_prob = match product.tier {
                    Tier::PromotedNew | Tier::LossLeader => calibration.paid_prob_hot,
                    _ => calibration.paid_prob_default,
                };
                if rng.gen::<f64>() < paid_prob {
                    let event = Self::build_paid_event(
                        product,
                        date,
                        weight,
                        traffic_base,
                        calibration,
                        &mut rng,
                        &mut cursor,
                    )?;
                    events.push(event);
                }
            }
        }

        debug!(batch_id, ids_used = cursor.used(), "流量批次ID消耗");
        Ok(events)
    }

    /// 生成自然流量: 基础曝光按类目取区间,拆分到 1-2 个自然渠道
    #[allow(clippy::too_many_arguments)]
    fn push_natural_events(
        product: &Product,
        date: NaiveDate,
        weight: f64,
        traffic_base: u64,
        calibration: &TrafficCalibration,
        rng: &mut StdRng,
        cursor: &mut IdCursor,
        out: &mut Vec<TrafficEvent>,
    ) -> GenResult<()> {
        let base_factor = traffic_base as f64 / 1000.0;
        let (lo, hi) = if product.is_vehicle() {
            calibration.natural_impressions_vehicle
        } else {
            calibration.natural_impressions_accessory
        };
        let base_impressions = (rng.gen_range(lo..hi) * weight * base_factor) as u32;

        let num_channels = rng.gen_range(1..=2usize);
        let selected: Vec<&&str> = NATURAL_CHANNELS
            .choose_multiple(rng, num_channels)
            .collect();

        for channel in selected {
            let impressions = base_impressions / num_channels as u32;
            let (ctr_lo, ctr_hi) = calibration.natural_ctr;
            let ctr = rng.gen_range(ctr_lo..ctr_hi);
            let clicks = (impressions as f64 * ctr) as u32;

            out.push(TrafficEvent {
                traffic_id: format_traffic_id(cursor.take()?),
                date,
                store_id: product.store_id.clone(),
                platform: product.platform.clone(),
                sku_id: product.sku_id.clone(),
                product_id: product.product_id.clone(),
                category_l1: product.category_l1.clone(),
                category_l2: product.category_l2.clone(),
                tier: product.tier,
                traffic_type: TrafficType::Natural,
                channel: channel.to_string(),
                impressions,
                clicks,
                ctr: round2(ctr * 100.0),
                promotion_cost: 0.0,
                cpc: 0.0,
            });
        }
        Ok(())
    }

    /// 生成付费流量: 渠道取自平台付费渠道表,CPC/曝光按类目标定
    #[allow(clippy::too_many_arguments)]
    fn build_paid_event(
        product: &Product,
        date: NaiveDate,
        weight: f64,
        traffic_base: u64,
        calibration: &TrafficCalibration,
        rng: &mut StdRng,
        cursor: &mut IdCursor,
    ) -> GenResult<TrafficEvent> {
        let channels = paid_channels_for(&product.platform);
        let channel = channels
            .choose(rng)
            .copied()
            .unwrap_or(crate::config::platform::FALLBACK_PAID_CHANNEL);

        let base_factor = traffic_base as f64 / 1000.0;
        let (lo, hi) = if product.is_vehicle() {
            calibration.paid_impressions_vehicle
        } else {
            calibration.paid_impressions_accessory
        };
        let impressions = (rng.gen_range(lo..hi) * weight * base_factor) as u32;

        let (ctr_lo, ctr_hi) = calibration.paid_ctr;
        let ctr = rng.gen_range(ctr_lo..ctr_hi);
        let clicks = (impressions as f64 * ctr) as u32;

        let (cpc_lo, cpc_hi) = if product.is_vehicle() {
            calibration.cpc_vehicle
        } else {
            calibration.cpc_accessory
        };
        let cpc = rng.gen_range(cpc_lo..cpc_hi);
        let cost = round2(clicks as f64 * cpc).max(calibration.min_paid_budget);

        Ok(TrafficEvent {
            traffic_id: format_traffic_id(cursor.take()?),
            date,
            store_id: product.store_id.clone(),
            platform: product.platform.clone(),
            sku_id: product.sku_id.clone(),
            product_id: product.product_id.clone(),
            category_l1: product.category_l1.clone(),
            category_l2: product.category_l2.clone(),
            tier: product.tier,
            traffic_type: TrafficType::Paid,
            channel: channel.to_string(),
            impressions,
            clicks,
            ctr: round2(ctr * 100.0),
            promotion_cost: cost,
            cpc: round2(cpc),
        })
    }
}

// ==========================================
// 电商数据生成系统 - 转化引擎
// ==========================================
// 依据: Datagen_Design_v1.0.md - 流量转订单
// 职责: 按日聚合流量 → 转化权重 → 配额分配 → 订单落料
// 输入: TrafficEvent 列表 + 商品索引 + 用户池 + 目标订单总数
// 输出: Order / OrderDetail 列表 + 转化统计
// 红线: 缺失商品引用与零权重组以计数器暴露,绝不静默丢弃
// ==========================================

use crate::config::business::{shipping_fee_per_unit, tier_profile};
use crate::config::generation::GenerationConfig;
use crate::domain::catalog::{build_product_index, Product, User};
use crate::domain::order::{format_detail_id, format_order_id, Order, OrderDetail};
use crate::domain::traffic::TrafficEvent;
use crate::domain::types::{OrderStatus, PaymentMethod, Tier, TrafficSource, TrafficType};
use crate::engine::batch::{
    day_batch_size, derive_worker_seed, IdCursor, IdRange, IdReservation, MAX_ORDER_LINES,
    MIN_DAYS_FOR_PARALLEL,
};
use crate::error::{GenError, GenResult};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info};

use super::round2;

// ==========================================
// SkipReason - 可跳过的数据问题
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingProduct, // (sku_id, store_id) 不在商品索引中
    ZeroWeight,     // 聚合组点击×转化率为零
}

// ==========================================
// ConversionStats - 转化统计
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionStats {
    pub orders: u64,
    pub details: u64,
    pub skipped_missing_product: u64,  // 缺失商品引用而放弃的订单单元数
    pub skipped_zero_weight_groups: u64, // 零权重聚合组数
}

impl ConversionStats {
    pub fn merge(&mut self, other: &ConversionStats) {
        self.orders += other.orders;
        self.details += other.details;
        self.skipped_missing_product += other.skipped_missing_product;
        self.skipped_zero_weight_groups += other.skipped_zero_weight_groups;
    }
}

// ==========================================
// DailyGroup - 日级 (SKU,店铺) 聚合
// ==========================================
#[derive(Debug, Clone)]
pub struct DailyGroup {
    pub sku_id: String,
    pub store_id: String,
    pub product_id: String,
    pub platform: String,
    pub tier: Tier,
    pub clicks: u64,
    pub has_paid: bool, // 当日任一付费事件命中即为真
}

/// 按 (sku_id, store_id) 聚合一天的流量
///
/// 点击求和;平台/商品ID/分层取首见值;键序稳定 (BTreeMap)
pub fn group_daily_traffic(events: &[&TrafficEvent]) -> Vec<DailyGroup> {
    let mut groups: BTreeMap<(String, String), DailyGroup> = BTreeMap::new();

    for event in events {
        let key = (event.sku_id.clone(), event.store_id.clone());
        let entry = groups.entry(key).or_insert_with(|| DailyGroup {
            sku_id: event.sku_id.clone(),
            store_id: event.store_id.clone(),
            product_id: event.product_id.clone(),
            platform: event.platform.clone(),
            tier: event.tier,
            clicks: 0,
            has_paid: false,
        });
        entry.clicks += event.clicks as u64;
        entry.has_paid |= event.traffic_type == TrafficType::Paid;
    }

    groups.into_values().collect()
}

/// 按日期切分流量 (日期升序)
pub fn traffic_by_day(traffic: &[TrafficEvent]) -> BTreeMap<NaiveDate, Vec<&TrafficEvent>> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&TrafficEvent>> = BTreeMap::new();
    for event in traffic {
        by_day.entry(event.date).or_default().push(event);
    }
    by_day
}

// ==========================================
// WeightedGroup - 带转化权重的聚合组
// ==========================================
#[derive(Debug, Clone)]
pub struct WeightedGroup {
    pub group: DailyGroup,
    pub traffic_source: TrafficSource,
    pub weight: f64, // 点击量 × 抽样转化率
    pub alloc: u64,  // 分得的当日订单配额
}

/// 计算各组转化权重: cvr ~ uniform(分层转化率区间), weight = clicks × cvr
///
/// 返回 (正权重组列表, 零权重组数)
pub fn compute_weights(groups: Vec<DailyGroup>, rng: &mut StdRng) -> (Vec<WeightedGroup>, u64) {
    let mut weighted = Vec::with_capacity(groups.len());
    let mut zero_weight = 0u64;

    for group in groups {
        let (cvr_lo, cvr_hi) = tier_profile(group.tier).conversion_rate;
        let cvr = rng.gen_range(cvr_lo..cvr_hi);
        let weight = group.clicks as f64 * cvr;

        if weight > 0.0 {
            let traffic_source = if group.has_paid {
                TrafficSource::Paid
            } else {
                *[
                    TrafficSource::Search,
                    TrafficSource::Recommendation,
                    TrafficSource::Direct,
                ]
                .choose(rng)
                .expect("自然来源列表非空")
            };
            weighted.push(WeightedGroup {
                group,
                traffic_source,
                weight,
                alloc: 0,
            });
        } else {
            zero_weight += 1;
        }
    }

    (weighted, zero_weight)
}

/// 按权重比例分配当日订单配额
///
/// 整数部分按 floor(配额 × w/Σw);余数逐单随机指派给任一正权重组
/// (对每一单均匀随机指派,非最大余数法)
pub fn allocate_quota(weighted: &mut [WeightedGroup], orders_per_day: u64, rng: &mut StdRng) {
    if weighted.is_empty() {
        return;
    }
    let total_weight: f64 = weighted.iter().map(|w| w.weight).sum();
    if total_weight <= 0.0 {
        return;
    }

    for conv in weighted.iter_mut() {
        conv.alloc = (orders_per_day as f64 * conv.weight / total_weight) as u64;
    }

    let assigned: u64 = weighted.iter().map(|w| w.alloc).sum();
    if assigned < orders_per_day {
        let shortage = orders_per_day - assigned;
        for _ in 0..shortage {
            let idx = rng.gen_range(0..weighted.len());
            weighted[idx].alloc += 1;
        }
    }
}

// ==========================================
// ConversionEngine - 转化引擎
// ==========================================
pub struct ConversionEngine {
    product_index: HashMap<(String, String), Product>,
    users: Vec<User>,
    parallel: bool,
    workers: usize,
    seed: u64,
    min_orders_per_batch: u64,
    max_orders_per_batch: u64,
}

/// 单批目标订单量包络 (天批尺寸钳制用)
pub const DEFAULT_MIN_ORDERS_PER_BATCH: u64 = 5_000;
pub const DEFAULT_MAX_ORDERS_PER_BATCH: u64 = 50_000;

impl ConversionEngine {
    pub fn new(config: &GenerationConfig, products: &[Product], users: &[User]) -> GenResult<Self> {
        if products.is_empty() {
            return Err(GenError::EmptyCatalog);
        }
        if users.is_empty() {
            return Err(GenError::EmptyUserPool);
        }

        Ok(Self {
            product_index: build_product_index(products),
            users: users.to_vec(),
            parallel: config.parallel,
            workers: config.effective_workers(),
            seed: config.seed,
            min_orders_per_batch: DEFAULT_MIN_ORDERS_PER_BATCH,
            max_orders_per_batch: DEFAULT_MAX_ORDERS_PER_BATCH,
        })
    }

    /// 覆写单批订单量包络 (压测/小批次场景)
    pub fn with_batch_envelope(mut self, min_orders: u64, max_orders: u64) -> Self {
        self.min_orders_per_batch = min_orders.max(1);
        self.max_orders_per_batch = max_orders.max(self.min_orders_per_batch);
        self
    }

    // ==========================================
    // 核心入口
    // ==========================================

    /// 从流量数据生成订单
    ///
    /// 天数不足并行阈值时自动退化为单线程
    pub fn generate_orders_from_traffic(
        &self,
        traffic: &[TrafficEvent],
        target_order_count: u64,
    ) -> GenResult<(Vec<Order>, Vec<OrderDetail>, ConversionStats)> {
        let by_day = traffic_by_day(traffic);
        if by_day.is_empty() {
            return Err(GenError::EmptyTraffic);
        }

        let total_days = by_day.len();
        let orders_per_day = (target_order_count / total_days as u64).max(1);
        let day_list: Vec<(NaiveDate, Vec<&TrafficEvent>)> = by_day.into_iter().collect();

        if !self.parallel || total_days < MIN_DAYS_FOR_PARALLEL {
            return self.generate_single(&day_list, orders_per_day);
        }
        self.generate_multi(&day_list, orders_per_day)
    }

    /// 单线程模式: 全部天数视作 0 号批次
    fn generate_single(
        &self,
        day_list: &[(NaiveDate, Vec<&TrafficEvent>)],
        orders_per_day: u64,
    ) -> GenResult<(Vec<Order>, Vec<OrderDetail>, ConversionStats)> {
        let mut order_reservation = IdReservation::new(1);
        let mut detail_reservation = IdReservation::new(1);
        let order_range =
            order_reservation.reserve(day_list.len() as u64, orders_per_day);
        let detail_range =
            detail_reservation.reserve(day_list.len() as u64, orders_per_day * MAX_ORDER_LINES);

        let result = self.generate_day_batch(
            day_list,
            orders_per_day,
            0,
            order_range,
            detail_range,
            self.seed,
        )?;

        info!(
            orders = result.2.orders,
            skipped_missing = result.2.skipped_missing_product,
            "订单生成完成 (单线程)"
        );
        Ok(result)
    }

    /// 多线程模式: 按日期连续分批,批间订单/明细ID区间预先预留
    fn generate_multi(
        &self,
        day_list: &[(NaiveDate, Vec<&TrafficEvent>)],
        orders_per_day: u64,
    ) -> GenResult<(Vec<Order>, Vec<OrderDetail>, ConversionStats)> {
        let batch_days = day_batch_size(
            day_list.len(),
            self.workers,
            orders_per_day,
            self.min_orders_per_batch,
            self.max_orders_per_batch,
        );

        let mut order_reservation = IdReservation::new(1);
        let mut detail_reservation = IdReservation::new(1);

        let batches: Vec<(usize, &[(NaiveDate, Vec<&TrafficEvent>)], IdRange, IdRange, u64)> =
            day_list
                .chunks(batch_days)
                .enumerate()
                .map(|(batch_id, chunk)| {
                    let order_range =
                        order_reservation.reserve(chunk.len() as u64, orders_per_day);
                    let detail_range = detail_reservation
                        .reserve(chunk.len() as u64, orders_per_day * MAX_ORDER_LINES);
                    let seed = derive_worker_seed(self.seed, batch_id);
                    debug!(
                        batch_id,
                        worker_seed = seed,
                        order_id_start = order_range.start,
                        detail_id_start = detail_range.start,
                        "订单批次种子派生"
                    );
                    (batch_id, chunk, order_range, detail_range, seed)
                })
                .collect();

        info!(
            workers = self.workers,
            batches = batches.len(),
            batch_days,
            orders_per_day,
            "订单生成启动 (多线程)"
        );

        let started = Instant::now();
        let completed = AtomicUsize::new(0);
        let total = batches.len();

        let per_batch: Vec<(Vec<Order>, Vec<OrderDetail>, ConversionStats)> = batches
            .into_par_iter()
            .map(|(batch_id, chunk, order_range, detail_range, seed)| {
                let result = self.generate_day_batch(
                    chunk,
                    orders_per_day,
                    batch_id,
                    order_range,
                    detail_range,
                    seed,
                )?;

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                info!(
                    progress_pct = done * 100 / total,
                    batch_id,
                    batch_orders = result.2.orders,
                    elapsed_s = started.elapsed().as_secs_f64(),
                    "订单批次完成"
                );
                Ok(result)
            })
            .collect::<GenResult<Vec<_>>>()?;

        let mut orders = Vec::new();
        let mut details = Vec::new();
        let mut stats = ConversionStats::default();
        for (batch_orders, batch_details, batch_stats) in per_batch {
            orders.extend(batch_orders);
            details.extend(batch_details);
            stats.merge(&batch_stats);
        }

        info!(
            orders = stats.orders,
            skipped_missing = stats.skipped_missing_product,
            elapsed_s = started.elapsed().as_secs_f64(),
            "订单生成完成 (多线程)"
        );
        Ok((orders, details, stats))
    }

    // ==========================================
    // 批内生成 (纯函数,工作线程执行)
    // ==========================================

    fn generate_day_batch(
        &self,
        days: &[(NaiveDate, Vec<&TrafficEvent>)],
        orders_per_day: u64,
        batch_id: usize,
        order_range: IdRange,
        detail_range: IdRange,
        worker_seed: u64,
    ) -> GenResult<(Vec<Order>, Vec<OrderDetail>, ConversionStats)> {
        let mut rng = StdRng::seed_from_u64(worker_seed);
        let mut order_cursor = IdCursor::new(batch_id, order_range);
        let mut detail_cursor = IdCursor::new(batch_id, detail_range);

        let mut orders = Vec::new();
        let mut details = Vec::new();
        let mut stats = ConversionStats::default();

        for (date, events) in days {
            let groups = group_daily_traffic(events);
            let (mut weighted, zero_weight) = compute_weights(groups, &mut rng);
            stats.skipped_zero_weight_groups += zero_weight;

            allocate_quota(&mut weighted, orders_per_day, &mut rng);

            // 落料: 严格控制当日数量,达到配额立即短路
            let mut daily_count = 0u64;
            'groups: for conv in &weighted {
                for _ in 0..conv.alloc {
                    if daily_count >= orders_per_day {
                        break 'groups;
                    }
                    match self.build_order(conv, *date, &mut order_cursor, &mut detail_cursor, &mut rng)? {
                        Ok((order, order_details)) => {
                            stats.orders += 1;
                            stats.details += order_details.len() as u64;
                            orders.push(order);
                            details.extend(order_details);
                            daily_count += 1;
                        }
                        Err(reason) => {
                            // 跳过不计入当日配额,但必须可观测
                            match reason {
                                SkipReason::MissingProduct => {
                                    stats.skipped_missing_product += 1;
                                    debug!(
                                        sku_id = %conv.group.sku_id,
                                        store_id = %conv.group.store_id,
                                        "商品引用缺失,跳过订单"
                                    );
                                }
                                SkipReason::ZeroWeight => {
                                    stats.skipped_zero_weight_groups += 1;
                                }
                            }
                        }
                    }
                }
            }
        }

        debug!(
            batch_id,
            order_ids_used = order_cursor.used(),
            detail_ids_used = detail_cursor.used(),
            "订单批次ID消耗"
        );
        Ok((orders, details, stats))
    }

    /// 创建单个订单
    ///
    /// 外层 GenResult 承载ID空间错误;内层 Result 是类型化的跳过结果
    fn build_order(
        &self,
        conv: &WeightedGroup,
        date: NaiveDate,
        order_cursor: &mut IdCursor,
        detail_cursor: &mut IdCursor,
        rng: &mut StdRng,
    ) -> GenResult<Result<(Order, Vec<OrderDetail>), SkipReason>> {
        let key = (conv.group.sku_id.clone(), conv.group.store_id.clone());
        let product = match self.product_index.get(&key) {
            Some(p) => p,
            None => return Ok(Err(SkipReason::MissingProduct)),
        };

        let user = self.users.as_slice().choose(rng).expect("用户池非空");

        let status = pick_weighted(
            rng,
            &[
                (OrderStatus::Completed, 0.92),
                (OrderStatus::Cancelled, 0.06),
                (OrderStatus::Refunded, 0.02),
            ],
        );
        let payment_method = pick_weighted(
            rng,
            &[
                (PaymentMethod::Alipay, 0.50),
                (PaymentMethod::Wechat, 0.40),
                (PaymentMethod::BankCard, 0.10),
            ],
        );

        let order_time: NaiveDateTime = date
            .and_hms_opt(rng.gen_range(0..24), rng.gen_range(0..60), 0)
            .expect("时分在合法区间");

        let quantity = rng.gen_range(1..=3u32);
        let amount = round2(product.price * quantity as f64);
        let cost_amount = round2(product.cost * quantity as f64);
        let shipping_fee = shipping_fee_per_unit(&product.category_l1) * quantity as f64;

        let order_id = format_order_id(order_cursor.take()?);
        let detail = OrderDetail {
            order_detail_id: format_detail_id(detail_cursor.take()?),
            order_id: order_id.clone(),
            sku_id: product.sku_id.clone(),
            product_id: product.product_id.clone(),
            quantity,
            price: product.price,
            amount,
        };

        let order = Order {
            order_id,
            user_id: user.user_id.clone(),
            store_id: conv.group.store_id.clone(),
            platform: conv.group.platform.clone(),
            order_time,
            status,
            payment_method,
            traffic_source: conv.traffic_source,
            total_amount: amount,
            discount_amount: 0.0,
            shipping_fee,
            final_amount: if status.is_completed() { amount } else { 0.0 },
            total_cost: if status.is_completed() { cost_amount } else { 0.0 },
            created_at: order_time,
            updated_at: order_time + Duration::days(rng.gen_range(0..=7)),
        };

        Ok(Ok((order, vec![detail])))
    }
}

/// 按权重抽取 (累计概率走查,权重和应为 1.0 量级)
fn pick_weighted<T: Copy>(rng: &mut StdRng, choices: &[(T, f64)]) -> T {
    let total: f64 = choices.iter().map(|(_, w)| w).sum();
    let draw = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (value, weight) in choices {
        cumulative += weight;
        if draw < cumulative {
            return *value;
        }
    }
    choices.last().expect("选项列表非空").0
}

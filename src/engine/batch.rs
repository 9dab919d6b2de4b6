// ==========================================
// 电商数据生成系统 - 批次与ID空间分配
// ==========================================
// 依据: Datagen_Design_v1.0.md - 并行批次划分
// 职责: 批次尺寸计算、ID区间预留、越界检查、工作种子派生
// 红线: 区间在分发前一次性预留,工作批次之间互不链接;
//       消耗越过预留上限必须显式报错,不允许静默重叠
// ==========================================

use crate::error::{GenError, GenResult};

/// 每个预留区间附加的安全余量
pub const ID_SAFETY_MARGIN: u64 = 100;

/// 单个 (商品,日) 最多产出的流量记录数: ≤2 个自然渠道 + ≤1 次付费投放
pub const MAX_EVENTS_PER_PRODUCT_DAY: u64 = 3;

/// 单笔订单的明细行上限 (当前生成固定 1 行,保留常量便于扩展预留)
pub const MAX_ORDER_LINES: u64 = 1;

/// 商品数低于此阈值时退化为单线程
pub const MIN_PRODUCTS_FOR_PARALLEL: usize = 100;

/// 天数低于此阈值时退化为单线程
pub const MIN_DAYS_FOR_PARALLEL: usize = 30;

// ==========================================
// IdRange - 预留的半开ID区间 [start, end)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdRange {
    pub start: u64,
    pub end: u64,
}

impl IdRange {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// ==========================================
// IdReservation - 顺序预留器 (调度方持有)
// ==========================================
// start(i) = start(i-1) + reserved(i-1);工作批次返回的游标不参与链接
#[derive(Debug)]
pub struct IdReservation {
    next_start: u64,
}

impl IdReservation {
    /// 从指定起始ID开始预留 (通常为 1)
    pub fn new(first_id: u64) -> Self {
        Self {
            next_start: first_id,
        }
    }

    /// 为一个批次预留区间
    ///
    /// 预留量 = 批内条目数 × 单条目记录数上界 + 安全余量
    pub fn reserve(&mut self, item_count: u64, per_item_upper_bound: u64) -> IdRange {
        let reserved = item_count * per_item_upper_bound + ID_SAFETY_MARGIN;
        let range = IdRange {
            start: self.next_start,
            end: self.next_start + reserved,
        };
        self.next_start = range.end;
        range
    }

    /// 已预留空间的高水位 (下一个未分配ID)
    pub fn high_water(&self) -> u64 {
        self.next_start
    }
}

// ==========================================
// IdCursor - 批内顺序消费游标 (工作批次持有)
// ==========================================
#[derive(Debug)]
pub struct IdCursor {
    batch_id: usize,
    start: u64,
    next: u64,
    end: u64,
}

impl IdCursor {
    pub fn new(batch_id: usize, range: IdRange) -> Self {
        Self {
            batch_id,
            start: range.start,
            next: range.start,
            end: range.end,
        }
    }

    /// 取下一个ID;越过预留上限立即报错
    pub fn take(&mut self) -> GenResult<u64> {
        if self.next >= self.end {
            return Err(GenError::IdSpaceExceeded {
                batch_id: self.batch_id,
                cursor: self.next,
                reserved_end: self.end,
            });
        }
        let id = self.next;
        self.next += 1;
        Ok(id)
    }

    /// 批内已消耗的ID数
    pub fn used(&self) -> u64 {
        self.next - self.start
    }
}

// ==========================================
// 批次尺寸计算
// ==========================================

/// 流量批次: 每批商品数 = max(10, 商品总数/线程数)
pub fn product_batch_size(product_count: usize, workers: usize) -> usize {
    (product_count / workers.max(1)).max(10)
}

/// 订单批次: 每批天数由线程数推得,再钳制到单批订单量包络
///
/// # 参数
/// - min_orders / max_orders: 单批目标订单量下限/上限
pub fn day_batch_size(
    total_days: usize,
    workers: usize,
    orders_per_day: u64,
    min_orders: u64,
    max_orders: u64,
) -> usize {
    let by_workers = (total_days / workers.max(1)).max(1);
    let opd = orders_per_day.max(1);
    let floor_days = ((min_orders + opd - 1) / opd).max(1) as usize;
    let ceil_days = (max_orders / opd).max(1) as usize;
    by_workers.clamp(floor_days.min(ceil_days), ceil_days)
}

// ==========================================
// 工作种子派生 (splitmix64)
// ==========================================
// 同一运行种子 + 同一批次号 → 相同工作种子;派生值写入日志便于复现
pub fn derive_worker_seed(seed: u64, batch_id: usize) -> u64 {
    let mut z = seed.wrapping_add((batch_id as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

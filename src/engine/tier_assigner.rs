// ==========================================
// 电商数据生成系统 - 商品分层指派
// ==========================================
// 职责: 分层抽样 (逆CDF) + 分层利润率 (含类别加成与全局上限)
// 红线: 随机性一律来自注入的 RNG 实例,便于复现与测试
// ==========================================

use crate::config::business::{
    category_profit_bonus, tier_profile, PROFIT_MARGIN_CEILING, TIER_ORDER,
};
use crate::domain::types::Tier;
use rand::rngs::StdRng;
use rand::Rng;

// ==========================================
// CatalogTierAssigner - 分层指派器
// ==========================================
pub struct CatalogTierAssigner;

impl CatalogTierAssigner {
    /// 按占比抽取商品分层
    pub fn assign_tier(rng: &mut StdRng) -> Tier {
        Self::tier_from_draw(rng.gen::<f64>())
    }

    /// 逆CDF抽样: 按固定顺序累加占比,返回首个累计值超过抽样值的分层
    ///
    /// 浮点误差兜底: 累计不足 1.0 时回落畅销品
    pub fn tier_from_draw(draw: f64) -> Tier {
        let mut cumulative = 0.0;
        for tier in TIER_ORDER {
            cumulative += tier_profile(tier).ratio;
            if draw < cumulative {
                return tier;
            }
        }
        Tier::Bestseller
    }

    /// 抽取利润率: uniform(分层区间) + 类别加成, 钳制到全局上限
    pub fn profit_margin(rng: &mut StdRng, tier: Tier, category_type: &str) -> f64 {
        let (lo, hi) = tier_profile(tier).profit_margin;
        let base = rng.gen_range(lo..hi);
        let margin = base + category_profit_bonus(category_type);
        margin.min(PROFIT_MARGIN_CEILING)
    }

    /// 成本率 = 1 - 利润率
    pub fn cost_rate(rng: &mut StdRng, tier: Tier, category_type: &str) -> f64 {
        1.0 - Self::profit_margin(rng, tier, category_type)
    }
}

// ==========================================
// 电商数据生成系统 - 企业体量配置
// ==========================================
// 职责: 五档企业体量画像,决定流量基数与倍率
// ==========================================

// ==========================================
// ScaleProfile - 企业体量画像
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ScaleProfile {
    pub name: &'static str,                 // 体量名称
    pub description: &'static str,          // 描述
    pub daily_traffic_base: u64,            // 每店每日基础流量
    pub store_count_range: (u32, u32),      // 店铺数量范围
    pub monthly_gmv_range: (u64, u64),      // 月GMV范围 (元)
    pub traffic_multiplier: f64,            // 流量系数
}

/// 未知体量名称的兜底档
pub const DEFAULT_SCALE: &str = "小型企业";

const SCALES: [ScaleProfile; 5] = [
    ScaleProfile {
        name: "微型企业",
        description: "3-5家店铺,月GMV 10-50万",
        daily_traffic_base: 500,
        store_count_range: (3, 5),
        monthly_gmv_range: (100_000, 500_000),
        traffic_multiplier: 0.5,
    },
    ScaleProfile {
        name: "小型企业",
        description: "6-10家店铺,月GMV 50-200万",
        daily_traffic_base: 1_500,
        store_count_range: (6, 10),
        monthly_gmv_range: (500_000, 2_000_000),
        traffic_multiplier: 1.0,
    },
    ScaleProfile {
        name: "中型企业",
        description: "10-20家店铺,月GMV 200-1000万",
        daily_traffic_base: 3_000,
        store_count_range: (10, 20),
        monthly_gmv_range: (2_000_000, 10_000_000),
        traffic_multiplier: 2.0,
    },
    ScaleProfile {
        name: "大型企业",
        description: "20-50家店铺,月GMV 1000-5000万",
        daily_traffic_base: 8_000,
        store_count_range: (20, 50),
        monthly_gmv_range: (10_000_000, 50_000_000),
        traffic_multiplier: 5.0,
    },
    ScaleProfile {
        name: "超大型企业",
        description: "50+家店铺,月GMV 5000万+",
        daily_traffic_base: 20_000,
        store_count_range: (50, 100),
        monthly_gmv_range: (50_000_000, 200_000_000),
        traffic_multiplier: 10.0,
    },
];

/// 按名称取体量画像;未知名称回落到小型企业
pub fn scale_profile(scale_name: &str) -> ScaleProfile {
    SCALES
        .iter()
        .find(|s| s.name == scale_name)
        .copied()
        .unwrap_or_else(|| {
            SCALES
                .iter()
                .find(|s| s.name == DEFAULT_SCALE)
                .copied()
                .expect("默认体量档必须存在")
        })
}

/// 全部体量画像 (按流量基数升序)
pub fn all_scales() -> &'static [ScaleProfile] {
    &SCALES
}

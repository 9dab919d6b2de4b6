// ==========================================
// 电商数据生成系统 - 平台与渠道配置
// ==========================================
// 职责: 自然渠道列表、各平台付费渠道列表
// ==========================================

/// 自然流量渠道 (全平台通用)
pub const NATURAL_CHANNELS: [&str; 5] = ["搜索", "推荐", "直接访问", "活动页", "店铺首页"];

/// 付费渠道兜底 (未知平台)
pub const FALLBACK_PAID_CHANNEL: &str = "通用推广";

/// 各平台付费渠道列表
///
/// 未收录平台返回兜底渠道
pub fn paid_channels_for(platform: &str) -> &'static [&'static str] {
    match platform {
        "京东" => &["京东快车", "京东展位", "京准通"],
        "天猫" => &["直通车", "钻展", "超级推荐"],
        "抖音" => &["巨量千川", "抖音小店随心推", "DOU+"],
        "快手" => &["磁力金牛", "快手粉条"],
        "微信" => &["朋友圈广告", "公众号广告"],
        "小红书" => &["信息流广告", "搜索广告", "薯条"],
        "拼多多" => &["多多搜索", "多多场景"],
        _ => &[FALLBACK_PAID_CHANNEL],
    }
}

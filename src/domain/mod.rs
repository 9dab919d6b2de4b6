// ==========================================
// 电商数据生成系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含生成逻辑,不含随机性;实体是引擎间的不可变交接物
// ==========================================

pub mod catalog;
pub mod order;
pub mod traffic;
pub mod types;

// 重导出核心类型
pub use catalog::{build_product_index, Product, Store, User};
pub use order::{format_detail_id, format_order_id, Order, OrderDetail};
pub use traffic::{format_traffic_id, TrafficEvent};
pub use types::{OrderStatus, PaymentMethod, Tier, TrafficSource, TrafficType};

// ==========================================
// 电商数据生成系统 - 统一错误类型
// ==========================================
// 职责: 定义生成管道的错误分类
// 红线: 可跳过的数据问题 (缺失商品引用/零权重) 不在此列,
//       它们以计数器形式暴露,不中断运行
// ==========================================

use thiserror::Error;

/// 生成管道错误类型
#[derive(Error, Debug)]
pub enum GenError {
    // ==========================================
    // 配置与输入错误
    // ==========================================
    #[error("配置无效: {0}")]
    InvalidConfig(String),

    #[error("商品目录为空")]
    EmptyCatalog,

    #[error("用户列表为空")]
    EmptyUserPool,

    #[error("流量数据为空,无法生成订单")]
    EmptyTraffic,

    // ==========================================
    // ID 空间预留错误
    // ==========================================
    /// 批次实际消耗超出预留区间 (预留不足属于正确性风险,必须显式失败)
    #[error("ID空间超限: batch={batch_id}, 游标={cursor}, 预留上限={reserved_end}")]
    IdSpaceExceeded {
        batch_id: usize,
        cursor: u64,
        reserved_end: u64,
    },

    // ==========================================
    // 并行执行错误
    // ==========================================
    /// 任一工作批次失败即中止整次运行 (快速失败,无部分结果)
    #[error("工作批次失败: batch={batch_id}: {message}")]
    WorkerFailure { batch_id: usize, message: String },

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type GenResult<T> = Result<T, GenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_space_exceeded_message_carries_context() {
        let err = GenError::IdSpaceExceeded {
            batch_id: 3,
            cursor: 5100,
            reserved_end: 5000,
        };
        let msg = err.to_string();
        assert!(msg.contains("batch=3"));
        assert!(msg.contains("5100"));
        assert!(msg.contains("5000"));
    }
}

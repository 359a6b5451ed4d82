//! 映射层错误类型

use rule_model::ConversionError;
use thiserror::Error;

/// 内存模型 → 在线格式
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("{position} 不支持 {kind} 节点")]
    UnsupportedSlot { position: String, kind: String },

    #[error("操作符 '{call}' 参数个数错误: 期望 {expected}, 实际 {actual}")]
    InvalidArity {
        call: String,
        expected: usize,
        actual: usize,
    },

    #[error("名称占位 '{0}' 只能作为函数参数")]
    UnexpectedRaw(String),

    #[error("JSON 序列化错误: {0}")]
    Json(#[from] serde_json::Error),
}

/// 在线格式 → 内存模型
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("类型转换失败: {0}")]
    Conversion(#[from] ConversionError),

    #[error("{position} 必须恰好填充一个槽位, 实际 {count} 个")]
    InvalidSlots { position: String, count: usize },

    #[error("{position} 必须为 Boolean 类型, 实际 {value_type}")]
    NonBooleanSlot { position: String, value_type: String },

    #[error("操作符 '{0}' 必须使用专用节点表示")]
    ReservedOperator(String),

    #[error("类型 {0} 不支持字符串转换, 应使用 customValue")]
    NotScalar(String),

    #[error("字段引用 '{0}' 缺少路径")]
    EmptyFieldPath(String),

    #[error("规则缺少字符串类型的 ruleName 属性")]
    MissingRuleName,

    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EncodeResult<T> = std::result::Result<T, EncodeError>;
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

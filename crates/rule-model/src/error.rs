//! 模型层错误类型

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("无效的类型名称: {0}")]
    InvalidTypeName(String),

    #[error("类型 {0} 不支持字符串转换")]
    NotApplicable(String),

    #[error("无法将 '{input}' 解析为 {value_type}: {message}")]
    Parse {
        value_type: String,
        input: String,
        message: String,
    },

    #[error("类型不匹配: 期望 {expected}, 实际 {actual}")]
    TypeMismatch { expected: String, actual: String },
}

pub type Result<T> = std::result::Result<T, ConversionError>;

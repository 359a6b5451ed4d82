//! 规则构建错误类型

use rule_model::ConversionError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DslError {
    #[error("规则名称不能为空")]
    MissingRuleName,

    #[error("规则 '{0}' 缺少谓词")]
    MissingPredicate(String),

    #[error("事实重复声明: {0}")]
    DuplicateFact(String),

    #[error("属性重复声明: {0}")]
    DuplicateAttribute(String),

    #[error("名称同时声明为事实和属性: {0}")]
    NameConflict(String),

    #[error("未声明的引用: {0}")]
    UnknownReference(String),

    #[error("字段路径不能为空: {0}")]
    EmptyFieldPath(String),

    #[error("无法解析字段类型: {reference}.{path}")]
    UnresolvedField { reference: String, path: String },

    #[error("引用 '{reference}' 类型冲突: 声明为 {declared}, 指定为 {requested}")]
    ReferenceTypeConflict {
        reference: String,
        declared: String,
        requested: String,
    },

    #[error("谓词类型必须为 Boolean, 实际 {0}")]
    NonBooleanPredicate(String),

    #[error("操作符 '{call}' 参数个数错误: 期望 {expected}, 实际 {actual}")]
    InvalidArity {
        call: String,
        expected: usize,
        actual: usize,
    },

    #[error("逻辑组 '{0}' 不能为空")]
    EmptyGroup(String),

    #[error("{position} 不支持 {kind}")]
    UnsupportedPosition { position: String, kind: String },

    #[error("字面量转换失败: {0}")]
    Conversion(#[from] ConversionError),
}

pub type Result<T> = std::result::Result<T, DslError>;

//! 规则表达式模型
//!
//! 提供规则谓词与动作的内存表示：
//! - 封闭的表达式语法树（值、引用、操作符/函数调用）
//! - 规则聚合（属性、事实、谓词、动作）
//! - 值类型与标量类型转换器

pub mod converter;
pub mod error;
pub mod expression;
pub mod literal;
pub mod rule;
pub mod types;

pub use converter::{DefaultTypeConverter, TypeConverter};
pub use error::{ConversionError, Result};
pub use expression::{
    Expression, FunctionExpr, Invocation, OperatorExpr, RawExpr, ReferenceExpr, ValueExpr,
};
pub use literal::Literal;
pub use rule::{Attribute, Fact, RULE_NAME_ATTRIBUTE, Rule};
pub use types::ValueType;

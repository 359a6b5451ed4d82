//! 规则构建 DSL
//!
//! 提供链式的规则构建会话和表达式工厂函数：
//! - `rule_builder()`：声明名称、事实、属性、谓词、动作并构建 `Rule`
//! - `value` / `values` / `field` / `reference` / `operator` / `function` / `param`
//! - 操作符别名 `and` / `or` / `not` / `equal` / `less` / `less_or_equal` / `matches`
//! - `SchemaRegistry`：字段类型结构注册，用于推断字段引用类型

pub mod builder;
pub mod error;
pub mod operand;
mod resolve;
pub mod schema;

pub use builder::{RuleBuilder, rule_builder};
pub use error::{DslError, Result};
pub use operand::{
    Operand, Parameter, and, equal, field, field_path, function, less, less_or_equal, matches,
    not, operator, or, param, reference, typed_field, typed_reference, typed_value, value, values,
};
pub use resolve::CONTEXT_REFERENCE;
pub use schema::{FactSchema, FieldTypeResolver, SchemaRegistry};

//! 表达式工厂
//!
//! 工厂函数返回未解析的 `Operand`，引用类型、字段类型和字面量规整
//! 推迟到 `RuleBuilder::build` 时统一完成，错误也在那时返回。
//!
//! ```ignore
//! use rule_dsl::*;
//!
//! let predicate = and(vec![
//!     equal(field("order", "status"), value("PAID")),
//!     less_or_equal(value(100), field("order", "amount")),
//! ]);
//! ```

use crate::error::Result;
use crate::resolve::Resolver;
use rule_model::{Expression, Literal, ValueType};

/// 未解析的表达式节点
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value {
        value: Literal,
        value_type: Option<ValueType>,
    },
    Values {
        element_type: ValueType,
        items: Vec<Literal>,
    },
    Field {
        reference: String,
        path: String,
        field_type: Option<ValueType>,
    },
    Reference {
        reference: String,
        value_type: Option<ValueType>,
    },
    Operator {
        call: String,
        arguments: Vec<Operand>,
    },
    Function {
        call: String,
        return_type: ValueType,
        parameters: Vec<Parameter>,
    },
}

/// 函数参数：绑定名称 + 参数表达式
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub operand: Operand,
}

impl Operand {
    /// 脱离规则上下文解析子树
    ///
    /// 只能引用内置的动作上下文 `ctx`，字段引用总是失败。
    pub fn build(self) -> Result<Expression> {
        Resolver::standalone().resolve(self)
    }
}

// ==================== 字面量 ====================

/// 字面量，类型按运行时形态推断
pub fn value(value: impl Into<Literal>) -> Operand {
    Operand::Value {
        value: value.into(),
        value_type: None,
    }
}

/// 指定类型的字面量
pub fn typed_value(value: impl Into<Literal>, value_type: ValueType) -> Operand {
    Operand::Value {
        value: value.into(),
        value_type: Some(value_type),
    }
}

/// 集合字面量，类型为 `List<element_type>`
pub fn values<T: Into<Literal>>(element_type: ValueType, items: impl IntoIterator<Item = T>) -> Operand {
    Operand::Values {
        element_type,
        items: items.into_iter().map(Into::into).collect(),
    }
}

// ==================== 引用 ====================

/// 事实字段引用，字段类型在构建时沿事实类型结构解析
pub fn field(reference: impl Into<String>, path: impl Into<String>) -> Operand {
    Operand::Field {
        reference: reference.into(),
        path: path.into(),
        field_type: None,
    }
}

/// 指定类型的事实字段引用
pub fn typed_field(reference: impl Into<String>, path: impl Into<String>, field_type: ValueType) -> Operand {
    Operand::Field {
        reference: reference.into(),
        path: path.into(),
        field_type: Some(field_type),
    }
}

/// 点号写法的字段引用，如 `"order.customer.vip"`
pub fn field_path(expression: &str) -> Operand {
    let (reference, path) = expression.split_once('.').unwrap_or((expression, ""));
    field(reference, path)
}

/// 整体引用事实或属性
pub fn reference(name: impl Into<String>) -> Operand {
    Operand::Reference {
        reference: name.into(),
        value_type: None,
    }
}

pub fn typed_reference(name: impl Into<String>, value_type: ValueType) -> Operand {
    Operand::Reference {
        reference: name.into(),
        value_type: Some(value_type),
    }
}

// ==================== 操作符 ====================

/// 通用操作符调用
pub fn operator(call: impl Into<String>, arguments: Vec<Operand>) -> Operand {
    Operand::Operator {
        call: call.into(),
        arguments,
    }
}

pub fn and(arguments: Vec<Operand>) -> Operand {
    operator("and", arguments)
}

pub fn or(arguments: Vec<Operand>) -> Operand {
    operator("or", arguments)
}

pub fn not(argument: Operand) -> Operand {
    operator("not", vec![argument])
}

pub fn equal(left: Operand, right: Operand) -> Operand {
    operator("equal", vec![left, right])
}

pub fn less(left: Operand, right: Operand) -> Operand {
    operator("less", vec![left, right])
}

pub fn less_or_equal(left: Operand, right: Operand) -> Operand {
    operator("less-or-equal", vec![left, right])
}

/// 模式匹配，调用名为 `match`
pub fn matches(left: Operand, right: Operand) -> Operand {
    operator("match", vec![left, right])
}

// ==================== 函数 ====================

/// 函数调用
pub fn function(call: impl Into<String>, return_type: ValueType, parameters: Vec<Parameter>) -> Operand {
    Operand::Function {
        call: call.into(),
        return_type,
        parameters,
    }
}

/// 函数参数绑定
pub fn param(name: impl Into<String>, operand: Operand) -> Parameter {
    Parameter {
        name: name.into(),
        operand,
    }
}

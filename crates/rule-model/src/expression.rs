//! 表达式模型
//!
//! 规则谓词和动作共用的封闭语法树。节点种类固定（值、引用、调用、名称占位），
//! 操作符名称开放，`and`/`or`/`not` 在模型中与其他操作符同构，仅由映射层特殊处理。
//!
//! 每个节点携带可选的绑定名称和类型。绑定名称只用于函数参数绑定，
//! 不属于表达式的结构语义。

use crate::literal::Literal;
use crate::types::ValueType;

static OBJECT_TYPE: ValueType = ValueType::Object;

/// 表达式节点
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Value(ValueExpr),
    Reference(ReferenceExpr),
    Invocation(Invocation),
    Raw(RawExpr),
}

/// 字面量节点
#[derive(Debug, Clone, PartialEq)]
pub struct ValueExpr {
    pub name: Option<String>,
    pub value_type: ValueType,
    pub value: Literal,
}

/// 引用节点
///
/// `path` 为空表示引用整个事实或属性；非空表示字段访问，此时 `value_type` 为字段类型。
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceExpr {
    pub name: Option<String>,
    pub value_type: ValueType,
    pub reference: String,
    pub path: Option<String>,
}

impl ReferenceExpr {
    pub fn is_field(&self) -> bool {
        self.path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// 调用节点
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Operator(OperatorExpr),
    Function(FunctionExpr),
}

/// 操作符调用
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorExpr {
    pub name: Option<String>,
    pub value_type: ValueType,
    pub call: String,
    pub arguments: Vec<Expression>,
}

/// 函数调用，参数按名称绑定
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub name: Option<String>,
    pub value_type: ValueType,
    pub call: String,
    pub arguments: Vec<Expression>,
}

/// 名称占位节点，仅用于参数绑定
#[derive(Debug, Clone, PartialEq)]
pub struct RawExpr {
    pub name: String,
}

impl Invocation {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Operator(op) => op.name.as_deref(),
            Self::Function(func) => func.name.as_deref(),
        }
    }

    pub fn value_type(&self) -> &ValueType {
        match self {
            Self::Operator(op) => &op.value_type,
            Self::Function(func) => &func.value_type,
        }
    }

    pub fn call(&self) -> &str {
        match self {
            Self::Operator(op) => &op.call,
            Self::Function(func) => &func.call,
        }
    }

    pub fn arguments(&self) -> &[Expression] {
        match self {
            Self::Operator(op) => &op.arguments,
            Self::Function(func) => &func.arguments,
        }
    }

    pub fn as_operator(&self) -> Option<&OperatorExpr> {
        match self {
            Self::Operator(op) => Some(op),
            Self::Function(_) => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionExpr> {
        match self {
            Self::Function(func) => Some(func),
            Self::Operator(_) => None,
        }
    }
}

impl Expression {
    // ==================== 构造 ====================

    pub fn value(name: Option<String>, value_type: ValueType, value: Literal) -> Self {
        Self::Value(ValueExpr {
            name,
            value_type,
            value,
        })
    }

    pub fn reference(name: Option<String>, value_type: ValueType, reference: impl Into<String>) -> Self {
        Self::Reference(ReferenceExpr {
            name,
            value_type,
            reference: reference.into(),
            path: None,
        })
    }

    pub fn field(
        name: Option<String>,
        field_type: ValueType,
        reference: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::Reference(ReferenceExpr {
            name,
            value_type: field_type,
            reference: reference.into(),
            path: Some(path.into()),
        })
    }

    /// 操作符调用，类型固定为 Boolean
    pub fn operator(name: Option<String>, call: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Self::Invocation(Invocation::Operator(OperatorExpr {
            name,
            value_type: ValueType::Boolean,
            call: call.into(),
            arguments,
        }))
    }

    pub fn function(
        name: Option<String>,
        value_type: ValueType,
        call: impl Into<String>,
        arguments: Vec<Expression>,
    ) -> Self {
        Self::Invocation(Invocation::Function(FunctionExpr {
            name,
            value_type,
            call: call.into(),
            arguments,
        }))
    }

    pub fn raw(name: impl Into<String>) -> Self {
        Self::Raw(RawExpr { name: name.into() })
    }

    // ==================== 访问 ====================

    /// 绑定名称
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Value(v) => v.name.as_deref(),
            Self::Reference(r) => r.name.as_deref(),
            Self::Invocation(inv) => inv.name(),
            Self::Raw(raw) => Some(&raw.name),
        }
    }

    /// 节点类型，名称占位节点视为 Object
    pub fn value_type(&self) -> &ValueType {
        match self {
            Self::Value(v) => &v.value_type,
            Self::Reference(r) => &r.value_type,
            Self::Invocation(inv) => inv.value_type(),
            Self::Raw(_) => &OBJECT_TYPE,
        }
    }

    pub fn as_value(&self) -> Option<&ValueExpr> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ReferenceExpr> {
        match self {
            Self::Reference(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_invocation(&self) -> Option<&Invocation> {
        match self {
            Self::Invocation(inv) => Some(inv),
            _ => None,
        }
    }

    pub fn as_operator(&self) -> Option<&OperatorExpr> {
        self.as_invocation().and_then(Invocation::as_operator)
    }

    pub fn as_function(&self) -> Option<&FunctionExpr> {
        self.as_invocation().and_then(Invocation::as_function)
    }

    pub fn as_raw(&self) -> Option<&RawExpr> {
        match self {
            Self::Raw(raw) => Some(raw),
            _ => None,
        }
    }

    /// 替换绑定名称；名称占位节点只接受非空名称
    pub fn with_name(self, name: Option<String>) -> Self {
        match self {
            Self::Value(v) => Self::Value(ValueExpr { name, ..v }),
            Self::Reference(r) => Self::Reference(ReferenceExpr { name, ..r }),
            Self::Invocation(Invocation::Operator(op)) => {
                Self::Invocation(Invocation::Operator(OperatorExpr { name, ..op }))
            }
            Self::Invocation(Invocation::Function(func)) => {
                Self::Invocation(Invocation::Function(FunctionExpr { name, ..func }))
            }
            Self::Raw(raw) => Self::Raw(RawExpr {
                name: name.unwrap_or(raw.name),
            }),
        }
    }

    /// 去除函数参数以外的绑定名称
    ///
    /// 在线格式只为函数参数保存名称，比较往返结果时使用该形式。
    pub fn without_binding_names(&self) -> Expression {
        self.strip_names(false)
    }

    fn strip_names(&self, keep_own_name: bool) -> Expression {
        let name = if keep_own_name {
            self.name().map(str::to_string)
        } else {
            None
        };

        match self {
            Self::Value(v) => Self::Value(ValueExpr {
                name,
                ..v.clone()
            }),
            Self::Reference(r) => Self::Reference(ReferenceExpr {
                name,
                ..r.clone()
            }),
            Self::Invocation(Invocation::Operator(op)) => {
                Self::Invocation(Invocation::Operator(OperatorExpr {
                    name,
                    value_type: op.value_type.clone(),
                    call: op.call.clone(),
                    arguments: op.arguments.iter().map(|a| a.strip_names(false)).collect(),
                }))
            }
            Self::Invocation(Invocation::Function(func)) => {
                Self::Invocation(Invocation::Function(FunctionExpr {
                    name,
                    value_type: func.value_type.clone(),
                    call: func.call.clone(),
                    arguments: func.arguments.iter().map(|a| a.strip_names(true)).collect(),
                }))
            }
            Self::Raw(raw) => Self::Raw(raw.clone()),
        }
    }

    /// 子树节点总数
    pub fn node_count(&self) -> usize {
        match self {
            Self::Invocation(inv) => 1 + inv.arguments().iter().map(Expression::node_count).sum::<usize>(),
            _ => 1,
        }
    }
}

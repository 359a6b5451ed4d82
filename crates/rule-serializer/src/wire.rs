//! 在线格式数据结构
//!
//! 与内存表达式树结构镜像的可序列化节点。标量值一律为字符串并携带规范类型名，
//! 集合只标注元素类型。`and`/`or`/`not` 使用专用节点，不以通用操作符出现。
//!
//! 结构体只依赖 serde，具体绑定格式由调用方决定；本 crate 附带 JSON 辅助函数。

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// 标量值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSer {
    #[serde(rename = "type")]
    pub value_type: String,
    pub value: String,
}

/// 集合值，`element_type` 为元素类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuesSer {
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default)]
    pub value: Vec<Option<String>>,
}

/// 转换器不支持的值，载荷原样传递；空值不带载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomValueSer {
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any: Option<Json>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSer {
    #[serde(rename = "ref")]
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSer {
    #[serde(rename = "ref")]
    pub reference: String,
    pub path: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// 通用操作符，`call` 不会是 and/or/not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorSer {
    #[serde(rename = "type")]
    pub call: String,
    #[serde(default)]
    pub operand: Vec<ExpressionSer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndSer {
    #[serde(default)]
    pub children: Vec<ExpressionSer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrSer {
    #[serde(default)]
    pub children: Vec<ExpressionSer>,
}

/// 取反节点：恰好填充一个槽位
///
/// 谓词根容器（[`PredicateSer`]）与之共用同一组槽位。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotSer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<OperatorSer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub and: Option<AndSer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub or: Option<OrSer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<NotSer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionSer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueSer>,
}

/// 谓词根容器
pub type PredicateSer = NotSer;

/// 布尔槽位的借用视图
#[derive(Debug, Clone, Copy)]
pub enum BooleanSlot<'a> {
    Operator(&'a OperatorSer),
    And(&'a AndSer),
    Or(&'a OrSer),
    Not(&'a NotSer),
    Function(&'a FunctionSer),
    Value(&'a ValueSer),
}

impl NotSer {
    /// 所有已填充的槽位
    pub fn slots(&self) -> Vec<BooleanSlot<'_>> {
        let mut slots = Vec::with_capacity(1);
        if let Some(operator) = &self.operator {
            slots.push(BooleanSlot::Operator(operator));
        }
        if let Some(and) = &self.and {
            slots.push(BooleanSlot::And(and));
        }
        if let Some(or) = &self.or {
            slots.push(BooleanSlot::Or(or));
        }
        if let Some(not) = &self.not {
            slots.push(BooleanSlot::Not(not));
        }
        if let Some(function) = &self.function {
            slots.push(BooleanSlot::Function(function));
        }
        if let Some(value) = &self.value {
            slots.push(BooleanSlot::Value(value));
        }
        slots
    }

    /// 将节点放入对应槽位；不属于布尔槽位的节点原样返回
    pub fn wrap(expression: ExpressionSer) -> Result<Self, ExpressionSer> {
        let slot = match expression {
            ExpressionSer::Operator(operator) => Self {
                operator: Some(operator),
                ..Default::default()
            },
            ExpressionSer::And(and) => Self {
                and: Some(and),
                ..Default::default()
            },
            ExpressionSer::Or(or) => Self {
                or: Some(or),
                ..Default::default()
            },
            ExpressionSer::Not(not) => Self {
                not: Some(not),
                ..Default::default()
            },
            ExpressionSer::Function(function) => Self {
                function: Some(function),
                ..Default::default()
            },
            ExpressionSer::Value(value) => Self {
                value: Some(value),
                ..Default::default()
            },
            other => return Err(other),
        };
        Ok(slot)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSer {
    pub name: String,
    pub return_type: String,
    #[serde(default)]
    pub parameter: Vec<ParameterSer>,
}

/// 函数参数：绑定名称 + 至多一个值槽位
///
/// 没有槽位的参数表示名称占位。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueSer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<ValuesSer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_value: Option<CustomValueSer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldSer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceSer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionSer>,
}

/// 参数槽位的借用视图
#[derive(Debug, Clone, Copy)]
pub enum ParameterSlot<'a> {
    Value(&'a ValueSer),
    Values(&'a ValuesSer),
    CustomValue(&'a CustomValueSer),
    Field(&'a FieldSer),
    Reference(&'a ReferenceSer),
    Function(&'a FunctionSer),
}

impl ParameterSer {
    /// 名称占位参数
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn slots(&self) -> Vec<ParameterSlot<'_>> {
        let mut slots = Vec::with_capacity(1);
        if let Some(value) = &self.value {
            slots.push(ParameterSlot::Value(value));
        }
        if let Some(values) = &self.values {
            slots.push(ParameterSlot::Values(values));
        }
        if let Some(custom_value) = &self.custom_value {
            slots.push(ParameterSlot::CustomValue(custom_value));
        }
        if let Some(field) = &self.field {
            slots.push(ParameterSlot::Field(field));
        }
        if let Some(reference) = &self.reference {
            slots.push(ParameterSlot::Reference(reference));
        }
        if let Some(function) = &self.function {
            slots.push(ParameterSlot::Function(function));
        }
        slots
    }

    /// 将节点放入对应槽位；布尔组合和操作符不能作为参数，原样返回
    pub fn wrap(name: Option<String>, expression: ExpressionSer) -> Result<Self, ExpressionSer> {
        let mut parameter = Self {
            name,
            ..Default::default()
        };
        match expression {
            ExpressionSer::Value(value) => parameter.value = Some(value),
            ExpressionSer::Values(values) => parameter.values = Some(values),
            ExpressionSer::CustomValue(custom_value) => parameter.custom_value = Some(custom_value),
            ExpressionSer::Field(field) => parameter.field = Some(field),
            ExpressionSer::Reference(reference) => parameter.reference = Some(reference),
            ExpressionSer::Function(function) => parameter.function = Some(function),
            other => return Err(other),
        }
        Ok(parameter)
    }
}

/// 任意表达式节点（单选）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpressionSer {
    Value(ValueSer),
    Values(ValuesSer),
    CustomValue(CustomValueSer),
    Reference(ReferenceSer),
    Field(FieldSer),
    Operator(OperatorSer),
    And(AndSer),
    Or(OrSer),
    Not(Box<NotSer>),
    Function(FunctionSer),
}

impl ExpressionSer {
    /// 节点种类名称，与序列化标签一致
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Value(_) => "value",
            Self::Values(_) => "values",
            Self::CustomValue(_) => "customValue",
            Self::Reference(_) => "reference",
            Self::Field(_) => "field",
            Self::Operator(_) => "operator",
            Self::And(_) => "and",
            Self::Or(_) => "or",
            Self::Not(_) => "not",
            Self::Function(_) => "function",
        }
    }
}

/// 字面量节点，用于规则属性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LiteralSer {
    Value(ValueSer),
    Values(ValuesSer),
    CustomValue(CustomValueSer),
}

impl From<LiteralSer> for ExpressionSer {
    fn from(literal: LiteralSer) -> Self {
        match literal {
            LiteralSer::Value(value) => Self::Value(value),
            LiteralSer::Values(values) => Self::Values(values),
            LiteralSer::CustomValue(custom_value) => Self::CustomValue(custom_value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSer {
    pub name: String,
    #[serde(flatten)]
    pub value: LiteralSer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactSer {
    pub name: String,
    #[serde(rename = "type")]
    pub fact_type: String,
}

/// 规则文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSer {
    #[serde(default)]
    pub attribute: Vec<AttributeSer>,
    #[serde(default)]
    pub fact: Vec<FactSer>,
    pub predicate: PredicateSer,
    #[serde(default)]
    pub action: Vec<FunctionSer>,
}

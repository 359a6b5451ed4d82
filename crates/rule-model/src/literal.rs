//! 字面量值
//!
//! 表达式中 `Value` 节点承载的数据。内置标量与类型目录一一对应，
//! 目录之外的类型以不透明的 JSON 载荷（`Custom`）保存。

use crate::converter::TypeConverter;
use crate::error::{ConversionError, Result};
use crate::types::ValueType;
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde_json::Value as Json;
use std::str::FromStr;

/// 字面量
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i32),
    Long(i64),
    Double(f64),
    String(String),
    Decimal(Decimal),
    DateTime(DateTime<FixedOffset>),
    List(Vec<Literal>),
    /// 非内置类型的不透明载荷
    Custom(Json),
}

impl Literal {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// 按运行时形态推断类型
    ///
    /// 空值与自定义载荷推断为 `Object`；集合取第一个非空元素的类型。
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Null | Self::Custom(_) => ValueType::Object,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Integer(_) => ValueType::Integer,
            Self::Long(_) => ValueType::Long,
            Self::Double(_) => ValueType::Double,
            Self::String(_) => ValueType::String,
            Self::Decimal(_) => ValueType::Decimal,
            Self::DateTime(_) => ValueType::ZonedDateTime,
            Self::List(items) => ValueType::list(
                items
                    .iter()
                    .find(|item| !item.is_null())
                    .map(Literal::value_type)
                    .unwrap_or(ValueType::Object),
            ),
        }
    }

    /// 转换为 JSON，用于不透明载荷的传输
    pub fn to_json(&self) -> Json {
        match self {
            Self::Null => Json::Null,
            Self::Boolean(b) => Json::Bool(*b),
            Self::Integer(i) => Json::from(*i),
            Self::Long(l) => Json::from(*l),
            Self::Double(d) => serde_json::Number::from_f64(*d)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Self::String(s) => Json::String(s.clone()),
            Self::Decimal(d) => Json::String(d.to_string()),
            Self::DateTime(dt) => Json::String(dt.to_rfc3339()),
            Self::List(items) => Json::Array(items.iter().map(Literal::to_json).collect()),
            Self::Custom(json) => json.clone(),
        }
    }

    /// 按声明类型从 JSON 还原字面量
    pub fn from_json(value_type: &ValueType, json: &Json) -> Result<Self> {
        if json.is_null() {
            return Ok(Self::Null);
        }

        let mismatch = || ConversionError::TypeMismatch {
            expected: value_type.to_string(),
            actual: json_type_name(json).to_string(),
        };

        let literal = match value_type {
            ValueType::Boolean => Self::Boolean(json.as_bool().ok_or_else(mismatch)?),
            ValueType::Integer => Self::Integer(
                json.as_i64()
                    .and_then(|i| i32::try_from(i).ok())
                    .ok_or_else(mismatch)?,
            ),
            ValueType::Long => Self::Long(json.as_i64().ok_or_else(mismatch)?),
            ValueType::Double => Self::Double(json.as_f64().ok_or_else(mismatch)?),
            ValueType::String => Self::String(json.as_str().ok_or_else(mismatch)?.to_string()),
            ValueType::Decimal => {
                let text = match json {
                    Json::String(s) => s.clone(),
                    Json::Number(n) => n.to_string(),
                    _ => return Err(mismatch()),
                };
                Self::Decimal(Decimal::from_str(&text).map_err(|e| ConversionError::Parse {
                    value_type: value_type.to_string(),
                    input: text.clone(),
                    message: e.to_string(),
                })?)
            }
            ValueType::ZonedDateTime => {
                let text = json.as_str().ok_or_else(mismatch)?;
                Self::DateTime(DateTime::parse_from_rfc3339(text).map_err(|e| {
                    ConversionError::Parse {
                        value_type: value_type.to_string(),
                        input: text.to_string(),
                        message: e.to_string(),
                    }
                })?)
            }
            ValueType::List(element) => {
                let items = json.as_array().ok_or_else(mismatch)?;
                Self::List(
                    items
                        .iter()
                        .map(|item| Self::from_json(element, item))
                        .collect::<Result<Vec<_>>>()?,
                )
            }
            ValueType::Object | ValueType::Void | ValueType::Custom(_) => Self::Custom(json.clone()),
        };

        Ok(literal)
    }

    /// 将字面量规整为声明类型
    ///
    /// 规则：
    /// - 空值保持为空
    /// - 字符串交给转换器按目标类型解析（如 `"true"` → `Boolean`）
    /// - 整数可放宽为 `Long`、`Double`、`Decimal`
    /// - 目录内类型的 JSON 载荷按声明类型还原
    /// - 转换器不支持的类型统一转为不透明载荷
    pub fn coerce_to(self, value_type: &ValueType, converter: &dyn TypeConverter) -> Result<Self> {
        if self.is_null() || matches!(self, Self::Custom(Json::Null)) {
            return Ok(Self::Null);
        }

        if let ValueType::List(element) = value_type {
            return match self {
                Self::List(items) => Ok(Self::List(
                    items
                        .into_iter()
                        .map(|item| item.coerce_to(element, converter))
                        .collect::<Result<Vec<_>>>()?,
                )),
                Self::Custom(json) => Self::from_json(value_type, &json),
                other => Err(ConversionError::TypeMismatch {
                    expected: value_type.to_string(),
                    actual: other.value_type().to_string(),
                }),
            };
        }

        if !converter.is_applicable(value_type) {
            return Ok(match self {
                Self::Custom(json) => Self::Custom(json),
                other => Self::Custom(other.to_json()),
            });
        }

        if &self.value_type() == value_type {
            return Ok(self);
        }

        match (self, value_type) {
            (Self::Custom(json), _) => Self::from_json(value_type, &json),
            (Self::String(s), _) => converter.from_string(value_type, &s),
            (Self::Integer(i), ValueType::Long) => Ok(Self::Long(i64::from(i))),
            (Self::Integer(i), ValueType::Double) => Ok(Self::Double(f64::from(i))),
            (Self::Integer(i), ValueType::Decimal) => Ok(Self::Decimal(Decimal::from(i))),
            (Self::Long(l), ValueType::Decimal) => Ok(Self::Decimal(Decimal::from(l))),
            (other, _) => Err(ConversionError::TypeMismatch {
                expected: value_type.to_string(),
                actual: other.value_type().to_string(),
            }),
        }
    }
}

fn json_type_name(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Decimal> for Literal {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<DateTime<FixedOffset>> for Literal {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::DateTime(value)
    }
}

impl From<Json> for Literal {
    fn from(value: Json) -> Self {
        Self::Custom(value)
    }
}

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Literal {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

//! 值类型定义
//!
//! 表达式树中每个节点都携带一个 `ValueType`。类型以规范字符串在线格式中传输，
//! 集合类型使用泛型写法 `List<ElementType>`，自定义类型按名称原样输出。

use crate::error::ConversionError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 值类型
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Boolean,
    Integer,
    Long,
    Double,
    String,
    Decimal,
    ZonedDateTime,
    /// 任意类型，未声明具体类型的引用和空值使用该标记
    Object,
    /// 动作的返回类型
    Void,
    /// 参数化集合类型，仅记录元素类型
    List(Box<ValueType>),
    /// 业务自定义类型（如事实类型），按名称区分
    Custom(String),
}

impl ValueType {
    /// 构造集合类型
    pub fn list(element: ValueType) -> Self {
        Self::List(Box::new(element))
    }

    /// 构造自定义类型
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// 集合元素类型，非集合返回 None
    pub fn element_type(&self) -> Option<&ValueType> {
        match self {
            Self::List(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Boolean)
    }

    /// 自定义类型名称
    pub fn custom_name(&self) -> Option<&str> {
        match self {
            Self::Custom(name) => Some(name),
            _ => None,
        }
    }

    /// 校验类型能否以规范字符串无损传输
    ///
    /// 自定义类型名必须是合法标识符，且不能与内置类型同名。
    pub fn validate(&self) -> Result<(), ConversionError> {
        match self {
            Self::List(element) => element.validate(),
            Self::Custom(name) if !is_custom_name(name) || builtin(name).is_some() => {
                Err(ConversionError::InvalidTypeName(name.clone()))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "Boolean"),
            Self::Integer => write!(f, "Integer"),
            Self::Long => write!(f, "Long"),
            Self::Double => write!(f, "Double"),
            Self::String => write!(f, "String"),
            Self::Decimal => write!(f, "Decimal"),
            Self::ZonedDateTime => write!(f, "ZonedDateTime"),
            Self::Object => write!(f, "Object"),
            Self::Void => write!(f, "Void"),
            Self::List(element) => write!(f, "List<{}>", element),
            Self::Custom(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for ValueType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(parsed) = builtin(s) {
            return Ok(parsed);
        }

        let parsed = if let Some(inner) = s.strip_prefix("List<").and_then(|rest| rest.strip_suffix('>')) {
            if inner.trim().is_empty() {
                return Err(ConversionError::InvalidTypeName(s.to_string()));
            }
            Self::list(inner.parse()?)
        } else if is_custom_name(s) {
            Self::Custom(s.to_string())
        } else {
            return Err(ConversionError::InvalidTypeName(s.to_string()));
        };
        Ok(parsed)
    }
}

fn builtin(s: &str) -> Option<ValueType> {
    let value_type = match s {
        "Boolean" => ValueType::Boolean,
        "Integer" => ValueType::Integer,
        "Long" => ValueType::Long,
        "Double" => ValueType::Double,
        "String" => ValueType::String,
        "Decimal" => ValueType::Decimal,
        "ZonedDateTime" => ValueType::ZonedDateTime,
        "Object" => ValueType::Object,
        "Void" => ValueType::Void,
        _ => return None,
    };
    Some(value_type)
}

/// 自定义类型名：以字母或下划线开头，由字母、数字、`_`、`.`、`$` 组成
fn is_custom_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$'))
}

impl Serialize for ValueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ValueType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

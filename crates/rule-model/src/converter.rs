//! 标量类型转换器
//!
//! 在线格式中的标量值统一以字符串传输，转换器负责类型与字符串之间的双向转换。
//! 目录之外的类型 `is_applicable` 返回 false，由调用方改走不透明载荷路径。

use crate::error::{ConversionError, Result};
use crate::literal::Literal;
use crate::types::ValueType;
use chrono::DateTime;
use rust_decimal::Decimal;
use std::str::FromStr;

/// 标量类型转换器
pub trait TypeConverter: Send + Sync {
    /// 是否支持该类型的字符串转换
    fn is_applicable(&self, value_type: &ValueType) -> bool;

    /// 将字面量编码为字符串
    fn to_string(&self, value_type: &ValueType, value: &Literal) -> Result<String>;

    /// 从字符串解码字面量
    fn from_string(&self, value_type: &ValueType, input: &str) -> Result<Literal>;
}

/// 默认转换器，覆盖内置标量类型目录
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeConverter;

impl DefaultTypeConverter {
    pub fn new() -> Self {
        Self
    }
}

impl TypeConverter for DefaultTypeConverter {
    fn is_applicable(&self, value_type: &ValueType) -> bool {
        matches!(
            value_type,
            ValueType::Boolean
                | ValueType::Integer
                | ValueType::Long
                | ValueType::Double
                | ValueType::String
                | ValueType::Decimal
                | ValueType::ZonedDateTime
        )
    }

    fn to_string(&self, value_type: &ValueType, value: &Literal) -> Result<String> {
        if !self.is_applicable(value_type) {
            return Err(ConversionError::NotApplicable(value_type.to_string()));
        }

        match (value_type, value) {
            (ValueType::Boolean, Literal::Boolean(b)) => Ok(b.to_string()),
            (ValueType::Integer, Literal::Integer(i)) => Ok(i.to_string()),
            (ValueType::Long, Literal::Long(l)) => Ok(l.to_string()),
            (ValueType::Long, Literal::Integer(i)) => Ok(i.to_string()),
            (ValueType::Double, Literal::Double(d)) => Ok(d.to_string()),
            (ValueType::String, Literal::String(s)) => Ok(s.clone()),
            (ValueType::Decimal, Literal::Decimal(d)) => Ok(d.to_string()),
            (ValueType::ZonedDateTime, Literal::DateTime(dt)) => Ok(dt.to_rfc3339()),
            _ => Err(ConversionError::TypeMismatch {
                expected: value_type.to_string(),
                actual: value.value_type().to_string(),
            }),
        }
    }

    fn from_string(&self, value_type: &ValueType, input: &str) -> Result<Literal> {
        let parse_error = |message: String| ConversionError::Parse {
            value_type: value_type.to_string(),
            input: input.to_string(),
            message,
        };

        match value_type {
            ValueType::Boolean => input
                .parse::<bool>()
                .map(Literal::Boolean)
                .map_err(|e| parse_error(e.to_string())),
            ValueType::Integer => input
                .parse::<i32>()
                .map(Literal::Integer)
                .map_err(|e| parse_error(e.to_string())),
            ValueType::Long => input
                .parse::<i64>()
                .map(Literal::Long)
                .map_err(|e| parse_error(e.to_string())),
            ValueType::Double => input
                .parse::<f64>()
                .map(Literal::Double)
                .map_err(|e| parse_error(e.to_string())),
            ValueType::String => Ok(Literal::String(input.to_string())),
            ValueType::Decimal => Decimal::from_str(input)
                .map(Literal::Decimal)
                .map_err(|e| parse_error(e.to_string())),
            ValueType::ZonedDateTime => DateTime::parse_from_rfc3339(input)
                .map(Literal::DateTime)
                .map_err(|e| parse_error(e.to_string())),
            _ => Err(ConversionError::NotApplicable(value_type.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applicable_catalogue() {
        let converter = DefaultTypeConverter::new();
        assert!(converter.is_applicable(&ValueType::Boolean));
        assert!(converter.is_applicable(&ValueType::ZonedDateTime));
        assert!(!converter.is_applicable(&ValueType::Object));
        assert!(!converter.is_applicable(&ValueType::list(ValueType::Integer)));
        assert!(!converter.is_applicable(&ValueType::custom("Bean")));
    }

    #[test]
    fn test_scalar_string_round_trip() {
        let converter = DefaultTypeConverter::new();
        let cases = vec![
            (ValueType::Boolean, Literal::Boolean(false)),
            (ValueType::Integer, Literal::Integer(-42)),
            (ValueType::Long, Literal::Long(123)),
            (ValueType::Double, Literal::Double(0.25)),
            (ValueType::String, Literal::from("my value")),
            (
                ValueType::Decimal,
                Literal::Decimal(Decimal::from_str("100.123").unwrap()),
            ),
            (
                ValueType::ZonedDateTime,
                Literal::DateTime(DateTime::parse_from_rfc3339("2024-01-15T10:00:00+08:00").unwrap()),
            ),
        ];

        for (value_type, literal) in cases {
            let encoded = converter.to_string(&value_type, &literal).unwrap();
            let decoded = converter.from_string(&value_type, &encoded).unwrap();
            assert_eq!(decoded, literal, "round trip failed for {}", value_type);
        }
    }

    #[test]
    fn test_to_string_type_mismatch() {
        let converter = DefaultTypeConverter::new();
        let result = converter.to_string(&ValueType::Integer, &Literal::from("5"));
        assert!(matches!(result, Err(ConversionError::TypeMismatch { .. })));
    }

    #[test]
    fn test_from_string_not_applicable() {
        let converter = DefaultTypeConverter::new();
        let result = converter.from_string(&ValueType::custom("Bean"), "{}");
        assert_eq!(result, Err(ConversionError::NotApplicable("Bean".to_string())));
    }
}

//! 表达式编码
//!
//! 内存表达式树 → 在线格式节点。`and`/`or`/`not` 映射为专用节点，
//! 其余操作符映射为通用 `OperatorSer`；字面量优先走转换器的字符串路径，
//! 转换器不支持时改用 `CustomValueSer` 不透明载荷。

use crate::error::{EncodeError, EncodeResult};
use crate::wire::{
    AndSer, CustomValueSer, ExpressionSer, FieldSer, FunctionSer, LiteralSer, NotSer, OperatorSer,
    OrSer, ParameterSer, PredicateSer, ReferenceSer, ValueSer, ValuesSer,
};
use rule_model::{
    DefaultTypeConverter, Expression, FunctionExpr, Invocation, Literal, OperatorExpr, TypeConverter,
    ValueType,
};
use std::sync::Arc;
use tracing::trace;

/// 表达式编码器
#[derive(Clone)]
pub struct ExpressionEncoder {
    converter: Arc<dyn TypeConverter>,
}

impl ExpressionEncoder {
    pub fn new(converter: Arc<dyn TypeConverter>) -> Self {
        Self { converter }
    }

    /// 编码谓词根节点
    pub fn map(&self, predicate: &Expression) -> EncodeResult<PredicateSer> {
        let wire = self.extract_expression(predicate)?;
        into_boolean_slot(wire, "谓词")
    }

    /// 编码任意表达式节点
    pub fn extract_expression(&self, expression: &Expression) -> EncodeResult<ExpressionSer> {
        match expression {
            Expression::Value(value) => {
                Ok(self.encode_literal(&value.value_type, &value.value).into())
            }
            Expression::Reference(reference) => match &reference.path {
                Some(path) if reference.is_field() => Ok(ExpressionSer::Field(FieldSer {
                    reference: reference.reference.clone(),
                    path: path.clone(),
                    field_type: reference.value_type.to_string(),
                })),
                _ => Ok(ExpressionSer::Reference(ReferenceSer {
                    reference: reference.reference.clone(),
                })),
            },
            Expression::Invocation(Invocation::Operator(op)) => self.encode_operator(op),
            Expression::Invocation(Invocation::Function(func)) => {
                Ok(ExpressionSer::Function(self.encode_function(func)?))
            }
            Expression::Raw(raw) => Err(EncodeError::UnexpectedRaw(raw.name.clone())),
        }
    }

    /// 编码函数参数，名称占位编码为只有名称的参数
    pub fn extract_parameters(&self, arguments: &[Expression]) -> EncodeResult<Vec<ParameterSer>> {
        arguments
            .iter()
            .map(|argument| -> EncodeResult<ParameterSer> {
                if let Expression::Raw(raw) = argument {
                    return Ok(ParameterSer::placeholder(raw.name.clone()));
                }

                let wire = self.extract_expression(argument)?;
                let name = argument.name().map(str::to_string);
                ParameterSer::wrap(name, wire).map_err(|rejected| EncodeError::UnsupportedSlot {
                    position: format!("参数 '{}'", argument.name().unwrap_or_default()),
                    kind: rejected.kind().to_string(),
                })
            })
            .collect()
    }

    /// 编码函数调用（谓词中的函数或动作）
    pub fn encode_function(&self, function: &FunctionExpr) -> EncodeResult<FunctionSer> {
        Ok(FunctionSer {
            name: function.call.clone(),
            return_type: function.value_type.to_string(),
            parameter: self.extract_parameters(&function.arguments)?,
        })
    }

    /// 编码带类型的字面量，属性与值节点共用
    pub fn encode_literal(&self, value_type: &ValueType, literal: &Literal) -> LiteralSer {
        let type_name = value_type.to_string();

        if literal.is_null() {
            return LiteralSer::CustomValue(CustomValueSer {
                value_type: type_name,
                any: None,
            });
        }

        if let Literal::List(items) = literal {
            if let Some(element) = value_type.element_type()
                && let Some(values) = self.encode_elements(element, items)
            {
                return LiteralSer::Values(ValuesSer {
                    element_type: element.to_string(),
                    value: values,
                });
            }
        } else if self.converter.is_applicable(value_type)
            && let Ok(value) = self.converter.to_string(value_type, literal)
        {
            return LiteralSer::Value(ValueSer {
                value_type: type_name,
                value,
            });
        }

        trace!(value_type = %type_name, "Literal encoded as custom value");
        LiteralSer::CustomValue(CustomValueSer {
            value_type: type_name,
            any: Some(literal.to_json()),
        })
    }

    /// 元素类型可转换且所有元素都能转换时返回字符串列表，空元素保留为 None
    fn encode_elements(&self, element: &ValueType, items: &[Literal]) -> Option<Vec<Option<String>>> {
        if !self.converter.is_applicable(element) {
            return None;
        }
        items
            .iter()
            .map(|item| {
                if item.is_null() {
                    Some(None)
                } else {
                    self.converter.to_string(element, item).ok().map(Some)
                }
            })
            .collect()
    }

    fn encode_operator(&self, op: &OperatorExpr) -> EncodeResult<ExpressionSer> {
        match op.call.as_str() {
            "and" => Ok(ExpressionSer::And(AndSer {
                children: self.encode_all(&op.arguments)?,
            })),
            "or" => Ok(ExpressionSer::Or(OrSer {
                children: self.encode_all(&op.arguments)?,
            })),
            "not" => {
                let [operand] = op.arguments.as_slice() else {
                    return Err(EncodeError::InvalidArity {
                        call: op.call.clone(),
                        expected: 1,
                        actual: op.arguments.len(),
                    });
                };
                let wire = self.extract_expression(operand)?;
                Ok(ExpressionSer::Not(Box::new(into_boolean_slot(wire, "not 操作数")?)))
            }
            _ => Ok(ExpressionSer::Operator(OperatorSer {
                call: op.call.clone(),
                operand: self.encode_all(&op.arguments)?,
            })),
        }
    }

    fn encode_all(&self, arguments: &[Expression]) -> EncodeResult<Vec<ExpressionSer>> {
        arguments
            .iter()
            .map(|argument| self.extract_expression(argument))
            .collect()
    }
}

impl Default for ExpressionEncoder {
    fn default() -> Self {
        Self::new(Arc::new(DefaultTypeConverter))
    }
}

fn into_boolean_slot(wire: ExpressionSer, position: &str) -> EncodeResult<NotSer> {
    NotSer::wrap(wire).map_err(|rejected| EncodeError::UnsupportedSlot {
        position: position.to_string(),
        kind: rejected.kind().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encoder() -> ExpressionEncoder {
        ExpressionEncoder::default()
    }

    #[test]
    fn test_encode_scalar_value() {
        let wire = encoder()
            .extract_expression(&Expression::value(None, ValueType::Integer, Literal::Integer(5)))
            .unwrap();
        assert_eq!(
            wire,
            ExpressionSer::Value(ValueSer {
                value_type: "Integer".to_string(),
                value: "5".to_string(),
            })
        );
    }

    #[test]
    fn test_encode_collection_value() {
        let literal = Literal::List(vec![Literal::Integer(1), Literal::Null, Literal::Integer(3)]);
        let wire = encoder().encode_literal(&ValueType::list(ValueType::Integer), &literal);
        assert_eq!(
            wire,
            LiteralSer::Values(ValuesSer {
                element_type: "Integer".to_string(),
                value: vec![Some("1".to_string()), None, Some("3".to_string())],
            })
        );
    }

    #[test]
    fn test_encode_non_catalogue_collection_as_custom() {
        let literal = Literal::List(vec![Literal::Custom(json!({"id": 1}))]);
        let wire = encoder().encode_literal(&ValueType::list(ValueType::custom("Bean")), &literal);
        assert_eq!(
            wire,
            LiteralSer::CustomValue(CustomValueSer {
                value_type: "List<Bean>".to_string(),
                any: Some(json!([{"id": 1}])),
            })
        );
    }

    #[test]
    fn test_encode_null_without_payload() {
        let wire = encoder().encode_literal(&ValueType::Boolean, &Literal::Null);
        assert_eq!(
            wire,
            LiteralSer::CustomValue(CustomValueSer {
                value_type: "Boolean".to_string(),
                any: None,
            })
        );
    }

    #[test]
    fn test_encode_boolean_groups_use_dedicated_nodes() {
        let predicate = Expression::operator(
            None,
            "or",
            vec![
                Expression::operator(
                    None,
                    "not",
                    vec![Expression::value(None, ValueType::Boolean, Literal::Boolean(false))],
                ),
                Expression::operator(
                    None,
                    "and",
                    vec![Expression::value(None, ValueType::Boolean, Literal::Boolean(true))],
                ),
            ],
        );

        let wire = encoder().map(&predicate).unwrap();
        let or = wire.or.unwrap();
        assert!(matches!(&or.children[0], ExpressionSer::Not(not) if not.value.is_some()));
        assert!(matches!(&or.children[1], ExpressionSer::And(and) if and.children.len() == 1));
    }

    #[test]
    fn test_encode_not_arity() {
        let predicate = Expression::operator(None, "not", vec![]);
        assert!(matches!(
            encoder().map(&predicate),
            Err(EncodeError::InvalidArity { expected: 1, actual: 0, .. })
        ));
    }

    #[test]
    fn test_reference_predicate_has_no_slot() {
        let predicate = Expression::reference(None, ValueType::Boolean, "flag");
        assert!(matches!(
            encoder().map(&predicate),
            Err(EncodeError::UnsupportedSlot { .. })
        ));
    }

    #[test]
    fn test_encode_parameters() {
        let arguments = vec![
            Expression::reference(Some("p1".to_string()), ValueType::String, "ruleName"),
            Expression::raw("p2"),
        ];
        let parameters = encoder().extract_parameters(&arguments).unwrap();

        assert_eq!(parameters[0].name.as_deref(), Some("p1"));
        assert!(parameters[0].reference.is_some());
        assert_eq!(parameters[1], ParameterSer::placeholder("p2"));

        let operator_argument = vec![Expression::operator(Some("p".to_string()), "equal", vec![])];
        assert!(matches!(
            encoder().extract_parameters(&operator_argument),
            Err(EncodeError::UnsupportedSlot { .. })
        ));
    }

    #[test]
    fn test_raw_outside_parameters_fails() {
        assert!(matches!(
            encoder().extract_expression(&Expression::raw("x")),
            Err(EncodeError::UnexpectedRaw(_))
        ));
    }
}

//! 表达式解码
//!
//! 在线格式节点 → 内存表达式树。引用节点不携带类型，由规则上下文中
//! 事实和属性的声明类型补全；未知名称按 Object 处理。

use crate::error::{DecodeError, DecodeResult};
use crate::wire::{
    AndSer, BooleanSlot, CustomValueSer, ExpressionSer, FieldSer, FunctionSer, LiteralSer, NotSer,
    OperatorSer, OrSer, ParameterSer, ParameterSlot, PredicateSer, ReferenceSer, ValueSer, ValuesSer,
};
use rule_model::{
    Attribute, DefaultTypeConverter, Expression, Fact, FunctionExpr, Invocation, Literal,
    TypeConverter, ValueType,
};
use std::collections::HashMap;
use std::sync::Arc;

/// 解码上下文：可引用名称 → 声明类型
#[derive(Debug, Clone, Default)]
pub struct DecodeContext {
    references: HashMap<String, ValueType>,
}

impl DecodeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由规则的事实和属性声明构建
    pub fn from_declarations(facts: &[Fact], attributes: &[Attribute]) -> Self {
        let mut context = Self::new();
        for fact in facts {
            context.insert(fact.name.clone(), fact.fact_type.clone());
        }
        for attribute in attributes {
            context.insert(attribute.name.clone(), attribute.value_type.clone());
        }
        context
    }

    pub fn with_reference(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.insert(name, value_type);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value_type: ValueType) {
        self.references.insert(name.into(), value_type);
    }

    /// 引用名称的类型，未声明的名称为 Object
    pub fn type_of(&self, name: &str) -> ValueType {
        self.references.get(name).cloned().unwrap_or(ValueType::Object)
    }
}

/// 表达式解码器
#[derive(Clone)]
pub struct ExpressionDecoder {
    converter: Arc<dyn TypeConverter>,
}

impl ExpressionDecoder {
    pub fn new(converter: Arc<dyn TypeConverter>) -> Self {
        Self { converter }
    }

    /// 解码谓词根容器
    pub fn decode_predicate(&self, predicate: &PredicateSer, context: &DecodeContext) -> DecodeResult<Expression> {
        self.decode_boolean_slot(predicate, "谓词", context)
    }

    /// 解码任意表达式节点
    pub fn decode_expression(&self, wire: &ExpressionSer, context: &DecodeContext) -> DecodeResult<Expression> {
        match wire {
            ExpressionSer::Value(value) => self.decode_value(value),
            ExpressionSer::Values(values) => self.decode_values(values),
            ExpressionSer::CustomValue(custom_value) => decode_custom_value(custom_value),
            ExpressionSer::Reference(reference) => Ok(decode_reference(reference, context)),
            ExpressionSer::Field(field) => decode_field(field),
            ExpressionSer::Operator(operator) => self.decode_operator(operator, context),
            ExpressionSer::And(and) => self.decode_and(and, context),
            ExpressionSer::Or(or) => self.decode_or(or, context),
            ExpressionSer::Not(not) => self.decode_not(not, context),
            ExpressionSer::Function(function) => self.decode_top_level_function(function, context),
        }
    }

    /// 解码函数调用，`name` 为绑定名称
    pub fn decode_function(
        &self,
        function: &FunctionSer,
        name: Option<String>,
        context: &DecodeContext,
    ) -> DecodeResult<FunctionExpr> {
        let value_type: ValueType = function.return_type.parse()?;
        let arguments = function
            .parameter
            .iter()
            .map(|parameter| self.decode_parameter(parameter, context))
            .collect::<DecodeResult<Vec<_>>>()?;

        Ok(FunctionExpr {
            name,
            value_type,
            call: function.name.clone(),
            arguments,
        })
    }

    /// 解码字面量节点，返回声明类型和值
    pub fn decode_literal(&self, literal: &LiteralSer) -> DecodeResult<(ValueType, Literal)> {
        match literal {
            LiteralSer::Value(value) => self.scalar(value),
            LiteralSer::Values(values) => self.collection(values),
            LiteralSer::CustomValue(custom_value) => custom(custom_value),
        }
    }

    /// 布尔槽位恰好填充一个节点，且节点类型为 Boolean
    fn decode_boolean_slot(
        &self,
        slot: &NotSer,
        position: &str,
        context: &DecodeContext,
    ) -> DecodeResult<Expression> {
        let expression = match slot.slots().as_slice() {
            [BooleanSlot::Operator(operator)] => self.decode_operator(operator, context),
            [BooleanSlot::And(and)] => self.decode_and(and, context),
            [BooleanSlot::Or(or)] => self.decode_or(or, context),
            [BooleanSlot::Not(not)] => self.decode_not(not, context),
            [BooleanSlot::Function(function)] => self.decode_top_level_function(function, context),
            [BooleanSlot::Value(value)] => self.decode_value(value),
            slots => Err(DecodeError::InvalidSlots {
                position: position.to_string(),
                count: slots.len(),
            }),
        }?;

        let value_type = expression.value_type();
        if !value_type.is_boolean() {
            return Err(DecodeError::NonBooleanSlot {
                position: position.to_string(),
                value_type: value_type.to_string(),
            });
        }
        Ok(expression)
    }

    /// 参数没有槽位时为名称占位；否则解码唯一槽位并绑定名称
    fn decode_parameter(&self, parameter: &ParameterSer, context: &DecodeContext) -> DecodeResult<Expression> {
        let argument = match parameter.slots().as_slice() {
            [] => {
                return match &parameter.name {
                    Some(name) => Ok(Expression::raw(name.clone())),
                    None => Err(DecodeError::InvalidSlots {
                        position: "未命名参数".to_string(),
                        count: 0,
                    }),
                };
            }
            [ParameterSlot::Value(value)] => self.decode_value(value)?,
            [ParameterSlot::Values(values)] => self.decode_values(values)?,
            [ParameterSlot::CustomValue(custom_value)] => decode_custom_value(custom_value)?,
            [ParameterSlot::Field(field)] => decode_field(field)?,
            [ParameterSlot::Reference(reference)] => decode_reference(reference, context),
            [ParameterSlot::Function(function)] => Expression::Invocation(Invocation::Function(
                self.decode_function(function, None, context)?,
            )),
            slots => {
                return Err(DecodeError::InvalidSlots {
                    position: format!("参数 '{}'", parameter.name.as_deref().unwrap_or_default()),
                    count: slots.len(),
                });
            }
        };

        Ok(argument.with_name(parameter.name.clone()))
    }

    fn decode_value(&self, value: &ValueSer) -> DecodeResult<Expression> {
        self.scalar(value).map(value_expression)
    }

    fn decode_values(&self, values: &ValuesSer) -> DecodeResult<Expression> {
        self.collection(values).map(value_expression)
    }

    fn scalar(&self, value: &ValueSer) -> DecodeResult<(ValueType, Literal)> {
        let value_type: ValueType = value.value_type.parse()?;
        if !self.converter.is_applicable(&value_type) {
            return Err(DecodeError::NotScalar(value.value_type.clone()));
        }
        let literal = self.converter.from_string(&value_type, &value.value)?;
        Ok((value_type, literal))
    }

    fn collection(&self, values: &ValuesSer) -> DecodeResult<(ValueType, Literal)> {
        let element_type: ValueType = values.element_type.parse()?;
        if !self.converter.is_applicable(&element_type) {
            return Err(DecodeError::NotScalar(values.element_type.clone()));
        }

        let items = values
            .value
            .iter()
            .map(|item| match item {
                Some(input) => self.converter.from_string(&element_type, input),
                None => Ok(Literal::Null),
            })
            .collect::<rule_model::Result<Vec<_>>>()?;

        Ok((ValueType::list(element_type), Literal::List(items)))
    }

    fn decode_operator(&self, operator: &OperatorSer, context: &DecodeContext) -> DecodeResult<Expression> {
        if matches!(operator.call.as_str(), "and" | "or" | "not") {
            return Err(DecodeError::ReservedOperator(operator.call.clone()));
        }
        let arguments = self.decode_all(&operator.operand, context)?;
        Ok(Expression::operator(None, operator.call.clone(), arguments))
    }

    fn decode_and(&self, and: &AndSer, context: &DecodeContext) -> DecodeResult<Expression> {
        let arguments = self.decode_all(&and.children, context)?;
        Ok(Expression::operator(None, "and", arguments))
    }

    fn decode_or(&self, or: &OrSer, context: &DecodeContext) -> DecodeResult<Expression> {
        let arguments = self.decode_all(&or.children, context)?;
        Ok(Expression::operator(None, "or", arguments))
    }

    fn decode_not(&self, not: &NotSer, context: &DecodeContext) -> DecodeResult<Expression> {
        let operand = self.decode_boolean_slot(not, "not 操作数", context)?;
        Ok(Expression::operator(None, "not", vec![operand]))
    }

    /// 不在参数位置的函数以调用名作为名称
    fn decode_top_level_function(&self, function: &FunctionSer, context: &DecodeContext) -> DecodeResult<Expression> {
        let function = self.decode_function(function, Some(function.name.clone()), context)?;
        Ok(Expression::Invocation(Invocation::Function(function)))
    }

    fn decode_all(&self, wires: &[ExpressionSer], context: &DecodeContext) -> DecodeResult<Vec<Expression>> {
        wires
            .iter()
            .map(|wire| self.decode_expression(wire, context))
            .collect()
    }
}

impl Default for ExpressionDecoder {
    fn default() -> Self {
        Self::new(Arc::new(DefaultTypeConverter))
    }
}

fn decode_custom_value(custom_value: &CustomValueSer) -> DecodeResult<Expression> {
    custom(custom_value).map(value_expression)
}

/// 载荷缺失表示空值
fn custom(custom_value: &CustomValueSer) -> DecodeResult<(ValueType, Literal)> {
    let value_type: ValueType = custom_value.value_type.parse()?;
    let literal = match &custom_value.any {
        Some(payload) => Literal::from_json(&value_type, payload)?,
        None => Literal::Null,
    };
    Ok((value_type, literal))
}

fn value_expression((value_type, literal): (ValueType, Literal)) -> Expression {
    Expression::value(None, value_type, literal)
}

fn decode_reference(reference: &ReferenceSer, context: &DecodeContext) -> Expression {
    Expression::reference(None, context.type_of(&reference.reference), reference.reference.clone())
}

fn decode_field(field: &FieldSer) -> DecodeResult<Expression> {
    if field.path.is_empty() {
        return Err(DecodeError::EmptyFieldPath(field.reference.clone()));
    }
    let field_type: ValueType = field.field_type.parse()?;
    Ok(Expression::field(
        None,
        field_type,
        field.reference.clone(),
        field.path.clone(),
    ))
}

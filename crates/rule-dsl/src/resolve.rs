//! 操作数解析
//!
//! 将 `Operand` 树解析为不可变的 `Expression` 树：补全引用与字段类型、
//! 规整字面量，并校验布尔位置和函数参数位置的节点种类。

use crate::error::{DslError, Result};
use crate::operand::{Operand, Parameter};
use crate::schema::{FieldTypeResolver, SchemaRegistry};
use rule_model::{
    Attribute, DefaultTypeConverter, Expression, Fact, FunctionExpr, Invocation, Literal,
    TypeConverter, ValueType,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// 动作上下文的内置引用名，类型为 Object
pub const CONTEXT_REFERENCE: &str = "ctx";

pub(crate) struct Resolver {
    /// 可引用的名称及其类型（事实、属性、动作上下文）
    scope: HashMap<String, ValueType>,
    /// 可做字段访问的事实
    facts: HashMap<String, ValueType>,
    schemas: Arc<dyn FieldTypeResolver>,
    converter: Arc<dyn TypeConverter>,
}

impl Resolver {
    pub(crate) fn new(
        facts: &[Fact],
        attributes: &[Attribute],
        schemas: Arc<dyn FieldTypeResolver>,
        converter: Arc<dyn TypeConverter>,
    ) -> Self {
        let mut scope = HashMap::new();
        scope.insert(CONTEXT_REFERENCE.to_string(), ValueType::Object);

        let mut fact_types = HashMap::new();
        for fact in facts {
            scope.insert(fact.name.clone(), fact.fact_type.clone());
            fact_types.insert(fact.name.clone(), fact.fact_type.clone());
        }
        for attribute in attributes {
            scope.insert(attribute.name.clone(), attribute.value_type.clone());
        }

        Self {
            scope,
            facts: fact_types,
            schemas,
            converter,
        }
    }

    pub(crate) fn standalone() -> Self {
        Self::new(
            &[],
            &[],
            Arc::new(SchemaRegistry::new()),
            Arc::new(DefaultTypeConverter),
        )
    }

    pub(crate) fn resolve(&self, operand: Operand) -> Result<Expression> {
        self.resolve_named(operand, None)
    }

    /// 解析谓词根节点，必须为布尔类型且可放入谓词位置
    pub(crate) fn resolve_predicate(&self, operand: Operand) -> Result<Expression> {
        let predicate = self.resolve(operand)?;
        if !predicate.value_type().is_boolean() {
            return Err(DslError::NonBooleanPredicate(predicate.value_type().to_string()));
        }
        check_boolean_slot(&predicate, "谓词")?;
        Ok(predicate)
    }

    /// 解析动作，动作是返回 Void 的函数调用
    pub(crate) fn resolve_action(&self, call: String, parameters: Vec<Parameter>) -> Result<FunctionExpr> {
        self.resolve_function(call, ValueType::Void, parameters, None)
    }

    fn resolve_named(&self, operand: Operand, name: Option<String>) -> Result<Expression> {
        match operand {
            Operand::Value { value, value_type } => {
                let value_type = value_type.unwrap_or_else(|| value.value_type());
                value_type.validate()?;
                let value = value.coerce_to(&value_type, self.converter.as_ref())?;
                Ok(Expression::value(name, value_type, value))
            }
            Operand::Values {
                element_type,
                items,
            } => {
                element_type.validate()?;
                let items = items
                    .into_iter()
                    .map(|item| item.coerce_to(&element_type, self.converter.as_ref()))
                    .collect::<rule_model::Result<Vec<_>>>()?;
                Ok(Expression::value(
                    name,
                    ValueType::list(element_type),
                    Literal::List(items),
                ))
            }
            Operand::Reference {
                reference,
                value_type,
            } => {
                let declared = self
                    .scope
                    .get(&reference)
                    .ok_or_else(|| DslError::UnknownReference(reference.clone()))?;

                if let Some(requested) = value_type
                    && &requested != declared
                {
                    return Err(DslError::ReferenceTypeConflict {
                        reference,
                        declared: declared.to_string(),
                        requested: requested.to_string(),
                    });
                }

                Ok(Expression::reference(name, declared.clone(), reference))
            }
            Operand::Field {
                reference,
                path,
                field_type,
            } => {
                if path.is_empty() {
                    return Err(DslError::EmptyFieldPath(reference));
                }

                let fact_type = self
                    .facts
                    .get(&reference)
                    .ok_or_else(|| DslError::UnknownReference(reference.clone()))?;

                let field_type = match field_type {
                    Some(field_type) => field_type,
                    None => self.schemas.resolve_path(fact_type, &path).ok_or_else(|| {
                        DslError::UnresolvedField {
                            reference: reference.clone(),
                            path: path.clone(),
                        }
                    })?,
                };

                field_type.validate()?;
                trace!(reference = %reference, path = %path, field_type = %field_type, "Resolved field");
                Ok(Expression::field(name, field_type, reference, path))
            }
            Operand::Operator { call, arguments } => {
                let arguments = arguments
                    .into_iter()
                    .map(|argument| self.resolve(argument))
                    .collect::<Result<Vec<_>>>()?;

                if (call == "and" || call == "or") && arguments.is_empty() {
                    return Err(DslError::EmptyGroup(call));
                }
                if call == "not" {
                    if arguments.len() != 1 {
                        return Err(DslError::InvalidArity {
                            call,
                            expected: 1,
                            actual: arguments.len(),
                        });
                    }
                    check_boolean_slot(&arguments[0], "not 操作数")?;
                }

                Ok(Expression::operator(name, call, arguments))
            }
            Operand::Function {
                call,
                return_type,
                parameters,
            } => Ok(Expression::Invocation(Invocation::Function(
                self.resolve_function(call, return_type, parameters, name)?,
            ))),
        }
    }

    /// 解析函数调用，未绑定名称的函数以调用名作为名称
    fn resolve_function(
        &self,
        call: String,
        return_type: ValueType,
        parameters: Vec<Parameter>,
        name: Option<String>,
    ) -> Result<FunctionExpr> {
        return_type.validate()?;
        let mut arguments = Vec::with_capacity(parameters.len());
        for Parameter { name: param_name, operand } in parameters {
            let argument = self.resolve_named(operand, Some(param_name.clone()))?;
            if argument.as_operator().is_some() {
                return Err(DslError::UnsupportedPosition {
                    position: format!("函数 '{}' 的参数 '{}'", call, param_name),
                    kind: describe(&argument),
                });
            }
            arguments.push(argument);
        }

        Ok(FunctionExpr {
            name: name.or_else(|| Some(call.clone())),
            value_type: return_type,
            call,
            arguments,
        })
    }
}

/// 布尔位置（谓词根节点、not 操作数）只接受布尔类型的调用或非空布尔字面量
fn check_boolean_slot(expression: &Expression, position: &str) -> Result<()> {
    let allowed = match expression {
        Expression::Invocation(invocation) => invocation.value_type().is_boolean(),
        Expression::Value(value) => value.value_type.is_boolean() && !value.value.is_null(),
        Expression::Reference(_) | Expression::Raw(_) => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(DslError::UnsupportedPosition {
            position: position.to_string(),
            kind: describe(expression),
        })
    }
}

fn describe(expression: &Expression) -> String {
    match expression {
        Expression::Value(value) if value.value.is_null() => format!("{} 类型的空值", value.value_type),
        Expression::Value(value) => format!("{} 类型的字面量", value.value_type),
        Expression::Reference(reference) => match &reference.path {
            Some(path) => format!("字段引用 '{}.{}'", reference.reference, path),
            None => format!("引用 '{}'", reference.reference),
        },
        Expression::Invocation(Invocation::Operator(op)) => format!("操作符 '{}'", op.call),
        Expression::Invocation(Invocation::Function(func)) => {
            format!("返回 {} 的函数 '{}'", func.value_type, func.call)
        }
        Expression::Raw(raw) => format!("名称占位 '{}'", raw.name),
    }
}

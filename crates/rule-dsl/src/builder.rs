//! 规则构建器
//!
//! 单次构建会话：链式声明名称、事实、属性、谓词和动作，`build` 时统一校验
//! 并产出不可变的 `Rule`。链式方法本身不会失败，记录的第一个错误由 `build` 返回。

use crate::error::{DslError, Result};
use crate::operand::{Operand, Parameter};
use crate::resolve::Resolver;
use crate::schema::{FieldTypeResolver, SchemaRegistry};
use rule_model::{
    Attribute, DefaultTypeConverter, Expression, Fact, Literal, RULE_NAME_ATTRIBUTE, Rule,
    TypeConverter, ValueType,
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// 开始一次规则构建会话
pub fn rule_builder() -> RuleBuilder {
    RuleBuilder::new()
}

/// 规则构建器
pub struct RuleBuilder {
    name: Option<String>,
    facts: Vec<Fact>,
    attributes: Vec<(String, Literal)>,
    predicate: Option<Operand>,
    actions: Vec<(String, Vec<Parameter>)>,
    schemas: Arc<dyn FieldTypeResolver>,
    converter: Arc<dyn TypeConverter>,
    /// 链式调用过程中记录的错误
    errors: Vec<DslError>,
}

impl RuleBuilder {
    pub fn new() -> Self {
        Self {
            name: None,
            facts: Vec::new(),
            attributes: Vec::new(),
            predicate: None,
            actions: Vec::new(),
            schemas: Arc::new(SchemaRegistry::new()),
            converter: Arc::new(DefaultTypeConverter),
            errors: Vec::new(),
        }
    }

    /// 设置规则名称，同时登记合成属性 `ruleName`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 声明事实，名称不可重复，类型必须可在线传输
    pub fn fact(mut self, name: impl Into<String>, fact_type: ValueType) -> Self {
        let name = name.into();
        if self.facts.iter().any(|f| f.name == name) {
            self.errors.push(DslError::DuplicateFact(name));
        } else if let Err(error) = fact_type.validate() {
            self.errors.push(error.into());
        } else {
            self.facts.push(Fact::new(name, fact_type));
        }
        self
    }

    /// 声明属性，类型按值推断
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Literal>) -> Self {
        let name = name.into();
        if name == RULE_NAME_ATTRIBUTE || self.attributes.iter().any(|(n, _)| *n == name) {
            self.errors.push(DslError::DuplicateAttribute(name));
        } else {
            self.attributes.push((name, value.into()));
        }
        self
    }

    /// 设置谓词
    pub fn predicate(mut self, predicate: Operand) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// 追加动作
    pub fn action(mut self, call: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        self.actions.push((call.into(), parameters));
        self
    }

    /// 安装字段类型结构，用于解析未指定类型的字段引用
    pub fn schemas(mut self, schemas: impl FieldTypeResolver + 'static) -> Self {
        self.schemas = Arc::new(schemas);
        self
    }

    /// 替换字面量规整使用的类型转换器
    pub fn converter(mut self, converter: Arc<dyn TypeConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// 在当前会话的声明下解析一棵独立的表达式子树
    pub fn expression(&self, operand: Operand) -> Result<Expression> {
        let attributes = self.collect_attributes()?;
        self.resolver(&attributes).resolve(operand)
    }

    /// 校验并构建规则
    #[instrument(skip(self), fields(rule_name = ?self.name))]
    pub fn build(self) -> Result<Rule> {
        if let Some(error) = self.errors.first() {
            return Err(error.clone());
        }

        let name = match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => return Err(DslError::MissingRuleName),
        };

        let attributes = self.collect_attributes()?;
        let resolver = self.resolver(&attributes);

        let predicate = match self.predicate {
            Some(predicate) => resolver.resolve_predicate(predicate)?,
            None => return Err(DslError::MissingPredicate(name)),
        };

        let actions = self
            .actions
            .into_iter()
            .map(|(call, parameters)| resolver.resolve_action(call, parameters))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            facts = self.facts.len(),
            attributes = attributes.len(),
            actions = actions.len(),
            predicate_nodes = predicate.node_count(),
            "Rule built"
        );

        Ok(Rule::new(name, attributes, self.facts, predicate, actions))
    }

    /// 合成属性在首位，其余属性按声明顺序规整类型
    fn collect_attributes(&self) -> Result<Vec<Attribute>> {
        let mut attributes = Vec::with_capacity(self.attributes.len() + 1);

        if let Some(name) = &self.name {
            attributes.push(Attribute::new(
                RULE_NAME_ATTRIBUTE,
                ValueType::String,
                Literal::String(name.clone()),
            ));
        }

        for (name, value) in &self.attributes {
            if self.facts.iter().any(|f| &f.name == name) {
                return Err(DslError::NameConflict(name.clone()));
            }
            let value_type = value.value_type();
            let value = value.clone().coerce_to(&value_type, self.converter.as_ref())?;
            attributes.push(Attribute::new(name.clone(), value_type, value));
        }

        Ok(attributes)
    }

    fn resolver(&self, attributes: &[Attribute]) -> Resolver {
        Resolver::new(
            &self.facts,
            attributes,
            Arc::clone(&self.schemas),
            Arc::clone(&self.converter),
        )
    }
}

impl Default for RuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

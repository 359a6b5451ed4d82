//! 规则聚合

use crate::expression::{Expression, FunctionExpr};
use crate::literal::Literal;
use crate::types::ValueType;

/// 规则名称对应的合成属性名
pub const RULE_NAME_ATTRIBUTE: &str = "ruleName";

/// 规则级常量属性
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value_type: ValueType,
    pub value: Literal,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value_type: ValueType, value: Literal) -> Self {
        Self {
            name: name.into(),
            value_type,
            value,
        }
    }
}

/// 规则声明的输入事实
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub name: String,
    pub fact_type: ValueType,
}

impl Fact {
    pub fn new(name: impl Into<String>, fact_type: ValueType) -> Self {
        Self {
            name: name.into(),
            fact_type,
        }
    }
}

/// 规则定义
///
/// 构建完成后不可变；`attributes` 总是包含名为 `ruleName` 的合成属性。
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    name: String,
    attributes: Vec<Attribute>,
    facts: Vec<Fact>,
    predicate: Expression,
    actions: Vec<FunctionExpr>,
}

impl Rule {
    /// 创建规则
    ///
    /// `ruleName` 属性总是由 `name` 合成：已有同名属性时原位替换（重复项移除），
    /// 缺少时补在首位。
    pub fn new(
        name: impl Into<String>,
        mut attributes: Vec<Attribute>,
        facts: Vec<Fact>,
        predicate: Expression,
        actions: Vec<FunctionExpr>,
    ) -> Self {
        let name = name.into();
        let position = attributes
            .iter()
            .position(|a| a.name == RULE_NAME_ATTRIBUTE)
            .unwrap_or(0);
        attributes.retain(|a| a.name != RULE_NAME_ATTRIBUTE);
        attributes.insert(
            position,
            Attribute::new(RULE_NAME_ATTRIBUTE, ValueType::String, Literal::String(name.clone())),
        );

        Self {
            name,
            attributes,
            facts,
            predicate,
            actions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    pub fn predicate(&self) -> &Expression {
        &self.predicate
    }

    pub fn actions(&self) -> &[FunctionExpr] {
        &self.actions
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn fact(&self, name: &str) -> Option<&Fact> {
        self.facts.iter().find(|f| f.name == name)
    }
}

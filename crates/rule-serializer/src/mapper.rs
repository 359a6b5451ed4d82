//! 规则映射
//!
//! `Rule` 与 `RuleSer` 之间的双向转换，以及 JSON 绑定辅助函数。

use crate::decoder::{DecodeContext, ExpressionDecoder};
use crate::encoder::ExpressionEncoder;
use crate::error::{DecodeError, DecodeResult, EncodeResult};
use crate::wire::{AttributeSer, FactSer, RuleSer};
use rule_model::{
    Attribute, DefaultTypeConverter, Fact, Literal, RULE_NAME_ATTRIBUTE, Rule, TypeConverter,
    ValueType,
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// 规则映射器
#[derive(Clone)]
pub struct RuleMapper {
    encoder: ExpressionEncoder,
    decoder: ExpressionDecoder,
}

impl RuleMapper {
    pub fn new(converter: Arc<dyn TypeConverter>) -> Self {
        Self {
            encoder: ExpressionEncoder::new(Arc::clone(&converter)),
            decoder: ExpressionDecoder::new(converter),
        }
    }

    pub fn encoder(&self) -> &ExpressionEncoder {
        &self.encoder
    }

    pub fn decoder(&self) -> &ExpressionDecoder {
        &self.decoder
    }

    /// 内存规则 → 在线格式
    #[instrument(skip_all, fields(rule_name = %rule.name()))]
    pub fn to_wire(&self, rule: &Rule) -> EncodeResult<RuleSer> {
        let attribute = rule
            .attributes()
            .iter()
            .map(|attribute| AttributeSer {
                name: attribute.name.clone(),
                value: self.encoder.encode_literal(&attribute.value_type, &attribute.value),
            })
            .collect();

        let fact = rule
            .facts()
            .iter()
            .map(|fact| FactSer {
                name: fact.name.clone(),
                fact_type: fact.fact_type.to_string(),
            })
            .collect();

        let predicate = self.encoder.map(rule.predicate())?;

        let action = rule
            .actions()
            .iter()
            .map(|action| self.encoder.encode_function(action))
            .collect::<EncodeResult<Vec<_>>>()?;

        debug!("Rule encoded");
        Ok(RuleSer {
            attribute,
            fact,
            predicate,
            action,
        })
    }

    /// 在线格式 → 内存规则，规则名取自 `ruleName` 属性
    #[instrument(skip_all)]
    pub fn from_wire(&self, wire: &RuleSer) -> DecodeResult<Rule> {
        let facts = wire
            .fact
            .iter()
            .map(|fact| -> DecodeResult<Fact> {
                Ok(Fact::new(fact.name.clone(), fact.fact_type.parse::<ValueType>()?))
            })
            .collect::<DecodeResult<Vec<_>>>()?;

        let attributes = wire
            .attribute
            .iter()
            .map(|attribute| -> DecodeResult<Attribute> {
                let (value_type, value) = self.decoder.decode_literal(&attribute.value)?;
                Ok(Attribute::new(attribute.name.clone(), value_type, value))
            })
            .collect::<DecodeResult<Vec<_>>>()?;

        let name = attributes
            .iter()
            .find(|attribute| attribute.name == RULE_NAME_ATTRIBUTE)
            .and_then(|attribute| match &attribute.value {
                Literal::String(name) => Some(name.clone()),
                _ => None,
            })
            .ok_or(DecodeError::MissingRuleName)?;

        let context = DecodeContext::from_declarations(&facts, &attributes);
        let predicate = self.decoder.decode_predicate(&wire.predicate, &context)?;

        let actions = wire
            .action
            .iter()
            .map(|action| self.decoder.decode_function(action, Some(action.name.clone()), &context))
            .collect::<DecodeResult<Vec<_>>>()?;

        debug!(rule_name = %name, actions = actions.len(), "Rule decoded");
        Ok(Rule::new(name, attributes, facts, predicate, actions))
    }
}

impl Default for RuleMapper {
    fn default() -> Self {
        Self::new(Arc::new(DefaultTypeConverter))
    }
}

/// 序列化为 JSON 文本
pub fn to_json_string(rule: &RuleSer, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(rule)
    } else {
        serde_json::to_string(rule)
    }
}

/// 从 JSON 文本解析
pub fn from_json_str(input: &str) -> serde_json::Result<RuleSer> {
    serde_json::from_str(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rule_model::Expression;
    use serde_json::json;

    fn sample_rule() -> Rule {
        Rule::new(
            "r1",
            vec![Attribute::new("limit", ValueType::Long, Literal::Long(10))],
            vec![Fact::new("f", ValueType::custom("F"))],
            Expression::operator(
                None,
                "less",
                vec![
                    Expression::field(None, ValueType::Long, "f", "n"),
                    Expression::reference(None, ValueType::Long, "limit"),
                ],
            ),
            vec![],
        )
    }

    #[test]
    fn test_to_wire_puts_rule_name_first() {
        let wire = RuleMapper::default().to_wire(&sample_rule()).unwrap();
        let names: Vec<_> = wire.attribute.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec![RULE_NAME_ATTRIBUTE, "limit"]);
        assert_eq!(
            wire.fact,
            vec![FactSer {
                name: "f".to_string(),
                fact_type: "F".to_string(),
            }]
        );
    }

    #[test]
    fn test_round_trip_restores_reference_types() {
        let mapper = RuleMapper::default();
        let rule = sample_rule();
        let decoded = mapper.from_wire(&mapper.to_wire(&rule).unwrap()).unwrap();
        assert_eq!(decoded, rule);
    }

    #[test]
    fn test_missing_rule_name() {
        let wire: RuleSer = serde_json::from_value(json!({
            "predicate": {"value": {"type": "Boolean", "value": "true"}}
        }))
        .unwrap();
        assert!(matches!(
            RuleMapper::default().from_wire(&wire),
            Err(DecodeError::MissingRuleName)
        ));
    }

    #[test]
    fn test_json_helpers() {
        let wire = RuleMapper::default().to_wire(&sample_rule()).unwrap();
        let compact = to_json_string(&wire, false).unwrap();
        let pretty = to_json_string(&wire, true).unwrap();
        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
        assert_eq!(from_json_str(&compact).unwrap(), wire);
    }
}

//! 规则构建 DSL 集成测试
//!
//! 覆盖完整规则构建、类型推断与构建期错误。

use chrono::DateTime;
use rule_dsl::*;
use rule_model::{Attribute, Expression, Fact, FunctionExpr, Literal, RULE_NAME_ATTRIBUTE, ValueType};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

fn example_fact() -> ValueType {
    ValueType::custom("ExampleFact")
}

fn other_fact() -> ValueType {
    ValueType::custom("OtherFact")
}

fn schemas() -> SchemaRegistry {
    SchemaRegistry::new()
        .register(
            FactSchema::new("ExampleFact")
                .field("startDate", ValueType::ZonedDateTime)
                .field("stopDate", ValueType::ZonedDateTime),
        )
        .register(
            FactSchema::new("OtherFact")
                .field("enabled", ValueType::Boolean)
                .field("number", ValueType::Long),
        )
}

fn expected_predicate() -> Expression {
    Expression::operator(
        None,
        "and",
        vec![
            Expression::operator(
                None,
                "or",
                vec![
                    Expression::operator(
                        None,
                        "less-or-equal",
                        vec![
                            Expression::value(None, ValueType::Long, Literal::Long(123)),
                            Expression::field(None, ValueType::Long, "otherFact", "number"),
                        ],
                    ),
                    Expression::operator(
                        None,
                        "match",
                        vec![
                            Expression::reference(None, ValueType::String, "stringValue"),
                            Expression::value(None, ValueType::String, Literal::from("10")),
                        ],
                    ),
                    Expression::operator(
                        None,
                        "asd",
                        vec![
                            Expression::field(None, ValueType::String, "otherFact", "enabled"),
                            Expression::value(None, ValueType::Boolean, Literal::Boolean(true)),
                        ],
                    ),
                    Expression::operator(
                        None,
                        "and",
                        vec![
                            Expression::operator(
                                None,
                                "equal",
                                vec![
                                    Expression::field(None, ValueType::Boolean, "otherFact", "enabled"),
                                    Expression::value(None, ValueType::Boolean, Literal::Boolean(true)),
                                ],
                            ),
                            Expression::operator(
                                None,
                                "not",
                                vec![Expression::value(
                                    None,
                                    ValueType::Boolean,
                                    Literal::Boolean(true),
                                )],
                            ),
                        ],
                    ),
                ],
            ),
            Expression::operator(
                None,
                "less",
                vec![
                    Expression::field(None, ValueType::ZonedDateTime, "exampleFact", "startDate"),
                    Expression::field(None, ValueType::ZonedDateTime, "exampleFact", "stopDate"),
                ],
            ),
            Expression::operator(
                None,
                "contains",
                vec![
                    Expression::value(
                        None,
                        ValueType::list(ValueType::String),
                        Literal::from(vec!["a", "b", "c"]),
                    ),
                    Expression::value(None, ValueType::String, Literal::from("c")),
                ],
            ),
            Expression::function(
                Some("function".to_string()),
                ValueType::Boolean,
                "function",
                vec![
                    Expression::reference(Some("param1".to_string()), ValueType::String, "ruleName"),
                    Expression::value(
                        Some("param2".to_string()),
                        ValueType::String,
                        Literal::from("my value"),
                    ),
                ],
            ),
        ],
    )
}

// ==================== 完整规则构建 ====================

#[test]
fn test_build_complete_rule() {
    let rule = rule_builder()
        .name("this.is.MyRuleName")
        .schemas(schemas())
        .fact("exampleFact", example_fact())
        .fact("otherFact", other_fact())
        .attribute("stringValue", "string")
        .attribute("doubleValue", 1.0)
        .predicate(and(vec![
            or(vec![
                less_or_equal(value(123i64), field_path("otherFact.number")),
                matches(typed_reference("stringValue", ValueType::String), value("10")),
                operator(
                    "asd",
                    vec![
                        typed_field("otherFact", "enabled", ValueType::String),
                        value(true),
                    ],
                ),
                and(vec![
                    equal(field_path("otherFact.enabled"), value(true)),
                    not(typed_value("true", ValueType::Boolean)),
                ]),
            ]),
            less(field("exampleFact", "startDate"), field("exampleFact", "stopDate")),
            operator(
                "contains",
                vec![values(ValueType::String, ["a", "b", "c"]), value("c")],
            ),
            function(
                "function",
                ValueType::Boolean,
                vec![
                    param("param1", reference("ruleName")),
                    param("param2", value("my value")),
                ],
            ),
        ]))
        .action("exampleAction", vec![param("param1", reference(CONTEXT_REFERENCE))])
        .build()
        .unwrap();

    assert_eq!(
        rule.attributes(),
        &[
            Attribute::new(RULE_NAME_ATTRIBUTE, ValueType::String, Literal::from("this.is.MyRuleName")),
            Attribute::new("stringValue", ValueType::String, Literal::from("string")),
            Attribute::new("doubleValue", ValueType::Double, Literal::Double(1.0)),
        ]
    );
    assert_eq!(
        rule.facts(),
        &[
            Fact::new("exampleFact", example_fact()),
            Fact::new("otherFact", other_fact()),
        ]
    );
    assert_eq!(rule.predicate(), &expected_predicate());
    assert_eq!(
        rule.actions(),
        &[FunctionExpr {
            name: Some("exampleAction".to_string()),
            value_type: ValueType::Void,
            call: "exampleAction".to_string(),
            arguments: vec![Expression::reference(
                Some("param1".to_string()),
                ValueType::Object,
                CONTEXT_REFERENCE,
            )],
        }]
    );
}

// ==================== 字面量 ====================

#[test]
fn test_typed_values() {
    let cases: Vec<(ValueType, Literal)> = vec![
        (ValueType::Boolean, Literal::Boolean(true)),
        (ValueType::Boolean, Literal::Null),
        (ValueType::Integer, Literal::Integer(10)),
        (ValueType::Long, Literal::Long(100)),
        (ValueType::String, Literal::from("string")),
        (
            ValueType::Decimal,
            Literal::Decimal(Decimal::from_str("100.123").unwrap()),
        ),
        (
            ValueType::ZonedDateTime,
            Literal::DateTime(DateTime::parse_from_rfc3339("2024-01-15T10:00:00Z").unwrap()),
        ),
        (ValueType::custom("Bean"), Literal::Custom(json!({"id": 1}))),
        (ValueType::custom("Bean"), Literal::Null),
        (ValueType::list(ValueType::Object), Literal::List(vec![])),
    ];

    for (value_type, literal) in cases {
        let expression = typed_value(literal.clone(), value_type.clone()).build().unwrap();
        let value = expression.as_value().unwrap();
        assert_eq!(value.value, literal);
        assert_eq!(value.value_type, value_type);
    }
}

#[test]
fn test_collection_values() {
    let cases: Vec<(ValueType, Vec<Literal>)> = vec![
        (
            ValueType::Boolean,
            vec![Literal::Boolean(true), Literal::Boolean(false), Literal::Null],
        ),
        (ValueType::Integer, vec![Literal::Integer(10), Literal::Integer(20)]),
        (ValueType::Long, vec![Literal::Long(10), Literal::Long(20)]),
        (ValueType::Integer, vec![Literal::Integer(10)]),
        (ValueType::String, vec![Literal::from("1"), Literal::from("2")]),
        (
            ValueType::custom("Bean"),
            vec![Literal::Custom(json!({})), Literal::Custom(json!({})), Literal::Null],
        ),
    ];

    for (element_type, items) in cases {
        let expression = values(element_type.clone(), items.clone()).build().unwrap();
        let value = expression.as_value().unwrap();
        assert_eq!(value.value, Literal::List(items));
        assert_eq!(value.value_type, ValueType::list(element_type));
        assert_eq!(
            value.value_type.to_string(),
            format!("List<{}>", value.value_type.element_type().unwrap())
        );
    }
}

#[test]
fn test_collection_values_coerce_elements() {
    let expression = values(ValueType::Long, [1, 2]).build().unwrap();
    assert_eq!(
        expression.as_value().unwrap().value,
        Literal::List(vec![Literal::Long(1), Literal::Long(2)])
    );

    let result = values(ValueType::Integer, ["1", "x"]).build();
    assert!(matches!(result, Err(DslError::Conversion(_))));
}

// ==================== 构建期错误 ====================

#[test]
fn test_unresolvable_field_fails_at_build() {
    let result = rule_builder()
        .name("r1")
        .schemas(schemas())
        .fact("otherFact", other_fact())
        .predicate(equal(field("otherFact", "missing"), value(1)))
        .build();

    assert_eq!(
        result.unwrap_err(),
        DslError::UnresolvedField {
            reference: "otherFact".to_string(),
            path: "missing".to_string(),
        }
    );
}

#[test]
fn test_field_without_schema_fails_at_build() {
    let result = rule_builder()
        .name("r1")
        .fact("otherFact", other_fact())
        .predicate(equal(field("otherFact", "number"), value(1i64)))
        .build();

    assert!(matches!(result, Err(DslError::UnresolvedField { .. })));
}

#[test]
fn test_explicit_field_type_skips_schema() {
    let rule = rule_builder()
        .name("r1")
        .fact("otherFact", other_fact())
        .predicate(equal(
            typed_field("otherFact", "number", ValueType::Long),
            value(1i64),
        ))
        .build()
        .unwrap();

    let equal_op = rule.predicate().as_operator().unwrap();
    assert_eq!(equal_op.arguments[0].value_type(), &ValueType::Long);
}

#[test]
fn test_undeclared_fact_fails_at_build() {
    let result = rule_builder()
        .name("r1")
        .schemas(schemas())
        .predicate(equal(field("ghost", "number"), value(1)))
        .build();
    assert_eq!(result.unwrap_err(), DslError::UnknownReference("ghost".to_string()));

    let result = rule_builder()
        .name("r1")
        .predicate(function("f", ValueType::Boolean, vec![param("p", reference("ghost"))]))
        .build();
    assert_eq!(result.unwrap_err(), DslError::UnknownReference("ghost".to_string()));
}

#[test]
fn test_reference_type_conflict() {
    let result = rule_builder()
        .name("r1")
        .attribute("limit", 10)
        .predicate(function(
            "f",
            ValueType::Boolean,
            vec![param("p", typed_reference("limit", ValueType::String))],
        ))
        .build();

    assert_eq!(
        result.unwrap_err(),
        DslError::ReferenceTypeConflict {
            reference: "limit".to_string(),
            declared: "Integer".to_string(),
            requested: "String".to_string(),
        }
    );
}

#[test]
fn test_literal_type_mismatch() {
    let result = rule_builder()
        .name("r1")
        .predicate(equal(typed_value(true, ValueType::Integer), value(1)))
        .build();
    assert!(matches!(result, Err(DslError::Conversion(_))));
}

#[test]
fn test_boolean_reference_predicate_is_rejected() {
    let result = rule_builder()
        .name("r1")
        .attribute("enabled", true)
        .predicate(reference("enabled"))
        .build();
    assert!(matches!(result, Err(DslError::UnsupportedPosition { .. })));
}

#[test]
fn test_null_boolean_cannot_be_negated() {
    let result = not(typed_value(Literal::Null, ValueType::Boolean)).build();
    assert!(matches!(result, Err(DslError::UnsupportedPosition { .. })));
}

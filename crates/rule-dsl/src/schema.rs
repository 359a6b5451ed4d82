//! 事实类型结构注册
//!
//! 未显式指定类型的字段引用，在构建时沿事实声明类型逐段解析字段类型。
//! 结构信息由调用方显式注册，不依赖运行时类型反射。

use rule_model::ValueType;
use std::collections::HashMap;

/// 字段类型解析器
pub trait FieldTypeResolver: Send + Sync {
    /// 解析某类型上单个字段的类型
    fn field_type(&self, owner: &ValueType, field: &str) -> Option<ValueType>;

    /// 沿点号分隔的路径逐段解析，任一段失败返回 None
    fn resolve_path(&self, root: &ValueType, path: &str) -> Option<ValueType> {
        if path.is_empty() {
            return None;
        }

        path.split('.').try_fold(root.clone(), |current, segment| {
            if segment.is_empty() {
                None
            } else {
                self.field_type(&current, segment)
            }
        })
    }
}

/// 单个自定义类型的字段结构
#[derive(Debug, Clone, Default)]
pub struct FactSchema {
    type_name: String,
    fields: HashMap<String, ValueType>,
}

impl FactSchema {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: HashMap::new(),
        }
    }

    /// 声明字段
    pub fn field(mut self, name: impl Into<String>, field_type: ValueType) -> Self {
        self.fields.insert(name.into(), field_type);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// 结构对应的类型
    pub fn value_type(&self) -> ValueType {
        ValueType::custom(self.type_name.clone())
    }

    pub fn get(&self, field: &str) -> Option<&ValueType> {
        self.fields.get(field)
    }
}

/// 类型结构注册表，按类型名索引
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, FactSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册类型结构（链式调用）
    pub fn register(mut self, schema: FactSchema) -> Self {
        self.insert(schema);
        self
    }

    /// 注册类型结构，同名结构会被覆盖
    pub fn insert(&mut self, schema: FactSchema) {
        self.schemas.insert(schema.type_name.clone(), schema);
    }

    pub fn get(&self, type_name: &str) -> Option<&FactSchema> {
        self.schemas.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl FieldTypeResolver for SchemaRegistry {
    fn field_type(&self, owner: &ValueType, field: &str) -> Option<ValueType> {
        let type_name = owner.custom_name()?;
        self.get(type_name)?.get(field).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
            .register(
                FactSchema::new("Order")
                    .field("amount", ValueType::Decimal)
                    .field("customer", ValueType::custom("Customer")),
            )
            .register(FactSchema::new("Customer").field("vip", ValueType::Boolean))
    }

    #[test]
    fn test_resolve_single_segment() {
        let registry = registry();
        assert_eq!(
            registry.resolve_path(&ValueType::custom("Order"), "amount"),
            Some(ValueType::Decimal)
        );
    }

    #[test]
    fn test_resolve_nested_path() {
        let registry = registry();
        assert_eq!(
            registry.resolve_path(&ValueType::custom("Order"), "customer.vip"),
            Some(ValueType::Boolean)
        );
    }

    #[test]
    fn test_resolve_failures() {
        let registry = registry();
        let order = ValueType::custom("Order");

        assert_eq!(registry.resolve_path(&order, "missing"), None);
        assert_eq!(registry.resolve_path(&order, "amount.scale"), None);
        assert_eq!(registry.resolve_path(&order, ""), None);
        assert_eq!(registry.resolve_path(&order, "customer..vip"), None);
        assert_eq!(registry.resolve_path(&ValueType::custom("Unknown"), "amount"), None);
        assert_eq!(registry.resolve_path(&ValueType::Integer, "amount"), None);
    }
}

use super::{ExpressionScope, Operator, Value};

/// Condition on the sort key of a query
///
/// Only single-field comparisons and ranges are allowed in a key-condition
/// expression, so there is no `IN` and no boolean composition here. The key
/// attribute is written unescaped, as `SK = :SK`, unless it is a reserved
/// word.
#[derive(Clone, Debug, PartialEq)]
pub struct SortKeyCondition {
    operator: Operator,
    operands: Vec<Value>,
}

impl SortKeyCondition {
    fn new(operator: Operator, operands: Vec<Value>) -> Self {
        Self { operator, operands }
    }

    /// `SK = :SK`
    pub fn eq(value: impl Into<Value>) -> Self {
        Self::new(Operator::Eq, vec![value.into()])
    }

    /// `SK <> :SK`
    pub fn neq(value: impl Into<Value>) -> Self {
        Self::new(Operator::Ne, vec![value.into()])
    }

    /// `SK < :SK`
    pub fn lt(value: impl Into<Value>) -> Self {
        Self::new(Operator::Lt, vec![value.into()])
    }

    /// `SK <= :SK`
    pub fn lte(value: impl Into<Value>) -> Self {
        Self::new(Operator::Le, vec![value.into()])
    }

    /// `SK > :SK`
    pub fn gt(value: impl Into<Value>) -> Self {
        Self::new(Operator::Gt, vec![value.into()])
    }

    /// `SK >= :SK`
    pub fn gte(value: impl Into<Value>) -> Self {
        Self::new(Operator::Ge, vec![value.into()])
    }

    /// `begins_with(SK, :SK)`
    pub fn begins_with(prefix: impl Into<Value>) -> Self {
        Self::new(Operator::BeginsWith, vec![prefix.into()])
    }

    /// `SK BETWEEN :SK AND :SK_1`
    pub fn between(lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        Self::new(Operator::Between, vec![lower.into(), upper.into()])
    }

    /// Comparison this condition renders
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Render against the sort key attribute `key` into a key-condition scope
    pub fn apply(&self, key: &str, scope: &mut ExpressionScope<'_>) {
        let registry = scope.registry();
        let name = registry.ref_key(key);
        let values: Vec<String> = self
            .operands
            .iter()
            .map(|value| registry.ref_value(key, value.clone()))
            .collect();
        scope.push(&self.operator.render(&name, &values));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Registry;

    fn render(partition: Option<&str>, condition: SortKeyCondition) -> Option<String> {
        let mut registry = Registry::new();
        let mut scope = ExpressionScope::with_expression(&mut registry, partition.map(Into::into));
        condition.apply("SK", &mut scope);
        scope.into_expression()
    }

    #[test]
    fn test_templates_use_raw_key_name() {
        assert_eq!(render(None, SortKeyCondition::eq("a")).as_deref(), Some("SK = :SK"));
        assert_eq!(render(None, SortKeyCondition::neq("a")).as_deref(), Some("SK <> :SK"));
        assert_eq!(render(None, SortKeyCondition::lt(1)).as_deref(), Some("SK < :SK"));
        assert_eq!(render(None, SortKeyCondition::lte(1)).as_deref(), Some("SK <= :SK"));
        assert_eq!(render(None, SortKeyCondition::gt(1)).as_deref(), Some("SK > :SK"));
        assert_eq!(render(None, SortKeyCondition::gte(1)).as_deref(), Some("SK >= :SK"));
        assert_eq!(
            render(None, SortKeyCondition::begins_with("ORDER#")).as_deref(),
            Some("begins_with(SK, :SK)")
        );
        assert_eq!(
            render(None, SortKeyCondition::between("a", "z")).as_deref(),
            Some("SK BETWEEN :SK AND :SK_1")
        );
    }

    #[test]
    fn test_joins_partition_clause_with_and() {
        assert_eq!(
            render(Some("PK = :PK"), SortKeyCondition::begins_with("ORDER#")).as_deref(),
            Some("PK = :PK AND begins_with(SK, :SK)")
        );
    }

    #[test]
    fn test_reserved_key_goes_through_name_placeholder() {
        let mut registry = Registry::new();
        let mut scope = ExpressionScope::new(&mut registry);
        SortKeyCondition::between(1, 9).apply("timestamp", &mut scope);
        assert_eq!(
            scope.into_expression().as_deref(),
            Some("#timestamp BETWEEN :timestamp AND :timestamp_1")
        );
        assert_eq!(registry.names()["#timestamp"], "timestamp");
    }

    #[test]
    fn test_does_not_touch_name_placeholders() {
        let mut registry = Registry::new();
        let mut scope = ExpressionScope::new(&mut registry);
        SortKeyCondition::eq("a").apply("SK", &mut scope);
        drop(scope);
        assert!(registry.names().is_empty());
        assert_eq!(registry.values().len(), 1);
    }
}

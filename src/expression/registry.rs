use super::Value;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

/// Placeholder maps shared by every expression of one request
///
/// Name placeholders are `#field` and map back to `field`. Value
/// placeholders are `:field`, then `:field_1`, `:field_2`... and are never
/// reused, so several fragments can compare the same field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Registry {
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `field` and return its name placeholder
    pub fn ref_name(&mut self, field: &str) -> String {
        let name = format!("#{field}");
        if !self.names.contains_key(&name) {
            let _ = self.names.insert(name.clone(), field.to_string());
        }
        name
    }

    /// Key attribute as written in a key-condition expression.
    ///
    /// Key names are written as-is (`PK = :PK`) unless they collide with a
    /// reserved word, in which case they go through a name placeholder.
    pub fn ref_key(&mut self, key: &str) -> String {
        if crate::is_reserved_word(key) {
            self.ref_name(key)
        } else {
            key.to_string()
        }
    }

    /// Register `value` under a fresh placeholder derived from `field`
    pub fn ref_value(&mut self, field: &str, value: Value) -> String {
        let mut key = format!(":{field}");
        let mut suffix = 1_usize;
        while self.values.contains_key(&key) {
            key = format!(":{field}_{suffix}");
            suffix += 1;
        }

        let _ = self.values.insert(key.clone(), value.into_attribute_value());
        key
    }

    /// Name placeholders and the attribute names they stand for
    pub fn names(&self) -> &HashMap<String, String> {
        &self.names
    }

    /// Value placeholders and the values bound to them
    pub fn values(&self) -> &HashMap<String, AttributeValue> {
        &self.values
    }

    /// Whether nothing has been registered yet
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.values.is_empty()
    }

    /// Maps as sent to the store, where an empty map is left unset
    pub(crate) fn placeholders(
        &self,
    ) -> (
        Option<HashMap<String, String>>,
        Option<HashMap<String, AttributeValue>>,
    ) {
        (
            Some(self.names.clone()).filter(|n| !n.is_empty()),
            Some(self.values.clone()).filter(|v| !v.is_empty()),
        )
    }
}

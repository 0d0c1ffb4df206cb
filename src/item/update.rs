use crate::expression::{Registry, Value};

/// Update expression for a single item
///
/// Actions are grouped by clause and rendered in the order
/// `SET`, `REMOVE`, `ADD`, `DELETE`. Attribute names always go through name
/// placeholders.
///
/// ```
/// use dynamo_query::{Registry, Update};
///
/// let update = Update::new()
///     .set("status", "shipped")
///     .add("version", 1)
///     .remove("draft");
///
/// let mut registry = Registry::new();
/// assert_eq!(
///     update.apply(&mut registry).as_deref(),
///     Some("SET #status = :status REMOVE #draft ADD #version :version")
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Update {
    set: Vec<(String, Value)>,
    remove: Vec<String>,
    add: Vec<(String, Value)>,
    delete: Vec<(String, Value)>,
}

impl Update {
    /// Update without actions
    pub fn new() -> Self {
        Self::default()
    }

    /// `SET #field = :field`
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.push((field.into(), value.into()));
        self
    }

    /// `REMOVE #field`
    pub fn remove(mut self, field: impl Into<String>) -> Self {
        self.remove.push(field.into());
        self
    }

    /// `ADD #field :field`, a numeric increment or a set union
    pub fn add(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add.push((field.into(), value.into()));
        self
    }

    /// `DELETE #field :field`, a set difference
    pub fn delete(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.delete.push((field.into(), value.into()));
        self
    }

    /// Whether no action has been added
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.remove.is_empty() && self.add.is_empty() && self.delete.is_empty()
    }

    /// Render the update expression, registering its placeholders
    pub fn apply(&self, registry: &mut Registry) -> Option<String> {
        let mut clauses = Vec::with_capacity(4);

        if !self.set.is_empty() {
            let actions: Vec<String> = self
                .set
                .iter()
                .map(|(field, value)| {
                    let name = registry.ref_name(field);
                    let placeholder = registry.ref_value(field, value.clone());
                    format!("{name} = {placeholder}")
                })
                .collect();
            clauses.push(format!("SET {}", actions.join(", ")));
        }

        if !self.remove.is_empty() {
            let names: Vec<String> = self
                .remove
                .iter()
                .map(|field| registry.ref_name(field))
                .collect();
            clauses.push(format!("REMOVE {}", names.join(", ")));
        }

        for (keyword, actions) in [("ADD", &self.add), ("DELETE", &self.delete)] {
            if actions.is_empty() {
                continue;
            }
            let actions: Vec<String> = actions
                .iter()
                .map(|(field, value)| {
                    let name = registry.ref_name(field);
                    let placeholder = registry.ref_value(field, value.clone());
                    format!("{name} {placeholder}")
                })
                .collect();
            clauses.push(format!("{keyword} {}", actions.join(", ")));
        }

        Some(clauses.join(" ")).filter(|e| !e.is_empty())
    }
}

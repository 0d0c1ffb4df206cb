use super::Registry;

/// Expression buffer bound to a shared [`Registry`]
///
/// Fragments render into the buffer and register placeholders in the
/// registry. A [`scratch`](Self::scratch) scope starts with an empty buffer
/// but keeps allocating from the same registry, which is how boolean
/// composition renders children in isolation without placeholder collisions.
#[derive(Debug)]
pub struct ExpressionScope<'a> {
    registry: &'a mut Registry,
    expression: Option<String>,
}

impl<'a> ExpressionScope<'a> {
    /// Scope with an empty buffer
    pub fn new(registry: &'a mut Registry) -> Self {
        Self::with_expression(registry, None)
    }

    /// Scope continuing an existing expression
    pub fn with_expression(registry: &'a mut Registry, expression: Option<String>) -> Self {
        Self {
            registry,
            expression,
        }
    }

    /// Registry shared with the enclosing scopes
    pub fn registry(&mut self) -> &mut Registry {
        &mut *self.registry
    }

    /// Text rendered so far
    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    /// Append a clause, joined with ` AND ` to any existing text.
    ///
    /// Empty clauses are ignored.
    pub fn push(&mut self, clause: &str) {
        if clause.is_empty() {
            return;
        }

        match &mut self.expression {
            Some(expression) if !expression.is_empty() => {
                expression.push_str(" AND ");
                expression.push_str(clause);
            }
            slot => *slot = Some(clause.to_string()),
        }
    }

    /// Child scope with an empty buffer sharing this registry
    pub fn scratch(&mut self) -> ExpressionScope<'_> {
        ExpressionScope::new(&mut *self.registry)
    }

    /// Rendered text, `None` if nothing was written
    pub fn into_expression(self) -> Option<String> {
        self.expression.filter(|e| !e.is_empty())
    }
}

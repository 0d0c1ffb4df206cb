use super::{ExpressionScope, Value};

/// Comparison operators shared by filters and sort-key conditions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    /// `a = b`
    Eq,
    /// `a <> b`
    Ne,
    /// `a < b`
    Lt,
    /// `a <= b`
    Le,
    /// `a > b`
    Gt,
    /// `a >= b`
    Ge,
    /// `begins_with(a, b)`
    BeginsWith,
    /// `a BETWEEN b AND c`
    Between,
    /// `a IN (b, c, ...)`
    In,
}

impl Operator {
    /// Render the clause for `name` against already allocated value placeholders
    pub fn render(self, name: &str, values: &[String]) -> String {
        let first = values.first().map(String::as_str).unwrap_or_default();
        match self {
            Operator::Eq => format!("{name} = {first}"),
            Operator::Ne => format!("{name} <> {first}"),
            Operator::Lt => format!("{name} < {first}"),
            Operator::Le => format!("{name} <= {first}"),
            Operator::Gt => format!("{name} > {first}"),
            Operator::Ge => format!("{name} >= {first}"),
            Operator::BeginsWith => format!("begins_with({name}, {first})"),
            Operator::Between => {
                let second = values.get(1).map(String::as_str).unwrap_or_default();
                format!("{name} BETWEEN {first} AND {second}")
            }
            Operator::In => format!("{name} IN ({})", values.join(", ")),
        }
    }
}

/// Keyword joining the children of a composed filter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Joiner {
    /// ` AND `
    And,
    /// ` OR `
    Or,
    /// ` NOT `, an infix token between children rather than a negation
    Not,
}

impl Joiner {
    fn keyword(self) -> &'static str {
        match self {
            Joiner::And => " AND ",
            Joiner::Or => " OR ",
            Joiner::Not => " NOT ",
        }
    }
}

/// Filter expression fragment
///
/// Fragments are data until [applied](Filter::apply). Applying several
/// fragments to the same scope joins them with ` AND ` in application order.
///
/// ```
/// use dynamo_query::{ExpressionScope, Filter, Registry};
///
/// let mut registry = Registry::new();
/// let mut scope = ExpressionScope::new(&mut registry);
///
/// Filter::eq("Name", "Jane").apply(&mut scope);
/// Filter::or([Filter::gt("Age", 30), Filter::lt("Age", 18)]).apply(&mut scope);
///
/// assert_eq!(
///     scope.into_expression().as_deref(),
///     Some("#Name = :Name AND (#Age > :Age OR #Age < :Age_1)")
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Single comparison against one field
    Predicate {
        /// Comparison to render
        operator: Operator,
        /// Attribute name, escaped through a name placeholder
        field: String,
        /// Operands, one value placeholder each
        operands: Vec<Value>,
    },
    /// Children joined by a keyword
    Compose {
        /// Keyword between children
        joiner: Joiner,
        /// Children in rendering order
        filters: Vec<Filter>,
    },
}

impl Filter {
    fn predicate(operator: Operator, field: impl Into<String>, operands: Vec<Value>) -> Self {
        Filter::Predicate {
            operator,
            field: field.into(),
            operands,
        }
    }

    fn compose(joiner: Joiner, filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Compose {
            joiner,
            filters: filters.into_iter().collect(),
        }
    }

    /// `#field = :field`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::predicate(Operator::Eq, field, vec![value.into()])
    }

    /// `#field <> :field`
    pub fn neq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::predicate(Operator::Ne, field, vec![value.into()])
    }

    /// `#field < :field`
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::predicate(Operator::Lt, field, vec![value.into()])
    }

    /// `#field <= :field`
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::predicate(Operator::Le, field, vec![value.into()])
    }

    /// `#field > :field`
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::predicate(Operator::Gt, field, vec![value.into()])
    }

    /// `#field >= :field`
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::predicate(Operator::Ge, field, vec![value.into()])
    }

    /// `begins_with(#field, :field)`
    pub fn begins_with(field: impl Into<String>, prefix: impl Into<Value>) -> Self {
        Self::predicate(Operator::BeginsWith, field, vec![prefix.into()])
    }

    /// `#field BETWEEN :field AND :field_1`
    pub fn between(
        field: impl Into<String>,
        lower: impl Into<Value>,
        upper: impl Into<Value>,
    ) -> Self {
        Self::predicate(Operator::Between, field, vec![lower.into(), upper.into()])
    }

    /// `#field IN (:field, :field_1, ...)`
    ///
    /// An empty value list still renders, as `#field IN ()`, which the store
    /// rejects when the request is sent. Skip the fragment when there is
    /// nothing to match.
    pub fn is_in<V>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<Value>,
    {
        let operands = values.into_iter().map(Into::into).collect();
        Self::predicate(Operator::In, field, operands)
    }

    /// Children joined with ` AND `
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::compose(Joiner::And, filters)
    }

    /// Children joined with ` OR `
    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::compose(Joiner::Or, filters)
    }

    /// Children joined with the literal ` NOT ` token.
    ///
    /// `not([eq("Name", "x"), lt("Age", 30)])` renders
    /// `(#Name = :Name NOT #Age < :Age)`; a single child renders unchanged.
    pub fn not(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::compose(Joiner::Not, filters)
    }

    /// Render this fragment into `scope`.
    ///
    /// Compositions render every child into its own scratch scope, drop the
    /// children that produced nothing, and parenthesize only when more than
    /// one child contributed text.
    pub fn apply(&self, scope: &mut ExpressionScope<'_>) {
        match self {
            Filter::Predicate {
                operator,
                field,
                operands,
            } => {
                let registry = scope.registry();
                let name = registry.ref_name(field);
                let values: Vec<String> = operands
                    .iter()
                    .map(|value| registry.ref_value(field, value.clone()))
                    .collect();
                scope.push(&operator.render(&name, &values));
            }
            Filter::Compose { joiner, filters } => {
                let parts: Vec<String> = filters
                    .iter()
                    .filter_map(|child| {
                        let mut scratch = scope.scratch();
                        child.apply(&mut scratch);
                        scratch.into_expression()
                    })
                    .collect();

                match parts.len() {
                    0 => {}
                    1 => scope.push(&parts[0]),
                    _ => scope.push(&format!("({})", parts.join(joiner.keyword()))),
                }
            }
        }
    }
}

use super::Item;
use crate::expression::{ExpressionScope, Filter, Registry, SortKeyCondition, Value};
use aws_sdk_dynamodb::operation::query::builders::QueryFluentBuilder;
use aws_sdk_dynamodb::operation::scan::builders::ScanFluentBuilder;
use aws_sdk_dynamodb::Client;
use tracing::trace;

/// Remote operation a [`Request`] is sent as
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Key-condition query against one partition
    Query,
    /// Full table or index scan
    Scan,
}

/// Normalized query or scan request
///
/// A request accumulates expression text and placeholders as fragments are
/// applied. Every placeholder referenced by any of its expressions has an
/// entry in its [`Registry`], and value placeholders are never reused.
///
/// ```
/// use dynamo_query::{Filter, Request, SortKeyCondition};
///
/// let request = Request::query("customers")
///     .partition_key("PK", "CUSTOMER#1")
///     .sort_key("SK", &SortKeyCondition::begins_with("ORDER#"))
///     .filter(&Filter::gte("Total", 100))
///     .select(["Total", "Status"])
///     .limit(25);
///
/// assert_eq!(
///     request.key_condition(),
///     Some("PK = :PK AND begins_with(SK, :SK)")
/// );
/// assert_eq!(request.filter_expression(), Some("#Total >= :Total"));
/// assert_eq!(request.projection_expression(), Some("#Total, #Status"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    operation: Operation,
    table_name: String,
    index_name: Option<String>,
    key_condition: Option<String>,
    filter_expression: Option<String>,
    projection_expression: Option<String>,
    registry: Registry,
    limit: Option<i32>,
    consistent_read: Option<bool>,
    scan_index_forward: Option<bool>,
    exclusive_start_key: Option<Item>,
}

impl Request {
    fn new(operation: Operation, table_name: impl Into<String>) -> Self {
        Self {
            operation,
            table_name: table_name.into(),
            index_name: None,
            key_condition: None,
            filter_expression: None,
            projection_expression: None,
            registry: Registry::new(),
            limit: None,
            consistent_read: None,
            scan_index_forward: None,
            exclusive_start_key: None,
        }
    }

    /// Empty query request against `table_name`
    pub fn query(table_name: impl Into<String>) -> Self {
        Self::new(Operation::Query, table_name)
    }

    /// Empty scan request against `table_name`
    pub fn scan(table_name: impl Into<String>) -> Self {
        Self::new(Operation::Scan, table_name)
    }

    /// Target a secondary index
    pub fn index(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// Add `key = :key` to the key-condition expression
    pub fn partition_key(mut self, key: &str, value: impl Into<Value>) -> Self {
        let mut scope =
            ExpressionScope::with_expression(&mut self.registry, self.key_condition.take());
        let name = scope.registry().ref_key(key);
        let placeholder = scope.registry().ref_value(key, value.into());
        scope.push(&format!("{name} = {placeholder}"));
        self.key_condition = scope.into_expression();
        self
    }

    /// Add a sort-key condition on `key` to the key-condition expression
    pub fn sort_key(mut self, key: &str, condition: &SortKeyCondition) -> Self {
        let mut scope =
            ExpressionScope::with_expression(&mut self.registry, self.key_condition.take());
        condition.apply(key, &mut scope);
        self.key_condition = scope.into_expression();
        self
    }

    /// Apply a filter fragment, joined with ` AND ` to earlier ones
    pub fn filter(mut self, filter: &Filter) -> Self {
        self.apply(filter);
        self
    }

    /// Apply several filter fragments in order
    pub fn filters<'f>(mut self, filters: impl IntoIterator<Item = &'f Filter>) -> Self {
        for filter in filters {
            self.apply(filter);
        }
        self
    }

    /// Apply a filter fragment in place
    pub fn apply(&mut self, filter: &Filter) {
        let mut scope =
            ExpressionScope::with_expression(&mut self.registry, self.filter_expression.take());
        filter.apply(&mut scope);
        self.filter_expression = scope.into_expression();
        trace!(
            table = %self.table_name,
            filter = ?self.filter_expression,
            "applied filter"
        );
    }

    /// Restrict the returned attributes.
    ///
    /// Repeated calls extend the projection. An empty field list is a no-op.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = fields
            .into_iter()
            .map(|field| self.registry.ref_name(field.as_ref()))
            .collect();
        if names.is_empty() {
            return self;
        }

        let projection = names.join(", ");
        self.projection_expression = Some(match self.projection_expression.take() {
            Some(existing) if !existing.is_empty() => format!("{existing}, {projection}"),
            _ => projection,
        });
        self
    }

    /// Maximum number of items evaluated per page
    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Use strongly consistent reads
    pub fn consistent_read(mut self, consistent: bool) -> Self {
        self.consistent_read = Some(consistent);
        self
    }

    /// Sort order of a query, ascending when `true`
    pub fn scan_index_forward(mut self, forward: bool) -> Self {
        self.scan_index_forward = Some(forward);
        self
    }

    /// Resume from a continuation token
    pub fn start_key(mut self, key: Item) -> Self {
        self.exclusive_start_key = Some(key);
        self
    }

    pub(crate) fn set_exclusive_start_key(&mut self, key: Option<Item>) {
        self.exclusive_start_key = key;
    }

    /// Operation this request is sent as
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Target table
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Target index, if any
    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    /// Key-condition expression
    pub fn key_condition(&self) -> Option<&str> {
        self.key_condition.as_deref()
    }

    /// Filter expression
    pub fn filter_expression(&self) -> Option<&str> {
        self.filter_expression.as_deref()
    }

    /// Projection expression
    pub fn projection_expression(&self) -> Option<&str> {
        self.projection_expression.as_deref()
    }

    /// Placeholders referenced by the expressions
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Page size limit
    pub fn page_limit(&self) -> Option<i32> {
        self.limit
    }

    /// Consistent read flag, if set
    pub fn is_consistent_read(&self) -> Option<bool> {
        self.consistent_read
    }

    /// Sort direction, if set
    pub fn is_scan_index_forward(&self) -> Option<bool> {
        self.scan_index_forward
    }

    /// Continuation token the next fetch starts from
    pub fn exclusive_start_key(&self) -> Option<&Item> {
        self.exclusive_start_key.as_ref()
    }

    /// Build the SDK query call for this request
    pub fn to_query(&self, client: &Client) -> QueryFluentBuilder {
        let (names, values) = self.registry.placeholders();
        client
            .query()
            .table_name(&self.table_name)
            .set_index_name(self.index_name.clone())
            .set_key_condition_expression(self.key_condition.clone())
            .set_filter_expression(self.filter_expression.clone())
            .set_projection_expression(self.projection_expression.clone())
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .set_limit(self.limit)
            .set_consistent_read(self.consistent_read)
            .set_scan_index_forward(self.scan_index_forward)
            .set_exclusive_start_key(self.exclusive_start_key.clone())
    }

    /// Build the SDK scan call for this request.
    ///
    /// Key condition and sort direction do not apply to scans and are left out.
    pub fn to_scan(&self, client: &Client) -> ScanFluentBuilder {
        let (names, values) = self.registry.placeholders();
        client
            .scan()
            .table_name(&self.table_name)
            .set_index_name(self.index_name.clone())
            .set_filter_expression(self.filter_expression.clone())
            .set_projection_expression(self.projection_expression.clone())
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .set_limit(self.limit)
            .set_consistent_read(self.consistent_read)
            .set_exclusive_start_key(self.exclusive_start_key.clone())
    }
}

use super::Update;
use crate::expression::{ExpressionScope, Filter, Registry};
use crate::query::Item;
use aws_sdk_dynamodb::error::BuildError;
use aws_sdk_dynamodb::operation::delete_item::builders::DeleteItemFluentBuilder;
use aws_sdk_dynamodb::operation::get_item::builders::GetItemFluentBuilder;
use aws_sdk_dynamodb::operation::put_item::builders::PutItemFluentBuilder;
use aws_sdk_dynamodb::operation::update_item::builders::UpdateItemFluentBuilder;
use aws_sdk_dynamodb::types::{DeleteRequest, PutRequest, ReturnValue, WriteRequest};
use aws_sdk_dynamodb::Client;

/// Remote operation an [`ItemRequest`] is sent as
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemOperation {
    /// Read one item by key
    Get,
    /// Create or replace one item
    Put,
    /// Delete one item by key
    Delete,
    /// Modify attributes of one item by key
    Update,
}

/// Normalized single-item request
///
/// Holds the key (or the whole item for a put) together with the update,
/// condition and projection expressions and the registry they share.
///
/// ```
/// use dynamo_query::{Filter, Item, ItemRequest};
/// use aws_sdk_dynamodb::types::AttributeValue;
///
/// let key = Item::from([
///     ("PK".to_string(), AttributeValue::S("CUSTOMER#1".into())),
///     ("SK".to_string(), AttributeValue::S("PROFILE".into())),
/// ]);
/// let request = ItemRequest::delete("shop", key).condition(&Filter::eq("status", "closed"));
///
/// assert_eq!(request.condition_expression(), Some("#status = :status"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ItemRequest {
    operation: ItemOperation,
    table_name: String,
    item: Item,
    update_expression: Option<String>,
    condition_expression: Option<String>,
    projection_expression: Option<String>,
    registry: Registry,
    consistent_read: Option<bool>,
    return_values: Option<ReturnValue>,
}

impl ItemRequest {
    fn new(operation: ItemOperation, table_name: impl Into<String>, item: Item) -> Self {
        Self {
            operation,
            table_name: table_name.into(),
            item,
            update_expression: None,
            condition_expression: None,
            projection_expression: None,
            registry: Registry::new(),
            consistent_read: None,
            return_values: None,
        }
    }

    /// Read the item stored under `key`
    pub fn get(table_name: impl Into<String>, key: Item) -> Self {
        Self::new(ItemOperation::Get, table_name, key)
    }

    /// Write `item`, replacing any item with the same key
    pub fn put(table_name: impl Into<String>, item: Item) -> Self {
        Self::new(ItemOperation::Put, table_name, item)
    }

    /// Delete the item stored under `key`
    pub fn delete(table_name: impl Into<String>, key: Item) -> Self {
        Self::new(ItemOperation::Delete, table_name, key)
    }

    /// Apply `update` to the item stored under `key`
    pub fn update(table_name: impl Into<String>, key: Item, update: &Update) -> Self {
        let mut request = Self::new(ItemOperation::Update, table_name, key);
        request.update_expression = update.apply(&mut request.registry);
        request
    }

    /// Add a condition, joined with ` AND ` to earlier ones
    pub fn condition(mut self, filter: &Filter) -> Self {
        let mut scope =
            ExpressionScope::with_expression(&mut self.registry, self.condition_expression.take());
        filter.apply(&mut scope);
        self.condition_expression = scope.into_expression();
        self
    }

    /// Restrict the returned attributes. An empty field list is a no-op.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = fields
            .into_iter()
            .map(|field| self.registry.ref_name(field.as_ref()))
            .collect();
        if !names.is_empty() {
            self.projection_expression = Some(names.join(", "));
        }
        self
    }

    /// Use a strongly consistent read
    pub fn consistent_read(mut self, consistent: bool) -> Self {
        self.consistent_read = Some(consistent);
        self
    }

    /// Attributes an update returns
    pub fn return_values(mut self, return_values: ReturnValue) -> Self {
        self.return_values = Some(return_values);
        self
    }

    /// Operation this request is sent as
    pub fn operation(&self) -> ItemOperation {
        self.operation
    }

    /// Target table
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Key attributes, or the whole item for a put
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Update expression
    pub fn update_expression(&self) -> Option<&str> {
        self.update_expression.as_deref()
    }

    /// Condition expression
    pub fn condition_expression(&self) -> Option<&str> {
        self.condition_expression.as_deref()
    }

    /// Projection expression
    pub fn projection_expression(&self) -> Option<&str> {
        self.projection_expression.as_deref()
    }

    /// Placeholders referenced by the expressions
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Consistent read flag, if set
    pub fn is_consistent_read(&self) -> Option<bool> {
        self.consistent_read
    }

    /// Requested return values, if set
    pub fn requested_return_values(&self) -> Option<&ReturnValue> {
        self.return_values.as_ref()
    }

    /// Build the SDK get call for this request
    pub fn to_get_item(&self, client: &Client) -> GetItemFluentBuilder {
        let (names, _) = self.registry.placeholders();
        client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(self.item.clone()))
            .set_projection_expression(self.projection_expression.clone())
            .set_expression_attribute_names(names)
            .set_consistent_read(self.consistent_read)
    }

    /// Build the SDK put call for this request
    pub fn to_put_item(&self, client: &Client) -> PutItemFluentBuilder {
        let (names, values) = self.registry.placeholders();
        client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(self.item.clone()))
            .set_condition_expression(self.condition_expression.clone())
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
    }

    /// Build the SDK delete call for this request
    pub fn to_delete_item(&self, client: &Client) -> DeleteItemFluentBuilder {
        let (names, values) = self.registry.placeholders();
        client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(self.item.clone()))
            .set_condition_expression(self.condition_expression.clone())
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
    }

    /// Build the SDK update call for this request
    pub fn to_update_item(&self, client: &Client) -> UpdateItemFluentBuilder {
        let (names, values) = self.registry.placeholders();
        client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(self.item.clone()))
            .set_update_expression(self.update_expression.clone())
            .set_condition_expression(self.condition_expression.clone())
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .set_return_values(self.return_values.clone())
    }
}

/// One entry of a batch write
#[derive(Clone, Debug, PartialEq)]
pub enum BatchWrite {
    /// Write a whole item
    Put(Item),
    /// Delete the item under a key
    Delete(Item),
}

impl BatchWrite {
    pub(crate) fn to_write_request(&self) -> Result<WriteRequest, BuildError> {
        let request = match self {
            BatchWrite::Put(item) => WriteRequest::builder()
                .put_request(PutRequest::builder().set_item(Some(item.clone())).build()?),
            BatchWrite::Delete(key) => WriteRequest::builder()
                .delete_request(DeleteRequest::builder().set_key(Some(key.clone())).build()?),
        };
        Ok(request.build())
    }
}

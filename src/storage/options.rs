use crate::expression::Filter;
use crate::query::Request;
use aws_sdk_dynamodb::types::ReturnValue;

/// Defaults applied to every request a [`Storage`](super::Storage) builds
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StorageOptions {
    pub(super) page_size: Option<i32>,
    pub(super) consistent_read: Option<bool>,
}

impl StorageOptions {
    /// Options leaving every request setting to the store's default
    pub fn new() -> Self {
        Self::default()
    }

    /// Items evaluated per page
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Strongly consistent reads on the table itself.
    ///
    /// Secondary indexes only support eventually consistent reads, so this is
    /// ignored for them.
    pub fn with_consistent_read(mut self, consistent_read: bool) -> Self {
        self.consistent_read = Some(consistent_read);
        self
    }
}

/// Per-call settings of a query. Unset fields keep the storage defaults.
///
/// ```
/// use dynamo_query::QueryOptions;
///
/// let newest_first = QueryOptions::new().with_forward(false).with_limit(10);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryOptions {
    limit: Option<i32>,
    forward: Option<bool>,
    consistent_read: Option<bool>,
    attributes: Vec<String>,
}

impl QueryOptions {
    /// Options that change nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Items evaluated per page
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Ascending sort-key order when `true`, descending otherwise
    pub fn with_forward(mut self, forward: bool) -> Self {
        self.forward = Some(forward);
        self
    }

    /// Strongly consistent reads
    pub fn with_consistent_read(mut self, consistent_read: bool) -> Self {
        self.consistent_read = Some(consistent_read);
        self
    }

    /// Attributes to return
    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.extend(attributes.into_iter().map(Into::into));
        self
    }

    pub(super) fn apply(&self, mut request: Request) -> Request {
        if let Some(limit) = self.limit {
            request = request.limit(limit);
        }
        if let Some(forward) = self.forward {
            request = request.scan_index_forward(forward);
        }
        if let Some(consistent) = self.consistent_read {
            request = request.consistent_read(consistent);
        }
        request.select(&self.attributes)
    }
}

/// Per-call settings of a scan
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanOptions {
    limit: Option<i32>,
    attributes: Vec<String>,
}

impl ScanOptions {
    /// Options that change nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Items evaluated per page
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Attributes to return
    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.extend(attributes.into_iter().map(Into::into));
        self
    }

    pub(super) fn apply(&self, mut request: Request) -> Request {
        if let Some(limit) = self.limit {
            request = request.limit(limit);
        }
        request.select(&self.attributes)
    }
}

/// Settings of a single-item read
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetOptions {
    pub(super) consistent_read: Option<bool>,
    pub(super) attributes: Vec<String>,
}

impl GetOptions {
    /// Options that change nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Strongly consistent read, overriding the storage default
    pub fn with_consistent_read(mut self, consistent_read: bool) -> Self {
        self.consistent_read = Some(consistent_read);
        self
    }

    /// Attributes to return
    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.extend(attributes.into_iter().map(Into::into));
        self
    }
}

/// Settings of an update
///
/// Returned attributes are decoded back into the entity only for
/// [`ReturnValue::AllNew`] and [`ReturnValue::UpdatedNew`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateOptions {
    pub(super) return_values: Option<ReturnValue>,
    pub(super) condition: Option<Filter>,
}

impl UpdateOptions {
    /// Options that change nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes the store returns after the update
    pub fn with_return_values(mut self, return_values: ReturnValue) -> Self {
        self.return_values = Some(return_values);
        self
    }

    /// Only update when `condition` holds on the stored item
    pub fn with_condition(mut self, condition: Filter) -> Self {
        self.condition = Some(condition);
        self
    }

    pub(super) fn decodes_result(&self) -> bool {
        matches!(
            self.return_values,
            Some(ReturnValue::AllNew) | Some(ReturnValue::UpdatedNew)
        )
    }
}

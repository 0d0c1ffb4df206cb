use super::Item;
use aws_sdk_dynamodb::operation::query::QueryOutput;
use aws_sdk_dynamodb::operation::scan::ScanOutput;

/// One page of query or scan results
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Output {
    /// Number of items returned after filtering
    pub count: i32,
    /// Number of items evaluated before filtering
    pub scanned_count: i32,
    /// Items of this page in store order
    pub items: Vec<Item>,
    /// Continuation token, `None` on the last page
    pub last_evaluated_key: Option<Item>,
}

impl Output {
    /// Page holding `items`, counted as both returned and evaluated
    pub fn new(items: Vec<Item>) -> Self {
        let count = i32::try_from(items.len()).unwrap_or(i32::MAX);
        Self {
            count,
            scanned_count: count,
            items,
            last_evaluated_key: None,
        }
    }

    /// Set the evaluated-item count
    pub fn with_scanned_count(mut self, scanned_count: i32) -> Self {
        self.scanned_count = scanned_count;
        self
    }

    /// Set the continuation token. An empty token means the last page.
    pub fn with_last_evaluated_key(mut self, key: Item) -> Self {
        self.last_evaluated_key = Some(key).filter(|k| !k.is_empty());
        self
    }

    /// Whether another page can be fetched
    pub fn has_more(&self) -> bool {
        self.last_evaluated_key.is_some()
    }
}

impl From<QueryOutput> for Output {
    fn from(output: QueryOutput) -> Self {
        Self {
            count: output.count,
            scanned_count: output.scanned_count,
            items: output.items.unwrap_or_default(),
            last_evaluated_key: output.last_evaluated_key.filter(|k| !k.is_empty()),
        }
    }
}

impl From<ScanOutput> for Output {
    fn from(output: ScanOutput) -> Self {
        Self {
            count: output.count,
            scanned_count: output.scanned_count,
            items: output.items.unwrap_or_default(),
            last_evaluated_key: output.last_evaluated_key.filter(|k| !k.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::types::AttributeValue;

    fn key(pk: &str) -> Item {
        Item::from([("PK".to_string(), AttributeValue::S(pk.to_string()))])
    }

    #[test]
    fn test_from_query_output() {
        let output = QueryOutput::builder()
            .items(key("A"))
            .items(key("B"))
            .count(2)
            .scanned_count(5)
            .set_last_evaluated_key(Some(key("B")))
            .build();

        let page = Output::from(output);
        assert_eq!(page.count, 2);
        assert_eq!(page.scanned_count, 5);
        assert_eq!(page.items.len(), 2);
        assert!(page.has_more());
    }

    #[test]
    fn test_from_scan_output_without_items() {
        let page = Output::from(ScanOutput::builder().build());
        assert_eq!(page, Output::default());
        assert!(!page.has_more());
    }

    #[test]
    fn test_empty_continuation_token_is_last_page() {
        let output = QueryOutput::builder()
            .set_last_evaluated_key(Some(Item::new()))
            .build();
        assert!(!Output::from(output).has_more());
        assert!(!Output::new(vec![]).with_last_evaluated_key(Item::new()).has_more());
    }

    #[test]
    fn test_new_counts_items() {
        let page = Output::new(vec![key("A"), key("B")]).with_scanned_count(7);
        assert_eq!(page.count, 2);
        assert_eq!(page.scanned_count, 7);
    }
}

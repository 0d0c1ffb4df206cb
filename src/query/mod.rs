//! Requests, pages and the paginated result iterator

use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

mod client;
mod decoder;
mod iterator;
mod output;
mod request;

pub use client::PageFetcher;
pub use decoder::{Decoder, SerdeDecoder};
pub use iterator::{field_value, FindCondition, IteratorState, QueryIterator};
pub use output::Output;
pub use request::{Operation, Request};

/// Raw item as returned by the store
pub type Item = HashMap<String, AttributeValue>;

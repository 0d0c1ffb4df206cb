/// Test helpers and fixtures for iterator and storage tests
///
/// This module provides a scripted client standing in for DynamoDB and the
/// fixtures shared by the integration tests.
pub mod fixtures;

pub use dynamo_query::{BatchWrite, Error, Item, ItemClient, ItemRequest, Output, PageFetcher, Request};
pub use serde::{Deserialize, Serialize};

// Re-export common fixtures
pub use fixtures::{customer, customer_item, token, Customer};

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Client replaying a fixed script of responses
///
/// Every fetched page request, item request and batch is recorded so tests
/// can assert on continuation tokens and expressions. Running past the page
/// or item script yields a client error. Batches without a scripted result
/// are fully processed.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    pages: Mutex<VecDeque<Result<Output, Error>>>,
    requests: Mutex<Vec<Request>>,
    items: Mutex<VecDeque<Result<Option<Item>, Error>>>,
    item_requests: Mutex<Vec<ItemRequest>>,
    batch_results: Mutex<VecDeque<Result<usize, Error>>>,
    batches: Mutex<Vec<(String, Vec<BatchWrite>)>>,
}

impl ScriptedFetcher {
    /// Shared fetcher answering with `pages` in order
    pub fn new(pages: Vec<Result<Output, Error>>) -> Arc<Self> {
        Self::scripted(pages, Vec::new(), Vec::new())
    }

    /// Shared client answering item requests with `items` in order
    #[allow(dead_code)]
    pub fn items(items: Vec<Result<Option<Item>, Error>>) -> Arc<Self> {
        Self::scripted(Vec::new(), items, Vec::new())
    }

    /// Shared client with a script for pages, item requests and batches
    pub fn scripted(
        pages: Vec<Result<Output, Error>>,
        items: Vec<Result<Option<Item>, Error>>,
        batch_results: Vec<Result<usize, Error>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(pages.into()),
            items: Mutex::new(items.into()),
            batch_results: Mutex::new(batch_results.into()),
            ..Self::default()
        })
    }

    /// Item requests seen so far, in order
    #[allow(dead_code)]
    pub fn item_requests(&self) -> Vec<ItemRequest> {
        self.item_requests.lock().unwrap().clone()
    }

    /// Batches written so far with their table, in order
    #[allow(dead_code)]
    pub fn batches(&self) -> Vec<(String, Vec<BatchWrite>)> {
        self.batches.lock().unwrap().clone()
    }

    /// Number of fetches issued so far
    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests seen so far, in order
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, request: &Request) -> Result<Output, Error> {
        self.requests.lock().unwrap().push(request.clone());
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::client("script exhausted")))
    }
}

impl ItemClient for ScriptedFetcher {
    async fn send(&self, request: &ItemRequest) -> Result<Option<Item>, Error> {
        self.item_requests.lock().unwrap().push(request.clone());
        self.items
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::client("script exhausted")))
    }

    async fn batch_write(&self, table_name: &str, writes: &[BatchWrite]) -> Result<usize, Error> {
        self.batches
            .lock()
            .unwrap()
            .push((table_name.to_string(), writes.to_vec()));
        self.batch_results.lock().unwrap().pop_front().unwrap_or(Ok(0))
    }
}

/// Page of customer items
#[allow(dead_code)]
pub fn page(customers: &[Customer]) -> Output {
    Output::new(customers.iter().map(customer_item).collect())
}

/// Page of customer items followed by another page
#[allow(dead_code)]
pub fn page_with_more(customers: &[Customer], next: &str) -> Output {
    page(customers).with_last_evaluated_key(token(next))
}

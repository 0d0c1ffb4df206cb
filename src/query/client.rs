use super::{Operation, Output, Request};
use crate::Error;
use aws_sdk_dynamodb::Client;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Issues one page fetch for a [`Request`]
///
/// Implemented for the SDK [`Client`]; tests and alternative transports
/// implement it directly. Failures should be reported as
/// [`Error::Client`](crate::Error::Client).
pub trait PageFetcher: Send + Sync {
    /// Fetch the page starting at the request's continuation token
    fn fetch(&self, request: &Request) -> impl Future<Output = Result<Output, Error>> + Send;
}

impl PageFetcher for Client {
    async fn fetch(&self, request: &Request) -> Result<Output, Error> {
        debug!(
            table = request.table_name(),
            index = ?request.index_name(),
            operation = ?request.operation(),
            resumed = request.exclusive_start_key().is_some(),
            "fetching page"
        );

        let result = match request.operation() {
            Operation::Query => request
                .to_query(self)
                .send()
                .await
                .map(Output::from)
                .map_err(Error::from),
            Operation::Scan => request
                .to_scan(self)
                .send()
                .await
                .map(Output::from)
                .map_err(Error::from),
        };

        match &result {
            Ok(output) => debug!(
                table = request.table_name(),
                count = output.count,
                scanned_count = output.scanned_count,
                has_more = output.has_more(),
                "fetched page"
            ),
            Err(e) => warn!(table = request.table_name(), error = %e, "page fetch failed"),
        }

        result
    }
}

impl<T: PageFetcher> PageFetcher for Arc<T> {
    fn fetch(&self, request: &Request) -> impl Future<Output = Result<Output, Error>> + Send {
        (**self).fetch(request)
    }
}

impl<T: PageFetcher> PageFetcher for &T {
    fn fetch(&self, request: &Request) -> impl Future<Output = Result<Output, Error>> + Send {
        (**self).fetch(request)
    }
}

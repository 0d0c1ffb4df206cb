use super::{BatchWrite, ItemOperation, ItemRequest};
use crate::query::Item;
use crate::Error;
use aws_sdk_dynamodb::Client;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sends single-item requests and batch writes
///
/// The single-item counterpart of [`PageFetcher`](crate::PageFetcher).
/// Implemented for the SDK [`Client`].
pub trait ItemClient: Send + Sync {
    /// Send one request.
    ///
    /// A get resolves to the stored item, an update to the attributes it was
    /// asked to return, puts and deletes to `None`.
    fn send(&self, request: &ItemRequest) -> impl Future<Output = Result<Option<Item>, Error>> + Send;

    /// Write one batch and return how many entries the store left unprocessed
    fn batch_write(
        &self,
        table_name: &str,
        writes: &[BatchWrite],
    ) -> impl Future<Output = Result<usize, Error>> + Send;
}

impl ItemClient for Client {
    async fn send(&self, request: &ItemRequest) -> Result<Option<Item>, Error> {
        debug!(
            table = request.table_name(),
            operation = ?request.operation(),
            conditional = request.condition_expression().is_some(),
            "sending item request"
        );

        let result = match request.operation() {
            ItemOperation::Get => request
                .to_get_item(self)
                .send()
                .await
                .map(|output| output.item)
                .map_err(Error::from),
            ItemOperation::Put => request
                .to_put_item(self)
                .send()
                .await
                .map(|_| None)
                .map_err(Error::from),
            ItemOperation::Delete => request
                .to_delete_item(self)
                .send()
                .await
                .map(|_| None)
                .map_err(Error::from),
            ItemOperation::Update => request
                .to_update_item(self)
                .send()
                .await
                .map(|output| output.attributes)
                .map_err(Error::from),
        };

        if let Err(e) = &result {
            warn!(
                table = request.table_name(),
                operation = ?request.operation(),
                error = %e,
                "item request failed"
            );
        }
        result
    }

    async fn batch_write(&self, table_name: &str, writes: &[BatchWrite]) -> Result<usize, Error> {
        let requests = writes
            .iter()
            .map(BatchWrite::to_write_request)
            .collect::<Result<Vec<_>, _>>()?;

        let output = self
            .batch_write_item()
            .request_items(table_name, requests)
            .send()
            .await?;

        let unprocessed = output
            .unprocessed_items
            .and_then(|mut items| items.remove(table_name))
            .map_or(0, |requests| requests.len());

        debug!(
            table = table_name,
            written = writes.len() - unprocessed.min(writes.len()),
            unprocessed,
            "wrote batch"
        );
        Ok(unprocessed)
    }
}

impl<T: ItemClient> ItemClient for Arc<T> {
    fn send(&self, request: &ItemRequest) -> impl Future<Output = Result<Option<Item>, Error>> + Send {
        (**self).send(request)
    }

    fn batch_write(
        &self,
        table_name: &str,
        writes: &[BatchWrite],
    ) -> impl Future<Output = Result<usize, Error>> + Send {
        (**self).batch_write(table_name, writes)
    }
}

impl<T: ItemClient> ItemClient for &T {
    fn send(&self, request: &ItemRequest) -> impl Future<Output = Result<Option<Item>, Error>> + Send {
        (**self).send(request)
    }

    fn batch_write(
        &self,
        table_name: &str,
        writes: &[BatchWrite],
    ) -> impl Future<Output = Result<usize, Error>> + Send {
        (**self).batch_write(table_name, writes)
    }
}

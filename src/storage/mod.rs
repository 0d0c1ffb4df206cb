//! Access to a single-table design keyed by `PK`/`SK`
//!
//! Items carry their primary key in `PK`/`SK` and up to two secondary keys
//! in `GSI1PK`/`GSI1SK` and `GSI2PK`/`GSI2SK`, indexed by `GSI1` and `GSI2`.
//! Reads go through [`PageFetcher`], single-item calls and batch writes
//! through [`ItemClient`].

mod entity;
mod options;

pub use entity::Entity;
pub use options::{GetOptions, QueryOptions, ScanOptions, StorageOptions, UpdateOptions};

use crate::expression::{Filter, SortKeyCondition};
use crate::item::{BatchWrite, ItemClient, ItemRequest, Update};
use crate::query::{Decoder, Output, PageFetcher, QueryIterator, Request, SerdeDecoder};
use crate::Error;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Most entries the store accepts in one batch write
pub const BATCH_WRITE_SIZE: usize = 25;

/// Key layout a read targets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Index {
    /// The table itself, keyed by `PK`/`SK`
    Primary,
    /// `GSI1`, keyed by `GSI1PK`/`GSI1SK`
    Gsi1,
    /// `GSI2`, keyed by `GSI2PK`/`GSI2SK`
    Gsi2,
}

impl Index {
    /// Index name to send, `None` for the table itself
    pub fn name(self) -> Option<&'static str> {
        match self {
            Index::Primary => None,
            Index::Gsi1 => Some("GSI1"),
            Index::Gsi2 => Some("GSI2"),
        }
    }

    /// Partition key attribute
    pub fn partition_key(self) -> &'static str {
        match self {
            Index::Primary => "PK",
            Index::Gsi1 => "GSI1PK",
            Index::Gsi2 => "GSI2PK",
        }
    }

    /// Sort key attribute
    pub fn sort_key(self) -> &'static str {
        match self {
            Index::Primary => "SK",
            Index::Gsi1 => "GSI1SK",
            Index::Gsi2 => "GSI2SK",
        }
    }
}

/// Entry points for one table
///
/// ```rust,no_run
/// use dynamo_query::{Entity, Filter, SortKeyCondition, Storage};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Deserialize, Serialize)]
/// struct Order {
///     customer: String,
///     id: String,
///     status: String,
/// }
///
/// impl Entity for Order {
///     fn pk_sk(&self) -> (String, String) {
///         (format!("CUSTOMER#{}", self.customer), format!("ORDER#{}", self.id))
///     }
/// }
///
/// # async fn example() -> Result<(), dynamo_query::Error> {
/// let storage = Storage::with_global_client("shop").await;
///
/// let mut order = Order {
///     customer: "42".into(),
///     id: "7".into(),
///     status: "shipped".into(),
/// };
/// storage.save(&mut order).await?;
///
/// let orders = storage
///     .query(
///         "CUSTOMER#42",
///         Some(SortKeyCondition::begins_with("ORDER#")),
///         &[Filter::eq("status", "shipped")],
///     )
///     .await?;
///
/// while orders.next().await {
///     let order: Order = orders.decode().await?;
///     println!("{}", order.status);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Storage<C, D = SerdeDecoder> {
    table: String,
    client: C,
    decoder: D,
    options: StorageOptions,
}

impl Storage<Client> {
    /// Storage backed by the global client, see [`dynamodb_client`](crate::dynamodb_client)
    pub async fn with_global_client(table: impl Into<String>) -> Self {
        Self::new(table, crate::dynamodb_client().await.clone())
    }
}

impl<C> Storage<C> {
    /// Storage for `table` decoding with `serde_dynamo`
    pub fn new(table: impl Into<String>, client: C) -> Self {
        Self {
            table: table.into(),
            client,
            decoder: SerdeDecoder,
            options: StorageOptions::default(),
        }
    }
}

impl<C, D> Storage<C, D> {
    /// Replace the decoder used for reads
    pub fn with_decoder<E: Decoder + Clone>(self, decoder: E) -> Storage<C, E> {
        Storage {
            table: self.table,
            client: self.client,
            decoder,
            options: self.options,
        }
    }

    /// Replace the request defaults
    pub fn with_options(mut self, options: StorageOptions) -> Self {
        self.options = options;
        self
    }

    /// Table name
    pub fn table(&self) -> &str {
        &self.table
    }

    fn with_defaults(&self, index: Index, mut request: Request) -> Request {
        if let Some(name) = index.name() {
            request = request.index(name);
        }
        if let Some(page_size) = self.options.page_size {
            request = request.limit(page_size);
        }
        if let (Index::Primary, Some(consistent)) = (index, self.options.consistent_read) {
            request = request.consistent_read(consistent);
        }
        request
    }

    /// Query request on `index` for partition `pk`.
    ///
    /// The partition clause is `PK = :PK` (or `GSI1PK = :GSI1PK`...), the
    /// optional sort-key condition and the filters follow in that order.
    pub fn query_request(
        &self,
        index: Index,
        pk: &str,
        condition: Option<&SortKeyCondition>,
        filters: &[Filter],
    ) -> Result<Request, Error> {
        if pk.is_empty() {
            return Err(Error::EntityPkNotSet);
        }

        let mut request =
            Request::query(self.table.as_str()).partition_key(index.partition_key(), pk);
        if let Some(condition) = condition {
            request = request.sort_key(index.sort_key(), condition);
        }
        Ok(self.with_defaults(index, request.filters(filters)))
    }

    /// Scan request on `index` with `filters`
    pub fn scan_request(&self, index: Index, filters: &[Filter]) -> Request {
        self.with_defaults(index, Request::scan(self.table.as_str()).filters(filters))
    }

    fn get_request(&self, pk: &str, sk: &str, options: &GetOptions) -> Result<ItemRequest, Error> {
        if pk.is_empty() {
            return Err(Error::EntityPkNotSet);
        }
        if sk.is_empty() {
            return Err(Error::EntitySkNotSet);
        }

        let key = [
            ("PK".to_string(), AttributeValue::S(pk.to_string())),
            ("SK".to_string(), AttributeValue::S(sk.to_string())),
        ];
        let mut request = ItemRequest::get(self.table.as_str(), key.into())
            .select(&options.attributes);
        if let Some(consistent) = options.consistent_read.or(self.options.consistent_read) {
            request = request.consistent_read(consistent);
        }
        Ok(request)
    }
}

impl<C, D> Storage<C, D>
where
    C: PageFetcher + Clone,
    D: Decoder + Clone,
{
    /// Fetch the first page of `request` and wrap it in an iterator
    pub async fn execute(&self, request: Request) -> Result<QueryIterator<C, D>, Error> {
        debug!(
            table = request.table_name(),
            index = ?request.index_name(),
            key_condition = ?request.key_condition(),
            filter = ?request.filter_expression(),
            "executing request"
        );

        let output: Output = self.client.fetch(&request).await?;
        Ok(QueryIterator::new(
            self.client.clone(),
            request,
            output,
            self.decoder.clone(),
        ))
    }

    /// Query the table for partition `pk`
    pub async fn query(
        &self,
        pk: &str,
        condition: Option<SortKeyCondition>,
        filters: &[Filter],
    ) -> Result<QueryIterator<C, D>, Error> {
        self.query_with(Index::Primary, pk, condition.as_ref(), filters, &QueryOptions::new())
            .await
    }

    /// Query `GSI1` for partition `pk`
    pub async fn query_gsi1(
        &self,
        pk: &str,
        condition: Option<SortKeyCondition>,
        filters: &[Filter],
    ) -> Result<QueryIterator<C, D>, Error> {
        self.query_with(Index::Gsi1, pk, condition.as_ref(), filters, &QueryOptions::new())
            .await
    }

    /// Query `GSI2` for partition `pk`
    pub async fn query_gsi2(
        &self,
        pk: &str,
        condition: Option<SortKeyCondition>,
        filters: &[Filter],
    ) -> Result<QueryIterator<C, D>, Error> {
        self.query_with(Index::Gsi2, pk, condition.as_ref(), filters, &QueryOptions::new())
            .await
    }

    /// Query `index` for partition `pk` with per-call options.
    ///
    /// Options are applied over the storage defaults. A consistent read asked
    /// for on a secondary index is sent as is and rejected by the store.
    pub async fn query_with(
        &self,
        index: Index,
        pk: &str,
        condition: Option<&SortKeyCondition>,
        filters: &[Filter],
        options: &QueryOptions,
    ) -> Result<QueryIterator<C, D>, Error> {
        let request = self.query_request(index, pk, condition, filters)?;
        self.execute(options.apply(request)).await
    }

    /// Scan the table
    pub async fn scan(&self, filters: &[Filter]) -> Result<QueryIterator<C, D>, Error> {
        self.scan_with(Index::Primary, filters, &ScanOptions::new()).await
    }

    /// Scan `GSI1`
    pub async fn scan_gsi1(&self, filters: &[Filter]) -> Result<QueryIterator<C, D>, Error> {
        self.scan_with(Index::Gsi1, filters, &ScanOptions::new()).await
    }

    /// Scan `GSI2`
    pub async fn scan_gsi2(&self, filters: &[Filter]) -> Result<QueryIterator<C, D>, Error> {
        self.scan_with(Index::Gsi2, filters, &ScanOptions::new()).await
    }

    /// Scan `index` with per-call options
    pub async fn scan_with(
        &self,
        index: Index,
        filters: &[Filter],
        options: &ScanOptions,
    ) -> Result<QueryIterator<C, D>, Error> {
        self.execute(options.apply(self.scan_request(index, filters)))
            .await
    }
}

impl<C, D> Storage<C, D>
where
    C: ItemClient,
    D: Decoder,
{
    /// Decode the item stored under `pk`/`sk`
    pub async fn get<T: DeserializeOwned>(&self, pk: &str, sk: &str) -> Result<T, Error> {
        self.get_with(pk, sk, &GetOptions::new()).await
    }

    /// Decode the item stored under `pk`/`sk` with per-call options.
    ///
    /// A missing item is [`Error::EntityNotFound`].
    pub async fn get_with<T: DeserializeOwned>(
        &self,
        pk: &str,
        sk: &str,
        options: &GetOptions,
    ) -> Result<T, Error> {
        let request = self.get_request(pk, sk, options)?;
        let item = self.client.send(&request).await?.ok_or(Error::EntityNotFound)?;
        Ok(self.decoder.decode(&item)?)
    }

    /// Replace `entity` with the stored item under its key
    pub async fn load<E>(&self, entity: &mut E, options: &GetOptions) -> Result<(), Error>
    where
        E: Entity + DeserializeOwned,
    {
        let (pk, sk) = entity.pk_sk();
        *entity = self.get_with(&pk, &sk, options).await?;
        Ok(())
    }

    /// Write `entity` with its key attributes, replacing any stored item
    pub async fn save<E: Entity>(&self, entity: &mut E) -> Result<(), Error> {
        let item = entity::to_item(entity)?;
        self.write(ItemRequest::put(self.table.as_str(), item)).await
    }

    /// Write `entity` only if `condition` holds on the stored item
    pub async fn save_with_condition<E: Entity>(
        &self,
        entity: &mut E,
        condition: &Filter,
    ) -> Result<(), Error> {
        let item = entity::to_item(entity)?;
        self.write(ItemRequest::put(self.table.as_str(), item).condition(condition))
            .await
    }

    /// Delete the item stored under the key of `entity`
    pub async fn remove<E: Entity>(&self, entity: &E) -> Result<(), Error> {
        let key = entity::key_of(entity)?;
        self.write(ItemRequest::delete(self.table.as_str(), key)).await
    }

    /// Delete the item under the key of `entity` only if `condition` holds
    pub async fn remove_with_condition<E: Entity>(
        &self,
        entity: &E,
        condition: &Filter,
    ) -> Result<(), Error> {
        let key = entity::key_of(entity)?;
        self.write(ItemRequest::delete(self.table.as_str(), key).condition(condition))
            .await
    }

    /// Apply `update` to the item stored under the key of `entity`.
    ///
    /// With [`ReturnValue::AllNew`](aws_sdk_dynamodb::types::ReturnValue::AllNew)
    /// or `UpdatedNew` the returned attributes are decoded into `entity`.
    /// Other return values are discarded.
    pub async fn update<E>(
        &self,
        entity: &mut E,
        update: &Update,
        options: &UpdateOptions,
    ) -> Result<(), Error>
    where
        E: Entity + DeserializeOwned,
    {
        let key = entity::key_of(entity)?;
        if update.is_empty() {
            return Err(Error::EmptyUpdate);
        }

        let mut request = ItemRequest::update(self.table.as_str(), key, update);
        if let Some(condition) = &options.condition {
            request = request.condition(condition);
        }
        if let Some(return_values) = &options.return_values {
            request = request.return_values(return_values.clone());
        }

        let attributes = self.client.send(&request).await?;
        if let (true, Some(attributes)) = (options.decodes_result(), attributes) {
            *entity = self.decoder.decode(&attributes)?;
        }
        Ok(())
    }

    /// Write every entity in batches of [`BATCH_WRITE_SIZE`].
    ///
    /// Every entity is encoded before anything is sent, so an invalid entity
    /// fails the call without writing.
    pub async fn batch_save<E: Entity>(&self, entities: &mut [E]) -> Result<(), Error> {
        let writes = entities
            .iter_mut()
            .map(|entity| entity::to_item(entity).map(BatchWrite::Put))
            .collect::<Result<Vec<_>, _>>()?;
        self.batch_write(&writes).await
    }

    /// Delete the items under the keys of every entity in batches of [`BATCH_WRITE_SIZE`]
    pub async fn batch_remove<E: Entity>(&self, entities: &[E]) -> Result<(), Error> {
        let writes = entities
            .iter()
            .map(|entity| entity::key_of(entity).map(BatchWrite::Delete))
            .collect::<Result<Vec<_>, _>>()?;
        self.batch_write(&writes).await
    }

    async fn write(&self, request: ItemRequest) -> Result<(), Error> {
        let _ = self.client.send(&request).await?;
        Ok(())
    }

    async fn batch_write(&self, writes: &[BatchWrite]) -> Result<(), Error> {
        let mut unprocessed = 0;
        for chunk in writes.chunks(BATCH_WRITE_SIZE) {
            unprocessed += self.client.batch_write(&self.table, chunk).await?;
        }

        if unprocessed > 0 {
            warn!(
                table = self.table.as_str(),
                unprocessed,
                total = writes.len(),
                "batch write left entries unprocessed"
            );
            return Err(Error::BatchUnprocessed(unprocessed));
        }
        debug!(table = self.table.as_str(), total = writes.len(), "batch write done");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Item, Operation};

    #[derive(Clone, Debug)]
    struct Offline;

    impl PageFetcher for Offline {
        async fn fetch(&self, _request: &Request) -> Result<Output, Error> {
            Err(Error::client("offline"))
        }
    }

    impl ItemClient for Offline {
        async fn send(&self, _request: &ItemRequest) -> Result<Option<Item>, Error> {
            Err(Error::client("offline"))
        }

        async fn batch_write(&self, _table_name: &str, _writes: &[BatchWrite]) -> Result<usize, Error> {
            Err(Error::client("offline"))
        }
    }

    #[derive(serde::Serialize, serde::Deserialize)]
    struct Draft {
        id: String,
    }

    impl Entity for Draft {
        fn pk_sk(&self) -> (String, String) {
            (self.id.clone(), "DRAFT".to_string())
        }
    }

    #[test]
    fn test_index_key_names() {
        assert_eq!(Index::Primary.name(), None);
        assert_eq!(Index::Gsi1.name(), Some("GSI1"));
        assert_eq!(Index::Gsi2.partition_key(), "GSI2PK");
        assert_eq!(Index::Gsi1.sort_key(), "GSI1SK");
    }

    #[test]
    fn test_query_request_for_table() {
        let storage = Storage::new("shop", Offline);
        let condition = SortKeyCondition::begins_with("ORDER#");
        let request = storage
            .query_request(
                Index::Primary,
                "CUSTOMER#1",
                Some(&condition),
                &[Filter::eq("status", "open")],
            )
            .unwrap();

        assert_eq!(request.operation(), Operation::Query);
        assert_eq!(request.index_name(), None);
        assert_eq!(
            request.key_condition(),
            Some("PK = :PK AND begins_with(SK, :SK)")
        );
        assert_eq!(request.filter_expression(), Some("#status = :status"));
    }

    #[test]
    fn test_query_request_for_gsi_ignores_consistent_read() {
        let storage = Storage::new("shop", Offline).with_options(
            StorageOptions::new()
                .with_page_size(50)
                .with_consistent_read(true),
        );
        let request = storage
            .query_request(Index::Gsi2, "EMAIL#x", None, &[])
            .unwrap();

        assert_eq!(request.index_name(), Some("GSI2"));
        assert_eq!(request.key_condition(), Some("GSI2PK = :GSI2PK"));
        assert_eq!(request.page_limit(), Some(50));
        assert_eq!(request.is_consistent_read(), None);

        let request = storage.query_request(Index::Primary, "A", None, &[]).unwrap();
        assert_eq!(request.is_consistent_read(), Some(true));
    }

    #[test]
    fn test_empty_partition_key_is_rejected() {
        let storage = Storage::new("shop", Offline);
        let err = storage
            .query_request(Index::Primary, "", None, &[])
            .unwrap_err();
        assert!(matches!(err, Error::EntityPkNotSet));
    }

    #[test]
    fn test_scan_request() {
        let storage = Storage::new("shop", Offline);
        let request = storage.scan_request(Index::Gsi1, &[Filter::gt("total", 10)]);
        assert_eq!(request.operation(), Operation::Scan);
        assert_eq!(request.index_name(), Some("GSI1"));
        assert_eq!(request.key_condition(), None);
        assert_eq!(request.filter_expression(), Some("#total > :total"));
    }

    #[test]
    fn test_get_request_falls_back_to_storage_consistency() {
        let storage = Storage::new("shop", Offline)
            .with_options(StorageOptions::new().with_consistent_read(true));

        let request = storage.get_request("A", "B", &GetOptions::new()).unwrap();
        assert_eq!(request.is_consistent_read(), Some(true));
        assert_eq!(request.projection_expression(), None);

        let options = GetOptions::new()
            .with_consistent_read(false)
            .with_attributes(["name"]);
        let request = storage.get_request("A", "B", &options).unwrap();
        assert_eq!(request.is_consistent_read(), Some(false));
        assert_eq!(request.projection_expression(), Some("#name"));
    }

    #[tokio::test]
    async fn test_fetch_error_is_returned_directly() {
        let storage = Storage::new("shop", Offline);
        let err = storage.scan(&[]).await.unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_get_requires_sort_key() {
        let storage = Storage::new("shop", Offline);
        let err = storage.get::<String>("A", "").await.unwrap_err();
        assert!(matches!(err, Error::EntitySkNotSet));
    }

    #[tokio::test]
    async fn test_key_checks_run_before_sending() {
        let storage = Storage::new("shop", Offline);
        let mut draft = Draft { id: String::new() };

        let err = storage.save(&mut draft).await.unwrap_err();
        assert!(matches!(err, Error::EntityPkNotSet));
        let err = storage.remove(&draft).await.unwrap_err();
        assert!(matches!(err, Error::EntityPkNotSet));

        draft.id = "1".into();
        let err = storage
            .update(&mut draft, &Update::new(), &UpdateOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyUpdate));
    }

    #[tokio::test]
    async fn test_empty_batch_sends_nothing() {
        let storage = Storage::new("shop", Offline);
        storage.batch_save::<Draft>(&mut []).await.unwrap();
        storage.batch_remove::<Draft>(&[]).await.unwrap();
    }
}

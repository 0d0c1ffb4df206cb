use super::{Decoder, Item, Output, PageFetcher, Request};
use crate::expression::Value;
use crate::Error;
use futures_util::stream;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_stream::Stream;
use tracing::{debug, warn};

/// Predicate selecting an item for [`QueryIterator::first`]
pub type FindCondition = Box<dyn Fn(&Item) -> bool + Send + Sync>;

/// Match items whose `field` equals `value`.
///
/// `S` attributes compare as strings, `N` attributes against the textual form
/// of the value, `BOOL` attributes against booleans.
pub fn field_value(field: impl Into<String>, value: impl Into<Value>) -> FindCondition {
    let field = field.into();
    let value = value.into();
    Box::new(move |item: &Item| {
        item.get(&field)
            .map(|attribute| value.matches(attribute))
            .unwrap_or(false)
    })
}

/// Observable position of a [`QueryIterator`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IteratorState {
    /// No item has been read yet
    Cold,
    /// The cursor is on or before an item of the current page
    Reading,
    /// Every page has been read
    Exhausted,
    /// A fetch failed during auto-pagination; cleared by `reset`
    Faulted,
}

#[derive(Debug)]
struct Cursor {
    request: Request,
    output: Output,
    // next item to read
    next: usize,
    // item `decode` reads
    current: Option<usize>,
    exhausted: bool,
    error: Option<Arc<Error>>,
}

impl Cursor {
    fn advance_within_page(&mut self) -> bool {
        if self.next < self.output.items.len() {
            self.current = Some(self.next);
            self.next += 1;
            true
        } else {
            self.current = None;
            false
        }
    }

    fn replace_page(&mut self, output: Output) {
        self.output = output;
        self.next = 0;
        self.current = None;
        self.exhausted = false;
    }
}

/// Cursor over paginated query or scan results
///
/// Holds the request that produced the current page so continuation pages
/// can be fetched transparently. All state sits behind one async mutex held
/// across the remote call: methods take `&self` and at most one fetch is in
/// flight per iterator.
///
/// Two pagination styles exist and should not be mixed in one traversal:
/// [`next`](Self::next) crosses pages by itself and records fetch failures
/// in [`error`](Self::error), while [`next_page`](Self::next_page) lets the
/// caller drive and returns failures directly.
///
/// ```rust,no_run
/// use dynamo_query::{Output, QueryIterator, Request, SerdeDecoder};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Order {
///     total: u64,
/// }
///
/// # async fn example(client: aws_sdk_dynamodb::Client) -> Result<(), dynamo_query::Error> {
/// let request = Request::query("orders").partition_key("PK", "CUSTOMER#1");
/// let iterator = QueryIterator::new(client, request, Output::default(), SerdeDecoder);
///
/// let mut sum = 0;
/// while iterator.next().await {
///     let order: Order = iterator.decode().await?;
///     sum += order.total;
/// }
/// if let Some(e) = iterator.error().await {
///     eprintln!("stopped early: {e}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct QueryIterator<C, D> {
    client: C,
    decoder: D,
    cursor: Mutex<Cursor>,
}

impl<C, D> QueryIterator<C, D>
where
    C: PageFetcher,
    D: Decoder,
{
    /// Iterator positioned before the first item of `output`.
    ///
    /// `output` is the page `request` already produced; pass
    /// [`Output::default`] with a continuation-free request to get an
    /// iterator that never fetches.
    pub fn new(client: C, request: Request, output: Output, decoder: D) -> Self {
        Self {
            client,
            decoder,
            cursor: Mutex::new(Cursor {
                request,
                output,
                next: 0,
                current: None,
                exhausted: false,
                error: None,
            }),
        }
    }

    /// Items returned on the current page
    pub async fn count(&self) -> i32 {
        self.cursor.lock().await.output.count
    }

    /// Items evaluated for the current page before filtering
    pub async fn scanned_count(&self) -> i32 {
        self.cursor.lock().await.output.scanned_count
    }

    /// Decode the first item of the current page matching any condition.
    ///
    /// Without conditions this is item zero. Only the current page is
    /// searched; nothing is fetched.
    pub async fn first<T: DeserializeOwned>(
        &self,
        conditions: &[FindCondition],
    ) -> Result<T, Error> {
        let cursor = self.cursor.lock().await;
        let found = if conditions.is_empty() {
            cursor.output.items.first()
        } else {
            cursor
                .output
                .items
                .iter()
                .find(|&item| conditions.iter().any(|condition| condition(item)))
        };

        let item = found.ok_or(Error::EntityNotFound)?;
        Ok(self.decoder.decode(item)?)
    }

    /// Move to the next item, fetching continuation pages as needed.
    ///
    /// Returns `false` once every page is read or a fetch fails. A failed
    /// fetch is kept in [`error`](Self::error) and further calls return
    /// `false` without fetching until [`reset`](Self::reset).
    pub async fn next(&self) -> bool {
        let mut cursor = self.cursor.lock().await;
        if cursor.error.is_some() {
            cursor.current = None;
            return false;
        }

        loop {
            if cursor.advance_within_page() {
                return true;
            }

            let Some(start_key) = cursor.output.last_evaluated_key.clone() else {
                cursor.exhausted = true;
                return false;
            };

            cursor.request.set_exclusive_start_key(Some(start_key));
            let fetched = self.client.fetch(&cursor.request).await;
            match fetched {
                Ok(output) => {
                    debug!(
                        table = cursor.request.table_name(),
                        count = output.items.len(),
                        has_more = output.has_more(),
                        "advanced to next page"
                    );
                    cursor.replace_page(output);
                }
                Err(e) => {
                    warn!(
                        table = cursor.request.table_name(),
                        error = %e,
                        "pagination stopped"
                    );
                    cursor.error = Some(Arc::new(e));
                    return false;
                }
            }
        }
    }

    /// Fetch the next page, leaving the cursor before its first item.
    ///
    /// Returns `Ok(false)` without fetching when no continuation remains.
    pub async fn next_page(&self) -> Result<bool, Error> {
        let mut cursor = self.cursor.lock().await;
        let Some(start_key) = cursor.output.last_evaluated_key.clone() else {
            return Ok(false);
        };

        cursor.request.set_exclusive_start_key(Some(start_key));
        let output = self.client.fetch(&cursor.request).await?;
        cursor.replace_page(output);
        Ok(true)
    }

    /// Rewind to the start of the current page and clear any recorded error.
    ///
    /// Pages already fetched are not refetched.
    pub async fn reset(&self) {
        let mut cursor = self.cursor.lock().await;
        cursor.next = 0;
        cursor.current = None;
        cursor.exhausted = false;
        cursor.error = None;
    }

    /// Decode the item the cursor is on
    pub async fn decode<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let cursor = self.cursor.lock().await;
        let item = cursor
            .current
            .and_then(|index| cursor.output.items.get(index))
            .ok_or(Error::IndexOutOfRange)?;
        Ok(self.decoder.decode(item)?)
    }

    /// Fetch failure recorded by [`next`](Self::next)
    pub async fn error(&self) -> Option<Arc<Error>> {
        self.cursor.lock().await.error.clone()
    }

    /// Current position
    pub async fn state(&self) -> IteratorState {
        let cursor = self.cursor.lock().await;
        if cursor.error.is_some() {
            IteratorState::Faulted
        } else if cursor.exhausted {
            IteratorState::Exhausted
        } else if cursor.next == 0 {
            IteratorState::Cold
        } else {
            IteratorState::Reading
        }
    }

    /// Snapshot of the request the next fetch would send
    pub async fn request(&self) -> Request {
        self.cursor.lock().await.request.clone()
    }

    async fn take_error(&self) -> Option<Error> {
        let shared = self.cursor.lock().await.error.take()?;
        Some(Arc::try_unwrap(shared).unwrap_or_else(|shared| Error::Client(Box::new(shared))))
    }

    /// Consume the iterator as a stream of decoded items.
    ///
    /// Pages are fetched as the stream is polled. Decode failures are yielded
    /// in place; a fetch failure is yielded once and ends the stream.
    pub fn into_stream<T>(self) -> impl Stream<Item = Result<T, Error>>
    where
        T: DeserializeOwned,
    {
        stream::unfold(Some(self), |iterator| async move {
            let iterator = iterator?;
            if iterator.next().await {
                let item = iterator.decode::<T>().await;
                Some((item, Some(iterator)))
            } else {
                let error = iterator.take_error().await?;
                Some((Err(error), None))
            }
        })
    }
}

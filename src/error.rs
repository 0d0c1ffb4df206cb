use aws_sdk_dynamodb::error::BuildError;
use aws_sdk_dynamodb::operation::batch_write_item::BatchWriteItemError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_runtime_api::http::Response;
use serde_dynamo::Error as SerdeDynamoError;
use std::error::Error as StdError;
use std::fmt;

type DynamoQueryError = SdkError<QueryError, Response>;
type DynamoScanError = SdkError<ScanError, Response>;
type DynamoGetItemError = SdkError<GetItemError, Response>;
type DynamoPutItemError = SdkError<PutItemError, Response>;
type DynamoDeleteItemError = SdkError<DeleteItemError, Response>;
type DynamoUpdateItemError = SdkError<UpdateItemError, Response>;
type DynamoBatchWriteError = SdkError<BatchWriteItemError, Response>;

/// Boxed failure raised by the page-fetch collaborator
pub type ClientError = Box<dyn StdError + Send + Sync + 'static>;

/// Query iterator and storage error
#[derive(Debug)]
pub enum Error {
    /// No item satisfied the lookup conditions
    EntityNotFound,
    /// Decode was called while the cursor was not on an item
    IndexOutOfRange,
    /// The current item could not be decoded into the target type
    EntityDecode(SerdeDynamoError),
    /// The remote fetch failed
    Client(ClientError),
    /// The partition key value was empty
    EntityPkNotSet,
    /// The sort key value was empty
    EntitySkNotSet,
    /// The entity could not be encoded into an item
    EntityEncode(SerdeDynamoError),
    /// The entity's `before_save` hook refused the write
    BeforeSave(ClientError),
    /// An update was sent without any action
    EmptyUpdate,
    /// A batch write left entries unprocessed
    BatchUnprocessed(usize),
}

impl Error {
    /// Wrap an arbitrary fetch failure as [`Error::Client`].
    ///
    /// Custom [`PageFetcher`](crate::PageFetcher) implementations use this to
    /// report transport failures.
    ///
    /// # Example
    /// ```
    /// use dynamo_query::Error;
    ///
    /// let err = Error::client("connection reset");
    /// assert!(err.is_client_error());
    /// assert_eq!(err.to_string(), "client error: connection reset");
    /// ```
    pub fn client(source: impl Into<ClientError>) -> Self {
        Error::Client(source.into())
    }

    /// Check if the error means that no matching item was found
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::EntityNotFound)
    }

    /// Check if the error was raised by decoding outside the current page
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, Error::IndexOutOfRange)
    }

    /// Check if the error is a deserialization error
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Error::EntityDecode(_))
    }

    /// Check if the error came from the remote store
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Client(_))
    }

    /// Check if the error is a serialization error
    pub fn is_encode_error(&self) -> bool {
        matches!(self, Error::EntityEncode(_))
    }
}

macro_rules! impl_from_error {
    ($name:ident, $variant:ident) => {
        impl From<$name> for Error {
            fn from(e: $name) -> Self {
                Error::$variant(e)
            }
        }
    };
    ($name:ident => boxed $variant:ident) => {
        impl From<$name> for Error {
            fn from(e: $name) -> Self {
                Error::$variant(Box::new(e))
            }
        }
    };
}

impl_from_error!(SerdeDynamoError, EntityDecode);
impl_from_error!(DynamoQueryError => boxed Client);
impl_from_error!(DynamoScanError => boxed Client);
impl_from_error!(DynamoGetItemError => boxed Client);
impl_from_error!(DynamoPutItemError => boxed Client);
impl_from_error!(DynamoDeleteItemError => boxed Client);
impl_from_error!(DynamoUpdateItemError => boxed Client);
impl_from_error!(DynamoBatchWriteError => boxed Client);
impl_from_error!(BuildError => boxed Client);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EntityNotFound => write!(f, "entity not found"),
            Error::IndexOutOfRange => write!(f, "index out of range"),
            Error::EntityDecode(e) => write!(f, "failed to decode entity: {}", e),
            Error::Client(e) => write!(f, "client error: {}", e),
            Error::EntityPkNotSet => write!(f, "entity partition key not set"),
            Error::EntitySkNotSet => write!(f, "entity sort key not set"),
            Error::EntityEncode(e) => write!(f, "failed to encode entity: {}", e),
            Error::BeforeSave(e) => write!(f, "failed to prepare save: {}", e),
            Error::EmptyUpdate => write!(f, "update has no actions"),
            Error::BatchUnprocessed(count) => {
                write!(f, "failed to process all items in batch: {} unprocessed", count)
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::EntityDecode(e) | Error::EntityEncode(e) => Some(e),
            Error::Client(e) | Error::BeforeSave(e) => Some(&**e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_error() -> SerdeDynamoError {
        <SerdeDynamoError as serde::de::Error>::custom("missing field `name`")
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(Error::EntityNotFound.to_string(), "entity not found");
        assert_eq!(Error::IndexOutOfRange.to_string(), "index out of range");
        assert!(Error::from(decode_error())
            .to_string()
            .starts_with("failed to decode entity: "));
        assert_eq!(
            Error::client("throttled").to_string(),
            "client error: throttled"
        );
    }

    #[test]
    fn test_client_error_exposes_source() {
        let err = Error::client("throttled");
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("throttled"));
    }

    #[test]
    fn test_decode_error_conversion() {
        let err: Error = decode_error().into();
        assert!(err.is_decode_error());
        assert!(err.source().is_some());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_sdk_error_conversion() {
        let sdk: DynamoQueryError = SdkError::timeout_error("timed out");
        let err: Error = sdk.into();
        assert!(err.is_client_error());

        let sdk: DynamoScanError = SdkError::timeout_error("timed out");
        let err: Error = sdk.into();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_write_errors() {
        let err = Error::EntityEncode(decode_error());
        assert!(err.is_encode_error());
        assert!(!err.is_decode_error());
        assert!(err.to_string().starts_with("failed to encode entity: "));

        let err = Error::BeforeSave("missing title".into());
        assert_eq!(err.to_string(), "failed to prepare save: missing title");
        assert!(err.source().is_some());

        assert_eq!(
            Error::BatchUnprocessed(3).to_string(),
            "failed to process all items in batch: 3 unprocessed"
        );
        assert_eq!(Error::EmptyUpdate.to_string(), "update has no actions");

        let sdk: DynamoPutItemError = SdkError::timeout_error("timed out");
        assert!(Error::from(sdk).is_client_error());
    }

    #[test]
    fn test_predicates() {
        assert!(Error::EntityNotFound.is_not_found());
        assert!(Error::IndexOutOfRange.is_index_out_of_range());
        assert!(!Error::EntityPkNotSet.is_not_found());
    }
}

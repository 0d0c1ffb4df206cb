use super::Item;
use serde::de::DeserializeOwned;

/// Turns a raw item into a typed entity
pub trait Decoder: Send + Sync {
    /// Decode `item` into `T`
    fn decode<T: DeserializeOwned>(&self, item: &Item) -> Result<T, serde_dynamo::Error>;
}

/// [`Decoder`] backed by `serde_dynamo`
#[derive(Clone, Copy, Debug, Default)]
pub struct SerdeDecoder;

impl Decoder for SerdeDecoder {
    fn decode<T: DeserializeOwned>(&self, item: &Item) -> Result<T, serde_dynamo::Error> {
        serde_dynamo::from_item(item.clone())
    }
}

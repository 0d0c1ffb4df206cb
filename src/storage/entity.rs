use crate::error::ClientError;
use crate::query::Item;
use crate::Error;
use aws_sdk_dynamodb::types::AttributeValue;
use serde::Serialize;

/// An item of a single-table design
///
/// The key attributes are derived from the entity and written next to its
/// serialized fields, so they need not be fields themselves.
///
/// ```
/// use dynamo_query::Entity;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Order {
///     customer: String,
///     id: String,
/// }
///
/// impl Entity for Order {
///     fn pk_sk(&self) -> (String, String) {
///         (format!("CUSTOMER#{}", self.customer), format!("ORDER#{}", self.id))
///     }
/// }
/// ```
pub trait Entity: Serialize + Send + Sync {
    /// Primary key values for `PK`/`SK`
    fn pk_sk(&self) -> (String, String);

    /// `GSI1PK`/`GSI1SK` values. An empty partition key leaves the entity out of `GSI1`.
    fn gsi1(&self) -> (String, String) {
        (String::new(), String::new())
    }

    /// `GSI2PK`/`GSI2SK` values. An empty partition key leaves the entity out of `GSI2`.
    fn gsi2(&self) -> (String, String) {
        (String::new(), String::new())
    }

    /// Called before the entity is encoded for a save. An error aborts the save.
    fn before_save(&mut self) -> Result<(), ClientError> {
        Ok(())
    }
}

/// `PK`/`SK` key of `entity`, rejecting empty values
pub(super) fn key_of<E: Entity>(entity: &E) -> Result<Item, Error> {
    let (pk, sk) = entity.pk_sk();
    if pk.is_empty() {
        return Err(Error::EntityPkNotSet);
    }
    if sk.is_empty() {
        return Err(Error::EntitySkNotSet);
    }
    Ok(Item::from([
        ("PK".to_string(), AttributeValue::S(pk)),
        ("SK".to_string(), AttributeValue::S(sk)),
    ]))
}

/// Run the save hook and encode `entity` with its key attributes
pub(super) fn to_item<E: Entity>(entity: &mut E) -> Result<Item, Error> {
    entity.before_save().map_err(Error::BeforeSave)?;

    let key = key_of(entity)?;
    let mut item: Item = serde_dynamo::to_item(&*entity).map_err(Error::EntityEncode)?;
    item.extend(key);

    for (pk_name, sk_name, (pk, sk)) in [
        ("GSI1PK", "GSI1SK", entity.gsi1()),
        ("GSI2PK", "GSI2SK", entity.gsi2()),
    ] {
        if pk.is_empty() {
            continue;
        }
        let _ = item.insert(pk_name.to_string(), AttributeValue::S(pk));
        if !sk.is_empty() {
            let _ = item.insert(sk_name.to_string(), AttributeValue::S(sk));
        }
    }

    Ok(item)
}

/// Common test fixtures and data structures
///
/// Models a customer record stored in a single-table layout with the key
/// attributes the storage façade expects.
use super::{Deserialize, Item, Serialize};
use dynamo_query::Entity;
use aws_sdk_dynamodb::types::AttributeValue;

/// Customer record with primary and GSI1 keys
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Customer {
    #[serde(rename = "PK")]
    pub pk: String,
    #[serde(rename = "SK")]
    pub sk: String,
    #[serde(rename = "GSI1PK")]
    pub gsi1pk: String,
    #[serde(rename = "GSI1SK")]
    pub gsi1sk: String,
    pub name: String,
    pub age: u32,
    pub active: bool,
}

impl Entity for Customer {
    fn pk_sk(&self) -> (String, String) {
        (self.pk.clone(), self.sk.clone())
    }

    fn gsi1(&self) -> (String, String) {
        (self.gsi1pk.clone(), self.gsi1sk.clone())
    }
}

/// Customer `id` with the given name and age
pub fn customer(id: &str, name: &str, age: u32) -> Customer {
    Customer {
        pk: format!("CUSTOMER#{id}"),
        sk: "PROFILE".to_string(),
        gsi1pk: format!("NAME#{name}"),
        gsi1sk: format!("CUSTOMER#{id}"),
        name: name.to_string(),
        age,
        active: age >= 18,
    }
}

/// Raw item for `customer`
pub fn customer_item(customer: &Customer) -> Item {
    serde_dynamo::to_item(customer).expect("customer fixture encodes")
}

/// Continuation token pointing after customer `id`
pub fn token(id: &str) -> Item {
    Item::from([
        (
            "PK".to_string(),
            AttributeValue::S(format!("CUSTOMER#{id}")),
        ),
        ("SK".to_string(), AttributeValue::S("PROFILE".to_string())),
    ])
}

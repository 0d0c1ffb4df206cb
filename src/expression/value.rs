use aws_sdk_dynamodb::types::AttributeValue;
use serde::Serialize;
use std::fmt;

/// Operand of a filter, sort-key condition or find condition
///
/// Scalars convert with [`From`]: strings become `S`, every integer and float
/// primitive becomes `N` and `bool` becomes `BOOL`. Anything else goes through
/// [`Value::encode`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// String attribute
    String(String),
    /// Number attribute in its textual form
    Number(String),
    /// Boolean attribute
    Bool(bool),
    /// Attribute produced by the serde encoder
    Attribute(AttributeValue),
}

impl Value {
    /// Encode any serializable value.
    ///
    /// Values the encoder rejects degrade to their `Debug` text as a string
    /// attribute instead of failing.
    ///
    /// ```
    /// use dynamo_query::Value;
    /// use aws_sdk_dynamodb::types::AttributeValue;
    ///
    /// let tags = Value::encode(&vec!["a", "b"]);
    /// assert!(matches!(tags.into_attribute_value(), AttributeValue::L(_)));
    /// ```
    pub fn encode<T>(value: &T) -> Self
    where
        T: Serialize + fmt::Debug + ?Sized,
    {
        match serde_dynamo::to_attribute_value::<_, AttributeValue>(value) {
            Ok(AttributeValue::S(s)) => Value::String(s),
            Ok(AttributeValue::N(n)) => Value::Number(n),
            Ok(AttributeValue::Bool(b)) => Value::Bool(b),
            Ok(attribute) => Value::Attribute(attribute),
            Err(_) => Value::String(format!("{:?}", value)),
        }
    }

    /// Convert into the store's attribute value union
    pub fn into_attribute_value(self) -> AttributeValue {
        match self {
            Value::String(s) => AttributeValue::S(s),
            Value::Number(n) => AttributeValue::N(n),
            Value::Bool(b) => AttributeValue::Bool(b),
            Value::Attribute(attribute) => attribute,
        }
    }

    /// Loose equality used by find conditions.
    ///
    /// `S` matches strings, `N` matches the textual form of numbers and strings,
    /// `BOOL` matches booleans. Other attribute kinds never match.
    pub(crate) fn matches(&self, attribute: &AttributeValue) -> bool {
        match (attribute, self) {
            (AttributeValue::S(s), Value::String(v)) => s == v,
            (AttributeValue::N(n), Value::Number(v) | Value::String(v)) => n == v,
            (AttributeValue::Bool(b), Value::Bool(v)) => b == v,
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<AttributeValue> for Value {
    fn from(v: AttributeValue) -> Self {
        Value::Attribute(v)
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Number(v.to_string())
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::{Error as _, Serializer};

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Value::from("x"), Value::String("x".into()));
        assert_eq!(Value::from(30), Value::Number("30".into()));
        assert_eq!(Value::from(12.34), Value::Number("12.34".into()));
        assert_eq!(Value::from(30.0_f64), Value::Number("30".into()));
        assert_eq!(Value::from(true), Value::Bool(true));
    }

    #[test]
    fn test_encode_scalars_resolve_to_plain_variants() {
        assert_eq!(Value::encode("Jane"), Value::String("Jane".into()));
        assert_eq!(Value::encode(&7_u8), Value::Number("7".into()));
        assert_eq!(Value::encode(&false), Value::Bool(false));
    }

    #[test]
    fn test_encode_structured_value() {
        #[derive(Debug, Serialize)]
        struct Address {
            city: String,
        }

        let value = Value::encode(&Address {
            city: "Lisbon".into(),
        });
        let AttributeValue::M(map) = value.into_attribute_value() else {
            panic!("expected a map attribute");
        };
        assert_eq!(map.get("city"), Some(&AttributeValue::S("Lisbon".into())));
    }

    #[derive(Debug)]
    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("unsupported"))
        }
    }

    #[test]
    fn test_encode_failure_degrades_to_debug_string() {
        assert_eq!(
            Value::encode(&Unencodable),
            Value::String("Unencodable".into())
        );
    }

    #[test]
    fn test_matches() {
        assert!(Value::from("a").matches(&AttributeValue::S("a".into())));
        assert!(!Value::from("a").matches(&AttributeValue::S("b".into())));
        assert!(Value::from(42).matches(&AttributeValue::N("42".into())));
        assert!(Value::from("42").matches(&AttributeValue::N("42".into())));
        assert!(Value::from(true).matches(&AttributeValue::Bool(true)));
        assert!(!Value::from(1).matches(&AttributeValue::S("1".into())));
        assert!(!Value::from(true).matches(&AttributeValue::Null(true)));
    }
}

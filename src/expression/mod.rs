//! Filter and key-condition expression composition
//!
//! Everything in this module renders DynamoDB expression text while
//! registering `#name` and `:value` placeholders in a [`Registry`].
//! Composition never fails: operands that cannot be encoded degrade to their
//! string form.

mod filter;
mod key_condition;
mod registry;
mod scope;
mod value;

pub use filter::{Filter, Joiner, Operator};
pub use key_condition::SortKeyCondition;
pub use registry::Registry;
pub use scope::ExpressionScope;
pub use value::Value;

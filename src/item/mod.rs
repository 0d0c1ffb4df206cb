//! Single-item reads and writes
//!
//! Gets, puts, deletes and updates address one item by its key and share the
//! placeholder registry with their condition and projection expressions.
//! Batch writes group puts and deletes without conditions.

mod client;
mod request;
mod update;

pub use client::ItemClient;
pub use request::{BatchWrite, ItemOperation, ItemRequest};
pub use update::Update;

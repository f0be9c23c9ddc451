//! Operation Dispatcher Module
//!
//! The public face of the engine: parses operation text, drives the
//! journaling protocol for mutations, and serves read-only queries.

#[allow(clippy::module_inception)]
pub mod dispatcher;
pub mod tokens;
pub mod types;

pub use dispatcher::Dispatcher;
pub use types::{Ack, QueryResult, StoreOptions};

//! journalfs - an in-memory hierarchical filesystem with snapshot +
//! write-ahead-log persistence.
//!
//! The namespace lives entirely in memory; durability comes from a
//! full-tree snapshot file plus an append-only journal of the operation
//! currently in flight. Recovery replays pending journal records against
//! the last snapshot, so an abrupt termination never loses an
//! acknowledged mutation and never leaves the store inconsistent.

pub mod dispatcher;
pub mod fs;
pub mod journal;
pub mod recovery;
pub mod shell;
pub mod snapshot;

pub use dispatcher::{Ack, Dispatcher, QueryResult, StoreOptions};
pub use fs::{FsError, Tree};
pub use journal::{Journal, Operation, Record};
pub use snapshot::SnapshotStore;

//! Snapshot Module
//!
//! Full-tree checkpointing: the durable, versioned encoding of the
//! namespace and its crash-atomic writer.

pub mod store;

pub use store::SnapshotStore;

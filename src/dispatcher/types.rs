//! Dispatcher Types
//!
//! The dispatcher's request/response surface and the options naming the
//! durable files a store lives in.

use std::path::{Path, PathBuf};

use crate::fs::{DirEntry, WalkEntry};

/// Locations of the two durable files backing one store instance.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub snapshot_path: PathBuf,
    pub journal_path: PathBuf,
}

impl StoreOptions {
    /// The default file names inside a data directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            snapshot_path: dir.join("fs.snapshot.json"),
            journal_path: dir.join("fs.journal"),
        }
    }
}

/// Acknowledgement of a successfully applied and checkpointed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// Sequence number the operation was journaled under.
    pub seq: u64,
    /// Canonical operation kind name.
    pub kind: &'static str,
}

/// Result of a read-only request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    /// `List`: the ordered children of a directory.
    Listing(Vec<DirEntry>),
    /// `Read`: a file's payload.
    Content(String),
    /// `Tree`: a depth-annotated recursive walk.
    Tree(Vec<WalkEntry>),
}

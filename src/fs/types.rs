//! Namespace Tree Types
//!
//! Core types for the in-memory namespace: node identifiers, the
//! Directory/File sum type, listing entries, and the error surface shared
//! by every component of the engine.

use indexmap::IndexMap;
use thiserror::Error;

/// Errors produced by the namespace tree, the journal, the snapshot store,
/// and the dispatcher.
#[derive(Error, Debug)]
pub enum FsError {
    #[error("ENOENT: no such file or directory, {operation} '{path}'")]
    NotFound { path: String, operation: String },

    #[error("EEXIST: file already exists, {operation} '{path}'")]
    AlreadyExists { path: String, operation: String },

    #[error("EISDIR: illegal operation on a directory, {operation} '{path}'")]
    IsDirectory { path: String, operation: String },

    #[error("EISDIR: not a file, {operation} '{path}'")]
    NotFile { path: String, operation: String },

    #[error("ENOTDIR: not a directory, {operation} '{path}'")]
    NotDirectory { path: String, operation: String },

    #[error("ENOTEMPTY: directory not empty, {operation} '{path}'")]
    NotEmpty { path: String, operation: String },

    #[error("EINVAL: invalid argument, {operation} '{path}'")]
    InvalidArgument { path: String, operation: String },

    #[error("unsupported operation, {operation} '{path}'")]
    Unsupported { path: String, operation: String },

    #[error("unknown operation '{name}'")]
    UnknownOperation { name: String },

    #[error("malformed journal record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("snapshot decode failed: {reason}")]
    SnapshotDecode { reason: String },

    #[error("durable write failed, {operation}: {source}")]
    DurableWrite {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle to a node in the tree's arena. Only meaningful for the `Tree`
/// that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// The two node kinds of the namespace.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Child name -> child node, in insertion order. Insertion order is the
    /// canonical listing order.
    Directory { children: IndexMap<String, NodeId> },
    /// An opaque text payload, replaceable only in full.
    File { content: String },
}

impl NodeKind {
    pub fn empty_directory() -> Self {
        NodeKind::Directory {
            children: IndexMap::new(),
        }
    }

    /// Check if this kind can contain children
    pub fn is_directory(&self) -> bool {
        matches!(self, NodeKind::Directory { .. })
    }

    /// Check if this kind carries a content payload
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File { .. })
    }
}

/// A single node: its entry name in the parent, a non-owning back-reference
/// to the parent directory (absent only for the root), and its kind.
///
/// Ownership is strictly top-down through the directory child maps; the
/// parent link exists for path reconstruction and ancestry walks only and
/// is never serialized.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

/// Entry kind as reported by the read surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// One entry of a recursive subtree walk, depth-annotated for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub name: String,
    pub depth: usize,
    pub kind: EntryKind,
}

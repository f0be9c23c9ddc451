//! Snapshot Store
//!
//! Serializes the whole namespace tree to a single versioned JSON document
//! and loads it back. Parent back-references are never encoded (they would
//! make the representation cyclic); they are rebuilt by the top-down arena
//! reconstruction during decode.
//!
//! Writes are crash-atomic: the document goes to a sibling temp file, is
//! forced durable, and only then renamed over the previous snapshot, so a
//! crash mid-write never leaves a truncated or mixed-version file.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::fs::{FsError, NodeId, NodeKind, Tree};

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDoc {
    format_version: u32,
    /// Sequence number of the last journal record this snapshot reflects.
    last_seq: u64,
    root: NodeRepr,
}

/// Serialized node form: kind, then children-in-order or content. Child
/// names live in the map keys, so uniqueness is structural.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum NodeRepr {
    Directory { children: IndexMap<String, NodeRepr> },
    File { content: String },
}

/// Handle to the snapshot file.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a fresh snapshot of `tree`, stamped with the seq of the last
    /// operation it reflects.
    pub fn save(&self, tree: &Tree, last_seq: u64) -> Result<(), FsError> {
        let doc = SnapshotDoc {
            format_version: FORMAT_VERSION,
            last_seq,
            root: encode_node(tree, tree.root()),
        };
        let json = serde_json::to_string(&doc).map_err(|e| FsError::DurableWrite {
            operation: "snapshot encode".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;

        let temp = self.path.with_extension("tmp");
        let write = || -> std::io::Result<()> {
            let mut file = File::create(&temp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            drop(file);
            // rename is the atomic substitution point
            std::fs::rename(&temp, &self.path)?;
            Ok(())
        };
        write().map_err(|e| FsError::DurableWrite {
            operation: "snapshot write".to_string(),
            source: e,
        })
    }

    /// Load the last snapshot. `Ok(None)` if no snapshot file exists;
    /// `SnapshotDecode` if one exists but cannot be decoded. The caller
    /// decides whether to fall back to an empty tree.
    pub fn load(&self) -> Result<Option<(Tree, u64)>, FsError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&self.path)?;
        let doc: SnapshotDoc =
            serde_json::from_str(&text).map_err(|e| FsError::SnapshotDecode {
                reason: e.to_string(),
            })?;
        if doc.format_version != FORMAT_VERSION {
            return Err(FsError::SnapshotDecode {
                reason: format!("unsupported format_version {}", doc.format_version),
            });
        }
        let children = match doc.root {
            NodeRepr::Directory { children } => children,
            NodeRepr::File { .. } => {
                return Err(FsError::SnapshotDecode {
                    reason: "root is not a directory".to_string(),
                });
            }
        };
        let mut tree = Tree::new();
        let root = tree.root();
        for (name, repr) in children {
            build_node(&mut tree, root, name, repr);
        }
        Ok(Some((tree, doc.last_seq)))
    }
}

fn encode_node(tree: &Tree, id: NodeId) -> NodeRepr {
    match &tree.node(id).kind {
        NodeKind::Directory { children } => NodeRepr::Directory {
            children: children
                .iter()
                .map(|(name, &child)| (name.clone(), encode_node(tree, child)))
                .collect(),
        },
        NodeKind::File { content } => NodeRepr::File {
            content: content.clone(),
        },
    }
}

/// Top-down reconstruction; attaching under `parent` is what rebuilds the
/// parent back-references the serialized form deliberately omits.
fn build_node(tree: &mut Tree, parent: NodeId, name: String, repr: NodeRepr) {
    match repr {
        NodeRepr::File { content } => {
            tree.attach_new(parent, name, NodeKind::File { content });
        }
        NodeRepr::Directory { children } => {
            let id = tree.attach_new(parent, name, NodeKind::empty_directory());
            for (child_name, child_repr) in children {
                build_node(tree, id, child_name, child_repr);
            }
        }
    }
}

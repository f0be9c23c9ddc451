//! Operation Records
//!
//! The durable, decodable encoding of one mutating request. A record is the
//! unit the write-ahead log stores and replay consumes: operation kind plus
//! its path/content arguments, round-tripped losslessly through JSON (string
//! escaping covers content that contains the log's own delimiters).

use serde::{Deserialize, Serialize};

use crate::fs::{FsError, Tree};

/// One mutating request, as logged and as replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Operation {
    CreateDirectory { path: String },
    DeleteDirectory { path: String },
    CreateOrReplaceFile { path: String, content: String },
    DeleteFile { path: String },
    Move { from: String, to: String },
    Copy { from: String, to: String },
}

impl Operation {
    /// Apply this operation to a tree. Used both by the dispatcher (live
    /// requests) and by recovery replay; replay calls this directly without
    /// re-logging.
    pub fn apply(&self, tree: &mut Tree) -> Result<(), FsError> {
        match self {
            Operation::CreateDirectory { path } => {
                tree.create_directory(path)?;
            }
            Operation::DeleteDirectory { path } => {
                tree.delete_directory(path)?;
            }
            Operation::CreateOrReplaceFile { path, content } => {
                tree.create_or_replace_file(path, content)?;
            }
            Operation::DeleteFile { path } => {
                tree.delete_file(path)?;
            }
            Operation::Move { from, to } => {
                tree.rename(from, to)?;
            }
            Operation::Copy { from, to } => {
                tree.copy_file(from, to)?;
            }
        }
        Ok(())
    }

    /// Canonical name of the operation kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::CreateDirectory { .. } => "CreateDirectory",
            Operation::DeleteDirectory { .. } => "DeleteDirectory",
            Operation::CreateOrReplaceFile { .. } => "CreateOrReplaceFile",
            Operation::DeleteFile { .. } => "DeleteFile",
            Operation::Move { .. } => "Move",
            Operation::Copy { .. } => "Copy",
        }
    }
}

/// One journal line: a sequence number and the operation it promises.
///
/// `seq` increases monotonically across the life of the store; the snapshot
/// records the seq of the last operation it reflects, which is what lets
/// replay skip records that a completed checkpoint already absorbed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub seq: u64,
    #[serde(flatten)]
    pub op: Operation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_round_trip() {
        let record = Record {
            seq: 3,
            op: Operation::Move {
                from: "/a".to_string(),
                to: "/b".to_string(),
            },
        };
        let line = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&line).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_content_with_delimiters_round_trips() {
        // newlines, quotes and backslashes are the characters that could
        // break a line-oriented log; JSON escaping must preserve them all
        let content = "line one\nline \"two\"\t\\backslash".to_string();
        let record = Record {
            seq: 1,
            op: Operation::CreateOrReplaceFile {
                path: "/f.txt".to_string(),
                content: content.clone(),
            },
        };
        let line = serde_json::to_string(&record).unwrap();
        assert!(!line.contains('\n'), "a record must stay on one line");
        let back: Record = serde_json::from_str(&line).unwrap();
        match back.op {
            Operation::CreateOrReplaceFile { content: c, .. } => assert_eq!(c, content),
            other => panic!("wrong operation decoded: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_fails_decode() {
        let line = r#"{"seq":1,"op":"Chmod","path":"/f"}"#;
        assert!(serde_json::from_str::<Record>(line).is_err());
    }

    #[test]
    fn test_apply_maps_to_tree_primitives() {
        let mut tree = Tree::new();
        Operation::CreateDirectory {
            path: "/docs".to_string(),
        }
        .apply(&mut tree)
        .unwrap();
        Operation::CreateOrReplaceFile {
            path: "/docs/a.txt".to_string(),
            content: "hi".to_string(),
        }
        .apply(&mut tree)
        .unwrap();
        Operation::Copy {
            from: "/docs/a.txt".to_string(),
            to: "/docs/b.txt".to_string(),
        }
        .apply(&mut tree)
        .unwrap();
        Operation::Move {
            from: "/docs/a.txt".to_string(),
            to: "/docs/c.txt".to_string(),
        }
        .apply(&mut tree)
        .unwrap();
        Operation::DeleteFile {
            path: "/docs/b.txt".to_string(),
        }
        .apply(&mut tree)
        .unwrap();

        assert_eq!(tree.read_file("/docs/c.txt").unwrap(), "hi");
        assert_eq!(tree.resolve("/docs/b.txt"), None);

        let err = Operation::DeleteDirectory {
            path: "/docs".to_string(),
        }
        .apply(&mut tree)
        .unwrap_err();
        assert!(matches!(err, FsError::NotEmpty { .. }));
    }
}

//! Operation Dispatcher
//!
//! Validates an operation request, drives the log-then-apply-then-
//! checkpoint protocol for mutations, and routes read-only requests
//! straight to the tree. Owns the process-wide tree/journal/store triple,
//! constructed once by recovery at startup.

use tracing::{debug, error};

use super::tokens::tokenize;
use super::types::{Ack, QueryResult, StoreOptions};
use crate::fs::{FsError, Tree};
use crate::journal::{Journal, Operation, Record};
use crate::recovery;
use crate::snapshot::SnapshotStore;

pub struct Dispatcher {
    tree: Tree,
    journal: Journal,
    store: SnapshotStore,
    next_seq: u64,
}

impl Dispatcher {
    /// Open (or create) a store: runs recovery against the named files and
    /// wraps the recovered tree. Live requests are only possible through a
    /// dispatcher, so recovery always runs first.
    pub fn open(options: &StoreOptions) -> Result<Self, FsError> {
        let store = SnapshotStore::new(&options.snapshot_path);
        let journal = Journal::new(&options.journal_path);
        let (tree, last_seq) = recovery::recover(&store, &journal)?;
        Ok(Self {
            tree,
            journal,
            store,
            next_seq: last_seq + 1,
        })
    }

    /// Submit one mutating request as operation text, e.g.
    /// `CreateOrReplaceFile /docs/a.txt "hi"`.
    pub fn submit(&mut self, text: &str) -> Result<Ack, FsError> {
        let op = parse_operation(text)?;
        self.submit_operation(op)
    }

    /// The log-then-apply-then-checkpoint protocol for one operation.
    pub fn submit_operation(&mut self, op: Operation) -> Result<Ack, FsError> {
        let record = Record {
            seq: self.next_seq,
            op,
        };
        // 1. durably commit the intent
        self.journal.append(&record)?;
        self.next_seq += 1;

        // 2. apply to the in-memory tree
        if let Err(apply_err) = record.op.apply(&mut self.tree) {
            // the record can never replay successfully; discard it so the
            // next startup does not halt on it
            if let Err(clear_err) = self.journal.clear() {
                error!("failed to discard void journal entry: {clear_err}");
            }
            return Err(apply_err);
        }

        // 3. checkpoint: snapshot stamped with this seq, then clear
        self.store.save(&self.tree, record.seq)?;
        self.journal.clear()?;

        debug!(seq = record.seq, kind = record.op.kind(), "operation checkpointed");
        Ok(Ack {
            seq: record.seq,
            kind: record.op.kind(),
        })
    }

    /// Serve one read-only request, e.g. `List /docs` or `Read /docs/a.txt`.
    /// Never touches the journal.
    pub fn query(&self, text: &str) -> Result<QueryResult, FsError> {
        match parse_query(text)? {
            Query::List(path) => Ok(QueryResult::Listing(self.tree.list(&path)?)),
            Query::Read(path) => Ok(QueryResult::Content(self.tree.read_file(&path)?.to_string())),
            Query::Tree(path) => Ok(QueryResult::Tree(self.tree.walk(&path)?)),
        }
    }

    /// The live tree, for callers that want direct read access.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }
}

enum Query {
    List(String),
    Read(String),
    Tree(String),
}

fn parse_operation(text: &str) -> Result<Operation, FsError> {
    let tokens = tokenize(text)?;
    let Some((kind, args)) = tokens.split_first() else {
        return Err(FsError::UnknownOperation {
            name: String::new(),
        });
    };
    match (kind.as_str(), args) {
        ("CreateDirectory", [path]) => Ok(Operation::CreateDirectory { path: path.clone() }),
        ("DeleteDirectory", [path]) => Ok(Operation::DeleteDirectory { path: path.clone() }),
        ("CreateOrReplaceFile", [path, content]) => Ok(Operation::CreateOrReplaceFile {
            path: path.clone(),
            content: content.clone(),
        }),
        ("DeleteFile", [path]) => Ok(Operation::DeleteFile { path: path.clone() }),
        ("Move", [from, to]) => Ok(Operation::Move {
            from: from.clone(),
            to: to.clone(),
        }),
        ("Copy", [from, to]) => Ok(Operation::Copy {
            from: from.clone(),
            to: to.clone(),
        }),
        (
            "CreateDirectory" | "DeleteDirectory" | "CreateOrReplaceFile" | "DeleteFile" | "Move"
            | "Copy",
            _,
        ) => Err(FsError::InvalidArgument {
            path: text.to_string(),
            operation: format!("{kind} arguments"),
        }),
        _ => Err(FsError::UnknownOperation { name: kind.clone() }),
    }
}

fn parse_query(text: &str) -> Result<Query, FsError> {
    let tokens = tokenize(text)?;
    let Some((kind, args)) = tokens.split_first() else {
        return Err(FsError::UnknownOperation {
            name: String::new(),
        });
    };
    match (kind.as_str(), args) {
        ("List", [path]) => Ok(Query::List(path.clone())),
        ("Read", [path]) => Ok(Query::Read(path.clone())),
        ("Tree", []) => Ok(Query::Tree("/".to_string())),
        ("Tree", [path]) => Ok(Query::Tree(path.clone())),
        ("List" | "Read" | "Tree", _) => Err(FsError::InvalidArgument {
            path: text.to_string(),
            operation: format!("{kind} arguments"),
        }),
        _ => Err(FsError::UnknownOperation { name: kind.clone() }),
    }
}

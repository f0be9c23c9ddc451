//! Recovery Manager
//!
//! Runs exactly once at startup, before any live request is accepted:
//! loads the last snapshot, replays pending journal records against it,
//! and re-checkpoints, returning the store to its resting state.
//!
//! Replay is idempotent: every record carries a seq, every snapshot is
//! stamped with the seq of the last operation it reflects, and records at
//! or below that stamp are skipped. A crash between the snapshot write and
//! the journal clear therefore cannot double-apply an operation.

use tracing::{debug, error, info, warn};

use crate::fs::{FsError, Tree};
use crate::journal::Journal;
use crate::snapshot::SnapshotStore;

/// Load-replay-checkpoint. Returns the recovered tree and the seq of the
/// last applied operation (0 for a fresh store).
///
/// A record that fails to decode, or whose application fails against the
/// current tree, halts recovery with the error: silently skipping it would
/// silently lose a durably promised mutation. Snapshot decode failure, by
/// contrast, falls back to an empty tree with a warning, since an empty
/// but consistent state is always a safe baseline.
pub fn recover(store: &SnapshotStore, journal: &Journal) -> Result<(Tree, u64), FsError> {
    let (mut tree, mut last_seq) = match store.load() {
        Ok(Some((tree, seq))) => {
            debug!(last_seq = seq, "snapshot loaded");
            (tree, seq)
        }
        Ok(None) => {
            debug!("no snapshot file, starting from an empty tree");
            (Tree::new(), 0)
        }
        Err(e @ FsError::SnapshotDecode { .. }) => {
            warn!("snapshot unreadable, starting from an empty tree: {e}");
            (Tree::new(), 0)
        }
        Err(e) => return Err(e),
    };

    let records = journal.read_all()?;
    if !records.is_empty() {
        info!(count = records.len(), "replaying pending journal records");
        for record in &records {
            if record.seq <= last_seq {
                debug!(seq = record.seq, "record already reflected in snapshot, skipping");
                continue;
            }
            if let Err(e) = record.op.apply(&mut tree) {
                error!(seq = record.seq, "replay failed: {e}");
                return Err(e);
            }
            last_seq = record.seq;
        }
        store.save(&tree, last_seq)?;
        journal.clear()?;
        info!("recovery checkpoint complete");
    }

    Ok((tree, last_seq))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{Operation, Record};
    use tempfile::TempDir;

    fn fixtures(dir: &TempDir) -> (SnapshotStore, Journal) {
        (
            SnapshotStore::new(dir.path().join("fs.snapshot.json")),
            Journal::new(dir.path().join("fs.journal")),
        )
    }

    #[test]
    fn test_fresh_store_recovers_to_empty_tree() {
        let dir = TempDir::new().unwrap();
        let (store, journal) = fixtures(&dir);
        let (tree, last_seq) = recover(&store, &journal).unwrap();
        assert_eq!(last_seq, 0);
        assert!(tree.list("/").unwrap().is_empty());
    }

    #[test]
    fn test_pending_record_is_replayed_and_checkpointed() {
        // snapshot contains root only; journal holds one logged-but-not-
        // checkpointed operation
        let dir = TempDir::new().unwrap();
        let (store, journal) = fixtures(&dir);
        store.save(&Tree::new(), 0).unwrap();
        journal
            .append(&Record {
                seq: 1,
                op: Operation::CreateDirectory {
                    path: "/x".to_string(),
                },
            })
            .unwrap();

        let (tree, last_seq) = recover(&store, &journal).unwrap();
        assert_eq!(last_seq, 1);
        assert!(tree.list("/x").unwrap().is_empty());
        assert!(journal.read_all().unwrap().is_empty());

        // the re-checkpoint persisted the replayed state
        let (reloaded, seq) = store.load().unwrap().unwrap();
        assert_eq!(seq, 1);
        assert!(reloaded.resolve("/x").is_some());
    }

    #[test]
    fn test_replay_matches_direct_application() {
        let dir = TempDir::new().unwrap();
        let (store, journal) = fixtures(&dir);

        let mut base = Tree::new();
        base.create_directory("/docs").unwrap();
        store.save(&base, 1).unwrap();

        let op = Operation::CreateOrReplaceFile {
            path: "/docs/a.txt".to_string(),
            content: "hi".to_string(),
        };
        journal.append(&Record { seq: 2, op: op.clone() }).unwrap();

        let (recovered, _) = recover(&store, &journal).unwrap();
        op.apply(&mut base).unwrap();
        assert_eq!(
            recovered.read_file("/docs/a.txt").unwrap(),
            base.read_file("/docs/a.txt").unwrap()
        );
    }

    #[test]
    fn test_record_already_in_snapshot_is_not_reapplied() {
        // crash simulated between the snapshot write and the journal clear:
        // the snapshot already reflects the operation the journal promises
        let dir = TempDir::new().unwrap();
        let (store, journal) = fixtures(&dir);

        let mut tree = Tree::new();
        tree.create_directory("/x").unwrap();
        store.save(&tree, 1).unwrap();
        journal
            .append(&Record {
                seq: 1,
                op: Operation::CreateDirectory {
                    path: "/x".to_string(),
                },
            })
            .unwrap();

        // a second application would fail AlreadyExists; the seq check must
        // skip it instead
        let (recovered, last_seq) = recover(&store, &journal).unwrap();
        assert_eq!(last_seq, 1);
        assert!(recovered.resolve("/x").is_some());
        assert!(journal.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_multiple_pending_records_replay_in_order() {
        let dir = TempDir::new().unwrap();
        let (store, journal) = fixtures(&dir);
        store.save(&Tree::new(), 0).unwrap();
        let ops = [
            Operation::CreateDirectory {
                path: "/d".to_string(),
            },
            Operation::CreateOrReplaceFile {
                path: "/d/f".to_string(),
                content: "one".to_string(),
            },
            Operation::Move {
                from: "/d/f".to_string(),
                to: "/d/g".to_string(),
            },
        ];
        for (i, op) in ops.iter().enumerate() {
            journal
                .append(&Record {
                    seq: i as u64 + 1,
                    op: op.clone(),
                })
                .unwrap();
        }

        let (tree, last_seq) = recover(&store, &journal).unwrap();
        assert_eq!(last_seq, 3);
        assert_eq!(tree.read_file("/d/g").unwrap(), "one");
        assert_eq!(tree.resolve("/d/f"), None);
    }

    #[test]
    fn test_malformed_record_halts_recovery() {
        let dir = TempDir::new().unwrap();
        let (store, journal) = fixtures(&dir);
        std::fs::write(journal.path(), "garbage\n").unwrap();
        let err = recover(&store, &journal).unwrap_err();
        assert!(matches!(err, FsError::MalformedRecord { .. }));
    }

    #[test]
    fn test_failing_replay_halts_recovery() {
        let dir = TempDir::new().unwrap();
        let (store, journal) = fixtures(&dir);
        store.save(&Tree::new(), 0).unwrap();
        journal
            .append(&Record {
                seq: 1,
                op: Operation::DeleteFile {
                    path: "/never-existed".to_string(),
                },
            })
            .unwrap();

        let err = recover(&store, &journal).unwrap_err();
        assert!(matches!(err, FsError::NotFound { .. }));
        // the journal is left intact for inspection
        assert_eq!(journal.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_empty_tree() {
        let dir = TempDir::new().unwrap();
        let (store, journal) = fixtures(&dir);
        std::fs::write(store.path(), "not json at all").unwrap();

        let (tree, last_seq) = recover(&store, &journal).unwrap();
        assert_eq!(last_seq, 0);
        assert!(tree.list("/").unwrap().is_empty());
    }
}

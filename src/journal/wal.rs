//! Write-Ahead Log File
//!
//! Append-only, newline-delimited UTF-8 journal of operation records. An
//! append is forced durable before it returns; that is the point at which
//! an operation's intent is committed. An empty (or absent) file means no
//! pending operation.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::record::Record;
use crate::fs::FsError;

/// Handle to the journal file. The file is exclusively owned by a single
/// running instance.
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record and force it to stable storage. When this returns
    /// Ok the intent is durably committed.
    pub fn append(&self, record: &Record) -> Result<(), FsError> {
        let line = serde_json::to_string(record).map_err(|e| FsError::DurableWrite {
            operation: "journal append".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        let write = || -> std::io::Result<()> {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            file.write_all(line.as_bytes())?;
            file.write_all(b"\n")?;
            // sync_data is enough for an append-only file
            file.sync_data()?;
            Ok(())
        };
        write().map_err(|e| FsError::DurableWrite {
            operation: "journal append".to_string(),
            source: e,
        })
    }

    /// Read every pending record in file order. A line that fails to decode
    /// is a `MalformedRecord`, never silently dropped: it stands for a
    /// durably promised mutation.
    pub fn read_all(&self) -> Result<Vec<Record>, FsError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&self.path)?;
        let mut records = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: Record =
                serde_json::from_str(line).map_err(|e| FsError::MalformedRecord {
                    line: index + 1,
                    reason: e.to_string(),
                })?;
            records.push(record);
        }
        Ok(records)
    }

    /// Truncate the journal back to its resting (empty) state.
    pub fn clear(&self) -> Result<(), FsError> {
        let truncate = || -> std::io::Result<()> {
            let file = File::create(&self.path)?;
            file.sync_all()?;
            Ok(())
        };
        truncate().map_err(|e| FsError::DurableWrite {
            operation: "journal clear".to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::record::Operation;
    use tempfile::TempDir;

    fn record(seq: u64, path: &str) -> Record {
        Record {
            seq,
            op: Operation::CreateDirectory {
                path: path.to_string(),
            },
        }
    }

    #[test]
    fn test_missing_file_means_no_pending_records() {
        let dir = TempDir::new().unwrap();
        let journal = Journal::new(dir.path().join("fs.journal"));
        assert!(journal.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_then_read_all_in_order() {
        let dir = TempDir::new().unwrap();
        let journal = Journal::new(dir.path().join("fs.journal"));
        journal.append(&record(1, "/a")).unwrap();
        journal.append(&record(2, "/b")).unwrap();

        let records = journal.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], record(1, "/a"));
        assert_eq!(records[1], record(2, "/b"));
    }

    #[test]
    fn test_clear_returns_to_resting_state() {
        let dir = TempDir::new().unwrap();
        let journal = Journal::new(dir.path().join("fs.journal"));
        journal.append(&record(1, "/a")).unwrap();
        journal.clear().unwrap();
        assert!(journal.read_all().unwrap().is_empty());
        assert!(journal.path().exists());
    }

    #[test]
    fn test_malformed_line_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fs.journal");
        let journal = Journal::new(&path);
        journal.append(&record(1, "/a")).unwrap();
        std::fs::write(
            &path,
            format!(
                "{}\nthis is not a record\n",
                serde_json::to_string(&record(1, "/a")).unwrap()
            ),
        )
        .unwrap();

        let err = journal.read_all().unwrap_err();
        match err {
            FsError::MalformedRecord { line, .. } => assert_eq!(line, 2),
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_content_with_newlines_survives_the_file() {
        let dir = TempDir::new().unwrap();
        let journal = Journal::new(dir.path().join("fs.journal"));
        let rec = Record {
            seq: 1,
            op: Operation::CreateOrReplaceFile {
                path: "/f".to_string(),
                content: "first\nsecond \"quoted\"".to_string(),
            },
        };
        journal.append(&rec).unwrap();
        let records = journal.read_all().unwrap();
        assert_eq!(records, vec![rec]);
    }
}

//! Write-Ahead Log Module
//!
//! The durable record of the operation currently in flight between
//! checkpoints: operation records (what gets logged and replayed) and the
//! append-only journal file that holds them.

pub mod record;
pub mod wal;

pub use record::{Operation, Record};
pub use wal::Journal;

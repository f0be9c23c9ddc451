//! Namespace Tree Module
//!
//! The in-memory hierarchical namespace of Directories and Files: path
//! resolution, the six mutating primitives, and the read surface. Purely
//! in-memory; durability lives in the journal and snapshot modules.

pub mod tree;
pub mod types;

pub use tree::{normalize_path, Tree};
pub use types::*;

//! Console Front End
//!
//! The interactive command loop. Everything here is presentation: the
//! engine's contract is the dispatcher, and this module only translates
//! between console text and that contract.

pub mod repl;

pub use repl::{LineOutcome, Shell};

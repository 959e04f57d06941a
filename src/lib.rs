//! Rowmatch (workspace facade crate).
//!
//! Re-exports the workspace crates under `rowmatch::{types, core, input, term}`
//! and carries the pieces only the binaries need: the logger and the headless
//! autoplay loop.

pub use rowmatch_core as core;
pub use rowmatch_input as input;
pub use rowmatch_term as term;
pub use rowmatch_types as types;

pub mod logging;
pub mod sim;

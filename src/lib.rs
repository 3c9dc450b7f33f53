//! `pipeforge` compiles a project interface schema and the operator's task
//! selections into a single JSON pipeline override document.

/// Command-line shell: argument parsing, dispatch and command handlers.
pub mod cli;
/// Fixed names, sets and limits.
pub mod constants;
/// The compiler and its collaborators.
pub mod core;
/// Profiling helpers.
pub mod dev_utils;
/// Schema and selection types.
pub mod models;

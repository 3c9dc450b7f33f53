// src/cli/handlers/mod.rs

/// `check`: input validation and unresolved references.
pub mod check;
/// Helpers shared by the handlers.
pub mod commons;
/// `compile`: the merged override document.
pub mod compile;
/// `list`: tasks and their option trees.
pub mod list;
/// `plan`: one override per enabled task.
pub mod plan;

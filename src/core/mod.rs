// src/core/mod.rs

/// Task and batch compilation into one override document.
pub mod compiler;
/// ASCII option trees for the `list` command.
pub mod graph_display;
/// Placeholder substitution in input templates.
pub mod interpolator;
/// Reading interfaces and selections from disk.
pub mod loader;
/// Deep merge of JSON object fragments.
pub mod merge;
/// Config directory lookup and path expansion.
pub mod paths;
/// Per-task run plans.
pub mod planner;
/// Recursive option resolution.
pub mod resolver;
/// User settings.
pub mod settings;
/// Input checks against `verify` patterns.
pub mod validation;

//! ClipGuard binary support: CLI definition, bootstrap and command handlers.
//!
//! Exposed as a library so integration tests can wire the app against a
//! temporary directory and an in-memory clipboard.

pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod shell;

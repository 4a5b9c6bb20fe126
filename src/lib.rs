//! chatdocs - document-aware chat client core.
//!
//! Core library providing upload orchestration, ingestion status polling,
//! and conversation/document state for a chat client whose attached
//! documents must be indexed before the conversation can reference them.

pub mod api;
pub mod config;
pub mod state;
pub mod sync;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

// Shared helpers for integration and contract tests
//
// Every test gets its own in-memory SQLite database with migrations
// applied, so tests never share state and need no external server.
//
// Usage:
//   #[path = "../helpers/mod.rs"]
//   mod helpers;
//   use helpers::*;

#![allow(dead_code)]


pub use test_data::*;
pub use test_database::*;

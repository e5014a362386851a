//! CLI command handlers

pub mod commands;

pub use commands::{books, inspect, sample, Book};

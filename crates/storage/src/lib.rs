//! Task sources for riskcast.
//!
//! This crate provides a trait-based interface for loading the tasks to
//! simulate, with a JSON file implementation and an in-memory one.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_source;
pub mod memory;

pub use trait_::{TaskSource, TaskFilter, StorageError, Result};
pub use json_source::JsonTaskSource;
pub use memory::MemoryTaskSource;

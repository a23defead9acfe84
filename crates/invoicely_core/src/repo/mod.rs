//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value contract used by the invoice store.
//! - Isolate SQLite query details from store orchestration.

pub mod kv_repo;

//! Storage abstraction and implementations for mission progress.
//!
//! A [`Storage`] is a set of keyed string slots, the same model as browser
//! local storage. Two backends are provided: a JSON file store and an
//! in-memory store.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;

pub use trait_::{Storage, StorageError, Result};
pub use json_storage::JsonStorage;
pub use memory::MemoryStorage;

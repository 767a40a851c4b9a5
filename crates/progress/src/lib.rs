//! Progress Store
//!
//! Keeps a learner's single progress record in a [`Storage`] slot and
//! enforces the XP rules: completion XP is credited once, practice XP
//! accumulates, and the rank always follows the total.
//!
//! [`Storage`]: mission_storage::Storage

#![warn(missing_docs)]

pub mod error;
pub mod config;
pub mod store;

pub use error::{ProgressError, Result};
pub use config::{StoreConfig, RecoveryPolicy, DEFAULT_STORAGE_KEY};
pub use store::ProgressStore;

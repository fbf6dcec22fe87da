//! Inkwell Storage Library
//!
//! This crate provides the storage abstraction used by the editor handler and its
//! local filesystem implementation.
//!
//! # Storage key format
//!
//! Keys are storage-root-relative paths using `/` as separator, e.g.
//! `upload/image/20240131/1706700000000abc123.png`. Keys must not contain a `..`
//! segment or a leading `/`. Key validation lives in the `keys` module so every
//! operation applies the same rules.

pub mod factory;
pub(crate) mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};

//! Storage module for file management
//!
//! Provides a local-disk storage client for uploaded photos.

mod local_storage;

pub use local_storage::LocalStorage;

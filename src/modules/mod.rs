//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for infrastructure the features rely on, such as file storage.

pub mod storage;

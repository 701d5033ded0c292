//! Storage layer for folio
//!
//! This crate provides:
//! - SQLite database operations (content table, users, sessions)
//! - Media bucket on the local filesystem
//! - Schema setup on open

pub mod auth;
pub mod blob;
pub mod db;
pub mod error;
mod models;

pub use blob::BlobStore;
pub use db::Storage;
pub use error::{Result, StorageError};

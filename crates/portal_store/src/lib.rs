//! Document and blob storage for the bulletin-board portal
//!
//! This crate provides a storage abstraction for portal items and uploaded
//! files. It ships an in-memory implementation for tests and local runs, and
//! a Google Cloud implementation (Firestore for documents, Cloud Storage for
//! blobs) authenticated with a service-account key.

mod auth_token;
mod cloud_storage;
mod error;
mod firestore;
mod google;
mod memory;
mod traits;

pub use auth_token::*;
pub use cloud_storage::*;
pub use error::*;
pub use firestore::*;
pub use google::*;
pub use memory::*;
pub use traits::*;

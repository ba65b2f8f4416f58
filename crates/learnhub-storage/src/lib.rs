//! Learnhub Storage Layer
//!
//! This crate provides the object-storage abstraction for Learnhub,
//! supporting an S3-compatible backend with presigned URLs and a
//! deterministic mock backend for development.

pub mod error;
pub mod mock;
pub mod s3;
pub mod store;

pub use error::StorageError;
pub use mock::MockStore;
pub use s3::{S3Config, S3Store};
pub use store::{MaterialStore, ObjectInfo};

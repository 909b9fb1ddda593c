//! AnyWork REST API client.
//!
//! This crate provides:
//! - The HTTP gateway client with bearer auth and error normalization
//! - Persistent session storage (in-memory and file-backed)
//! - The shared API error taxonomy
//! - Request metrics and tracing spans

pub mod error;
pub mod gateway;
pub mod metrics;
pub mod store;

pub use error::{ApiError, ApiResult};
pub use gateway::{ApiClient, ApiConfig, DEFAULT_BASE_URL};
pub use store::{FileStore, MemoryStore, SessionStore};

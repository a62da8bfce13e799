//! Shared core for the Marlin platform clients
//!
//! This crate provides the pieces every Marlin service client builds on:
//! the session store, durable key-value persistence, the authenticated
//! fetch helper, device identification headers, and pagination types.

pub mod device;
pub mod error;
pub mod http;
pub mod page;
pub mod session;
pub mod storage;

pub use device::DeviceInfo;
pub use error::ApiError;
pub use http::{build_http_client, Fetch, FetchBuilder, DEFAULT_TIMEOUT};
pub use page::{PageRequest, PagedResult};
pub use session::{Session, SessionStore, UserProfile};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

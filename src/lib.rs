//! Fetch Relay - Cached, task-based HTTP fetching for sandboxed code
//!
//! Provides a compressed in-memory TTL cache and a fetch transport that can
//! route requests through an external task responder instead of the network.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod tasks;

pub use cache::{engine_from_config, CacheEngine, Ttl};
pub use config::Config;
pub use error::{Error, Result};
pub use fetch::{FetchOptions, FetchResponse, TaskFetch};
pub use tasks::spawn_cleanup_task;

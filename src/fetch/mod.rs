//! Fetch Module
//!
//! Turns HTTP requests into serializable tasks, dispatches them directly or
//! through a task responder, and rebuilds responses from the results.

mod dispatch;
mod handler;
mod http;
mod options;
mod request;
mod responder;
mod response;
mod task;
mod transport;

pub use dispatch::send_task;
pub use handler::{CacheHandler, EngineCacheHandler, NoCache};
pub use http::{HttpClient, ReqwestClient};
pub use options::{Connection, FetchOptions, QueryParams, JSON_CONTENT_TYPE};
pub use request::{prepare_request, FetchRequest};
pub use responder::{ChannelResponder, PendingTask, Responder};
pub use response::FetchResponse;
pub use task::{FetchTask, FetchTaskResult, RedirectPolicy};
pub use transport::{TaskFetch, DEFAULT_TIMEOUT};

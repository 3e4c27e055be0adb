//! Date Prediction Agent
//!
//! JSON-RPC over HTTP service that turns facts about a scanned crop into
//! a date prediction prompt: harvest dates for farmers, expiration dates
//! for consumers.

pub mod config;
pub mod error;
pub mod rpc;
pub mod server;

pub use config::{ParamPolicy, ServerConfig};
pub use error::{DatePredictionError, Result};
pub use rpc::{MethodHandler, MethodRegistry, Params, RpcRequest, RpcResponse};
pub use server::{BoundServer, RpcServer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

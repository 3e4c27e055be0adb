//! JSON-RPC dispatcher
//!
//! Envelope codec, parameter access, and the method registry that maps a
//! method name to its handler.

pub mod methods;
pub mod params;
pub mod protocol;
pub mod registry;

pub use methods::{ConsumerPrompt, FarmerPrompt};
pub use params::Params;
pub use protocol::{decode_request, RpcRequest, RpcResponse, JSONRPC_VERSION};
pub use registry::{MethodHandler, MethodRegistry};

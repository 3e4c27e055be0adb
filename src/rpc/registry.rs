//! Method registry and dispatch

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::methods::{ConsumerPrompt, FarmerPrompt};
use super::params::Params;
use super::protocol::{decode_request, RpcRequest, RpcResponse};
use crate::config::ParamPolicy;
use crate::error::{DatePredictionError, Result};

/// Trait implemented by every RPC method handler
pub trait MethodHandler: Send + Sync {
    fn call(&self, params: &Params) -> Result<Value>;
}

impl<F> MethodHandler for F
where
    F: Fn(&Params) -> Result<Value> + Send + Sync,
{
    fn call(&self, params: &Params) -> Result<Value> {
        self(params)
    }
}

/// Registry mapping method names to handlers
pub struct MethodRegistry {
    handlers: HashMap<String, Arc<dyn MethodHandler>>,
}

impl MethodRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registry with the built-in `farmer` and `consumer` methods
    pub fn with_defaults(policy: ParamPolicy) -> Self {
        let mut registry = Self::new();
        registry.register(FarmerPrompt::METHOD, FarmerPrompt::new(policy));
        registry.register(ConsumerPrompt::METHOD, ConsumerPrompt::new(policy));
        registry
    }

    /// Register a handler, replacing any previous one under the same name
    pub fn register(&mut self, method: &str, handler: impl MethodHandler + 'static) {
        self.handlers.insert(method.to_owned(), Arc::new(handler));
    }

    /// Check whether a method is registered
    pub fn has_method(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// List all registered method names (sorted)
    pub fn methods(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Run one decoded request and produce its single response envelope
    pub fn dispatch(&self, request: RpcRequest) -> RpcResponse {
        let outcome = match self.handlers.get(&request.method) {
            Some(handler) => handler.call(&request.params),
            None => Err(DatePredictionError::UnknownMethod(request.method.clone())),
        };

        if let Err(ref e) = outcome {
            tracing::debug!(method = %request.method, id = request.id, "RPC error: {}", e);
        }

        RpcResponse::from_outcome(request.id, outcome)
    }

    /// Decode a raw body and dispatch it.
    ///
    /// Returns `InvalidJson` when the body is not a request envelope; no
    /// envelope is produced in that case.
    pub fn handle(&self, raw: &[u8]) -> Result<RpcResponse> {
        let request = match decode_request(raw) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("Failed to decode request: {}", e);
                return Err(e);
            }
        };

        tracing::info!(method = %request.method, id = request.id, "Received method");
        Ok(self.dispatch(request))
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}

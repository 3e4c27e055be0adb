//! Built-in date prediction methods
//!
//! Each method turns the crop facts in `data` into the prompt a date
//! estimate is requested for. A non-empty `prompt` field overrides the
//! generated text.

use serde_json::Value;

use super::params::Params;
use super::registry::MethodHandler;
use crate::config::ParamPolicy;
use crate::error::Result;

/// Field that, when a non-empty string, replaces the generated prompt
pub const PROMPT_OVERRIDE_KEY: &str = "prompt";

fn prompt_override(params: &Params) -> Option<Value> {
    params
        .non_empty_str(PROMPT_OVERRIDE_KEY)
        .map(|prompt| Value::String(prompt.to_string()))
}

/// Harvest date prompt: `<location> <name> <attributes>`
#[derive(Debug, Clone, Copy, Default)]
pub struct FarmerPrompt {
    policy: ParamPolicy,
}

impl FarmerPrompt {
    pub const METHOD: &'static str = "farmer";
    const FIELDS: [&'static str; 3] = ["location", "name", "attributes"];

    pub fn new(policy: ParamPolicy) -> Self {
        Self { policy }
    }
}

impl MethodHandler for FarmerPrompt {
    fn call(&self, params: &Params) -> Result<Value> {
        if let Some(prompt) = prompt_override(params) {
            return Ok(prompt);
        }

        let parts = Self::FIELDS
            .iter()
            .map(|key| params.field(key, self.policy))
            .collect::<Result<Vec<_>>>()?;

        Ok(Value::String(parts.join(" ")))
    }
}

/// Expiration date prompt: `Estimate expiration date for <name>.`
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsumerPrompt {
    policy: ParamPolicy,
}

impl ConsumerPrompt {
    pub const METHOD: &'static str = "consumer";

    pub fn new(policy: ParamPolicy) -> Self {
        Self { policy }
    }
}

impl MethodHandler for ConsumerPrompt {
    fn call(&self, params: &Params) -> Result<Value> {
        if let Some(prompt) = prompt_override(params) {
            return Ok(prompt);
        }

        let name = params.field("name", self.policy)?;
        Ok(Value::String(format!("Estimate expiration date for {}.", name)))
    }
}

//! Ports for the external script-generation and voice-calling providers.
//!
//! Implementations live outside the core (see the `callpilot-providers`
//! crate); the core only decides what happens when they fail.

use async_trait::async_trait;

use crate::call::{OutboundCall, ProviderCallOutcome, ScriptInput};
use crate::error::CoreError;

/// AI-backed phone script writer.
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    /// Draft a script for a validated input.
    async fn generate_script(&self, input: &ScriptInput) -> Result<String, CoreError>;
}

/// Voice provider that places outbound calls.
#[async_trait]
pub trait CallInitiator: Send + Sync {
    /// Hand a call to the provider. Resolves once the provider has accepted
    /// or rejected it, not when the call ends.
    async fn initiate_call(&self, call: &OutboundCall) -> Result<ProviderCallOutcome, CoreError>;
}

//! HTTP clients for the external script-generation and voice providers.
//!
//! Each client implements one of the core provider ports
//! ([`ScriptGenerator`](callpilot_core::providers::ScriptGenerator),
//! [`CallInitiator`](callpilot_core::providers::CallInitiator)) on top of
//! [`reqwest`]. Configuration comes from environment variables; a `None`
//! config means the provider is not set up and the caller decides how to
//! degrade.

pub mod error;
pub mod openai;
pub mod twilio;

pub use error::ProviderError;
pub use openai::{OpenAiConfig, OpenAiScriptGenerator};
pub use twilio::{TwilioCallInitiator, TwilioConfig};

/// Shared HTTP client type; clone it to share one connection pool.
pub use reqwest::Client as HttpClient;

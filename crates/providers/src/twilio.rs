//! Twilio voice client that places outbound calls reading a script.

use std::time::Duration;

use async_trait::async_trait;
use callpilot_core::call::{CallStatus, OutboundCall, ProviderCallOutcome};
use callpilot_core::error::CoreError;
use callpilot_core::providers::CallInitiator;
use serde::Deserialize;

use crate::error::{ensure_success, ProviderError};

const PROVIDER: &str = "Twilio";

pub const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

/// Shown when any of the Twilio credentials is missing.
pub const MISSING_CONFIGURATION_MESSAGE: &str = "Twilio environment variables are missing. \
Provide TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, and TWILIO_CALLER_ID.";

/// HTTP timeout for one call-creation request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Twilio connection settings.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Verified number calls are placed from.
    pub caller_id: String,
    pub base_url: String,
}

impl TwilioConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` unless all three credentials are set and non-blank.
    ///
    /// | Variable             | Required | Default                   |
    /// |----------------------|----------|---------------------------|
    /// | `TWILIO_ACCOUNT_SID` | yes      | -                         |
    /// | `TWILIO_AUTH_TOKEN`  | yes      | -                         |
    /// | `TWILIO_CALLER_ID`   | yes      | -                         |
    /// | `TWILIO_BASE_URL`    | no       | `https://api.twilio.com`  |
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Some(Self {
            account_sid: var("TWILIO_ACCOUNT_SID")?,
            auth_token: var("TWILIO_AUTH_TOKEN")?,
            caller_id: var("TWILIO_CALLER_ID")?,
            base_url: var("TWILIO_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

/// Subset of Twilio's call resource we care about.
#[derive(Debug, Deserialize)]
struct CallResource {
    sid: String,
    status: Option<String>,
}

/// Call initiator backed by Twilio's `Calls` REST resource.
pub struct TwilioCallInitiator {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioCallInitiator {
    pub fn new(config: TwilioConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(client: reqwest::Client, config: TwilioConfig) -> Self {
        Self { client, config }
    }

    /// Create an outbound call that reads `call.script` to the callee.
    pub async fn create_call(&self, call: &OutboundCall) -> Result<ProviderCallOutcome, ProviderError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Calls.json",
            self.config.base_url.trim_end_matches('/'),
            self.config.account_sid
        );
        let twiml = build_twiml(&call.script);
        let form = [
            ("To", call.to.as_str()),
            ("From", self.config.caller_id.as_str()),
            ("Twiml", twiml.as_str()),
        ];

        let response = self
            .client
            .post(url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .timeout(REQUEST_TIMEOUT)
            .form(&form)
            .send()
            .await?;

        let response = ensure_success(PROVIDER, response).await?;
        let resource: CallResource = response.json().await?;

        let status = resource.status.as_deref().and_then(CallStatus::from_provider_status);
        if status.is_none() {
            tracing::debug!(
                sid = %resource.sid,
                provider_status = ?resource.status,
                "Unrecognised Twilio call status"
            );
        }

        Ok(ProviderCallOutcome {
            status,
            sid: Some(resource.sid),
            message: None,
        })
    }
}

#[async_trait]
impl CallInitiator for TwilioCallInitiator {
    async fn initiate_call(&self, call: &OutboundCall) -> Result<ProviderCallOutcome, CoreError> {
        tracing::info!(
            client_name = %call.metadata.client_name,
            business_name = %call.metadata.business_name,
            "Placing Twilio call"
        );
        Ok(self.create_call(call).await?)
    }
}

/// TwiML that speaks the script.
pub fn build_twiml(script: &str) -> String {
    format!(
        "<Response><Say voice=\"alice\">{}</Say></Response>",
        escape_xml(script)
    )
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

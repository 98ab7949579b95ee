//! Call request data model.
//!
//! [`CallDraft`] is the editable blueprint, [`ScriptInput`] the subset used
//! for script generation, and [`CallRequest`] the persisted history entry.
//! Field names serialize in camelCase to stay compatible with stored history
//! documents.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{CallId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_QUEUED: &str = "queued";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_FAILED: &str = "failed";

/// All valid status strings.
pub const VALID_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_QUEUED, STATUS_COMPLETED, STATUS_FAILED];

/// Result message recorded when the provider accepts a call.
pub const CALL_QUEUED_MESSAGE: &str = "Call queued successfully";

/// Coaching message shown once a call has been handed to the provider.
pub const CALL_QUEUED_INSIGHT: &str =
    "Call queued with Twilio. We'll update status when webhooks come in.";

/// Result message recorded when the provider reports the call failed on submission.
pub const CALL_FAILED_MESSAGE: &str = "Call could not be placed";

pub const CALL_FAILED_INSIGHT: &str =
    "Twilio could not place this call. Check the phone number and try again.";

/// Result message recorded when the provider reports the call already finished.
pub const CALL_COMPLETED_MESSAGE: &str = "Call completed";

pub const CALL_COMPLETED_INSIGHT: &str = "Twilio reports this call has already finished.";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a call request.
///
/// `Draft -> Queued -> {Completed, Failed}`; a draft may also fail outright.
/// Completed and failed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Draft,
    Queued,
    Completed,
    Failed,
}

impl CallStatus {
    /// Parse a stored/wire status string.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATUS_DRAFT => Ok(Self::Draft),
            STATUS_QUEUED => Ok(Self::Queued),
            STATUS_COMPLETED => Ok(Self::Completed),
            STATUS_FAILED => Ok(Self::Failed),
            _ => Err(format!(
                "Invalid call status '{s}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            )),
        }
    }

    /// Map a voice-provider call state onto the lifecycle.
    ///
    /// Returns `None` for states the lifecycle has no opinion about.
    pub fn from_provider_status(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queued" | "initiated" | "ringing" | "in-progress" => Some(Self::Queued),
            "completed" => Some(Self::Completed),
            "failed" | "busy" | "no-answer" | "canceled" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => STATUS_DRAFT,
            Self::Queued => STATUS_QUEUED,
            Self::Completed => STATUS_COMPLETED,
            Self::Failed => STATUS_FAILED,
        }
    }

    /// Human-readable label for badges and lists.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Queued => "Queued",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }

    /// Default result message for a call whose provider outcome is `self`.
    pub fn submission_message(&self) -> &'static str {
        match self {
            Self::Failed => CALL_FAILED_MESSAGE,
            Self::Completed => CALL_COMPLETED_MESSAGE,
            Self::Draft | Self::Queued => CALL_QUEUED_MESSAGE,
        }
    }

    /// Coaching message for a call whose provider outcome is `self`.
    pub fn submission_insight(&self) -> &'static str {
        match self {
            Self::Failed => CALL_FAILED_INSIGHT,
            Self::Completed => CALL_COMPLETED_INSIGHT,
            Self::Draft | Self::Queued => CALL_QUEUED_INSIGHT,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether moving from `self` to `next` is a legal lifecycle step.
    ///
    /// Repeating the current status is not a transition and returns `false`.
    pub fn can_transition_to(&self, next: CallStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Queued)
                | (Self::Draft, Self::Failed)
                | (Self::Queued, Self::Completed)
                | (Self::Queued, Self::Failed)
        )
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Draft and script input
// ---------------------------------------------------------------------------

/// In-progress call blueprint as edited by the operator.
///
/// Every field defaults to the empty string so partial drafts deserialize.
/// The `validator` constraints describe a draft that is ready to queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CallDraft {
    #[validate(length(min = 1, message = "is required"))]
    pub client_name: String,
    #[validate(length(min = 1, message = "is required"))]
    pub business_name: String,
    #[validate(
        length(min = 1, message = "is required"),
        regex(
            path = *crate::validation::PHONE_PATTERN,
            message = "must be 7-15 digits with an optional leading +"
        )
    )]
    pub phone_number: String,
    #[validate(custom(function = "crate::validation::validate_optional_email"))]
    pub contact_email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub preferred_date: String,
    pub preferred_time_window: String,
    #[validate(length(min = 1, message = "is required"))]
    pub appointment_goal: String,
    pub notes: String,
    #[validate(length(min = 1, message = "is required"))]
    pub script: String,
}

impl CallDraft {
    pub fn has_script(&self) -> bool {
        !self.script.trim().is_empty()
    }

    /// The fields that feed script generation.
    pub fn script_input(&self) -> ScriptInput {
        ScriptInput {
            client_name: self.client_name.clone(),
            business_name: self.business_name.clone(),
            appointment_goal: self.appointment_goal.clone(),
            preferred_date: self.preferred_date.clone(),
            preferred_time_window: self.preferred_time_window.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Subset of a draft used to generate a phone script.
///
/// Phone number, email and the script itself are irrelevant to script content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct ScriptInput {
    #[validate(length(min = 1, message = "is required"))]
    pub client_name: String,
    #[validate(length(min = 1, message = "is required"))]
    pub business_name: String,
    #[validate(length(min = 1, message = "is required"))]
    pub appointment_goal: String,
    #[validate(length(min = 1, message = "is required"))]
    pub preferred_date: String,
    pub preferred_time_window: String,
    pub notes: String,
}

// ---------------------------------------------------------------------------
// Persisted request
// ---------------------------------------------------------------------------

/// A submitted call, as kept in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    pub id: CallId,
    pub client_name: String,
    pub business_name: String,
    pub phone_number: String,
    pub contact_email: String,
    pub preferred_date: String,
    pub preferred_time_window: String,
    pub appointment_goal: String,
    pub notes: String,
    pub script: String,
    pub created_at: Timestamp,
    pub status: CallStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_sid: Option<String>,
}

impl CallRequest {
    /// Project the request back into an editable draft.
    ///
    /// Identity, timestamps and provider outcome are dropped; resubmitting
    /// the draft creates a new request.
    pub fn to_draft(&self) -> CallDraft {
        CallDraft {
            client_name: self.client_name.clone(),
            business_name: self.business_name.clone(),
            phone_number: self.phone_number.clone(),
            contact_email: self.contact_email.clone(),
            preferred_date: self.preferred_date.clone(),
            preferred_time_window: self.preferred_time_window.clone(),
            appointment_goal: self.appointment_goal.clone(),
            notes: self.notes.clone(),
            script: self.script.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Provider payloads
// ---------------------------------------------------------------------------

/// Caller identity passed along with an outbound call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallMetadata {
    pub client_name: String,
    pub business_name: String,
}

/// What the voice provider needs to place a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundCall {
    pub to: String,
    pub script: String,
    pub metadata: CallMetadata,
}

impl From<&CallDraft> for OutboundCall {
    fn from(draft: &CallDraft) -> Self {
        Self {
            to: draft.phone_number.clone(),
            script: draft.script.clone(),
            metadata: CallMetadata {
                client_name: draft.client_name.clone(),
                business_name: draft.business_name.clone(),
            },
        }
    }
}

/// Result of handing a call to the voice provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCallOutcome {
    pub status: Option<CallStatus>,
    pub sid: Option<String>,
    pub message: Option<String>,
}

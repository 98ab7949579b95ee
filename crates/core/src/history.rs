//! Call lifecycle manager.
//!
//! [`CallHistory`] owns the ordered history of submitted calls (newest
//! first), applies status transitions, and is the only writer of the
//! persisted history document. Persistence goes through an injected
//! [`KeyValueStore`] and is best-effort in both directions.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::call::{CallDraft, CallRequest, CallStatus, ProviderCallOutcome};
use crate::error::CoreError;
use crate::store::KeyValueStore;
use crate::types::{CallId, Timestamp};
use crate::validation::validate_call_draft;

/// Storage key of the history document.
pub const HISTORY_STORAGE_KEY: &str = "callpilot-history";

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Build a new request from a draft that already passed validation.
///
/// The draft is re-checked; an invalid draft here means a caller skipped
/// validation.
pub fn create_from_validated_draft(
    draft: CallDraft,
    outcome: ProviderCallOutcome,
) -> Result<CallRequest, CoreError> {
    validate_call_draft(&draft)?;

    Ok(CallRequest {
        id: CallId::new_v4(),
        client_name: draft.client_name,
        business_name: draft.business_name,
        phone_number: draft.phone_number,
        contact_email: draft.contact_email,
        preferred_date: draft.preferred_date,
        preferred_time_window: draft.preferred_time_window,
        appointment_goal: draft.appointment_goal,
        notes: draft.notes,
        script: draft.script,
        created_at: Utc::now(),
        status: outcome.status.unwrap_or(CallStatus::Queued),
        result_message: outcome.message,
        provider_sid: outcome.sid,
    })
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Stored shape of a history entry. Older documents may lack `createdAt`
/// and optional text fields.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCallRequest {
    id: CallId,
    #[serde(default)]
    client_name: String,
    #[serde(default)]
    business_name: String,
    #[serde(default)]
    phone_number: String,
    #[serde(default)]
    contact_email: String,
    #[serde(default)]
    preferred_date: String,
    #[serde(default)]
    preferred_time_window: String,
    #[serde(default)]
    appointment_goal: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    script: String,
    #[serde(default)]
    created_at: Option<Timestamp>,
    status: CallStatus,
    #[serde(default)]
    result_message: Option<String>,
    #[serde(default)]
    provider_sid: Option<String>,
}

impl StoredCallRequest {
    fn into_request(self, now: Timestamp) -> CallRequest {
        CallRequest {
            id: self.id,
            client_name: self.client_name,
            business_name: self.business_name,
            phone_number: self.phone_number,
            contact_email: self.contact_email,
            preferred_date: self.preferred_date,
            preferred_time_window: self.preferred_time_window,
            appointment_goal: self.appointment_goal,
            notes: self.notes,
            script: self.script,
            created_at: self.created_at.unwrap_or(now),
            status: self.status,
            result_message: self.result_message,
            provider_sid: self.provider_sid,
        }
    }
}

/// Serialize a history for storage.
pub fn encode_history(entries: &[CallRequest]) -> Result<String, CoreError> {
    serde_json::to_string(entries)
        .map_err(|e| CoreError::Internal(format!("Failed to encode call history: {e}")))
}

/// Parse a stored history document.
///
/// Entries without `createdAt` get `now`. Malformed entries and repeated ids
/// are skipped with a warning; only a document that is not a JSON array
/// fails as a whole.
pub fn decode_history(raw: &str, now: Timestamp) -> Result<Vec<CallRequest>, serde_json::Error> {
    let documents: Vec<Value> = serde_json::from_str(raw)?;

    let mut entries: Vec<CallRequest> = Vec::with_capacity(documents.len());
    for (index, document) in documents.into_iter().enumerate() {
        match StoredCallRequest::deserialize(document) {
            Ok(stored) => {
                let request = stored.into_request(now);
                if entries.iter().any(|e| e.id == request.id) {
                    tracing::warn!(index, id = %request.id, "Skipping duplicate history entry");
                    continue;
                }
                entries.push(request);
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed history entry");
            }
        }
    }
    Ok(entries)
}

/// Load the history from storage, degrading to empty on any failure.
pub fn restore(store: &dyn KeyValueStore) -> Vec<CallRequest> {
    let raw = match store.get(HISTORY_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stored call history");
            return Vec::new();
        }
    };

    if raw.trim().is_empty() {
        return Vec::new();
    }

    match decode_history(&raw, Utc::now()) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse stored call history");
            Vec::new()
        }
    }
}

/// Write the history to storage.
pub fn persist(store: &dyn KeyValueStore, entries: &[CallRequest]) -> Result<(), CoreError> {
    let raw = encode_history(entries)?;
    store.set(HISTORY_STORAGE_KEY, &raw)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// CallHistory
// ---------------------------------------------------------------------------

/// Ordered, persisted history of call requests.
///
/// Single writer: mutations take `&mut self`. Every mutation is followed by
/// a best-effort write of the whole document.
pub struct CallHistory {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<CallRequest>,
}

impl CallHistory {
    /// Restore the history from `store`.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = restore(store.as_ref());
        tracing::info!(count = entries.len(), "Call history restored");
        Self { store, entries }
    }

    /// All requests, newest first.
    pub fn entries(&self) -> &[CallRequest] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: CallId) -> Option<&CallRequest> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Prepend a request. Existing entries are never touched.
    pub fn append(&mut self, request: CallRequest) -> Result<&CallRequest, CoreError> {
        if self.get(request.id).is_some() {
            return Err(CoreError::Conflict(format!(
                "Call request {} is already in the history",
                request.id
            )));
        }
        self.entries.insert(0, request);
        self.flush();
        Ok(&self.entries[0])
    }

    /// Create a request from a validated draft and the provider's outcome,
    /// then prepend it.
    pub fn record(
        &mut self,
        draft: CallDraft,
        outcome: ProviderCallOutcome,
    ) -> Result<&CallRequest, CoreError> {
        let request = create_from_validated_draft(draft, outcome)?;
        tracing::info!(
            call_id = %request.id,
            status = %request.status,
            "Call request recorded"
        );
        self.append(request)
    }

    /// Apply an externally reported status.
    ///
    /// Repeating the current status only replaces the message.
    pub fn update_status(
        &mut self,
        id: CallId,
        status: CallStatus,
        message: Option<String>,
    ) -> Result<&CallRequest, CoreError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(CoreError::NotFound {
                entity: "CallRequest",
                id,
            })?;

        let current = self.entries[index].status;
        if current != status && !current.can_transition_to(status) {
            return Err(CoreError::InvalidTransition {
                from: current,
                to: status,
            });
        }

        let entry = &mut self.entries[index];
        entry.status = status;
        if message.is_some() {
            entry.result_message = message;
        }
        tracing::info!(call_id = %id, from = %current, to = %status, "Call status updated");

        self.flush();
        Ok(&self.entries[index])
    }

    /// Editable draft for a stored request.
    pub fn select_for_editing(&self, id: CallId) -> Result<CallDraft, CoreError> {
        self.get(id)
            .map(CallRequest::to_draft)
            .ok_or(CoreError::NotFound {
                entity: "CallRequest",
                id,
            })
    }

    fn flush(&self) {
        if let Err(e) = persist(self.store.as_ref(), &self.entries) {
            tracing::warn!(error = %e, "Failed to persist call history");
        }
    }
}

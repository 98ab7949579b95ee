//! Call blueprint readiness scoring.
//!
//! A weighted sum of completeness signals over a [`CallDraft`], clamped to
//! 0..=100, plus a coaching message for the operator. Pure functions; the
//! caller recomputes on every edit.

use serde::Serialize;

use crate::call::CallDraft;
use crate::validation::{is_valid_email, is_valid_phone};

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

pub const WEIGHT_CLIENT_NAME: u32 = 10;
pub const WEIGHT_BUSINESS_NAME: u32 = 10;
pub const WEIGHT_PHONE_PRESENT: u32 = 5;
pub const WEIGHT_PHONE_VALID: u32 = 10;
pub const WEIGHT_GOAL_PRESENT: u32 = 10;
pub const WEIGHT_PREFERRED_DATE: u32 = 10;
pub const WEIGHT_TIME_WINDOW: u32 = 5;
pub const WEIGHT_NOTES: u32 = 10;
pub const WEIGHT_CONTACT_EMAIL: u32 = 5;
pub const WEIGHT_SCRIPT_PRESENT: u32 = 10;

/// Extra points for a goal at least this many characters long.
const GOAL_LENGTH_BONUSES: &[(usize, u32)] = &[(25, 5), (50, 10)];

/// Extra points for a script at least this many characters long.
const SCRIPT_LENGTH_BONUSES: &[(usize, u32)] = &[(40, 5), (200, 10)];

pub const MAX_SCORE: u8 = 100;

/// Score at or above which a scripted blueprint counts as excellent.
pub const EXCELLENT_THRESHOLD: u8 = 85;
pub const STRONG_THRESHOLD: u8 = 60;
pub const DEVELOPING_THRESHOLD: u8 = 35;

// ---------------------------------------------------------------------------
// Insight messages
// ---------------------------------------------------------------------------

pub const INSIGHT_NEEDS_SCRIPT: &str =
    "Generate or craft a script so the call has something to say.";
pub const INSIGHT_EXCELLENT: &str = "Excellent! This call blueprint is ready to go.";
pub const INSIGHT_STRONG: &str =
    "Strong blueprint. A few more specifics will make the call even smoother.";
pub const INSIGHT_DEVELOPING: &str =
    "Good start. Fill in the remaining details to strengthen the call.";
pub const INSIGHT_SPARSE: &str =
    "Add the appointment details so the call has everything it needs.";

/// Score and coaching message for one draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessReport {
    pub score: u8,
    pub insight: &'static str,
    pub has_script: bool,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Compute the 0..=100 readiness score of a draft.
///
/// Whitespace-only fields count as absent. Every signal is monotonic in
/// isolation; the raw sum may exceed 100 and is clamped.
pub fn compute_readiness_score(draft: &CallDraft) -> u8 {
    let mut score = 0u32;

    if present(&draft.client_name) {
        score += WEIGHT_CLIENT_NAME;
    }
    if present(&draft.business_name) {
        score += WEIGHT_BUSINESS_NAME;
    }
    if present(&draft.phone_number) {
        score += WEIGHT_PHONE_PRESENT;
        if is_valid_phone(&draft.phone_number) {
            score += WEIGHT_PHONE_VALID;
        }
    }
    if present(&draft.appointment_goal) {
        score += WEIGHT_GOAL_PRESENT + length_bonus(&draft.appointment_goal, GOAL_LENGTH_BONUSES);
    }
    if present(&draft.preferred_date) {
        score += WEIGHT_PREFERRED_DATE;
    }
    if present(&draft.preferred_time_window) {
        score += WEIGHT_TIME_WINDOW;
    }
    if present(&draft.notes) {
        score += WEIGHT_NOTES;
    }
    if present(&draft.contact_email) && is_valid_email(&draft.contact_email) {
        score += WEIGHT_CONTACT_EMAIL;
    }
    if present(&draft.script) {
        score += WEIGHT_SCRIPT_PRESENT + length_bonus(&draft.script, SCRIPT_LENGTH_BONUSES);
    }

    score.min(u32::from(MAX_SCORE)) as u8
}

/// Map a score and script presence to a coaching message.
///
/// Without a script the operator is always pointed at script creation.
pub fn readiness_insight(score: u8, has_script: bool) -> &'static str {
    if !has_script {
        return INSIGHT_NEEDS_SCRIPT;
    }
    match score {
        s if s >= EXCELLENT_THRESHOLD => INSIGHT_EXCELLENT,
        s if s >= STRONG_THRESHOLD => INSIGHT_STRONG,
        s if s >= DEVELOPING_THRESHOLD => INSIGHT_DEVELOPING,
        _ => INSIGHT_SPARSE,
    }
}

/// Score a draft and pick its insight in one go.
pub fn evaluate(draft: &CallDraft) -> ReadinessReport {
    let score = compute_readiness_score(draft);
    let has_script = draft.has_script();
    ReadinessReport {
        score,
        insight: readiness_insight(score, has_script),
        has_script,
    }
}

fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Sum of all bonuses whose length threshold the trimmed text reaches.
fn length_bonus(text: &str, bonuses: &[(usize, u32)]) -> u32 {
    let len = text.trim().chars().count();
    bonuses
        .iter()
        .filter(|(min_len, _)| len >= *min_len)
        .map(|(_, points)| points)
        .sum()
}

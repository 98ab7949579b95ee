//! Input validation for call and script requests.
//!
//! Validation runs in two stages. The JSON-shape stage walks an arbitrary
//! `serde_json::Value`, trims every known string field and reports fields of
//! the wrong type. The rule stage runs the `validator` constraints declared on
//! [`CallDraft`] and [`ScriptInput`]. Violations from both stages are reported
//! together, keyed by wire (camelCase) field name, in declaration order.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::call::{CallDraft, ScriptInput};
use crate::error::CoreError;

/// E.164-like phone number: optional `+` followed by 7-15 digits.
pub static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("valid regex"));

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Maps a struct field to its wire name.
#[derive(Clone, Copy)]
struct FieldName {
    rust: &'static str,
    wire: &'static str,
}

const fn field(rust: &'static str, wire: &'static str) -> FieldName {
    FieldName { rust, wire }
}

const CALL_FIELDS: &[FieldName] = &[
    field("client_name", "clientName"),
    field("business_name", "businessName"),
    field("phone_number", "phoneNumber"),
    field("contact_email", "contactEmail"),
    field("preferred_date", "preferredDate"),
    field("preferred_time_window", "preferredTimeWindow"),
    field("appointment_goal", "appointmentGoal"),
    field("notes", "notes"),
    field("script", "script"),
];

const SCRIPT_FIELDS: &[FieldName] = &[
    field("client_name", "clientName"),
    field("business_name", "businessName"),
    field("appointment_goal", "appointmentGoal"),
    field("preferred_date", "preferredDate"),
    field("preferred_time_window", "preferredTimeWindow"),
    field("notes", "notes"),
];

// ---------------------------------------------------------------------------
// Field predicates
// ---------------------------------------------------------------------------

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_PATTERN.is_match(value.trim())
}

pub fn is_valid_email(value: &str) -> bool {
    value.trim().validate_email()
}

/// `validator` custom rule: empty is allowed, anything else must be an email.
pub fn validate_optional_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || is_valid_email(value) {
        return Ok(());
    }
    let mut err = ValidationError::new("email");
    err.message = Some("must be a valid email address".into());
    Err(err)
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Validate an untyped call-queue request and produce a normalized draft.
pub fn parse_call_request(input: &Value) -> Result<CallDraft, CoreError> {
    let mut fields = extract_fields(input, CALL_FIELDS)?;
    let draft = CallDraft {
        client_name: fields.take("clientName"),
        business_name: fields.take("businessName"),
        phone_number: fields.take("phoneNumber"),
        contact_email: fields.take("contactEmail"),
        preferred_date: fields.take("preferredDate"),
        preferred_time_window: fields.take("preferredTimeWindow"),
        appointment_goal: fields.take("appointmentGoal"),
        notes: fields.take("notes"),
        script: fields.take("script"),
    };
    fields.finish(draft.validate(), CALL_FIELDS)?;
    Ok(draft)
}

/// Validate an untyped script-generation request.
///
/// Same rules as a call request, without phone, email or script.
pub fn parse_script_input(input: &Value) -> Result<ScriptInput, CoreError> {
    let mut fields = extract_fields(input, SCRIPT_FIELDS)?;
    let script_input = ScriptInput {
        client_name: fields.take("clientName"),
        business_name: fields.take("businessName"),
        appointment_goal: fields.take("appointmentGoal"),
        preferred_date: fields.take("preferredDate"),
        preferred_time_window: fields.take("preferredTimeWindow"),
        notes: fields.take("notes"),
    };
    fields.finish(script_input.validate(), SCRIPT_FIELDS)?;
    Ok(script_input)
}

/// Read a possibly incomplete draft for scoring.
///
/// Only the JSON shape is checked: missing and `null` fields become empty,
/// non-string fields are violations. Required-field rules do not apply.
pub fn parse_partial_draft(input: &Value) -> Result<CallDraft, CoreError> {
    let mut fields = extract_fields(input, CALL_FIELDS)?;
    let draft = CallDraft {
        client_name: fields.take("clientName"),
        business_name: fields.take("businessName"),
        phone_number: fields.take("phoneNumber"),
        contact_email: fields.take("contactEmail"),
        preferred_date: fields.take("preferredDate"),
        preferred_time_window: fields.take("preferredTimeWindow"),
        appointment_goal: fields.take("appointmentGoal"),
        notes: fields.take("notes"),
        script: fields.take("script"),
    };
    fields.finish(Ok(()), CALL_FIELDS)?;
    Ok(draft)
}

/// Re-check an already-typed draft against the call-queue rules.
///
/// Whitespace-only values count as missing.
pub fn validate_call_draft(draft: &CallDraft) -> Result<(), CoreError> {
    let trimmed = CallDraft {
        client_name: draft.client_name.trim().to_string(),
        business_name: draft.business_name.trim().to_string(),
        phone_number: draft.phone_number.trim().to_string(),
        contact_email: draft.contact_email.trim().to_string(),
        preferred_date: draft.preferred_date.trim().to_string(),
        preferred_time_window: draft.preferred_time_window.trim().to_string(),
        appointment_goal: draft.appointment_goal.trim().to_string(),
        notes: draft.notes.trim().to_string(),
        script: draft.script.trim().to_string(),
    };
    let violations = collect_violations(trimmed.validate(), CALL_FIELDS);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(violations))
    }
}

// ---------------------------------------------------------------------------
// JSON-shape stage
// ---------------------------------------------------------------------------

struct ExtractedFields {
    values: HashMap<&'static str, String>,
    type_violations: Vec<FieldViolation>,
}

impl ExtractedFields {
    fn take(&mut self, wire: &str) -> String {
        self.values.remove(wire).unwrap_or_default()
    }

    /// Merge rule violations with type violations and fail if any exist.
    ///
    /// Rule violations on a mistyped field are dropped; the type error
    /// already explains it.
    fn finish(
        self,
        result: Result<(), ValidationErrors>,
        fields: &[FieldName],
    ) -> Result<(), CoreError> {
        let mistyped: Vec<&str> = self
            .type_violations
            .iter()
            .map(|v| v.field.as_str())
            .collect();
        let rule_violations: Vec<FieldViolation> = collect_violations(result, fields)
            .into_iter()
            .filter(|v| !mistyped.contains(&v.field.as_str()))
            .collect();

        let mut violations = self.type_violations.clone();
        violations.extend(rule_violations);
        if violations.is_empty() {
            return Ok(());
        }

        // Stable sort keeps per-field message order intact.
        violations.sort_by_key(|v| {
            fields
                .iter()
                .position(|f| f.wire == v.field)
                .unwrap_or(usize::MAX)
        });
        Err(CoreError::Validation(violations))
    }
}

fn extract_fields(input: &Value, fields: &[FieldName]) -> Result<ExtractedFields, CoreError> {
    let Some(obj) = input.as_object() else {
        return Err(CoreError::Validation(vec![FieldViolation::new(
            "body",
            "must be a JSON object",
        )]));
    };

    let mut values = HashMap::new();
    let mut type_violations = Vec::new();
    for f in fields {
        match obj.get(f.wire) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) => {
                values.insert(f.wire, s.trim().to_string());
            }
            Some(_) => type_violations.push(FieldViolation::new(f.wire, "must be a string")),
        }
    }

    Ok(ExtractedFields {
        values,
        type_violations,
    })
}

// ---------------------------------------------------------------------------
// Rule stage
// ---------------------------------------------------------------------------

fn collect_violations(
    result: Result<(), ValidationErrors>,
    fields: &[FieldName],
) -> Vec<FieldViolation> {
    let Err(errors) = result else {
        return Vec::new();
    };
    let field_errors = errors.field_errors();

    let mut violations = Vec::new();
    for f in fields {
        if let Some(errs) = field_errors.get(f.rust) {
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                violations.push(FieldViolation::new(f.wire, message));
            }
        }
    }
    violations
}

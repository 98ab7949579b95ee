//! Phone script synthesis.
//!
//! [`synthesize`] builds a deterministic script from structured fields and is
//! the guaranteed degraded mode when the AI generator is missing or failing.
//! [`generate_with_fallback`] wires the two together.

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::call::ScriptInput;
use crate::providers::ScriptGenerator;

/// Coaching message after a fallback script was produced.
pub const FALLBACK_SCRIPT_INSIGHT: &str =
    "AI fallback script created. Add more details or configure OPENAI_API_KEY for richer scripts.";

/// Coaching message after the AI generator produced a script.
pub const AI_SCRIPT_INSIGHT: &str =
    "Script generated successfully. You can make edits before placing the call.";

/// Date shapes accepted for `preferred_date`, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Output of script generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedScript {
    pub script: String,
    pub used_fallback: bool,
}

// ---------------------------------------------------------------------------
// Date rendering
// ---------------------------------------------------------------------------

/// Parse a free-form preferred date as a calendar date.
pub fn parse_preferred_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Render a preferred date as a long en-US date ("December 1, 2024").
///
/// Unparseable input is echoed unchanged so the operator's wording always
/// reaches the script.
pub fn render_preferred_date(raw: &str) -> String {
    match parse_preferred_date(raw) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Synthesis
// ---------------------------------------------------------------------------

/// Build the fallback phone script.
///
/// Field values are interpolated verbatim; only emptiness checks trim.
pub fn synthesize(input: &ScriptInput) -> String {
    let mut sentences = vec![
        format!(
            "Hi, this is {} calling on behalf of {}.",
            input.client_name, input.business_name
        ),
        as_sentence(&format!(
            "I'm reaching out to arrange the following: {}",
            input.appointment_goal
        )),
    ];

    let date = render_preferred_date(&input.preferred_date);
    let when = if date.trim().is_empty() {
        "in the coming days".to_string()
    } else {
        format!("on {date}")
    };
    if input.preferred_time_window.trim().is_empty() {
        sentences.push(format!("Would you have availability {when}?"));
    } else {
        sentences.push(format!(
            "Would you have availability {when}, ideally {}?",
            input.preferred_time_window
        ));
    }
    sentences.push(
        "If that doesn't work, I'm happy to find another time that suits you.".to_string(),
    );

    if !input.notes.trim().is_empty() {
        sentences.push(format!("Additional context: {}.", input.notes));
    }

    sentences.push("Thank you, and I look forward to confirming the appointment.".to_string());
    sentences.join(" ")
}

fn as_sentence(text: &str) -> String {
    if text.ends_with(['.', '!', '?']) {
        text.to_string()
    } else {
        format!("{text}.")
    }
}

// ---------------------------------------------------------------------------
// Generation with fallback
// ---------------------------------------------------------------------------

/// Ask the AI generator for a script, falling back to [`synthesize`].
///
/// Provider errors are logged and swallowed; a blank provider script counts
/// as a failure.
pub async fn generate_with_fallback(
    generator: Option<&dyn ScriptGenerator>,
    input: &ScriptInput,
) -> GeneratedScript {
    let Some(generator) = generator else {
        tracing::debug!("No script generator configured, using fallback script");
        return fallback(input);
    };

    match generator.generate_script(input).await {
        Ok(script) if !script.trim().is_empty() => GeneratedScript {
            script: script.trim().to_string(),
            used_fallback: false,
        },
        Ok(_) => {
            tracing::warn!("Script generator returned an empty script, using fallback");
            fallback(input)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Script generation failed, using fallback");
            fallback(input)
        }
    }
}

fn fallback(input: &ScriptInput) -> GeneratedScript {
    GeneratedScript {
        script: synthesize(input),
        used_fallback: true,
    }
}

/// Coaching message to show after a script was generated.
pub fn generation_insight(used_fallback: bool) -> &'static str {
    if used_fallback {
        FALLBACK_SCRIPT_INSIGHT
    } else {
        AI_SCRIPT_INSIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::error::CoreError;

    fn summit_dental() -> ScriptInput {
        ScriptInput {
            client_name: "Jordan".into(),
            business_name: "Summit Dental".into(),
            appointment_goal: "Schedule a follow-up cleaning for Maria Lopez".into(),
            preferred_date: "2024-12-01".into(),
            preferred_time_window: "between 2-4 PM".into(),
            notes: "She prefers Tuesdays.".into(),
        }
    }

    // -- render_preferred_date ------------------------------------------------

    #[test]
    fn iso_date_renders_long_form() {
        assert_eq!(render_preferred_date("2024-12-01"), "December 1, 2024");
    }

    #[test]
    fn alternate_date_shapes_render() {
        assert_eq!(render_preferred_date("2024/03/09"), "March 9, 2024");
        assert_eq!(render_preferred_date("07/04/2025"), "July 4, 2025");
        assert_eq!(
            render_preferred_date("2024-12-01T23:30:00-05:00"),
            "December 1, 2024"
        );
    }

    #[test]
    fn invalid_calendar_date_is_echoed() {
        assert_eq!(render_preferred_date("2024-02-30"), "2024-02-30");
        assert_eq!(render_preferred_date("next Tuesday"), "next Tuesday");
    }

    // -- synthesize -----------------------------------------------------------

    #[test]
    fn script_includes_goal_and_timing() {
        let script = synthesize(&summit_dental());
        assert!(script.contains("Jordan"));
        assert!(script.contains("Summit Dental"));
        assert!(script.contains("Schedule a follow-up cleaning for Maria Lopez"));
        assert!(script.contains("between 2-4 PM"));
        assert!(script.contains("Additional context: She prefers Tuesdays."));
        assert!(script.contains("December 1, 2024"));
    }

    #[test]
    fn invalid_date_falls_back_to_raw_text() {
        let input = ScriptInput {
            client_name: "Alex".into(),
            business_name: "Northside Clinic".into(),
            appointment_goal: "Book a primary care consultation".into(),
            preferred_date: "not-a-valid-date".into(),
            preferred_time_window: String::new(),
            notes: String::new(),
        };
        let script = synthesize(&input);
        assert!(script.contains("not-a-valid-date"));
        assert!(!script.contains("ideally"));
    }

    #[test]
    fn notes_sentence_is_exact_when_present() {
        let input = ScriptInput {
            notes: "Mention insurance coverage".into(),
            ..summit_dental()
        };
        assert!(synthesize(&input).contains("Additional context: Mention insurance coverage."));
    }

    #[test]
    fn notes_sentence_absent_when_empty() {
        let input = ScriptInput {
            notes: "   ".into(),
            ..summit_dental()
        };
        assert!(!synthesize(&input).contains("Additional context"));
    }

    #[test]
    fn goal_with_terminal_punctuation_is_kept_verbatim() {
        let input = ScriptInput {
            appointment_goal: "Can we book a cleaning?".into(),
            ..summit_dental()
        };
        let script = synthesize(&input);
        assert!(script.contains("Can we book a cleaning?"));
        assert!(!script.contains("cleaning?."));
    }

    #[test]
    fn synthesis_is_deterministic() {
        assert_eq!(synthesize(&summit_dental()), synthesize(&summit_dental()));
    }

    // -- generate_with_fallback -----------------------------------------------

    struct FixedGenerator(Result<&'static str, &'static str>);

    #[async_trait]
    impl ScriptGenerator for FixedGenerator {
        async fn generate_script(&self, _input: &ScriptInput) -> Result<String, CoreError> {
            self.0
                .map(str::to_string)
                .map_err(|e| CoreError::Provider(e.to_string()))
        }
    }

    #[tokio::test]
    async fn missing_generator_uses_fallback() {
        let result = generate_with_fallback(None, &summit_dental()).await;
        assert!(result.used_fallback);
        assert_eq!(result.script, synthesize(&summit_dental()));
    }

    #[tokio::test]
    async fn generator_script_is_used_when_available() {
        let generator = FixedGenerator(Ok("  Hello from the AI.  "));
        let result = generate_with_fallback(Some(&generator), &summit_dental()).await;
        assert!(!result.used_fallback);
        assert_eq!(result.script, "Hello from the AI.");
    }

    #[tokio::test]
    async fn generator_failure_uses_fallback() {
        let generator = FixedGenerator(Err("rate limited"));
        let result = generate_with_fallback(Some(&generator), &summit_dental()).await;
        assert!(result.used_fallback);
        assert!(result.script.contains("Summit Dental"));
    }

    #[tokio::test]
    async fn blank_generator_script_uses_fallback() {
        let generator = FixedGenerator(Ok("   "));
        let result = generate_with_fallback(Some(&generator), &summit_dental()).await;
        assert!(result.used_fallback);
    }

    #[test]
    fn insight_reflects_fallback() {
        assert!(generation_insight(true).contains("OPENAI_API_KEY"));
        assert!(generation_insight(false).starts_with("Script generated successfully"));
    }
}

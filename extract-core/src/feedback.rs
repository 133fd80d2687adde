//! Corrective feedback messages for the retry loop.

use serde_json::Value;

use crate::validate::FieldError;

/// Builds the feedback turn for a payload that parsed but failed validation.
///
/// Includes the attempt counter, every field error with its path, the
/// expected schema manifest, the echoed submission, and an instruction to
/// correct exactly the listed fields.
#[must_use]
pub fn build_validation_feedback(
    manifest: &Value,
    submitted: &Value,
    errors: &[FieldError],
    attempt: usize,
    total_attempts: usize,
) -> String {
    let mut feedback = format!("Attempt {attempt}/{total_attempts}: validation failed.\n\n");

    feedback.push_str("Errors:\n");
    for error in errors {
        feedback.push_str("  - ");
        feedback.push_str(&error.to_string());
        feedback.push('\n');
    }

    feedback.push_str("\nExpected schema:\n");
    feedback.push_str(&pretty(manifest));

    feedback.push_str("\n\nYour submission:\n");
    feedback.push_str(&pretty(submitted));

    feedback.push_str("\n\nCorrect exactly the fields listed above and resubmit the full object.");
    feedback
}

/// Builds the feedback turn for a completion that was not parsable JSON.
///
/// Echoes the parse error and a truncated slice of the raw output so the
/// model can see what it actually sent.
#[must_use]
pub fn build_parse_feedback(
    raw_output: &str,
    parse_error: &str,
    attempt: usize,
    total_attempts: usize,
    manifest: &Value,
) -> String {
    let mut feedback =
        format!("Attempt {attempt}/{total_attempts}: your response was not parsable JSON.\n\n");

    feedback.push_str("Parse error: ");
    feedback.push_str(parse_error);
    feedback.push_str("\n\n");

    feedback.push_str("Your response (first 500 chars):\n");
    if raw_output.chars().count() > 500 {
        feedback.extend(raw_output.chars().take(500));
        feedback.push_str("...");
    } else {
        feedback.push_str(raw_output);
    }

    feedback.push_str("\n\nExpected schema:\n");
    feedback.push_str(&pretty(manifest));

    feedback.push_str("\n\nRespond with a single JSON object matching the schema above.");
    feedback
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

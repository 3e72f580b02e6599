//! Parsing of JSON answers from the model
//!
//! Models often wrap JSON in Markdown code fences or add a sentence around
//! it. Parsing strips fences, then falls back to the outermost `{...}` span.
//! Callers decide what to do when both attempts fail.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::types::{ComplianceReport, Insights};

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```(?:json)?\n?").expect("code fence pattern is valid")
});

/// Remove Markdown code fences around a JSON payload
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("```") {
        CODE_FENCE.replace_all(trimmed, "").trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse a JSON object out of a model response
pub fn parse_json<T: DeserializeOwned>(raw: &str) -> serde_json::Result<T> {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str(&cleaned) {
        Ok(value) => Ok(value),
        Err(err) => match (cleaned.find('{'), cleaned.rfind('}')) {
            (Some(start), Some(end)) if start < end => serde_json::from_str(&cleaned[start..=end]),
            _ => Err(err),
        },
    }
}

/// Parse insights, degrading to an empty result
pub fn parse_insights(raw: &str) -> Insights {
    parse_json(raw).unwrap_or_else(|e| {
        tracing::warn!("Could not parse insights response, returning empty result: {}", e);
        Insights::default()
    })
}

/// Parse a compliance report, degrading to a needs-review result
pub fn parse_compliance(raw: &str) -> ComplianceReport {
    parse_json(raw).unwrap_or_else(|e| {
        tracing::warn!("Could not parse compliance response, returning needs-review: {}", e);
        ComplianceReport::needs_review_fallback()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ComplianceStatus, Severity};

    #[test]
    fn test_strip_json_fence() {
        let raw = "```json\n{\"dates\": [\"2024-01-31\"]}\n```";
        assert_eq!(strip_code_fences(raw), "{\"dates\": [\"2024-01-31\"]}");
    }

    #[test]
    fn test_strip_bare_fence() {
        assert_eq!(strip_code_fences("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_insights_missing_fields_default() {
        let insights = parse_insights(r#"{"people": ["Anna Meier"], "keyStats": ["CHF 1.2M"]}"#);
        assert_eq!(insights.people, vec!["Anna Meier"]);
        assert_eq!(insights.key_stats, vec!["CHF 1.2M"]);
        assert!(insights.dates.is_empty());
        assert!(insights.action_items.is_empty());
    }

    #[test]
    fn test_insights_surrounded_by_prose() {
        let insights = parse_insights("Here is the JSON:\n{\"organizations\": [\"FINMA\"]}\nThanks!");
        assert_eq!(insights.organizations, vec!["FINMA"]);
    }

    #[test]
    fn test_unparseable_insights_degrade() {
        assert!(parse_insights("I could not find anything.").is_empty());
    }

    #[test]
    fn test_compliance_parse() {
        let raw = r#"```json
{
  "overallCompliance": "non-compliant",
  "issues": [
    {"severity": "critical", "category": "Data Protection", "description": "No consent clause", "relevantLaw": "DSG Art. 6"}
  ],
  "summary": "Consent is missing.",
  "applicableLaws": ["DSG"]
}
```"#;
        let report = parse_compliance(raw);
        assert_eq!(report.overall_compliance, ComplianceStatus::NonCompliant);
        assert_eq!(report.issues[0].severity, Severity::Critical);
        assert_eq!(report.issues[0].relevant_law.as_deref(), Some("DSG Art. 6"));
        assert!(report.issues[0].recommendation.is_none());
        assert_eq!(report.applicable_laws, vec!["DSG"]);
    }

    #[test]
    fn test_null_summary_keeps_issues() {
        let report = parse_compliance(
            r#"{"overallCompliance": "non-compliant", "issues": [{"severity": "critical", "category": "Data Protection", "description": "No consent clause"}], "summary": null, "applicableLaws": ["DSG"]}"#,
        );
        assert_eq!(report.overall_compliance, ComplianceStatus::NonCompliant);
        assert_eq!(report.issues[0].category, "Data Protection");
        assert_eq!(report.summary, "Compliance check completed.");
        assert_eq!(report.applicable_laws, vec!["DSG"]);
    }

    #[test]
    fn test_null_status_and_severity_keep_issues() {
        let report = parse_compliance(
            r#"{"overallCompliance": null, "issues": [{"severity": null, "category": "Tax", "description": null}], "summary": "  ", "applicableLaws": null}"#,
        );
        assert_eq!(report.overall_compliance, ComplianceStatus::NeedsReview);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].category, "Tax");
        assert_eq!(report.issues[0].severity, Severity::Info);
        assert!(report.issues[0].description.is_empty());
        assert_eq!(report.summary, "Compliance check completed.");
    }

    #[test]
    fn test_insights_scalar_items_become_text() {
        let insights = parse_insights(
            r#"{"people": ["Anna Meier"], "keyStats": [42, "CHF 1.2M", null, 3.5], "dates": "31 March 2026"}"#,
        );
        assert_eq!(insights.people, vec!["Anna Meier"]);
        assert_eq!(insights.key_stats, vec!["42", "CHF 1.2M", "3.5"]);
        assert_eq!(insights.dates, vec!["31 March 2026"]);
    }

    #[test]
    fn test_unparseable_compliance_needs_review() {
        let report = parse_compliance("not json at all");
        assert_eq!(report, ComplianceReport::needs_review_fallback());
        assert_eq!(report.issues[0].category, "System Error");
    }
}

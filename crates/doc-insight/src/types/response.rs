//! Result types returned for each analysis task

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read a list of strings leniently: numbers and other values are rendered as
/// text, null items are skipped and a lone value counts as a one-item list
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        other => vec![other],
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
        .collect())
}

/// Document summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub summary: String,
}

/// Answer to a question about a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Generated answer text
    pub answer: String,
    /// Preview of the document chunk the answer was grounded on
    pub source: String,
}

/// Structured facts extracted from a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Insights {
    /// Important dates and deadlines
    #[serde(deserialize_with = "lenient_strings")]
    pub dates: Vec<String>,
    /// People mentioned
    #[serde(deserialize_with = "lenient_strings")]
    pub people: Vec<String>,
    /// Organizations and companies mentioned
    #[serde(deserialize_with = "lenient_strings")]
    pub organizations: Vec<String>,
    /// Tasks or action items
    #[serde(deserialize_with = "lenient_strings")]
    pub action_items: Vec<String>,
    /// Important statistics or numbers
    #[serde(deserialize_with = "lenient_strings")]
    pub key_stats: Vec<String>,
}

impl Insights {
    /// True when nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
            && self.people.is_empty()
            && self.organizations.is_empty()
            && self.action_items.is_empty()
            && self.key_stats.is_empty()
    }
}

/// Overall compliance verdict
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
    /// Also used for verdicts the model phrased in an unexpected way
    #[default]
    #[serde(other)]
    NeedsReview,
}

/// Issue severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    #[default]
    #[serde(other)]
    Info,
}

/// A single compliance finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceIssue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub severity: Severity,
    /// Legal area, e.g. "Data Protection"
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Specific law or regulation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant_law: Option<String>,
    /// Suggested action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// Compliance analysis for a jurisdiction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_compliance: ComplianceStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issues: Vec<ComplianceIssue>,
    #[serde(default = "default_compliance_summary", deserialize_with = "summary_or_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub applicable_laws: Vec<String>,
}

fn default_compliance_summary() -> String {
    "Compliance check completed.".to_string()
}

/// Null or blank summaries read as the default summary
fn summary_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(default_compliance_summary))
}

impl ComplianceReport {
    /// Report returned when the model output could not be interpreted
    pub fn needs_review_fallback() -> Self {
        Self {
            overall_compliance: ComplianceStatus::NeedsReview,
            issues: vec![ComplianceIssue {
                severity: Severity::Info,
                category: "System Error".to_string(),
                description: "Unable to complete legal compliance check. Please try again."
                    .to_string(),
                relevant_law: None,
                recommendation: None,
            }],
            summary: "An error occurred during the compliance check.".to_string(),
            applicable_laws: Vec::new(),
        }
    }
}

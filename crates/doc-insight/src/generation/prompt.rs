//! Prompt templates for each analysis task

use crate::config::ComplianceConfig;
use crate::types::ConversationTurn;

/// Prompt builder for document analysis tasks
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build a summarization prompt
    pub fn summary_prompt(text: &str) -> String {
        format!(
            r#"You are a document summarization expert. Create concise, accurate summaries with key insights.

Summarize this document in exactly 3 sentences, then provide 5-7 key bullet points:

{text}"#,
            text = text
        )
    }

    /// Build a question-answering prompt grounded on one document chunk
    pub fn question_prompt(context: &str, history: &[ConversationTurn], question: &str) -> String {
        format!(
            r#"You are a helpful assistant that answers questions based on the provided document context. Always cite which part of the document you used.

Document context:

{context}{history}

Question: {question}

Answer the question based on the document context above. If the answer is not in the context, say so."#,
            context = context,
            history = Self::format_history(history),
            question = question
        )
    }

    /// Render prior turns as role-labelled lines; empty when there is no history
    fn format_history(history: &[ConversationTurn]) -> String {
        if history.is_empty() {
            return String::new();
        }

        let mut rendered = String::from("\n\nPrevious conversation:\n");
        for turn in history {
            rendered.push_str(&format!("{}: {}\n", turn.role.label(), turn.content));
        }
        rendered
    }

    /// Build an insight extraction prompt
    pub fn insights_prompt(text: &str) -> String {
        format!(
            r#"You are an expert at extracting structured information from documents. Return JSON format only.

Extract the following from this document and return as JSON:
- dates: Array of important dates and deadlines
- people: Array of people mentioned
- organizations: Array of organizations/companies mentioned
- actionItems: Array of tasks or action items
- keyStats: Array of important statistics or numbers

Document:

{text}

Return only valid JSON, no markdown formatting. Format: {{"dates": [], "people": [], "organizations": [], "actionItems": [], "keyStats": []}}"#,
            text = text
        )
    }

    /// Build a compliance analysis prompt for the configured jurisdiction
    pub fn compliance_prompt(text: &str, compliance: &ComplianceConfig) -> String {
        let jurisdiction = &compliance.jurisdiction;
        let focus_areas = compliance
            .focus_areas
            .iter()
            .enumerate()
            .map(|(i, area)| format!("{}. {}", i + 1, area))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are a legal compliance expert for {jurisdiction}. Analyze the following document against the laws and regulations of {jurisdiction}. Focus on:

{focus_areas}

Document:

{text}

Analyze the document and return a JSON object with:
- overallCompliance: "compliant", "non-compliant", or "needs-review"
- issues: Array of objects with:
  - severity: "critical", "warning", or "info"
  - category: The legal area (e.g., "Data Protection", "Employment Law")
  - description: Clear description of the issue
  - relevantLaw: The specific law or regulation of {jurisdiction} (if applicable)
  - recommendation: Suggested action (if applicable)
- summary: A brief 2-3 sentence summary of compliance status
- applicableLaws: Array of laws of {jurisdiction} that are relevant to this document

Return only valid JSON, no markdown formatting. Format:
{{
  "overallCompliance": "compliant" | "non-compliant" | "needs-review",
  "issues": [
    {{
      "severity": "critical" | "warning" | "info",
      "category": "string",
      "description": "string",
      "relevantLaw": "string (optional)",
      "recommendation": "string (optional)"
    }}
  ],
  "summary": "string",
  "applicableLaws": ["string"]
}}"#,
            jurisdiction = jurisdiction,
            focus_areas = focus_areas,
            text = text
        )
    }
}

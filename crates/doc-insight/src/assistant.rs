//! Document assistant: one generation call per user action
//!
//! Whole-document tasks (summary, insights, compliance) send the document text,
//! cut to `max_context_chars`. Question answering chunks the full text and
//! grounds the prompt on the single most relevant chunk.

use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::generation::structured::{parse_compliance, parse_insights};
use crate::generation::{build_client, GenerationClient, GenerationRequest, PromptBuilder};
use crate::retrieval::{KeywordSelector, WordChunker};
use crate::types::{Answer, ComplianceReport, ConversationTurn, Insights, Summary};

const SUMMARY_FALLBACK: &str = "Summary generation failed";
const ANSWER_FALLBACK: &str = "Unable to generate answer";

/// Characters of the selected chunk shown as the answer source
const SOURCE_PREVIEW_CHARS: usize = 200;

/// Request-handling layer over a generation client
pub struct DocumentAssistant {
    client: Arc<dyn GenerationClient>,
    model_id: String,
    config: AppConfig,
    chunker: WordChunker,
    selector: KeywordSelector,
}

impl DocumentAssistant {
    /// Create an assistant around an existing client
    pub fn new(client: Arc<dyn GenerationClient>, config: AppConfig) -> Result<Self> {
        let chunker = WordChunker::new(config.retrieval.chunk_size_tokens)?;
        let selector = KeywordSelector::new(config.retrieval.min_query_token_chars);
        let model_id = config.generation.model_id().to_string();

        Ok(Self {
            client,
            model_id,
            config,
            chunker,
            selector,
        })
    }

    /// Create an assistant with the client selected by the configuration
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let client = build_client(&config.generation)?;
        Self::new(client, config)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Summarize a document in three sentences plus key bullet points
    pub async fn summarize(&self, text: &str) -> Result<Summary> {
        self.ensure_analyzable(text)?;
        let start = Instant::now();

        let prompt = PromptBuilder::summary_prompt(self.context_window(text));
        let request = GenerationRequest::new(prompt, &self.model_id)
            .with_temperature(0.3)
            .with_max_output_tokens(500);
        let output = self.client.generate(&request).await?;

        let summary = non_empty_or(output, SUMMARY_FALLBACK);
        tracing::info!(
            "Summary generated ({} chars) in {}ms",
            summary.chars().count(),
            start.elapsed().as_millis()
        );

        Ok(Summary { summary })
    }

    /// Answer a question using the chunk most relevant to it
    pub async fn answer_question(
        &self,
        text: &str,
        question: &str,
        history: &[ConversationTurn],
    ) -> Result<Answer> {
        if text.is_empty() {
            return Err(Error::validation("Document text is required"));
        }
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::validation("Question is required"));
        }
        let start = Instant::now();

        let chunks = self.chunker.chunk(text);
        let chunk = self.selector.select(&chunks, question)?;
        tracing::debug!(
            "Answering from chunk {} of {} ({} tokens)",
            chunk.index,
            chunks.len(),
            chunk.token_count
        );

        let prompt = PromptBuilder::question_prompt(&chunk.text, history, question);
        let request = GenerationRequest::new(prompt, &self.model_id)
            .with_temperature(0.5)
            .with_max_output_tokens(500);
        let output = self.client.generate(&request).await?;

        let answer = non_empty_or(output, ANSWER_FALLBACK);
        let source = format!("{}...", truncate_chars(&chunk.text, SOURCE_PREVIEW_CHARS));
        tracing::info!(
            "Question answered with {} prior turns in {}ms",
            history.len(),
            start.elapsed().as_millis()
        );

        Ok(Answer { answer, source })
    }

    /// Extract dates, people, organizations, action items and key numbers.
    ///
    /// An unparseable model response yields empty insights, not an error.
    pub async fn extract_insights(&self, text: &str) -> Result<Insights> {
        self.ensure_analyzable(text)?;
        let start = Instant::now();

        let prompt = PromptBuilder::insights_prompt(self.context_window(text));
        let request = GenerationRequest::new(prompt, &self.model_id)
            .with_temperature(0.2)
            .with_json_output();
        let output = self.client.generate(&request).await?;

        let insights = parse_insights(&output);
        tracing::info!(
            "Insights extracted ({} dates, {} people, {} organizations) in {}ms",
            insights.dates.len(),
            insights.people.len(),
            insights.organizations.len(),
            start.elapsed().as_millis()
        );

        Ok(insights)
    }

    /// Check the document against the configured jurisdiction.
    ///
    /// An unparseable model response yields a needs-review report.
    pub async fn check_compliance(&self, text: &str) -> Result<ComplianceReport> {
        self.ensure_analyzable(text)?;
        let start = Instant::now();

        let prompt =
            PromptBuilder::compliance_prompt(self.context_window(text), &self.config.compliance);
        let request = GenerationRequest::new(prompt, &self.model_id)
            .with_temperature(0.2)
            .with_json_output();
        let output = self.client.generate(&request).await?;

        let report = parse_compliance(&output);
        tracing::info!(
            "Compliance check for {}: {:?}, {} issues in {}ms",
            self.config.compliance.jurisdiction,
            report.overall_compliance,
            report.issues.len(),
            start.elapsed().as_millis()
        );

        Ok(report)
    }

    fn ensure_analyzable(&self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Err(Error::validation("Document text is required"));
        }
        let min = self.config.intake.min_analysis_chars;
        if text.chars().count() < min {
            return Err(Error::validation(format!(
                "Document text is too short (minimum {} characters)",
                min
            )));
        }
        Ok(())
    }

    fn context_window<'a>(&self, text: &'a str) -> &'a str {
        let max = self.config.generation.max_context_chars;
        let window = truncate_chars(text, max);
        if window.len() < text.len() {
            tracing::debug!("Document truncated to {} characters", max);
        }
        window
    }
}

/// Longest prefix of `text` with at most `max_chars` characters
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Model output unchanged, or `fallback` when it has no visible text
fn non_empty_or(output: String, fallback: &str) -> String {
    if output.trim().is_empty() {
        fallback.to_string()
    } else {
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationError;
    use crate::types::{ComplianceStatus, Severity};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    type Reply = std::result::Result<String, GenerationError>;

    /// Returns canned replies in order and records every request
    struct ScriptedClient {
        replies: Mutex<VecDeque<Reply>>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Reply>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn replying(text: &str) -> Arc<Self> {
            Self::new(vec![Ok(text.to_string())])
        }

        fn requests(&self) -> Vec<GenerationRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationClient for ScriptedClient {
        async fn generate(&self, request: &GenerationRequest) -> Reply {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(GenerationError::EmptyResponse))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn assistant(client: &Arc<ScriptedClient>) -> DocumentAssistant {
        DocumentAssistant::new(client.clone(), AppConfig::default()).unwrap()
    }

    fn long_text() -> String {
        "The supplier shall deliver the goods to Zurich within thirty days of the order. ".repeat(3)
    }

    #[tokio::test]
    async fn test_summarize() {
        let client = ScriptedClient::replying("Three sentences.\n- point\n");
        let summary = assistant(&client).summarize(&long_text()).await.unwrap();
        assert_eq!(summary.summary, "Three sentences.\n- point\n");

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model_id, "gemini-1.5-flash");
        assert_eq!(requests[0].temperature, 0.3);
        assert_eq!(requests[0].max_output_tokens, Some(500));
        assert!(!requests[0].json_output);
        assert!(requests[0].prompt.ends_with(&long_text()));
    }

    #[tokio::test]
    async fn test_summarize_empty_output_falls_back() {
        let client = ScriptedClient::replying("   ");
        let summary = assistant(&client).summarize(&long_text()).await.unwrap();
        assert_eq!(summary.summary, "Summary generation failed");
    }

    #[tokio::test]
    async fn test_model_output_returned_verbatim() {
        let client = ScriptedClient::replying("\n  Anna Meier signed the lease.  \n");
        let answer = assistant(&client)
            .answer_question(&long_text(), "Who signed?", &[])
            .await
            .unwrap();
        assert_eq!(answer.answer, "\n  Anna Meier signed the lease.  \n");
    }

    #[tokio::test]
    async fn test_short_text_rejected_without_generation() {
        let client = ScriptedClient::replying("unused");
        let assistant = assistant(&client);

        let err = assistant.summarize("too short").await.unwrap_err();
        assert_eq!(err.to_string(), "Document text is too short (minimum 100 characters)");
        let err = assistant.extract_insights("").await.unwrap_err();
        assert_eq!(err.to_string(), "Document text is required");
        assert!(assistant.check_compliance("short").await.unwrap_err().is_user_error());

        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_long_text_truncated() {
        let client = ScriptedClient::replying("ok");
        let mut config = AppConfig::default();
        config.generation.max_context_chars = 150;
        let assistant = DocumentAssistant::new(client.clone(), config).unwrap();

        let text = "ä".repeat(400);
        assistant.summarize(&text).await.unwrap();

        let prompt = &client.requests()[0].prompt;
        assert!(prompt.ends_with(&"ä".repeat(150)));
        assert!(!prompt.contains(&"ä".repeat(151)));
    }

    #[tokio::test]
    async fn test_answer_uses_best_chunk() {
        let client = ScriptedClient::replying("Reports are due monthly.");
        let mut config = AppConfig::default();
        config.retrieval.chunk_size_tokens = 5;
        let assistant = DocumentAssistant::new(client.clone(), config).unwrap();

        let text = "The weather today is sunny. Financial reporting requirements apply quarterly.";
        let answer = assistant
            .answer_question(text, "  What are the financial requirements?  ", &[])
            .await
            .unwrap();

        assert_eq!(answer.answer, "Reports are due monthly.");
        assert_eq!(answer.source, "Financial reporting requirements apply quarterly....");

        let request = &client.requests()[0];
        assert_eq!(request.temperature, 0.5);
        assert_eq!(request.max_output_tokens, Some(500));
        assert!(request.prompt.contains(
            "Document context:\n\nFinancial reporting requirements apply quarterly.\n\nQuestion: What are the financial requirements?"
        ));
        assert!(!request.prompt.contains("weather"));
    }

    #[tokio::test]
    async fn test_answer_includes_history() {
        let client = ScriptedClient::replying("It ends in March.");
        let history = vec![
            ConversationTurn::user("Who is the tenant?"),
            ConversationTurn::assistant("Anna Meier."),
        ];
        assistant(&client)
            .answer_question(&long_text(), "When does it end?", &history)
            .await
            .unwrap();

        let prompt = &client.requests()[0].prompt;
        assert!(prompt.contains("Previous conversation:\nUser: Who is the tenant?\nAssistant: Anna Meier.\n"));
    }

    #[tokio::test]
    async fn test_answer_source_preview_is_capped() {
        let client = ScriptedClient::replying("");
        let text = "word ".repeat(100);
        let answer = assistant(&client)
            .answer_question(&text, "anything", &[])
            .await
            .unwrap();

        assert_eq!(answer.answer, "Unable to generate answer");
        assert_eq!(answer.source.chars().count(), 203);
        assert!(answer.source.ends_with("..."));
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let client = ScriptedClient::replying("unused");
        let err = assistant(&client)
            .answer_question(&long_text(), "   ", &[])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Question is required");
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_insights_request_and_parse() {
        let client = ScriptedClient::replying(
            "```json\n{\"dates\": [\"30 days\"], \"organizations\": [\"Acme AG\"]}\n```",
        );
        let insights = assistant(&client).extract_insights(&long_text()).await.unwrap();
        assert_eq!(insights.organizations, vec!["Acme AG"]);
        assert!(insights.people.is_empty());

        let request = &client.requests()[0];
        assert_eq!(request.temperature, 0.2);
        assert!(request.json_output);
        assert_eq!(request.max_output_tokens, None);
    }

    #[tokio::test]
    async fn test_insights_degrade_on_garbage() {
        let client = ScriptedClient::replying("Sorry, I cannot help with that.");
        let insights = assistant(&client).extract_insights(&long_text()).await.unwrap();
        assert_eq!(insights, Insights::default());
    }

    #[tokio::test]
    async fn test_compliance_report() {
        let client = ScriptedClient::replying(
            r#"{"overallCompliance": "compliant", "issues": [{"severity": "warning", "category": "Contract Law", "description": "Delivery term is vague"}], "summary": "Mostly fine.", "applicableLaws": ["OR"]}"#,
        );
        let report = assistant(&client).check_compliance(&long_text()).await.unwrap();
        assert_eq!(report.overall_compliance, ComplianceStatus::Compliant);
        assert_eq!(report.issues[0].severity, Severity::Warning);
        assert_eq!(report.applicable_laws, vec!["OR"]);

        let request = &client.requests()[0];
        assert!(request.json_output);
        assert!(request.prompt.starts_with("You are a legal compliance expert for Switzerland."));
    }

    #[tokio::test]
    async fn test_compliance_degrades_on_garbage() {
        let client = ScriptedClient::replying("not json");
        let report = assistant(&client).check_compliance(&long_text()).await.unwrap();
        assert_eq!(report, ComplianceReport::needs_review_fallback());
    }

    #[tokio::test]
    async fn test_generation_errors_propagate() {
        let client = ScriptedClient::new(vec![
            Err(GenerationError::RateLimited("quota exceeded".to_string())),
            Err(GenerationError::Authentication("bad key".to_string())),
        ]);
        let assistant = assistant(&client);

        let err = assistant.check_compliance(&long_text()).await.unwrap_err();
        assert!(matches!(err, Error::Generation(GenerationError::RateLimited(_))));

        let err = assistant
            .answer_question(&long_text(), "delivery", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Generation(GenerationError::Authentication(_))));
        assert_eq!(client.requests().len(), 2);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut config = AppConfig::default();
        config.retrieval.chunk_size_tokens = 0;
        let result = DocumentAssistant::new(ScriptedClient::replying(""), config);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("Grüezi", 3), "Grü");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}

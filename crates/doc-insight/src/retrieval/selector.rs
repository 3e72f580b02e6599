//! Keyword-overlap relevance selection
//!
//! Picks the chunk sharing the most distinct content words with a query.
//! Matching is plain substring containment on lower-cased text, so "report"
//! also matches "reporting". Short words are dropped from the query because
//! they rarely discriminate between chunks.

use crate::error::{Error, Result};

use super::chunker::Chunk;

/// Default minimum length: query tokens with this many chars or fewer are ignored
pub const DEFAULT_MIN_TOKEN_CHARS: usize = 3;

/// Lexical chunk selector
#[derive(Debug, Clone, Copy)]
pub struct KeywordSelector {
    min_token_chars: usize,
}

impl Default for KeywordSelector {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TOKEN_CHARS)
    }
}

impl KeywordSelector {
    /// Create a selector that ignores query tokens of `min_token_chars` chars or fewer
    pub fn new(min_token_chars: usize) -> Self {
        Self { min_token_chars }
    }

    /// Distinct lower-cased query tokens longer than the minimum, in query order
    pub fn query_terms(&self, query: &str) -> Vec<String> {
        let mut terms: Vec<String> = Vec::new();
        for token in query.split_whitespace() {
            let token = token.to_lowercase();
            if token.chars().count() > self.min_token_chars && !terms.contains(&token) {
                terms.push(token);
            }
        }
        terms
    }

    /// Number of `terms` contained in the chunk text
    pub fn score(&self, chunk: &Chunk, terms: &[String]) -> usize {
        let text = chunk.text.to_lowercase();
        terms.iter().filter(|term| text.contains(term.as_str())).count()
    }

    /// Select the chunk that best matches `query`.
    ///
    /// The first chunk with the highest score wins. When nothing matches the
    /// first chunk is returned.
    pub fn select<'a>(&self, chunks: &'a [Chunk], query: &str) -> Result<&'a Chunk> {
        let first = chunks
            .first()
            .ok_or_else(|| Error::invalid_argument("cannot select from an empty chunk list"))?;

        let terms = self.query_terms(query);
        if terms.is_empty() {
            tracing::debug!("No qualifying query terms, using first chunk");
            return Ok(first);
        }

        let mut best = first;
        let mut max_matches = 0usize;

        for chunk in chunks {
            let matches = self.score(chunk, &terms);
            if matches > max_matches {
                max_matches = matches;
                best = chunk;
            }
        }

        tracing::debug!(
            "Selected chunk {} of {} ({} of {} terms matched)",
            best.index,
            chunks.len(),
            max_matches,
            terms.len()
        );

        Ok(best)
    }
}

/// Select the best chunk for `query` using the default selector
pub fn select_best_chunk<'a>(chunks: &'a [Chunk], query: &str) -> Result<&'a Chunk> {
    KeywordSelector::default().select(chunks, query)
}

//! Offline keyword matcher
//!
//! Scores each entry by the query terms it shares with the entry's name,
//! language, frameworks and description. Highest score wins, earlier entries
//! win ties, and a zero score selects nothing. Useful when no inference
//! service is reachable (local runs, the CLI, tests).

use super::InferenceMatcher;
use crate::catalog::TemplateCatalogEntry;
use crate::error::MatcherError;
use crate::selection::{InferenceContext, TemplateSelection};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9]+").expect("valid token regex"));

/// Words too common to say anything about a template
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "app", "application", "build", "create", "for", "i", "in", "make", "me",
    "my", "of", "on", "please", "the", "to", "want", "with",
];

const NAME_WEIGHT: u32 = 3;
const LANGUAGE_WEIGHT: u32 = 2;
const FRAMEWORK_WEIGHT: u32 = 2;
const DESCRIPTION_WEIGHT: u32 = 1;

/// Token-overlap matcher
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordMatcher;

impl KeywordMatcher {
    /// Create matcher
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Score one entry against the query terms
    #[must_use]
    pub fn score(terms: &BTreeSet<String>, entry: &TemplateCatalogEntry) -> u32 {
        let name = tokens(&entry.name);
        let language = entry.language.as_deref().map(tokens).unwrap_or_default();
        let frameworks: BTreeSet<String> =
            entry.frameworks.iter().flat_map(|f| tokens(f)).collect();
        let description = entry.description.as_deref().map(tokens).unwrap_or_default();

        terms
            .iter()
            .map(|term| {
                let mut score = 0;
                if name.contains(term) {
                    score += NAME_WEIGHT;
                }
                if language.contains(term) {
                    score += LANGUAGE_WEIGHT;
                }
                if frameworks.contains(term) {
                    score += FRAMEWORK_WEIGHT;
                }
                if description.contains(term) {
                    score += DESCRIPTION_WEIGHT;
                }
                score
            })
            .sum()
    }
}

/// Lowercased alphanumeric tokens minus stopwords
fn tokens(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl InferenceMatcher for KeywordMatcher {
    async fn select_template(
        &self,
        _context: &InferenceContext,
        query: &str,
        catalog: &[TemplateCatalogEntry],
    ) -> Result<TemplateSelection, MatcherError> {
        let terms = tokens(query);

        let mut best: Option<(&TemplateCatalogEntry, u32)> = None;
        for entry in catalog {
            let score = Self::score(&terms, entry);
            if score > 0 && best.map_or(true, |(_, top)| score > top) {
                best = Some((entry, score));
            }
        }

        Ok(match best {
            Some((entry, score)) => TemplateSelection::named(&entry.name)
                .with_reasoning(format!("keyword score {score} for '{}'", entry.name)),
            None => TemplateSelection::none()
                .with_reasoning("no catalog entry shares terms with the query"),
        })
    }
}

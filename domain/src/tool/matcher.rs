//! Alternative tool matching for misspelled or hallucinated tool names.
//!
//! Only consulted on the not-found path. Scoring for an unmatched name `u`
//! against each catalogue entry:
//!
//! | Signal | Points |
//! |--------|-------:|
//! | keyword contains `u`, or `u` contains keyword | +20 each |
//! | tool name contains `u`, or contains `u`'s first `_` segment | +30 |
//!
//! Entries with a positive score are ranked descending (ties keep
//! catalogue order) and the top three are returned.

use super::entities::{ToolCatalog, ToolDescriptor};
use crate::permission::tier::TierSet;
use serde::{Deserialize, Serialize};

const KEYWORD_SCORE: u32 = 20;
const NAME_SCORE: u32 = 30;
const MAX_SUGGESTIONS: usize = 3;

/// A ranked guess at the tool the agent meant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeSuggestion {
    pub tool_name: String,
    pub description: String,
    pub confidence_score: u32,
    pub required_tiers: TierSet,
}

/// Keyword-similarity search over the tool catalogue.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlternativeToolMatcher;

impl AlternativeToolMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Score a single catalogue entry against an unmatched (lower-cased) name.
    pub fn score(&self, unmatched: &str, tool: &ToolDescriptor) -> u32 {
        let keyword_score: u32 = tool
            .keywords
            .iter()
            .map(|k| k.to_lowercase())
            .filter(|k| k.contains(unmatched) || unmatched.contains(k.as_str()))
            .map(|_| KEYWORD_SCORE)
            .sum();

        let name = tool.name.to_lowercase();
        let first_segment = unmatched.split('_').next().unwrap_or_default();
        let name_matches =
            name.contains(unmatched) || (!first_segment.is_empty() && name.contains(first_segment));

        keyword_score + if name_matches { NAME_SCORE } else { 0 }
    }

    /// Top suggestions for `unmatched`, or empty when nothing overlaps.
    pub fn find_alternatives(&self, unmatched: &str, catalog: &ToolCatalog) -> Vec<AlternativeSuggestion> {
        let unmatched = unmatched.trim().to_lowercase();
        if unmatched.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(u32, &ToolDescriptor)> = catalog
            .all()
            .map(|tool| (self.score(&unmatched, tool), tool))
            .filter(|(score, _)| *score > 0)
            .collect();

        // Stable sort keeps catalogue order among equal scores
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(score, tool)| AlternativeSuggestion {
                tool_name: tool.name.clone(),
                description: tool.description.clone(),
                confidence_score: score,
                required_tiers: tool.required_tiers.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::catalogue::{CREATE_TASK, START_TIMER, STOP_TIMER};

    fn suggest(name: &str) -> Vec<AlternativeSuggestion> {
        AlternativeToolMatcher::new().find_alternatives(name, &ToolCatalog::standard())
    }

    #[test]
    fn test_misspelled_create_task_ranks_first() {
        let suggestions = suggest("creat_tsk");
        assert!(!suggestions.is_empty());
        assert_eq!(suggestions[0].tool_name, CREATE_TASK);
    }

    #[test]
    fn test_no_overlap_returns_empty() {
        assert!(suggest("xyz").is_empty());
        assert!(suggest("   ").is_empty());
    }

    #[test]
    fn test_keyword_and_name_scores_add_up() {
        let catalog = ToolCatalog::standard();
        let matcher = AlternativeToolMatcher::new();
        let start = catalog.get(START_TIMER).unwrap();
        // "timer" keyword (+20) and name contains "timer" (+30)
        assert_eq!(matcher.score("timer", start), 50);
    }

    #[test]
    fn test_at_most_three_results_sorted_descending() {
        let suggestions = suggest("task");
        assert!(suggestions.len() <= 3);
        for pair in suggestions.windows(2) {
            assert!(pair[0].confidence_score >= pair[1].confidence_score);
        }
    }

    #[test]
    fn test_first_segment_matches_name() {
        let suggestions = suggest("stop_clock");
        assert_eq!(suggestions[0].tool_name, STOP_TIMER);
        assert!(!suggestions[0].required_tiers.is_empty());
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(suggest("CREATE_TODO")[0].tool_name, CREATE_TASK);
    }
}

// src/studio/scorer.rs — Deterministic heuristic scoring of test outputs
//
// Three dimensions, summed and clamped to 0..=100:
//   clarity    enough words and more than one sentence, no filler/error words
//   relevance  keyword overlap between the rough idea and the output
//   length     word count inside the ideal or acceptable band

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Weights and thresholds of the heuristic. Tunable from `[scoring]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub clarity_weight: u32,
    pub clarity_min_words: usize,
    pub clarity_min_sentences: usize,
    pub clean_weight: u32,
    pub filler_words: Vec<String>,

    pub strong_relevance_weight: u32,
    pub partial_relevance_weight: u32,
    /// Share of idea keywords that must appear for the strong bonus.
    pub strong_relevance_ratio: f64,

    pub length_weight: u32,
    pub partial_length_weight: u32,
    pub ideal_min_words: usize,
    pub ideal_max_words: usize,
    pub acceptable_min_words: usize,
    pub acceptable_max_words: usize,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            clarity_weight: 30,
            clarity_min_words: 11,
            clarity_min_sentences: 2,
            clean_weight: 10,
            filler_words: vec!["lorem".into(), "ipsum".into(), "error".into()],
            strong_relevance_weight: 30,
            partial_relevance_weight: 20,
            strong_relevance_ratio: 0.5,
            length_weight: 20,
            partial_length_weight: 10,
            ideal_min_words: 50,
            ideal_max_words: 500,
            acceptable_min_words: 20,
            acceptable_max_words: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub clarity: u32,
    pub relevance: u32,
    pub length: u32,
    pub total: u8,
}

impl ScoringPolicy {
    pub fn score(&self, output: &str, rough_idea: &str) -> u8 {
        self.breakdown(output, rough_idea).total
    }

    pub fn breakdown(&self, output: &str, rough_idea: &str) -> ScoreBreakdown {
        let word_count = output.split_whitespace().count();
        let output_keywords = keywords(output);

        let clarity = self.clarity(output, word_count, &output_keywords);
        let relevance = self.relevance(&keywords(rough_idea), &output_keywords);
        let length = self.length(word_count);

        let total = (clarity + relevance + length).min(100) as u8;
        ScoreBreakdown {
            clarity,
            relevance,
            length,
            total,
        }
    }

    fn clarity(&self, output: &str, word_count: usize, output_keywords: &HashSet<String>) -> u32 {
        let mut points = 0;
        let sentences = output.chars().filter(|c| matches!(c, '.' | '!' | '?')).count();
        if word_count >= self.clarity_min_words && sentences >= self.clarity_min_sentences {
            points += self.clarity_weight;
        }
        let has_filler = self
            .filler_words
            .iter()
            .any(|w| output_keywords.contains(&w.to_lowercase()));
        if !has_filler {
            points += self.clean_weight;
        }
        points
    }

    fn relevance(&self, idea: &HashSet<String>, output: &HashSet<String>) -> u32 {
        let common = idea.intersection(output).count();
        let ratio = common as f64 / idea.len().max(1) as f64;
        if ratio > self.strong_relevance_ratio {
            self.strong_relevance_weight
        } else if common > 0 {
            self.partial_relevance_weight
        } else {
            0
        }
    }

    fn length(&self, word_count: usize) -> u32 {
        if (self.ideal_min_words..=self.ideal_max_words).contains(&word_count) {
            self.length_weight
        } else if (self.acceptable_min_words..=self.acceptable_max_words).contains(&word_count) {
            self.partial_length_weight
        } else {
            0
        }
    }
}

/// Lowercased word tokens (letters, digits, underscore).
fn keywords(text: &str) -> HashSet<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

//! Text statistics tool.
//!
//! Computes basic counts plus a few derived characteristics over free text.
//! The report wording is for humans (and the model); the computed fields are
//! the contract.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use super::Tool;

/// Punctuation stripped from word boundaries for length and frequency stats.
const WORD_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

/// Analyze free text and report statistics about it.
pub struct TextAnalyzer;

#[async_trait]
impl Tool for TextAnalyzer {
    fn name(&self) -> &str {
        "text_analyzer"
    }

    fn description(&self) -> &str {
        "Use this tool to analyze text content. It reports character, word, line, and sentence counts, average word length, reading complexity, text density, and the most frequently used words. Input is the text to analyze as a string."
    }

    async fn invoke(&self, input: &str) -> String {
        if input.trim().is_empty() {
            return "Error: No text provided for analysis".to_string();
        }
        analyze(input)
    }
}

fn sentence_splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("valid sentence pattern"))
}

fn analyze(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let word_count = words.len();
    let char_count = text.chars().count();
    let char_count_no_spaces = text.chars().filter(|c| *c != ' ').count();
    let line_count = text.split('\n').count();

    let sentence_count = sentence_splitter()
        .split(text)
        .filter(|fragment| !fragment.trim().is_empty())
        .count();

    let avg_word_length = if words.is_empty() {
        0.0
    } else {
        let total: usize = words
            .iter()
            .map(|w| w.trim_end_matches(WORD_PUNCTUATION).chars().count())
            .sum();
        total as f64 / word_count as f64
    };

    let reading_level = if avg_word_length < 5.0 {
        "Simple"
    } else if avg_word_length < 7.0 {
        "Moderate"
    } else {
        "Complex"
    };

    let density = if (word_count as f64 / line_count as f64) < 10.0 {
        "Concise"
    } else {
        "Dense"
    };

    let top_words = top_words(&words);

    let mut report = format!(
        "Text Analysis Results:\n\
         \n\
         Basic Statistics:\n\
         - Characters: {} (including spaces), {} (excluding spaces)\n\
         - Words: {}\n\
         - Lines: {}\n\
         - Sentences: {}\n\
         - Average word length: {:.1} characters\n\
         \n\
         Text Characteristics:\n\
         - Reading level: {}\n\
         - Text density: {}",
        char_count,
        char_count_no_spaces,
        word_count,
        line_count,
        sentence_count,
        avg_word_length,
        reading_level,
        density
    );

    if !top_words.is_empty() {
        let listing: Vec<String> = top_words
            .iter()
            .map(|(word, count)| format!("{} ({})", word, count))
            .collect();
        report.push_str(&format!("\n\nMost frequent words: {}", listing.join(", ")));
    }

    report
}

/// Top 3 most frequent words longer than two characters, case-folded and
/// punctuation-stripped. Ties keep first-encountered order: counts live in a
/// vector in encounter order and the sort is stable.
fn top_words(words: &[&str]) -> Vec<(String, usize)> {
    let mut frequencies: Vec<(String, usize)> = Vec::new();

    for word in words {
        let clean = word.trim_matches(WORD_PUNCTUATION).to_lowercase();
        if clean.chars().count() > 2 {
            match frequencies.iter_mut().find(|(w, _)| *w == clean) {
                Some((_, count)) => *count += 1,
                None => frequencies.push((clean, 1)),
            }
        }
    }

    frequencies.sort_by(|a, b| b.1.cmp(&a.1));
    frequencies.truncate(3);
    frequencies
}

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").unwrap();
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]+").unwrap();
}

/// Document metrics derived from raw text only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub words: usize,
    pub characters: usize,
    pub sentences: usize,
    /// Distinct words as a rounded percentage of all words.
    pub vocabulary_ratio: u32,
    pub reading_minutes: usize,
}

impl Statistics {
    pub fn compute(text: &str) -> Self {
        Self::compute_with_wpm(text, DEFAULT_WORDS_PER_MINUTE)
    }

    pub fn compute_with_wpm(text: &str, words_per_minute: usize) -> Self {
        let words = word_count(text);
        Self {
            words,
            characters: char_count(text),
            sentences: sentence_count(text),
            vocabulary_ratio: vocabulary_ratio(text),
            reading_minutes: reading_minutes(words, words_per_minute),
        }
    }

    pub fn reading_time_label(&self) -> String {
        format!("{} min", self.reading_minutes)
    }
}

pub fn word_count(text: &str) -> usize {
    WORD.find_iter(text).count()
}

pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

pub fn sentence_count(text: &str) -> usize {
    SENTENCE_END
        .split(text)
        .filter(|sentence| !sentence.trim().is_empty())
        .count()
}

pub fn vocabulary_ratio(text: &str) -> u32 {
    let mut total = 0usize;
    let mut distinct = HashSet::new();
    for word in WORD.find_iter(text) {
        total += 1;
        distinct.insert(word.as_str().to_lowercase());
    }

    if total == 0 {
        return 0;
    }
    (distinct.len() as f64 * 100.0 / total as f64).round() as u32
}

/// Minutes to read `words` words, rounded up. Zero words take zero minutes.
pub fn reading_minutes(words: usize, words_per_minute: usize) -> usize {
    words.div_ceil(words_per_minute.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_text() {
        let stats = Statistics::compute("Hello world. Foo bar baz!");
        assert_eq!(stats.words, 5);
        assert_eq!(stats.sentences, 2);
        assert_eq!(stats.characters, 25);
        assert_eq!(stats.vocabulary_ratio, 100);
        assert_eq!(stats.reading_minutes, 1);
        assert_eq!(stats.reading_time_label(), "1 min");
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(Statistics::compute(""), Statistics::default());

        let stats = Statistics::compute("  \n\t ");
        assert_eq!(stats.words, 0);
        assert_eq!(stats.characters, 5);
        assert_eq!(stats.sentences, 0);
        assert_eq!(stats.vocabulary_ratio, 0);
        assert_eq!(stats.reading_minutes, 0);
    }

    #[test]
    fn test_sentence_count_ignores_empty_segments() {
        assert_eq!(sentence_count("...Wait!?! Really... yes."), 3);
        assert_eq!(sentence_count("No terminator"), 1);
        assert_eq!(sentence_count("!!! ... ???"), 0);
    }

    #[test]
    fn test_vocabulary_ratio_case_folds() {
        // the, cat, saw, dog: 4 distinct of 6
        assert_eq!(vocabulary_ratio("The cat saw the dog. THE"), 67);
    }

    #[test]
    fn test_word_count_splits_on_punctuation() {
        assert_eq!(word_count("don't stop-believing"), 4);
        assert_eq!(word_count("naïve café"), 2);
    }

    #[test]
    fn test_reading_minutes_rounds_up() {
        assert_eq!(reading_minutes(0, 200), 0);
        assert_eq!(reading_minutes(1, 200), 1);
        assert_eq!(reading_minutes(200, 200), 1);
        assert_eq!(reading_minutes(201, 200), 2);
        assert_eq!(reading_minutes(90, 0), 90);
    }

    #[test]
    fn test_custom_words_per_minute() {
        let text = "one two three four five six";
        assert_eq!(Statistics::compute_with_wpm(text, 4).reading_minutes, 2);
    }
}

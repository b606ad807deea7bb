//! Reading-time estimation over a post's content blocks.

use crate::post::ContentBlock;
use crate::richtext::to_plain_text;

/// Fixed reading rate used for the minutes label.
pub const WORDS_PER_MINUTE: usize = 200;

/// Estimate reading time in whole minutes, rounded up.
///
/// Words are whitespace-delimited tokens of each block's plain text;
/// punctuation is not stripped. A post with no words at all reports 0.
/// Deterministic and cheap, so it is computed per render, never cached.
#[must_use]
pub fn estimate_minutes(blocks: &[ContentBlock]) -> u32 {
    let words: usize = blocks
        .iter()
        .map(|block| to_plain_text(&block.body).split_whitespace().count())
        .sum();

    u32::try_from(words.div_ceil(WORDS_PER_MINUTE)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::{Span, SpanKind};

    fn block(text: &str) -> ContentBlock {
        ContentBlock {
            heading: Some("H".to_string()),
            body: vec![Span {
                kind: SpanKind::Paragraph,
                text: Some(text.to_string()),
                markers: Vec::new(),
            }],
        }
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_no_blocks_is_zero() {
        assert_eq!(estimate_minutes(&[]), 0);
    }

    #[test]
    fn test_single_word_is_one_minute() {
        assert_eq!(estimate_minutes(&[block("hello")]), 1);
    }

    #[test]
    fn test_rounds_up() {
        assert_eq!(estimate_minutes(&[block(&words(200))]), 1);
        assert_eq!(estimate_minutes(&[block(&words(201))]), 2);
        assert_eq!(estimate_minutes(&[block(&words(400))]), 2);
    }

    #[test]
    fn test_accumulates_across_blocks() {
        let blocks = vec![block(&words(150)), block(&words(150))];
        assert_eq!(estimate_minutes(&blocks), 2);
    }

    #[test]
    fn test_monotonic_in_word_count() {
        let mut previous = 0;
        for n in [0, 1, 50, 199, 200, 201, 999, 1000] {
            let minutes = estimate_minutes(&[block(&words(n))]);
            assert!(minutes >= previous);
            previous = minutes;
        }
    }

    #[test]
    fn test_whitespace_runs_count_once() {
        assert_eq!(estimate_minutes(&[block("one   two \t three\n")]), 1);
    }

    #[test]
    fn test_blocks_with_no_words_are_zero() {
        assert_eq!(estimate_minutes(&[block("   ")]), 0);
    }
}

//! Estimated reading time for post content

use serde::Serialize;
use std::fmt;

use super::rich_text::as_text;
use super::RichTextBlock;

/// Average reading speed
pub const WORDS_PER_MINUTE: usize = 200;

/// Estimated reading time in whole minutes, always at least one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ReadingTime {
    minutes: usize,
}

impl ReadingTime {
    pub fn minutes(&self) -> usize {
        self.minutes
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.minutes)
    }
}

/// Total words across all blocks: heading words plus body plain-text words
pub fn count_words(content: &[RichTextBlock]) -> usize {
    content
        .iter()
        .map(|block| {
            block.heading.split_whitespace().count()
                + as_text(&block.body).split_whitespace().count()
        })
        .sum()
}

/// Estimate reading time as `round(words / 200) + 1` minutes.
///
/// Halves round up, so 500 words read as 4 minutes.
pub fn estimate(content: &[RichTextBlock]) -> ReadingTime {
    let words = count_words(content);
    let rounded = (words + WORDS_PER_MINUTE / 2) / WORDS_PER_MINUTE;
    ReadingTime {
        minutes: rounded + 1,
    }
}

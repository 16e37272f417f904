//! Greedy word wrap

use heapless::{String, Vec};

use crate::text::MAX_TEXT_LEN;

/// Upper bound on wrapped lines: every line holds at least one word, and
/// words are separated by at least one byte of whitespace.
pub const MAX_LINES: usize = MAX_TEXT_LEN / 2 + 1;

/// Result of [`wrap`]
///
/// Words are stored once, joined by single spaces; each line is a span of
/// that buffer, so a line is always a contiguous run of input words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedText {
    words: String<MAX_TEXT_LEN>,
    spans: Vec<(u16, u16), MAX_LINES>,
}

impl WrappedText {
    const fn empty() -> Self {
        Self {
            words: String::new(),
            spans: Vec::new(),
        }
    }

    /// Number of wrapped lines
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Wrapped lines in order
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.spans
            .iter()
            .map(move |&(start, end)| &self.words[start as usize..end as usize])
    }

    /// Line `index`, if present
    pub fn line(&self, index: usize) -> Option<&str> {
        self.spans
            .get(index)
            .map(|&(start, end)| &self.words[start as usize..end as usize])
    }

    /// All words re-joined by single spaces
    pub fn words(&self) -> &str {
        &self.words
    }

    /// Append `word`, either to the open line or as a new line.
    /// Returns false once the buffer is full.
    fn push_word(&mut self, word: &str, new_line: bool) -> bool {
        let separator = usize::from(!self.words.is_empty());
        if self.words.len() + separator + word.len() > MAX_TEXT_LEN {
            return false;
        }
        if separator == 1 {
            let _ = self.words.push(' ');
        }
        let start = self.words.len() as u16;
        let _ = self.words.push_str(word);
        let end = self.words.len() as u16;

        match self.spans.last_mut() {
            Some(span) if !new_line => span.1 = end,
            _ => {
                if self.spans.push((start, end)).is_err() {
                    return false;
                }
            }
        }
        true
    }
}

/// Greedy word wrap by character count
///
/// A word joins the current line while `line + 1 + word <= max_chars`,
/// otherwise it starts a new line. Words are never split, so a word longer
/// than `max_chars` sits alone on its own (overlong) line. Whitespace runs
/// collapse to one separator and empty lines are never produced.
///
/// Input beyond [`MAX_TEXT_LEN`] bytes is dropped at a word boundary.
pub fn wrap(text: &str, max_chars: usize) -> WrappedText {
    let mut wrapped = WrappedText::empty();
    let mut line_chars = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        let fits = !wrapped.is_empty() && line_chars + word_chars + 1 <= max_chars;

        if !wrapped.push_word(word, !fits) {
            break;
        }
        line_chars = if fits {
            line_chars + word_chars + 1
        } else {
            word_chars
        };
    }

    wrapped
}

//! Punctuation-based sentence segmentation.
//!
//! A sentence ends after each run of `.`, `?` or `!`; the run stays attached
//! to the sentence it closes. Whitespace inside a sentence is collapsed to a
//! single space. Abbreviations ("e.g.") and decimals ("2.5") split too; that
//! heuristic is accepted rather than worked around.

use std::sync::LazyLock;

use regex::{Matches, Regex};

use policyscan_shared::Sentence;

static TERMINATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Split `text` into sentences in input order.
pub fn segment(text: &str) -> Vec<Sentence> {
    sentences(text).collect()
}

/// Lazily iterate the sentences of `text`.
pub fn sentences(text: &str) -> Sentences<'_> {
    Sentences {
        text,
        terminators: TERMINATOR_RE.find_iter(text),
        start: 0,
        next_index: 0,
        finished: false,
    }
}

/// Iterator returned by [`sentences`].
pub struct Sentences<'a> {
    text: &'a str,
    terminators: Matches<'static, 'a>,
    start: usize,
    next_index: usize,
    finished: bool,
}

impl Sentences<'_> {
    /// Turn `text[start..end]` into a sentence, or `None` if nothing but
    /// whitespace and punctuation is left.
    fn build(&mut self, start: usize, end: usize) -> Option<Sentence> {
        let raw = &self.text[start..end];
        let leading = raw.len() - raw.trim_start().len();
        let trimmed = raw.trim();

        if trimmed.trim_end_matches(TERMINATORS).trim().is_empty() {
            return None;
        }

        let sentence = Sentence {
            index: self.next_index,
            offset: start + leading,
            text: WHITESPACE_RE.replace_all(trimmed, " ").into_owned(),
        };
        self.next_index += 1;
        Some(sentence)
    }
}

impl Iterator for Sentences<'_> {
    type Item = Sentence;

    fn next(&mut self) -> Option<Sentence> {
        while !self.finished {
            let end = match self.terminators.next() {
                Some(m) => m.end(),
                None => {
                    self.finished = true;
                    self.text.len()
                }
            };
            let start = std::mem::replace(&mut self.start, end);

            if let Some(sentence) = self.build(start, end) {
                return Some(sentence);
            }
        }
        None
    }
}

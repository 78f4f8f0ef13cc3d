// File: src/core/tokenizer.rs
use std::borrow::Cow;

const APOSTROPHE: char = '\'';
const LEFT_SINGLE_QUOTE: char = '\u{2018}';
const RIGHT_SINGLE_QUOTE: char = '\u{2019}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// A word candidate for dictionary lookup.
    Token,
    /// Anything else, passed through untouched.
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    pub text: &'a str,
}

impl<'a> Segment<'a> {
    fn token(text: &'a str) -> Self {
        Self { kind: SegmentKind::Token, text }
    }

    fn literal(text: &'a str) -> Self {
        Self { kind: SegmentKind::Literal, text }
    }
}

/// Rewrites curly single quotes as ASCII apostrophes so contractions and
/// possessives tokenize the same regardless of typography.
pub fn normalize_quotes(text: &str) -> Cow<'_, str> {
    if text.contains([LEFT_SINGLE_QUOTE, RIGHT_SINGLE_QUOTE]) {
        Cow::Owned(text.replace([LEFT_SINGLE_QUOTE, RIGHT_SINGLE_QUOTE], "'"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Letters, digits and underscore. The apostrophe is handled separately: it
/// may sit inside a token but never starts or ends one.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_token_char(c: char) -> bool {
    is_word_char(c) || c == APOSTROPHE
}

/// Splits `text` into alternating literal and token segments. Concatenating
/// every segment's text reproduces the input exactly.
///
/// A token is a maximal run of word characters and apostrophes with its
/// leading and trailing apostrophes removed; a run made only of apostrophes
/// is literal. Quote normalization is the caller's job.
pub fn segments(text: &str) -> Segments<'_> {
    Segments { text, pos: 0, pending: None }
}

/// One-shot iterator over the segments of a string.
#[derive(Debug)]
pub struct Segments<'a> {
    text: &'a str,
    pos: usize,
    /// Byte span of the next token, once it has been located.
    pending: Option<(usize, usize)>,
}

impl<'a> Segments<'a> {
    /// Finds the first token starting at or after byte offset `from`.
    fn find_token(&self, from: usize) -> Option<(usize, usize)> {
        let mut chars = self.text[from..].char_indices().map(|(i, c)| (i + from, c)).peekable();
        loop {
            // skip to the start of the next run
            let (run_start, _) = loop {
                let (i, c) = chars.next()?;
                if is_token_char(c) {
                    break (i, c);
                }
            };
            let mut run_end = self.text.len();
            while let Some(&(i, c)) = chars.peek() {
                if !is_token_char(c) {
                    run_end = i;
                    break;
                }
                chars.next();
            }

            let run = &self.text[run_start..run_end];
            let trimmed_start = run.trim_start_matches(APOSTROPHE);
            let core = trimmed_start.trim_end_matches(APOSTROPHE);
            if !core.is_empty() {
                let start = run_start + (run.len() - trimmed_start.len());
                return Some((start, start + core.len()));
            }
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.text.len() {
            return None;
        }

        let next_token = match self.pending.take() {
            Some(span) => Some(span),
            None => self.find_token(self.pos),
        };

        match next_token {
            Some((start, end)) if start == self.pos => {
                self.pos = end;
                Some(Segment::token(&self.text[start..end]))
            }
            Some((start, end)) => {
                let literal = &self.text[self.pos..start];
                self.pending = Some((start, end));
                self.pos = start;
                Some(Segment::literal(literal))
            }
            None => {
                let literal = &self.text[self.pos..];
                self.pos = self.text.len();
                Some(Segment::literal(literal))
            }
        }
    }
}

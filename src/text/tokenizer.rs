//! Sentence and word tokenization.
//!
//! Words are Unicode word segments (UAX #29). Hyphenated compounds are
//! re-joined into one token. When markup handling is on, LaTeX control
//! words and their bookkeeping arguments are tagged as
//! [`TokenKind::Markup`] so they never take part in a candidate. `%`
//! comments are dropped only from text that contains a control word;
//! elsewhere `%` is ordinary punctuation, as in "50% of speakers".

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Word,
    Number,
    Punctuation,
    Markup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// text as it appears in the document
    pub surface: String,
    /// lowercased surface
    pub folded: String,
    pub kind: TokenKind,
    /// sentence index within the document
    pub sentence: usize,
    /// index of this token within its sentence, punctuation included
    pub position: usize,
}

impl Token {
    #[inline]
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// Word or number, i.e. something that can be part of a term
    #[inline]
    pub fn is_term(&self) -> bool {
        matches!(self.kind, TokenKind::Word | TokenKind::Number)
    }

    /// Starts with an uppercase letter
    pub fn is_capitalized(&self) -> bool {
        self.surface.chars().next().is_some_and(char::is_uppercase)
    }

    /// All letters uppercase and more than one char, e.g. `NLP`
    pub fn is_acronym(&self) -> bool {
        self.surface.chars().count() > 1
            && self.surface.chars().any(char::is_alphabetic)
            && self
                .surface
                .chars()
                .filter(|c| c.is_alphabetic())
                .all(char::is_uppercase)
    }
}

/// Control words whose `{...}` argument is bookkeeping rather than prose.
const MARKUP_ARG_COMMANDS: &[&str] = &[
    "begin", "end", "label", "ref", "eqref", "cite", "citet", "citep", "citealt", "citeauthor",
    "citeyear", "usepackage", "documentclass", "input", "include", "includegraphics", "bibliography",
    "bibliographystyle", "newcommand", "renewcommand", "url", "href", "pageref", "todo",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tokenizer {
    /// recognize LaTeX markup
    pub markup: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self { markup: true }
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text mode: backslashes and percent signs are ordinary punctuation
    pub fn plain() -> Self {
        Self { markup: false }
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let stripped;
        let text = if self.markup && has_control_word(text) {
            stripped = strip_latex_comments(text);
            stripped.as_str()
        } else {
            text
        };

        let segments: Vec<&str> = text.split_word_bounds().collect();
        let mut builder = SentenceBuilder::default();
        let mut control_word = false;
        // depth of a bookkeeping argument, 0 when outside
        let mut markup_arg_depth = 0usize;
        let mut pending_markup_arg = false;
        let mut newline_run = 0usize;

        let mut i = 0;
        while i < segments.len() {
            let seg = segments[i];
            i += 1;

            if seg.chars().all(char::is_whitespace) {
                newline_run += seg.matches('\n').count();
                if newline_run >= 2 {
                    builder.break_sentence();
                }
                continue;
            }
            newline_run = 0;

            if is_wordlike(seg) {
                // re-join hyphenated compounds: word - word without spaces
                let mut surface = seg.to_string();
                while i + 1 < segments.len()
                    && segments[i] == "-"
                    && is_wordlike(segments[i + 1])
                    && !control_word
                {
                    surface.push('-');
                    surface.push_str(segments[i + 1]);
                    i += 2;
                }

                let kind = if control_word || markup_arg_depth > 0 {
                    TokenKind::Markup
                } else if surface.chars().any(char::is_alphabetic) {
                    TokenKind::Word
                } else {
                    TokenKind::Number
                };
                if control_word {
                    pending_markup_arg = MARKUP_ARG_COMMANDS.contains(&surface.as_str());
                }
                control_word = false;
                builder.push(surface, kind);
                continue;
            }

            // punctuation and symbols
            if self.markup && seg == "\\" {
                control_word = true;
                builder.push(seg.to_string(), TokenKind::Punctuation);
                continue;
            }
            control_word = false;
            if self.markup {
                match seg {
                    "{" if pending_markup_arg || markup_arg_depth > 0 => markup_arg_depth += 1,
                    "}" if markup_arg_depth > 0 => markup_arg_depth -= 1,
                    _ => {}
                }
                if seg != "{" && seg != "[" {
                    pending_markup_arg = false;
                }
            }
            builder.push(seg.to_string(), TokenKind::Punctuation);
            if is_sentence_terminal(seg) && markup_arg_depth == 0 {
                builder.break_sentence();
            }
        }
        builder.finish()
    }
}

#[derive(Default)]
struct SentenceBuilder {
    tokens: Vec<Token>,
    sentence: usize,
    position: usize,
}

impl SentenceBuilder {
    fn push(&mut self, surface: String, kind: TokenKind) {
        let folded = surface.to_lowercase();
        self.tokens.push(Token {
            surface,
            folded,
            kind,
            sentence: self.sentence,
            position: self.position,
        });
        self.position += 1;
    }

    /// Sentences with no tokens are never emitted
    fn break_sentence(&mut self) {
        if self.position > 0 {
            self.sentence += 1;
            self.position = 0;
        }
    }

    fn finish(self) -> Vec<Token> {
        self.tokens
    }
}

#[inline]
fn is_wordlike(seg: &str) -> bool {
    seg.chars().next().is_some_and(char::is_alphanumeric)
}

#[inline]
fn is_sentence_terminal(seg: &str) -> bool {
    !seg.is_empty() && seg.chars().all(|c| matches!(c, '.' | '!' | '?' | '…'))
}

/// At least one `\name`, i.e. the text is LaTeX source
fn has_control_word(text: &str) -> bool {
    text.as_bytes()
        .windows(2)
        .any(|w| w[0] == b'\\' && w[1].is_ascii_alphabetic())
}

/// Drop everything from an unescaped `%` to the end of its line
fn strip_latex_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let mut prev_backslash = false;
        let mut cut = None;
        for (idx, c) in line.char_indices() {
            if c == '%' && !prev_backslash {
                cut = Some(idx);
                break;
            }
            prev_backslash = c == '\\' && !prev_backslash;
        }
        match cut {
            Some(idx) => {
                out.push_str(&line[..idx]);
                if line.ends_with('\n') {
                    out.push('\n');
                }
            }
            None => out.push_str(line),
        }
    }
    out
}

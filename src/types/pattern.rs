use std::fmt;

use crate::parse::{self, Token};

/// A glob pattern compiled into tokens, ready for repeated matching.
///
/// `*` matches any run of characters (including none and including `/`),
/// and `?` matches exactly one character. Everything else, `\` included, is
/// literal. Matching is case-sensitive and anchored at both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    source: String,
    tokens: Vec<Token>,
}

impl CompiledPattern {
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        Self {
            source: pattern.to_owned(),
            tokens: parse::parse(pattern),
        }
    }

    /// The pattern text this matcher was compiled from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `text` matches the whole pattern.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let tokens = &self.tokens;
        let mut ti = 0;
        let mut pos = 0;
        // Resume point after the most recent `*`: (next token, text offset it absorbed up to).
        let mut star: Option<(usize, usize)> = None;

        loop {
            if let Some(token) = tokens.get(ti) {
                let rest = &text[pos..];
                match token {
                    Token::AnyRun => {
                        ti += 1;
                        star = Some((ti, pos));
                        continue;
                    }
                    Token::Literal(lit) if rest.starts_with(lit.as_str()) => {
                        ti += 1;
                        pos += lit.len();
                        continue;
                    }
                    Token::AnyChar => {
                        if let Some(c) = rest.chars().next() {
                            ti += 1;
                            pos += c.len_utf8();
                            continue;
                        }
                    }
                    Token::Literal(_) => {}
                }
            } else if pos == text.len() {
                return true;
            }

            // Mismatch: let the last star swallow one more character and retry.
            let Some((resume, absorbed)) = star else {
                return false;
            };
            let Some(c) = text[absorbed..].chars().next() else {
                return false;
            };
            let absorbed = absorbed + c.len_utf8();
            star = Some((resume, absorbed));
            ti = resume;
            pos = absorbed;
        }
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

//! Shell-style wildcard matching over whole strings.
//!
//! Supports `*` (any run, including empty), `?` (exactly one character), and
//! bracket expressions (`[abc]`, `[a-z]`, `[!0-9]`). `/` has no special
//! meaning since citation text is not a path. Matching is case-sensitive and
//! anchored at both ends.
//!
//! Malformed brackets never fail to compile: an unterminated `[` is a
//! literal, and a reversed range such as `[z-a]` contributes nothing.

use std::fmt;

/// A compiled wildcard pattern
#[derive(Clone, PartialEq, Eq)]
pub struct Glob {
    source: String,
    tokens: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyChar,
    AnyRun,
    Class { negated: bool, items: Vec<ClassItem> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClassItem {
    Char(char),
    Range(char, char),
}

impl Glob {
    /// Compile a pattern. Every input is a valid pattern.
    pub fn new(pattern: &str) -> Self {
        Self {
            source: pattern.to_string(),
            tokens: tokenize(pattern),
        }
    }

    /// The pattern text this glob was compiled from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the whole of `text` matches this pattern
    pub fn matches(&self, text: &str) -> bool {
        let t: Vec<char> = text.chars().collect();
        let p = &self.tokens;

        let (mut pi, mut ti) = (0usize, 0usize);
        let (mut star_pi, mut star_ti) = (None::<usize>, 0usize);

        while ti < t.len() {
            if pi < p.len() && p[pi] != Token::AnyRun && p[pi].matches(t[ti]) {
                pi += 1;
                ti += 1;
                continue;
            }

            if pi < p.len() && p[pi] == Token::AnyRun {
                star_pi = Some(pi);
                star_ti = ti;
                pi += 1;
                continue;
            }

            if let Some(sp) = star_pi {
                pi = sp + 1;
                star_ti += 1;
                ti = star_ti;
                continue;
            }

            return false;
        }

        while pi < p.len() && p[pi] == Token::AnyRun {
            pi += 1;
        }

        pi == p.len()
    }
}

impl fmt::Debug for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Glob").field(&self.source).finish()
    }
}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Token {
    fn matches(&self, c: char) -> bool {
        match self {
            Self::Literal(l) => *l == c,
            Self::AnyChar => true,
            Self::AnyRun => true,
            Self::Class { negated, items } => items.iter().any(|i| i.contains(c)) != *negated,
        }
    }
}

impl ClassItem {
    fn contains(&self, c: char) -> bool {
        match *self {
            Self::Char(x) => x == c,
            Self::Range(lo, hi) => lo <= c && c <= hi,
        }
    }
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let p: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::with_capacity(p.len());
    let mut i = 0;

    while i < p.len() {
        match p[i] {
            '*' => {
                // Consecutive stars are equivalent to one
                if tokens.last() != Some(&Token::AnyRun) {
                    tokens.push(Token::AnyRun);
                }
                i += 1;
            }
            '?' => {
                tokens.push(Token::AnyChar);
                i += 1;
            }
            '[' => match parse_class(&p, i) {
                Some((token, next)) => {
                    tokens.push(token);
                    i = next;
                }
                None => {
                    tokens.push(Token::Literal('['));
                    i += 1;
                }
            },
            c => {
                tokens.push(Token::Literal(c));
                i += 1;
            }
        }
    }

    tokens
}

/// Parse a bracket expression starting at `p[start] == '['`.
///
/// Returns the token and the index just past the closing `]`, or `None` if
/// the bracket is unterminated.
fn parse_class(p: &[char], start: usize) -> Option<(Token, usize)> {
    let mut j = start + 1;
    if j < p.len() && p[j] == '!' {
        j += 1;
    }
    if j < p.len() && p[j] == ']' {
        j += 1;
    }
    while j < p.len() && p[j] != ']' {
        j += 1;
    }
    if j >= p.len() {
        return None;
    }

    let mut body = &p[start + 1..j];
    let negated = body.first() == Some(&'!');
    if negated {
        body = &body[1..];
    }

    let mut items = Vec::new();
    let mut k = 0;
    while k < body.len() {
        if k + 2 < body.len() && body[k + 1] == '-' {
            let (lo, hi) = (body[k], body[k + 2]);
            if lo <= hi {
                items.push(ClassItem::Range(lo, hi));
            }
            k += 3;
        } else {
            items.push(ClassItem::Char(body[k]));
            k += 1;
        }
    }

    Some((Token::Class { negated, items }, j + 1))
}

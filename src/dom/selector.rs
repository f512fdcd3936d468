//! A small CSS selector subset.
//!
//! Supported: type (`p`), id (`#lightbox`), class (`.nav-link`), attribute
//! presence (`[data-lang]`), compounds of those (`a.nav-link[href]`), the
//! descendant combinator (whitespace) and selector groups (`,`).

use std::fmt;
use std::iter::Peekable;
use std::str::{Chars, FromStr};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("empty name after '{marker}' in selector '{selector}'")]
    EmptyName { marker: char, selector: String },

    #[error("unclosed '[' in selector '{0}'")]
    UnclosedBracket(String),

    #[error("unexpected character '{found}' in selector '{selector}'")]
    Unexpected { found: char, selector: String },
}

/// One compound selector: every part must match the same element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<String>,
}

/// A parsed selector: a list of alternatives, each a descendant chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Vec<Compound>>,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let mut alternatives = Vec::new();

        for group in source.split(',') {
            let chain = group
                .split_whitespace()
                .map(|token| parse_compound(token, source))
                .collect::<Result<Vec<_>, _>>()?;
            if chain.is_empty() {
                return Err(SelectorError::Empty);
            }
            alternatives.push(chain);
        }

        Ok(Self {
            source: source.trim().to_string(),
            alternatives,
        })
    }

    /// Descendant chains, one per comma-separated alternative.
    pub fn alternatives(&self) -> &[Vec<Compound>] {
        &self.alternatives
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn take_name(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if !is_name_char(c) {
            break;
        }
        name.push(c);
        chars.next();
    }
    name
}

fn parse_compound(token: &str, selector: &str) -> Result<Compound, SelectorError> {
    let mut compound = Compound::default();
    let mut chars = token.chars().peekable();

    let tag = take_name(&mut chars);
    if !tag.is_empty() {
        compound.tag = Some(tag.to_ascii_lowercase());
    }

    while let Some(marker) = chars.next() {
        match marker {
            '#' | '.' => {
                let name = take_name(&mut chars);
                if name.is_empty() {
                    return Err(SelectorError::EmptyName {
                        marker,
                        selector: selector.to_string(),
                    });
                }
                if marker == '#' {
                    compound.id = Some(name);
                } else {
                    compound.classes.push(name);
                }
            }
            '[' => {
                let name = take_name(&mut chars);
                if chars.next() != Some(']') {
                    return Err(SelectorError::UnclosedBracket(selector.to_string()));
                }
                if name.is_empty() {
                    return Err(SelectorError::EmptyName {
                        marker,
                        selector: selector.to_string(),
                    });
                }
                compound.attributes.push(name);
            }
            found => {
                return Err(SelectorError::Unexpected {
                    found,
                    selector: selector.to_string(),
                })
            }
        }
    }

    Ok(compound)
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

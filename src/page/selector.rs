//! Selector parsing and matching
//!
//! Supported grammar (enough for the page behaviors and the stylesheet):
//!
//! ```text
//! list     := complex ( "," complex )*
//! complex  := compound ( whitespace compound )*        descendant combinator
//! compound := ( "*" | tag )? ( "#" ident | "." ident | ":focus" )*
//! ```

use super::document::{Document, ElementId};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected `{found}` at byte {at} in selector `{selector}`")]
    Unexpected {
        selector: String,
        found: char,
        at: usize,
    },
    #[error("unsupported pseudo-class `:{0}`")]
    UnsupportedPseudo(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    focus: bool,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && !self.focus
    }

    fn matches(&self, doc: &Document, el: ElementId) -> bool {
        let Some(element) = doc.get(el) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if element.tag() != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| element.class_list().contains(c)) {
            return false;
        }
        !self.focus || doc.focused() == Some(el)
    }
}

/// Compounds joined by descendant combinators, rightmost last
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    parts: Vec<Compound>,
}

impl Complex {
    fn matches(&self, doc: &Document, el: ElementId) -> bool {
        let Some((last, ancestors)) = self.parts.split_last() else {
            return false;
        };
        if !last.matches(doc, el) {
            return false;
        }
        let mut remaining = ancestors.iter().rev().peekable();
        let mut cursor = doc.parent(el);
        while let Some(wanted) = remaining.peek() {
            match cursor {
                Some(ancestor) => {
                    if wanted.matches(doc, ancestor) {
                        remaining.next();
                    }
                    cursor = doc.parent(ancestor);
                }
                None => return false,
            }
        }
        true
    }
}

/// A parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let mut alternatives = Vec::new();
        let mut offset = 0;
        for chunk in source.split(',') {
            alternatives.push(parse_complex(source, chunk, offset)?);
            offset += chunk.len() + 1;
        }
        Ok(Self {
            source: source.trim().to_string(),
            alternatives,
        })
    }

    pub fn matches(&self, doc: &Document, el: ElementId) -> bool {
        self.alternatives.iter().any(|c| c.matches(doc, el))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_complex(full: &str, chunk: &str, base: usize) -> Result<Complex, SelectorError> {
    let mut parts = Vec::new();
    let mut current = Compound::default();
    let mut chars = chunk.char_indices().peekable();

    let take_ident = |chars: &mut std::iter::Peekable<std::str::CharIndices>| {
        let mut ident = String::new();
        while let Some(&(_, c)) = chars.peek() {
            if !is_ident_char(c) {
                break;
            }
            ident.push(c);
            chars.next();
        }
        ident
    };
    let unexpected = |found: char, at: usize| SelectorError::Unexpected {
        selector: full.to_string(),
        found,
        at: base + at,
    };

    while let Some(&(at, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            '*' => {
                chars.next();
                if !current.is_empty() {
                    return Err(unexpected(c, at));
                }
                // universal selector contributes no constraint
            }
            '#' | '.' | ':' => {
                chars.next();
                let ident = take_ident(&mut chars);
                if ident.is_empty() {
                    return Err(unexpected(c, at));
                }
                match c {
                    '#' => current.id = Some(ident),
                    '.' => current.classes.push(ident),
                    _ if ident == "focus" => current.focus = true,
                    _ => return Err(SelectorError::UnsupportedPseudo(ident)),
                }
            }
            c if is_ident_char(c) => {
                if !current.is_empty() {
                    return Err(unexpected(c, at));
                }
                current.tag = Some(take_ident(&mut chars).to_ascii_lowercase());
            }
            other => return Err(unexpected(other, at)),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    if parts.is_empty() {
        // a lone `*` still selects everything
        if chunk.trim() == "*" {
            parts.push(Compound::default());
        } else {
            return Err(SelectorError::Empty);
        }
    }
    Ok(Complex { parts })
}

use std::fmt;
use std::str::FromStr;

use super::element::Element;
use crate::error::{Error, Result};

/// Parsed element selector.
///
/// Supports the subset the toolkit needs: an optional `body >` / `head >`
/// child scope, then one compound of `tag`/`*`, `#id`, `.class` and
/// `:not(...)` parts. Descendant combinators and other pseudo-classes are
/// rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub(crate) scope: Option<Scope>,
    pub(crate) compound: Compound,
}

/// Restricts matching to direct children of one document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Body,
    Head,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Compound {
    pub(crate) tag: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) not: Vec<Compound>,
}

impl Selector {
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::SelectorParse("empty selector".to_string()));
        }

        let (scope, rest) = match text.split_once('>') {
            Some((left, right)) => {
                let scope = match left.trim() {
                    "body" => Scope::Body,
                    "head" => Scope::Head,
                    other => {
                        return Err(Error::SelectorParse(format!(
                            "unsupported scope '{other}', expected 'body' or 'head'"
                        )))
                    }
                };
                let rest = right.trim();
                if rest.contains('>') {
                    return Err(Error::SelectorParse(
                        "only a single child combinator is supported".to_string(),
                    ));
                }
                (Some(scope), rest)
            }
            None => (None, text),
        };

        let compound = Compound::parse(rest, true)?;
        Ok(Self { scope, compound })
    }

    /// Structural match against one element. Scope is positional and is
    /// checked by the document query functions, not here.
    pub fn matches(&self, element: &Element) -> bool {
        self.compound.matches(element)
    }
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            Some(Scope::Body) => write!(f, "body > ")?,
            Some(Scope::Head) => write!(f, "head > ")?,
            None => {}
        }
        write!(f, "{}", self.compound)
    }
}

impl Compound {
    fn parse(s: &str, allow_not: bool) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::SelectorParse("empty selector part".to_string()));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(Error::SelectorParse(format!(
                "descendant combinators are not supported: '{s}'"
            )));
        }

        let mut compound = Compound::default();
        let mut pos = 0;

        if s[pos..].starts_with('*') {
            pos += 1;
        } else if s[pos..].starts_with(is_ident_char) {
            compound.tag = Some(take_ident(s, &mut pos));
        }

        while pos < s.len() {
            let rest = &s[pos..];
            if rest.starts_with('#') {
                pos += 1;
                let id = take_ident(s, &mut pos);
                if id.is_empty() {
                    return Err(Error::SelectorParse(format!("missing id after '#' in '{s}'")));
                }
                compound.id = Some(id);
            } else if rest.starts_with('.') {
                pos += 1;
                let class = take_ident(s, &mut pos);
                if class.is_empty() {
                    return Err(Error::SelectorParse(format!(
                        "missing class after '.' in '{s}'"
                    )));
                }
                compound.classes.push(class);
            } else if rest.starts_with(":not(") {
                if !allow_not {
                    return Err(Error::SelectorParse(
                        "nested :not() is not supported".to_string(),
                    ));
                }
                let inner_start = pos + ":not(".len();
                let close = s[inner_start..].find(')').ok_or_else(|| {
                    Error::SelectorParse(format!("unclosed :not() in '{s}'"))
                })?;
                let inner = &s[inner_start..inner_start + close];
                compound.not.push(Compound::parse(inner, false)?);
                pos = inner_start + close + 1;
            } else if rest.starts_with(':') {
                return Err(Error::SelectorParse(format!(
                    "unsupported pseudo-class in '{s}'"
                )));
            } else {
                let ch = rest.chars().next().unwrap_or('?');
                return Err(Error::SelectorParse(format!(
                    "unexpected character '{ch}' in '{s}'"
                )));
            }
        }

        Ok(compound)
    }

    pub(crate) fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if element.tag != *tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| element.has_class(c)) {
            return false;
        }
        self.not.iter().all(|n| !n.matches(element))
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "{tag}")?,
            None if self.id.is_none() && self.classes.is_empty() && self.not.is_empty() => {
                write!(f, "*")?
            }
            None => {}
        }
        if let Some(id) = &self.id {
            write!(f, "#{id}")?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        for not in &self.not {
            write!(f, ":not({not})")?;
        }
        Ok(())
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

fn take_ident(s: &str, pos: &mut usize) -> String {
    let rest = &s[*pos..];
    let end = rest
        .char_indices()
        .find(|(_, ch)| !is_ident_char(*ch))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    let ident = rest[..end].to_string();
    *pos += end;
    ident
}

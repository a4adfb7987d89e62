//! CSS selector matching
//!
//! Supports the subset the widget's markup contract needs:
//! - type (`div`), universal (`*`), id (`#panel-1`) and class (`.ts-nav-item`)
//! - attribute presence and equality (`[ts-target]`, `[ts-target='panel-1']`)
//! - compound selectors (`.ts-content-item.active`)
//! - descendant (` `) and child (`>`) combinators

use std::iter::Peekable;
use std::str::Chars;

use crate::error::DomError;
use crate::node::{NodeId, Tree};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeMatch {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    compounds: Vec<Compound>,
    /// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        Parser::new(input).parse()
    }

    pub(crate) fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        self.matches_at(tree, node, self.compounds.len() - 1)
    }

    fn matches_at(&self, tree: &Tree, node: NodeId, index: usize) -> bool {
        if !self.compounds[index].matches(tree, node) {
            return false;
        }
        if index == 0 {
            return true;
        }

        let parent = tree.get(node).and_then(|n| n.parent);
        match self.combinators[index - 1] {
            Combinator::Child => parent.is_some_and(|p| self.matches_at(tree, p, index - 1)),
            Combinator::Descendant => {
                let mut current = parent;
                while let Some(ancestor) = current {
                    if self.matches_at(tree, ancestor, index - 1) {
                        return true;
                    }
                    current = tree.get(ancestor).and_then(|n| n.parent);
                }
                false
            }
        }
    }
}

impl std::str::FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self> {
        Selector::parse(s)
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl Compound {
    fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        let Some(node) = tree.get(node) else {
            return false;
        };
        let Some(tag) = node.tag() else {
            return false;
        };

        if self.tag.as_deref().is_some_and(|t| t != tag) {
            return false;
        }
        if let Some(id) = &self.id {
            if node.attributes.get("id") != Some(id) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| node.has_class(c)) {
            return false;
        }
        self.attributes.iter().all(|attr| {
            match (node.attributes.get(&attr.name), &attr.value) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            }
        })
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Peekable<Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.trim().chars().peekable(),
        }
    }

    fn error(&self, reason: impl Into<String>) -> DomError {
        DomError::InvalidSelector {
            selector: self.source.to_string(),
            reason: reason.into(),
        }
    }

    fn parse(mut self) -> Result<Selector> {
        let mut compounds = Vec::new();
        let mut combinators = Vec::new();
        let mut pending: Option<Combinator> = None;

        loop {
            self.skip_whitespace();
            match self.chars.peek().copied() {
                None => break,
                Some('>') => {
                    self.chars.next();
                    if compounds.is_empty() || pending.is_some() {
                        return Err(self.error("unexpected '>'"));
                    }
                    pending = Some(Combinator::Child);
                }
                Some(_) => {
                    if !compounds.is_empty() {
                        combinators.push(pending.take().unwrap_or(Combinator::Descendant));
                    }
                    compounds.push(self.compound()?);
                }
            }
        }

        if pending.is_some() {
            return Err(self.error("selector ends with a combinator"));
        }
        if compounds.is_empty() {
            return Err(self.error("empty selector"));
        }

        Ok(Selector {
            source: self.source.trim().to_string(),
            compounds,
            combinators,
        })
    }

    fn compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::default();
        let mut matched_any = false;

        match self.chars.peek().copied() {
            Some('*') => {
                self.chars.next();
                matched_any = true;
            }
            Some(c) if is_ident_char(c) => {
                compound.tag = Some(self.ident()?.to_lowercase());
                matched_any = true;
            }
            _ => {}
        }

        loop {
            match self.chars.peek().copied() {
                Some('#') => {
                    self.chars.next();
                    compound.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.chars.next();
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.chars.next();
                    compound.attributes.push(self.attribute()?);
                }
                None | Some('>') => break,
                Some(c) if c.is_whitespace() => break,
                Some(c) => return Err(self.error(format!("unexpected character '{}'", c))),
            }
            matched_any = true;
        }

        if !matched_any {
            return Err(self.error("expected a simple selector"));
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<AttributeMatch> {
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();

        let value = if self.chars.peek() == Some(&'=') {
            self.chars.next();
            self.skip_whitespace();
            let value = match self.chars.peek().copied() {
                Some(quote @ ('\'' | '"')) => {
                    self.chars.next();
                    self.quoted(quote)?
                }
                _ => self.ident()?,
            };
            self.skip_whitespace();
            Some(value)
        } else {
            None
        };

        match self.chars.next() {
            Some(']') => Ok(AttributeMatch { name, value }),
            _ => Err(self.error("unterminated attribute selector")),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String> {
        let mut value = String::new();
        for c in self.chars.by_ref() {
            if c == quote {
                return Ok(value);
            }
            value.push(c);
        }
        Err(self.error("unterminated string"))
    }

    fn ident(&mut self) -> Result<String> {
        let mut ident = String::new();
        while let Some(c) = self.chars.peek().copied() {
            if !is_ident_char(c) {
                break;
            }
            ident.push(c);
            self.chars.next();
        }
        if ident.is_empty() {
            return Err(self.error("expected an identifier"));
        }
        Ok(ident)
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compound() {
        let selector = Selector::parse(".ts-nav-item[ts-target='panel-1']").unwrap();
        assert_eq!(selector.compounds.len(), 1);
        let compound = &selector.compounds[0];
        assert_eq!(compound.classes, vec!["ts-nav-item"]);
        assert_eq!(
            compound.attributes,
            vec![AttributeMatch {
                name: "ts-target".to_string(),
                value: Some("panel-1".to_string()),
            }]
        );
    }

    #[test]
    fn test_parse_combinators() {
        let selector = Selector::parse("#toolslide > .ts-container  div.active").unwrap();
        assert_eq!(selector.compounds.len(), 3);
        assert_eq!(
            selector.combinators,
            vec![Combinator::Child, Combinator::Descendant]
        );
        assert_eq!(selector.compounds[2].tag.as_deref(), Some("div"));
        assert_eq!(selector.to_string(), "#toolslide > .ts-container  div.active");
    }

    #[test]
    fn test_invalid_selectors() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("> .a").is_err());
        assert!(Selector::parse(".a >").is_err());
        assert!(Selector::parse(".").is_err());
        assert!(Selector::parse("[ts-target='x'").is_err());
        assert!(Selector::parse("div!").is_err());
    }
}

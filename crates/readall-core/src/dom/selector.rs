//! Minimal CSS selector engine for the in-memory document.
//!
//! Supported: type and universal selectors, `#id`, `.class`, attribute
//! selectors (`[a]`, `=`, `*=`, `^=`, `$=`, `~=`), compound selectors, the
//! descendant and child combinators, and selector lists.

use readall_protocols::{DomError, NodeId};

use super::memory::MemoryTree;

/// Parsed selector list (`a, b, c`).
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    selectors: Vec<ComplexSelector>,
}

#[derive(Debug, Clone, PartialEq)]
struct ComplexSelector {
    /// Compounds left to right; the combinator links a compound to the one before it.
    parts: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
}

#[derive(Debug, Clone, PartialEq)]
struct AttrSelector {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, PartialEq)]
enum AttrOp {
    Exists,
    Equals(String),
    Contains(String),
    Prefix(String),
    Suffix(String),
    Word(String),
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self, DomError> {
        let mut parser = Parser {
            src: input,
            chars: input.char_indices().peekable(),
        };
        let selectors = parser.selector_list()?;
        Ok(Self { selectors })
    }

    /// Whether `node` matches any selector in the list.
    pub fn matches(&self, tree: &MemoryTree, node: NodeId) -> bool {
        self.selectors.iter().any(|s| s.matches(tree, node))
    }
}

impl ComplexSelector {
    fn matches(&self, tree: &MemoryTree, node: NodeId) -> bool {
        self.matches_at(tree, self.parts.len() - 1, node)
    }

    fn matches_at(&self, tree: &MemoryTree, idx: usize, node: NodeId) -> bool {
        let (combinator, compound) = &self.parts[idx];
        if !compound.matches(tree, node) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match combinator {
            Combinator::Child => tree
                .parent_of(node)
                .is_some_and(|p| self.matches_at(tree, idx - 1, p)),
            Combinator::Descendant => {
                let mut current = tree.parent_of(node);
                while let Some(ancestor) = current {
                    if self.matches_at(tree, idx - 1, ancestor) {
                        return true;
                    }
                    current = tree.parent_of(ancestor);
                }
                false
            }
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.ids.is_empty() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches(&self, tree: &MemoryTree, node: NodeId) -> bool {
        let Some(tag) = tree.tag_of(node) else {
            return false;
        };
        if let Some(expected) = &self.tag {
            if expected != "*" && expected != tag {
                return false;
            }
        }
        if !self
            .ids
            .iter()
            .all(|id| tree.attr_of(node, "id") == Some(id.as_str()))
        {
            return false;
        }
        if !self.classes.is_empty() {
            let class_attr = tree.attr_of(node, "class").unwrap_or("");
            let classes: Vec<&str> = class_attr.split_whitespace().collect();
            if !self.classes.iter().all(|c| classes.contains(&c.as_str())) {
                return false;
            }
        }
        self.attrs.iter().all(|a| a.matches(tree.attr_of(node, &a.name)))
    }
}

impl AttrSelector {
    fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match &self.op {
            AttrOp::Exists => true,
            AttrOp::Equals(v) => value == v,
            AttrOp::Contains(v) => !v.is_empty() && value.contains(v.as_str()),
            AttrOp::Prefix(v) => !v.is_empty() && value.starts_with(v.as_str()),
            AttrOp::Suffix(v) => !v.is_empty() && value.ends_with(v.as_str()),
            AttrOp::Word(v) => value.split_whitespace().any(|w| w == v),
        }
    }
}

struct Parser<'a> {
    src: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Parser<'_> {
    fn error(&self, reason: &str) -> DomError {
        DomError::InvalidSelector(format!("{} ({})", self.src, reason))
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
            skipped = true;
        }
        skipped
    }

    fn selector_list(&mut self) -> Result<Vec<ComplexSelector>, DomError> {
        let mut list = Vec::new();
        loop {
            self.skip_whitespace();
            list.push(self.complex()?);
            match self.bump() {
                None => return Ok(list),
                Some(',') => continue,
                Some(c) => return Err(self.error(&format!("unexpected '{c}'"))),
            }
        }
    }

    fn complex(&mut self) -> Result<ComplexSelector, DomError> {
        let mut parts = Vec::new();
        let mut combinator = Combinator::Descendant;
        loop {
            let compound = self.compound()?;
            if compound.is_empty() {
                return Err(self.error("expected a selector"));
            }
            parts.push((combinator, compound));

            let had_space = self.skip_whitespace();
            match self.peek() {
                None | Some(',') => return Ok(ComplexSelector { parts }),
                Some('>') => {
                    self.bump();
                    self.skip_whitespace();
                    combinator = Combinator::Child;
                }
                Some(_) if had_space => combinator = Combinator::Descendant,
                Some(c) => return Err(self.error(&format!("unexpected '{c}'"))),
            }
        }
    }

    fn compound(&mut self) -> Result<Compound, DomError> {
        let mut compound = Compound::default();
        match self.peek() {
            Some('*') => {
                self.bump();
                compound.tag = Some("*".to_string());
            }
            Some(c) if is_ident_char(c) => {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
            }
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    compound.ids.push(self.ident()?);
                }
                Some('.') => {
                    self.bump();
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.bump();
                    compound.attrs.push(self.attribute()?);
                }
                _ => return Ok(compound),
            }
        }
    }

    fn attribute(&mut self) -> Result<AttrSelector, DomError> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();
        let op = match self.bump() {
            Some(']') => return Ok(AttrSelector { name, op: AttrOp::Exists }),
            Some('=') => AttrOp::Equals(String::new()),
            Some(c @ ('*' | '^' | '$' | '~')) => {
                if self.bump() != Some('=') {
                    return Err(self.error("expected '=' in attribute selector"));
                }
                match c {
                    '*' => AttrOp::Contains(String::new()),
                    '^' => AttrOp::Prefix(String::new()),
                    '$' => AttrOp::Suffix(String::new()),
                    _ => AttrOp::Word(String::new()),
                }
            }
            _ => return Err(self.error("malformed attribute selector")),
        };
        self.skip_whitespace();
        let value = self.value()?;
        self.skip_whitespace();
        if self.bump() != Some(']') {
            return Err(self.error("unterminated attribute selector"));
        }
        let op = match op {
            AttrOp::Equals(_) => AttrOp::Equals(value),
            AttrOp::Contains(_) => AttrOp::Contains(value),
            AttrOp::Prefix(_) => AttrOp::Prefix(value),
            AttrOp::Suffix(_) => AttrOp::Suffix(value),
            AttrOp::Word(_) => AttrOp::Word(value),
            AttrOp::Exists => AttrOp::Exists,
        };
        Ok(AttrSelector { name, op })
    }

    fn value(&mut self) -> Result<String, DomError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some(c) if c == quote => return Ok(value),
                        Some('\\') => match self.bump() {
                            Some(c) => value.push(c),
                            None => return Err(self.error("unterminated string")),
                        },
                        Some(c) => value.push(c),
                        None => return Err(self.error("unterminated string")),
                    }
                }
            }
            _ => self.ident(),
        }
    }

    fn ident(&mut self) -> Result<String, DomError> {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if !is_ident_char(c) {
                break;
            }
            ident.push(c);
            self.bump();
        }
        if ident.is_empty() {
            return Err(self.error("expected an identifier"));
        }
        Ok(ident)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;

//! Simplified selector grammar: tag, `#id`, `.class`, the universal `*`,
//! compounds thereof, and descendant (whitespace) combinators.
//!
//! This is the whole `matches` capability the repair engine relies on; anything
//! outside the grammar fails to parse rather than silently mis-matching.

use crate::types::{NodeId, Tree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    text: String,
    // Left to right; the last compound is the subject.
    parts: Vec<Compound>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    universal: bool,
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    // input: "header .logo-text", "ul.ingredients-list-paste", "#recipe-name", "*"
    pub fn parse(input: &str) -> Option<Self> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        let parts = text
            .split_whitespace()
            .map(parse_compound)
            .collect::<Option<Vec<_>>>()?;
        if parts.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            parts,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// A bare `*` with no other constraints and no combinator.
    pub fn is_universal(&self) -> bool {
        matches!(
            self.parts.as_slice(),
            [Compound {
                universal: true,
                tag: None,
                id: None,
                classes,
            }] if classes.is_empty()
        )
    }

    pub fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        let Some((subject, ancestors)) = self.parts.split_last() else {
            return false;
        };
        if !compound_matches(tree, node, subject) {
            return false;
        }
        // Descendant combinators: scan upward, consuming parts right to left.
        let mut current = tree.parent(node);
        for part in ancestors.iter().rev() {
            loop {
                let Some(candidate) = current else {
                    return false;
                };
                current = tree.parent(candidate);
                if compound_matches(tree, candidate, part) {
                    break;
                }
            }
        }
        true
    }
}

fn compound_matches(tree: &Tree, node: NodeId, part: &Compound) -> bool {
    let Some(name) = tree.name(node) else {
        // Document node matches nothing, not even `*`.
        return false;
    };
    if let Some(tag) = &part.tag {
        if !name.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(want) = &part.id {
        if tree.attr(node, "id") != Some(want.as_str()) {
            return false;
        }
    }
    part.classes
        .iter()
        .all(|class| tree.has_class_token(node, class))
}

// input: "ul.ingredients-list-paste", "h3.instructions.shadow", "*", "#recipe-name"
fn parse_compound(input: &str) -> Option<Compound> {
    let mut part = Compound::default();
    let mut rest = input;
    if let Some(after) = rest.strip_prefix('*') {
        part.universal = true;
        rest = after;
    } else if !rest.starts_with(['.', '#']) {
        let end = rest
            .find(['.', '#'])
            .unwrap_or(rest.len());
        let tag = &rest[..end];
        if !is_name(tag) {
            return None;
        }
        part.tag = Some(tag.to_ascii_lowercase());
        rest = &rest[end..];
    }
    while !rest.is_empty() {
        let marker = rest.as_bytes()[0];
        let body = &rest[1..];
        let end = body.find(['.', '#']).unwrap_or(body.len());
        let name = &body[..end];
        if !is_name(name) {
            return None;
        }
        match marker {
            b'.' => part.classes.push(name.to_string()),
            b'#' => {
                if part.id.is_some() {
                    return None;
                }
                part.id = Some(name.to_string());
            }
            _ => return None,
        }
        rest = &body[end..];
    }
    if !part.universal && part.tag.is_none() && part.id.is_none() && part.classes.is_empty() {
        return None;
    }
    Some(part)
}

fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

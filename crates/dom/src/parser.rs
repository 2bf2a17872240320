//! Simplified markup parser with a constrained, practical tag-name character set.
//!
//! Supported tag/attribute-name characters (ASCII only): `[A-Za-z0-9:_-]`.
//!
//! This is not an HTML5 state machine and does not try to be: the repair engine
//! treats element content as an opaque serialized string, so the parser's only
//! jobs are the element structure, the attribute lists, and recording each
//! element's raw inner markup. Parsing is lenient and never fails; malformed
//! constructs are skipped.
//!
//! Known limitations (intentional):
//! - No entity decoding; content is kept verbatim.
//! - An end tag with no matching open element is dropped.
//! - No implied end tags: successive `<li>` without close tags nest.
//! - Elements popped implicitly by an ancestor's end tag take their content up
//!   to that closing tag.

use crate::types::{NodeId, Tree};
use memchr::memchr;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b':' || b == b'_' || b == b'-'
}

/// Parses markup into an arena tree, recording each element's `content` as the
/// raw source slice between its start and end tags.
pub fn parse_document(input: &str) -> Tree {
    let bytes = input.as_bytes();
    let mut tree = Tree::new();
    // Open elements with the offset where their inner markup begins.
    let mut open: Vec<(NodeId, usize)> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let Some(rel) = memchr(b'<', &bytes[i..]) else {
            break;
        };
        i += rel;

        if input[i..].starts_with(COMMENT_START) {
            match input[i + COMMENT_START.len()..].find(COMMENT_END) {
                Some(end) => i += COMMENT_START.len() + end + COMMENT_END.len(),
                None => break,
            }
            continue;
        }

        if starts_with_ignore_ascii_case(&input[i..], "<!doctype") {
            let Some(end) = input[i..].find('>') else {
                break;
            };
            let doctype = input[i + "<!doctype".len()..i + end].trim().to_string();
            tree.set_doctype(doctype);
            i += end + 1;
            continue;
        }

        // end tag
        if bytes.get(i + 1) == Some(&b'/') {
            let name_start = i + 2;
            let mut j = name_start;
            while j < bytes.len() && is_name_byte(bytes[j]) {
                j += 1;
            }
            let name = &input[name_start..j];
            while j < bytes.len() && bytes[j] != b'>' {
                j += 1;
            }
            if name.is_empty() || !has_open(&tree, &open, name) {
                // Stray close tag; drop it.
                i = j + 1;
                continue;
            }
            while let Some((id, content_start)) = open.pop() {
                tree.set_content(id, input[content_start..i].to_string());
                let closed = tree
                    .name(id)
                    .is_some_and(|n| n.eq_ignore_ascii_case(name));
                if closed {
                    break;
                }
            }
            i = j + 1;
            continue;
        }

        // start tag
        let name_start = i + 1;
        let mut j = name_start;
        while j < bytes.len() && is_name_byte(bytes[j]) {
            j += 1;
        }
        if j == name_start {
            // Stray '<' in text.
            i += 1;
            continue;
        }
        let name = input[name_start..j].to_ascii_lowercase();
        let (attributes, after, self_closing) = parse_attributes(input, j);
        let parent = open.last().map(|(id, _)| *id).unwrap_or(tree.root());
        let id = tree.add_element(parent, name.clone(), attributes);
        i = after;
        if !self_closing && !is_void_element(&name) {
            open.push((id, i));
        }
    }

    // Unclosed elements run to end of input.
    while let Some((id, content_start)) = open.pop() {
        tree.set_content(id, input[content_start..].to_string());
    }

    log::trace!(
        target: "dom.parser",
        "parsed {} bytes into {} nodes",
        input.len(),
        tree.node_count()
    );
    tree
}

fn has_open(tree: &Tree, open: &[(NodeId, usize)], name: &str) -> bool {
    open.iter()
        .any(|(id, _)| tree.name(*id).is_some_and(|n| n.eq_ignore_ascii_case(name)))
}

fn starts_with_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack.len() >= needle.len()
        && haystack.as_bytes()[..needle.len()].eq_ignore_ascii_case(needle.as_bytes())
}

// input: cursor just past the tag name
// output: (attributes, index past '>', self_closing)
fn parse_attributes(
    input: &str,
    mut i: usize,
) -> (Vec<(String, Option<String>)>, usize, bool) {
    let bytes = input.as_bytes();
    let mut attributes = Vec::new();
    let mut self_closing = false;

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            return (attributes, i, self_closing);
        }
        match bytes[i] {
            b'>' => return (attributes, i + 1, self_closing),
            b'/' => {
                self_closing = true;
                i += 1;
            }
            _ => {
                let name_start = i;
                while i < bytes.len() && is_name_byte(bytes[i]) {
                    i += 1;
                }
                if i == name_start {
                    // Unparsable byte inside the tag; skip it.
                    i += 1;
                    continue;
                }
                let name = input[name_start..i].to_ascii_lowercase();
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                if i < bytes.len() && bytes[i] == b'=' {
                    i += 1;
                    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    let value = if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                        let quote = bytes[i];
                        let start = i + 1;
                        let end = memchr(quote, &bytes[start..])
                            .map(|rel| start + rel)
                            .unwrap_or(bytes.len());
                        i = (end + 1).min(bytes.len());
                        input[start..end].to_string()
                    } else {
                        let start = i;
                        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>'
                        {
                            i += 1;
                        }
                        input[start..i].to_string()
                    };
                    attributes.push((name, Some(value)));
                } else {
                    attributes.push((name, None));
                }
            }
        }
    }
}

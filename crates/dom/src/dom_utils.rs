use crate::selector::Selector;
use crate::types::{NodeId, Tree};

/// First element matching `selector`, pre-order.
pub fn query_selector(tree: &Tree, selector: &Selector) -> Option<NodeId> {
    fn walk(tree: &Tree, node: NodeId, selector: &Selector) -> Option<NodeId> {
        if tree.is_element(node) && selector.matches(tree, node) {
            return Some(node);
        }
        for &child in tree.children(node) {
            if let Some(found) = walk(tree, child, selector) {
                return Some(found);
            }
        }
        None
    }
    walk(tree, tree.root(), selector)
}

/// All elements matching `selector`, pre-order.
pub fn query_selector_all(tree: &Tree, selector: &Selector) -> Vec<NodeId> {
    fn walk(tree: &Tree, node: NodeId, selector: &Selector, out: &mut Vec<NodeId>) {
        if tree.is_element(node) && selector.matches(tree, node) {
            out.push(node);
        }
        for &child in tree.children(node) {
            walk(tree, child, selector, out);
        }
    }
    let mut out = Vec::new();
    walk(tree, tree.root(), selector, &mut out);
    out
}

/// Collect <link rel="stylesheet" href="…"> href values.
pub fn collect_stylesheet_hrefs(tree: &Tree, out: &mut Vec<String>) {
    fn walk(tree: &Tree, node: NodeId, out: &mut Vec<String>) {
        if tree.name(node).is_some_and(|n| n.eq_ignore_ascii_case("link")) {
            let is_stylesheet = tree
                .attr(node, "rel")
                .is_some_and(|rel| {
                    rel.split_whitespace()
                        .any(|t| t.eq_ignore_ascii_case("stylesheet"))
                });
            if is_stylesheet {
                if let Some(href) = tree.attr(node, "href") {
                    let href = href.trim();
                    if !href.is_empty() {
                        out.push(href.to_string());
                    }
                }
            }
        }
        for &child in tree.children(node) {
            walk(tree, child, out);
        }
    }
    walk(tree, tree.root(), out);
}

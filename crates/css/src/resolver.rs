//! Effective style value lookup under the simplified scan rule.
//!
//! This is deliberately not cascade resolution: no specificity, no inheritance
//! beyond the explicit ancestor fallback, no media queries, no pseudo-classes.
//! Rules are scanned in reverse declaration order (last-declared wins) and the
//! same rule list is retried up the ancestor chain until a value is found or
//! the document node is reached.

use crate::syntax::Rule;
use dom::{NodeId, Tree};
use std::collections::BTreeMap;

/// Resolves `property` for `element` against `rules`.
///
/// The scan at each level visits rules last to first:
/// - a matching rule that declares `property` returns its value;
/// - a matching rule that does not declare it is skipped, not a terminator;
/// - a matching bare `*` rule aborts the scan at this level unless the
///   element's parent is the document node, so the universal rule cannot mask
///   more specific rules found on ancestors.
///
/// Empty `property` or empty `rules` resolve to `None` without scanning.
/// The ancestor walk is an explicit loop over parent links.
pub fn resolve(tree: &Tree, element: NodeId, property: &str, rules: &[Rule]) -> Option<String> {
    if property.is_empty() || rules.is_empty() {
        return None;
    }

    let mut current = Some(element);
    while let Some(node) = current {
        if !tree.is_element(node) {
            break;
        }
        'scan: for rule in rules.iter().rev() {
            if !rule.selector.matches(tree, node) {
                continue;
            }
            if rule.selector.is_universal() && !tree.parent_is_document(node) {
                break 'scan;
            }
            if let Some(value) = rule.declared(property) {
                return Some(value.to_string());
            }
        }
        current = tree.parent(node);
    }
    None
}

/// All declarations of the single highest-priority rule matching `element`:
/// the last matching rule in `rules` wins outright. No merging of other
/// matching rules, no ancestor walk. `None` when no rule matches.
///
/// Used to find *which* properties two elements disagree on before resolving
/// each differing key.
pub fn all_declared_properties(
    tree: &Tree,
    element: NodeId,
    rules: &[Rule],
) -> Option<BTreeMap<String, String>> {
    let rule = rules
        .iter()
        .rev()
        .find(|rule| rule.selector.matches(tree, element))?;
    Some(
        rule.declarations
            .iter()
            .map(|d| (d.name.clone(), d.value.clone()))
            .collect(),
    )
}

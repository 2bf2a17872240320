//! Applies one reconciliation target to the live tree.
//!
//! Contract:
//! - The reference tree and both stylesheets are read-only; only the live tree
//!   is mutated, and never re-parented — children are copied in, not moved.
//! - Absence of an expected element and a strict-count mismatch are reported
//!   outcomes, not errors; nothing here aborts a session.
//! - Applying the same target twice is a no-op the second time (all strategies
//!   converge), which keeps re-runs deterministic.

use crate::target::{Change, Outcome, Strategy, Target, TargetReport};
use css::{Stylesheet, all_declared_properties, resolve};
use dom::{NodeId, Selector, Tree, query_selector};

/// Locates the target's region in both trees and applies its strategy.
/// Every outcome is encoded in the returned report.
pub fn apply_target(
    target: &Target,
    live: &mut Tree,
    reference: &Tree,
    live_sheet: &Stylesheet,
    reference_sheet: &Stylesheet,
) -> TargetReport {
    let Some(selector) = Selector::parse(&target.selector) else {
        log::warn!(target: "reconcile", "{}: unsupported selector {:?}", target.name, target.selector);
        return TargetReport::skipped(target, Outcome::SkippedMissing);
    };
    let Some(live_el) = query_selector(live, &selector) else {
        log::warn!(
            target: "reconcile",
            "{}: selector {:?} missing in live tree",
            target.name,
            target.selector
        );
        return TargetReport::skipped(target, Outcome::SkippedMissing);
    };

    // The only strategy that needs no reference counterpart.
    if let Strategy::ClassTokenRemove { class } = &target.strategy {
        let report = class_token_remove(target, live, live_el, class);
        log::debug!(
            target: "reconcile",
            "{}: {:?}, {} change(s)",
            report.target,
            report.outcome,
            report.changes.len()
        );
        return report;
    }

    let Some(reference_el) = query_selector(reference, &selector) else {
        log::warn!(
            target: "reconcile",
            "{}: selector {:?} missing in reference tree",
            target.name,
            target.selector
        );
        return TargetReport::skipped(target, Outcome::SkippedMissing);
    };

    let report = match &target.strategy {
        Strategy::ReplaceContent => replace_content(target, live, live_el, reference, reference_el),
        Strategy::PositionalListMerge => {
            positional_list_merge(target, live, live_el, reference, reference_el)
        }
        Strategy::StrictCountMerge => {
            strict_count_merge(target, live, live_el, reference, reference_el)
        }
        Strategy::ClassTokenCopy => {
            class_token_copy(target, live, live_el, reference, reference_el)
        }
        Strategy::AttributeCopy { attribute } => {
            attribute_copy(target, live, live_el, reference, reference_el, attribute)
        }
        Strategy::ClassTokenRemove { class } => class_token_remove(target, live, live_el, class),
        Strategy::PropertyFix => property_fix(
            target,
            live,
            live_el,
            reference,
            reference_el,
            live_sheet,
            reference_sheet,
        ),
    };
    log::debug!(
        target: "reconcile",
        "{}: {:?}, {} change(s)",
        report.target,
        report.outcome,
        report.changes.len()
    );
    report
}

fn replace_content(
    target: &Target,
    live: &mut Tree,
    live_el: NodeId,
    reference: &Tree,
    reference_el: NodeId,
) -> TargetReport {
    let mut changes = Vec::new();
    let wanted = reference.content(reference_el);
    if live.content(live_el) != wanted {
        live.set_content(live_el, wanted.to_string());
        changes.push(Change::ContentReplaced { index: None });
    }
    TargetReport::applied(target, changes)
}

// Grow-only: the live child list never shrinks; stale trailing live children
// beyond the reference length are left untouched.
fn positional_list_merge(
    target: &Target,
    live: &mut Tree,
    live_container: NodeId,
    reference: &Tree,
    reference_container: NodeId,
) -> TargetReport {
    let mut changes = Vec::new();
    let reference_children: Vec<NodeId> = reference.children(reference_container).to_vec();
    for (i, &reference_child) in reference_children.iter().enumerate() {
        match live.children(live_container).get(i).copied() {
            None => {
                live.copy_subtree(live_container, reference, reference_child);
                changes.push(Change::ChildAppended { index: i });
            }
            Some(live_child) => {
                let wanted = reference.content(reference_child);
                if live.content(live_child) != wanted {
                    live.set_content(live_child, wanted.to_string());
                    changes.push(Change::ContentReplaced { index: Some(i) });
                }
            }
        }
    }
    TargetReport::applied(target, changes)
}

// Used for ordered regions where a partial merge would scramble meaning, such
// as numbered instruction lists.
fn strict_count_merge(
    target: &Target,
    live: &mut Tree,
    live_container: NodeId,
    reference: &Tree,
    reference_container: NodeId,
) -> TargetReport {
    let live_children: Vec<NodeId> = live.children(live_container).to_vec();
    let reference_children: Vec<NodeId> = reference.children(reference_container).to_vec();
    if live_children.len() != reference_children.len() {
        log::warn!(
            target: "reconcile",
            "{}: child count mismatch, live {} vs reference {}",
            target.name,
            live_children.len(),
            reference_children.len()
        );
        return TargetReport::skipped(target, Outcome::SkippedMismatchedCount);
    }
    let mut changes = Vec::new();
    for (i, (&live_child, &reference_child)) in
        live_children.iter().zip(&reference_children).enumerate()
    {
        let wanted = reference.content(reference_child);
        if live.content(live_child) != wanted {
            live.set_content(live_child, wanted.to_string());
            changes.push(Change::ContentReplaced { index: Some(i) });
        }
    }
    TargetReport::applied(target, changes)
}

// Children split into "numeric" (content contains a decimal digit) and
// "non-numeric". The matching reference child is found per predicate, scanned
// independently for each live child — not index-aligned.
fn class_token_copy(
    target: &Target,
    live: &mut Tree,
    live_container: NodeId,
    reference: &Tree,
    reference_container: NodeId,
) -> TargetReport {
    let mut changes = Vec::new();
    let live_children: Vec<NodeId> = live.children(live_container).to_vec();
    let reference_children: Vec<NodeId> = reference.children(reference_container).to_vec();
    for (i, &live_child) in live_children.iter().enumerate() {
        if contains_digit(live.content(live_child)) {
            let matching = reference_children
                .iter()
                .copied()
                .find(|&c| contains_digit(reference.content(c)));
            if let Some(reference_child) = matching {
                let wanted = reference.content(reference_child);
                if live.content(live_child) != wanted {
                    live.set_content(live_child, wanted.to_string());
                    changes.push(Change::ContentReplaced { index: Some(i) });
                }
            }
        } else {
            let matching = reference_children
                .iter()
                .copied()
                .find(|&c| !contains_digit(reference.content(c)));
            if let Some(reference_child) = matching {
                if let Some(&class) = reference.class_tokens(reference_child).first() {
                    if live.add_class_token(live_child, class) {
                        changes.push(Change::ClassAdded {
                            index: i,
                            class: class.to_string(),
                        });
                    }
                }
            }
        }
    }
    TargetReport::applied(target, changes)
}

fn attribute_copy(
    target: &Target,
    live: &mut Tree,
    live_el: NodeId,
    reference: &Tree,
    reference_el: NodeId,
    attribute: &str,
) -> TargetReport {
    let mut changes = Vec::new();
    // An absent or empty reference value is not copied over.
    let wanted = reference.attr(reference_el, attribute).unwrap_or("");
    if !wanted.is_empty() && live.attr(live_el, attribute) != Some(wanted) {
        let wanted = wanted.to_string();
        live.set_attr(live_el, attribute, wanted.clone());
        changes.push(Change::AttributeSet {
            attribute: attribute.to_string(),
            value: wanted,
        });
    }
    TargetReport::applied(target, changes)
}

fn class_token_remove(
    target: &Target,
    live: &mut Tree,
    live_el: NodeId,
    class: &str,
) -> TargetReport {
    let mut changes = Vec::new();
    if live.remove_class_token(live_el, class) {
        changes.push(Change::ClassRemoved {
            class: class.to_string(),
        });
    }
    TargetReport::applied(target, changes)
}

// Only properties the live element's nearest rule declares are considered;
// reference-only properties are not proactively added.
fn property_fix(
    target: &Target,
    live: &mut Tree,
    live_el: NodeId,
    reference: &Tree,
    reference_el: NodeId,
    live_sheet: &Stylesheet,
    reference_sheet: &Stylesheet,
) -> TargetReport {
    let mut changes = Vec::new();
    let Some(live_props) = all_declared_properties(live, live_el, &live_sheet.rules) else {
        return TargetReport::applied(target, changes);
    };
    let reference_props =
        all_declared_properties(reference, reference_el, &reference_sheet.rules).unwrap_or_default();
    for (property, value) in &live_props {
        if reference_props.get(property) == Some(value) {
            continue;
        }
        if let Some(fixed) = resolve(reference, reference_el, property, &reference_sheet.rules) {
            live.set_style_property(live_el, property, &fixed);
            changes.push(Change::PropertySet {
                property: property.clone(),
                value: fixed,
            });
        }
    }
    TargetReport::applied(target, changes)
}

fn contains_digit(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use css::parse_stylesheet;
    use dom::parse_document;

    fn no_sheets() -> (Stylesheet, Stylesheet) {
        (Stylesheet::default(), Stylesheet::default())
    }

    fn target(name: &str, selector: &str, strategy: Strategy) -> Target {
        Target::new(name, selector, strategy)
    }

    #[test]
    fn replace_content_overwrites_verbatim() {
        let mut live = parse_document("<h1 id=\"recipe-name\">Krabby Patty</h1>");
        let reference = parse_document("<h1 id=\"recipe-name\">Tikka Masala</h1>");
        let (ls, rs) = no_sheets();
        let t = target("recipe name", "#recipe-name", Strategy::ReplaceContent);

        let report = apply_target(&t, &mut live, &reference, &ls, &rs);
        assert_eq!(report.outcome, Outcome::Applied);
        assert_eq!(report.changes, vec![Change::ContentReplaced { index: None }]);
        let h1 = dom::query_selector(&live, &Selector::parse("#recipe-name").unwrap()).unwrap();
        assert_eq!(live.content(h1), "Tikka Masala");

        // Second run converges to no changes.
        let report = apply_target(&t, &mut live, &reference, &ls, &rs);
        assert_eq!(report.outcome, Outcome::Applied);
        assert!(report.changes.is_empty());
    }

    #[test]
    fn replace_content_skips_when_either_side_is_missing() {
        let mut live = parse_document("<div></div>");
        let reference = parse_document("<h1 id=\"recipe-name\">Tikka Masala</h1>");
        let (ls, rs) = no_sheets();
        let t = target("recipe name", "#recipe-name", Strategy::ReplaceContent);
        let report = apply_target(&t, &mut live, &reference, &ls, &rs);
        assert_eq!(report.outcome, Outcome::SkippedMissing);

        let mut live = parse_document("<h1 id=\"recipe-name\">x</h1>");
        let reference = parse_document("<div></div>");
        let report = apply_target(&t, &mut live, &reference, &ls, &rs);
        assert_eq!(report.outcome, Outcome::SkippedMissing);
        let h1 = dom::query_selector(&live, &Selector::parse("#recipe-name").unwrap()).unwrap();
        assert_eq!(live.content(h1), "x");
    }

    #[test]
    fn positional_merge_grows_and_overwrites() {
        let mut live = parse_document(
            "<ul class=\"paste\"><li>1 tsp salt</li><li>2 dl water</li></ul>",
        );
        let reference = parse_document(concat!(
            "<ul class=\"paste\">",
            "<li>1 tbsp salt</li>",
            "<li>2 dl water</li>",
            "<li>3 cloves garlic</li>",
            "<li>4 dried chilies</li>",
            "</ul>",
        ));
        let (ls, rs) = no_sheets();
        let t = target("paste list", "ul.paste", Strategy::PositionalListMerge);

        let report = apply_target(&t, &mut live, &reference, &ls, &rs);
        assert_eq!(report.outcome, Outcome::Applied);
        assert_eq!(
            report.changes,
            vec![
                Change::ContentReplaced { index: Some(0) },
                Change::ChildAppended { index: 2 },
                Change::ChildAppended { index: 3 },
            ]
        );

        let ul = dom::query_selector(&live, &Selector::parse("ul.paste").unwrap()).unwrap();
        let kids = live.children(ul).to_vec();
        assert_eq!(kids.len(), 4);
        assert_eq!(live.content(kids[0]), "1 tbsp salt");
        assert_eq!(live.content(kids[1]), "2 dl water");
        assert_eq!(live.content(kids[2]), "3 cloves garlic");
        assert_eq!(live.content(kids[3]), "4 dried chilies");
        assert_eq!(live.parent(kids[3]), Some(ul));
    }

    #[test]
    fn positional_merge_never_trims_trailing_live_children() {
        let mut live = parse_document(
            "<ul class=\"paste\"><li>a</li><li>b</li><li>stale</li></ul>",
        );
        let reference = parse_document("<ul class=\"paste\"><li>a</li><li>b</li></ul>");
        let (ls, rs) = no_sheets();
        let t = target("paste list", "ul.paste", Strategy::PositionalListMerge);

        let report = apply_target(&t, &mut live, &reference, &ls, &rs);
        assert_eq!(report.outcome, Outcome::Applied);
        assert!(report.changes.is_empty());
        let ul = dom::query_selector(&live, &Selector::parse("ul.paste").unwrap()).unwrap();
        assert_eq!(live.children(ul).len(), 3);
        assert_eq!(live.content(live.children(ul)[2]), "stale");
    }

    #[test]
    fn strict_count_merge_skips_on_mismatch_without_touching_live() {
        let mut live = parse_document(
            "<ol class=\"steps\"><li>one</li><li>two</li><li>three</li></ol>",
        );
        let reference = parse_document(
            "<ol class=\"steps\"><li>1</li><li>2</li><li>3</li><li>4</li></ol>",
        );
        let (ls, rs) = no_sheets();
        let t = target("instructions", "ol.steps", Strategy::StrictCountMerge);

        let report = apply_target(&t, &mut live, &reference, &ls, &rs);
        assert_eq!(report.outcome, Outcome::SkippedMismatchedCount);
        assert!(report.changes.is_empty());
        let ol = dom::query_selector(&live, &Selector::parse("ol.steps").unwrap()).unwrap();
        let kids = live.children(ol).to_vec();
        assert_eq!(kids.len(), 3);
        assert_eq!(live.content(kids[0]), "one");
    }

    #[test]
    fn strict_count_merge_overwrites_positionally_when_counts_match() {
        let mut live = parse_document(
            "<ol class=\"steps\"><li>Boil water</li><li>Wrong step</li></ol>",
        );
        let reference = parse_document(
            "<ol class=\"steps\"><li>Boil water</li><li>Add the paste</li></ol>",
        );
        let (ls, rs) = no_sheets();
        let t = target("instructions", "ol.steps", Strategy::StrictCountMerge);

        let report = apply_target(&t, &mut live, &reference, &ls, &rs);
        assert_eq!(report.outcome, Outcome::Applied);
        assert_eq!(report.changes, vec![Change::ContentReplaced { index: Some(1) }]);
        let ol = dom::query_selector(&live, &Selector::parse("ol.steps").unwrap()).unwrap();
        assert_eq!(live.content(live.children(ol)[1]), "Add the paste");
    }

    #[test]
    fn class_token_copy_fixes_icon_class_and_numeric_text() {
        let mut live = parse_document(concat!(
            "<div class=\"time-container\">",
            "<span>Icon</span>",
            "<span>3 min</span>",
            "</div>",
        ));
        let reference = parse_document(concat!(
            "<div class=\"time-container\">",
            "<span class=\"clock-icon large\">Clock</span>",
            "<span>5 min</span>",
            "</div>",
        ));
        let (ls, rs) = no_sheets();
        let t = target("timer", ".time-container", Strategy::ClassTokenCopy);

        let report = apply_target(&t, &mut live, &reference, &ls, &rs);
        assert_eq!(report.outcome, Outcome::Applied);
        assert_eq!(
            report.changes,
            vec![
                Change::ClassAdded {
                    index: 0,
                    class: "clock-icon".to_string()
                },
                Change::ContentReplaced { index: Some(1) },
            ]
        );

        let sel = Selector::parse(".time-container").unwrap();
        let div = dom::query_selector(&live, &sel).unwrap();
        let kids = live.children(div).to_vec();
        // Only the first class token is copied, additively.
        assert_eq!(live.attr(kids[0], "class"), Some("clock-icon"));
        assert_eq!(live.content(kids[0]), "Icon");
        assert_eq!(live.content(kids[1]), "5 min");
    }

    #[test]
    fn class_token_copy_matches_by_predicate_not_index() {
        // Reference order is flipped relative to the live children.
        let mut live = parse_document(
            "<div class=\"t\"><span>Icon</span><span>3 min</span></div>",
        );
        let reference = parse_document(
            "<div class=\"t\"><span>5 min</span><span class=\"clock\">Clock</span></div>",
        );
        let (ls, rs) = no_sheets();
        let t = target("timer", ".t", Strategy::ClassTokenCopy);

        apply_target(&t, &mut live, &reference, &ls, &rs);
        let div = dom::query_selector(&live, &Selector::parse(".t").unwrap()).unwrap();
        let kids = live.children(div).to_vec();
        assert_eq!(live.attr(kids[0], "class"), Some("clock"));
        assert_eq!(live.content(kids[1]), "5 min");
    }

    #[test]
    fn attribute_copy_takes_the_reference_value() {
        let mut live = parse_document(
            "<div class=\"image-container\"><img src=\"placeholder.png\" alt=\"Dish\"></div>",
        );
        let reference = parse_document(
            "<div class=\"image-container\"><img src=\"curry.png\" alt=\"Dish\"></div>",
        );
        let (ls, rs) = no_sheets();
        let t = target(
            "recipe image",
            ".image-container img",
            Strategy::AttributeCopy {
                attribute: "src".to_string(),
            },
        );

        let report = apply_target(&t, &mut live, &reference, &ls, &rs);
        assert_eq!(report.outcome, Outcome::Applied);
        assert_eq!(
            report.changes,
            vec![Change::AttributeSet {
                attribute: "src".to_string(),
                value: "curry.png".to_string()
            }]
        );
        let img = dom::query_selector(&live, &Selector::parse("img").unwrap()).unwrap();
        assert_eq!(live.attr(img, "src"), Some("curry.png"));
        assert_eq!(live.attr(img, "alt"), Some("Dish"));

        let report = apply_target(&t, &mut live, &reference, &ls, &rs);
        assert!(report.changes.is_empty());
    }

    #[test]
    fn attribute_copy_ignores_an_empty_reference_value() {
        let mut live = parse_document("<img src=\"keep.png\">");
        let reference = parse_document("<img src=\"\">");
        let (ls, rs) = no_sheets();
        let t = target(
            "recipe image",
            "img",
            Strategy::AttributeCopy {
                attribute: "src".to_string(),
            },
        );

        let report = apply_target(&t, &mut live, &reference, &ls, &rs);
        assert_eq!(report.outcome, Outcome::Applied);
        assert!(report.changes.is_empty());
        let img = dom::query_selector(&live, &Selector::parse("img").unwrap()).unwrap();
        assert_eq!(live.attr(img, "src"), Some("keep.png"));
    }

    #[test]
    fn class_token_remove_needs_no_reference_counterpart() {
        let mut live =
            parse_document("<h3 class=\"instructions shadow\">Instruksjoner</h3>");
        // The reference never carried the stale token, so its tree has no
        // element matching the selector.
        let reference = parse_document("<h3 class=\"instructions\">Instruksjoner</h3>");
        let (ls, rs) = no_sheets();
        let t = target(
            "instructions shadow",
            "h3.instructions.shadow",
            Strategy::ClassTokenRemove {
                class: "shadow".to_string(),
            },
        );

        let report = apply_target(&t, &mut live, &reference, &ls, &rs);
        assert_eq!(report.outcome, Outcome::Applied);
        assert_eq!(
            report.changes,
            vec![Change::ClassRemoved {
                class: "shadow".to_string()
            }]
        );
        let h3 = dom::query_selector(&live, &Selector::parse("h3").unwrap()).unwrap();
        assert_eq!(live.attr(h3, "class"), Some("instructions"));

        // Once removed, the selector no longer matches anything live.
        let report = apply_target(&t, &mut live, &reference, &ls, &rs);
        assert_eq!(report.outcome, Outcome::SkippedMissing);
    }

    #[test]
    fn property_fix_resolves_differing_properties_from_reference_sheet() {
        let mut live =
            parse_document("<html><body><header><span class=\"logo-text\">Pm</span></header></body></html>");
        let reference =
            parse_document("<html><body><header><span class=\"logo-text\">Pm</span></header></body></html>");
        let live_sheet = parse_stylesheet(
            "wrong.css",
            ".logo-text { color: hotpink; font-size: 40px; }",
        );
        let reference_sheet = parse_stylesheet(
            "index.css",
            "header { color: black; } .logo-text { color: black; font-size: 40px; }",
        );
        let t = target("logo", "header .logo-text", Strategy::PropertyFix);

        let report = apply_target(&t, &mut live, &reference, &live_sheet, &reference_sheet);
        assert_eq!(report.outcome, Outcome::Applied);
        // font-size agrees; only color differs and is resolved.
        assert_eq!(
            report.changes,
            vec![Change::PropertySet {
                property: "color".to_string(),
                value: "black".to_string()
            }]
        );
        let logo =
            dom::query_selector(&live, &Selector::parse(".logo-text").unwrap()).unwrap();
        assert_eq!(live.style_value(logo, "color"), Some("black"));
        assert_eq!(live.style_value(logo, "font-size"), None);
    }

    #[test]
    fn property_fix_ignores_reference_only_properties() {
        let mut live = parse_document("<div class=\"box\"></div>");
        let reference = parse_document("<div class=\"box\"></div>");
        let live_sheet = parse_stylesheet("wrong.css", ".box { color: red; }");
        let reference_sheet =
            parse_stylesheet("index.css", ".box { color: red; padding: 12px; }");
        let t = target("box", ".box", Strategy::PropertyFix);

        let report = apply_target(&t, &mut live, &reference, &live_sheet, &reference_sheet);
        assert_eq!(report.outcome, Outcome::Applied);
        // padding exists only on the reference side and is not added.
        assert!(report.changes.is_empty());
    }

    #[test]
    fn property_fix_with_no_live_declarations_is_a_quiet_no_op() {
        let mut live = parse_document("<div class=\"box\"></div>");
        let reference = parse_document("<div class=\"box\"></div>");
        let live_sheet = parse_stylesheet("wrong.css", ".other { color: red; }");
        let reference_sheet = parse_stylesheet("index.css", ".box { color: red; }");
        let t = target("box", ".box", Strategy::PropertyFix);

        let report = apply_target(&t, &mut live, &reference, &live_sheet, &reference_sheet);
        assert_eq!(report.outcome, Outcome::Applied);
        assert!(report.changes.is_empty());
    }

    #[test]
    fn property_fix_skips_unresolvable_properties() {
        let mut live = parse_document("<div class=\"box\"></div>");
        let reference = parse_document("<div class=\"other\"></div>");
        let live_sheet = parse_stylesheet("wrong.css", ".box { color: red; }");
        // Nothing in the reference sheet matches the reference element.
        let reference_sheet = parse_stylesheet("index.css", ".box { color: black; }");
        let t = target("box", "div", Strategy::PropertyFix);

        let report = apply_target(&t, &mut live, &reference, &live_sheet, &reference_sheet);
        assert_eq!(report.outcome, Outcome::Applied);
        assert!(report.changes.is_empty());
        let div = dom::query_selector(&live, &Selector::parse("div").unwrap()).unwrap();
        assert_eq!(live.style_value(div, "color"), None);
    }

    #[test]
    fn unsupported_selector_reports_missing() {
        let mut live = parse_document("<div></div>");
        let reference = parse_document("<div></div>");
        let (ls, rs) = no_sheets();
        let t = target("bad", "div > span", Strategy::ReplaceContent);
        let report = apply_target(&t, &mut live, &reference, &ls, &rs);
        assert_eq!(report.outcome, Outcome::SkippedMissing);
    }
}

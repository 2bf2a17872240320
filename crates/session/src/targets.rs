use reconcile::{Strategy, Target};

/// The fixed page-region sequence a repair session applies, in order.
/// This is configuration, not logic; callers can supply their own list.
pub fn default_targets() -> Vec<Target> {
    vec![
        Target::new("logo styling", "header .logo-text", Strategy::PropertyFix),
        Target::new("header border", "body header", Strategy::PropertyFix),
        Target::new("recipe name", "#recipe-name", Strategy::ReplaceContent),
        Target::new("timer", ".time-container", Strategy::ClassTokenCopy),
        Target::new(
            "recipe image",
            ".image-container img",
            Strategy::AttributeCopy {
                attribute: "src".to_string(),
            },
        ),
        Target::new(
            "ingredients heading",
            ".ingredients-container h3.ingredients",
            Strategy::ReplaceContent,
        ),
        Target::new(
            "ingredients styling",
            ".ingredients-container",
            Strategy::PropertyFix,
        ),
        Target::new(
            "ingredients bottom",
            ".ingredients-container ul.ingredients-list-bottom",
            Strategy::ReplaceContent,
        ),
        Target::new(
            "ingredients paste",
            ".ingredients-container ul.ingredients-list-paste",
            Strategy::PositionalListMerge,
        ),
        Target::new(
            "instructions shadow",
            "h3.instructions.shadow",
            Strategy::ClassTokenRemove {
                class: "shadow".to_string(),
            },
        ),
        Target::new(
            "instructions",
            ".instructions-container ol.instructions-list",
            Strategy::StrictCountMerge,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets_have_unique_names_and_parse() {
        let targets = default_targets();
        for (i, t) in targets.iter().enumerate() {
            assert!(
                dom::Selector::parse(&t.selector).is_some(),
                "selector {:?} must parse",
                t.selector
            );
            assert!(
                targets[..i].iter().all(|prev| prev.name != t.name),
                "duplicate target name {:?}",
                t.name
            );
        }
    }
}

//! Reconciliation targets are data, not code: a named page region, the
//! selector that locates it in both trees, and the strategy to apply.

/// How a region is aligned with its reference counterpart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Overwrite the live element's serialized content verbatim.
    ReplaceContent,
    /// Grow-only positional child merge: append missing children, overwrite
    /// differing content, never trim trailing live children.
    PositionalListMerge,
    /// Positional content overwrite that requires equal child counts and
    /// refuses partial merges.
    StrictCountMerge,
    /// Classify children as numeric/non-numeric; non-numeric children gain the
    /// matching reference child's first class token, numeric children take the
    /// matching reference child's content.
    ClassTokenCopy,
    /// Copy the named attribute from the reference element when it carries a
    /// non-empty value there.
    AttributeCopy { attribute: String },
    /// Drop a stale class token from the live element. The reference tree is
    /// not consulted; the selector alone names the region.
    ClassTokenRemove { class: String },
    /// Resolve differing declared properties against the reference stylesheet
    /// and write them onto the live element's inline style.
    PropertyFix,
}

#[derive(Clone, Debug)]
pub struct Target {
    pub name: String,
    pub selector: String,
    pub strategy: Strategy,
}

impl Target {
    pub fn new(name: &str, selector: &str, strategy: Strategy) -> Self {
        Self {
            name: name.to_string(),
            selector: selector.to_string(),
            strategy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The selector matched nothing in one of the trees (or did not parse).
    SkippedMissing,
    /// Strict-count merge saw unequal child counts.
    SkippedMismatchedCount,
}

/// One mutation performed on the live tree, for observability and tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change {
    ContentReplaced { index: Option<usize> },
    ChildAppended { index: usize },
    ClassAdded { index: usize, class: String },
    ClassRemoved { class: String },
    AttributeSet { attribute: String, value: String },
    PropertySet { property: String, value: String },
}

#[derive(Clone, Debug)]
pub struct TargetReport {
    pub target: String,
    pub outcome: Outcome,
    pub changes: Vec<Change>,
}

impl TargetReport {
    pub fn applied(target: &Target, changes: Vec<Change>) -> Self {
        Self {
            target: target.name.clone(),
            outcome: Outcome::Applied,
            changes,
        }
    }

    pub fn skipped(target: &Target, outcome: Outcome) -> Self {
        debug_assert!(outcome != Outcome::Applied);
        Self {
            target: target.name.clone(),
            outcome,
            changes: Vec::new(),
        }
    }

    pub fn is_skip(&self) -> bool {
        self.outcome != Outcome::Applied
    }
}

use crate::loader::{DocumentLoader, LoadError};
use crate::targets::default_targets;
use css::Stylesheet;
use dom::{Tree, collect_stylesheet_hrefs};
use reconcile::{Target, TargetReport, apply_target};

pub struct SessionConfig {
    pub live_url: String,
    pub reference_url: String,
    /// Substring used to pick the live document's stylesheet link.
    pub live_sheet_hint: String,
    /// Substring used to pick the reference document's stylesheet link.
    pub reference_sheet_hint: String,
    pub targets: Vec<Target>,
}

impl SessionConfig {
    pub fn new(live_url: &str, reference_url: &str) -> Self {
        Self {
            live_url: live_url.to_string(),
            reference_url: reference_url.to_string(),
            live_sheet_hint: "wrong".to_string(),
            reference_sheet_hint: "index".to_string(),
            targets: default_targets(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionReport {
    pub targets: Vec<TargetReport>,
}

impl SessionReport {
    pub fn skipped(&self) -> Vec<&TargetReport> {
        self.targets.iter().filter(|t| t.is_skip()).collect()
    }

    pub fn change_count(&self) -> usize {
        self.targets.iter().map(|t| t.changes.len()).sum()
    }
}

/// The repaired live tree plus what happened to every target.
#[derive(Debug)]
pub struct RepairOutcome {
    pub live: Tree,
    pub report: SessionReport,
}

/// Drives one repair: load both documents and their stylesheets, then apply
/// each configured target exactly once, in declaration order, synchronously.
///
/// Load failures abort before the first target runs. Per-target failures are
/// isolated: they land in the report and the remaining targets still run.
pub struct RepairSession<L: DocumentLoader> {
    loader: L,
}

impl<L: DocumentLoader> RepairSession<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    pub fn run(&self, config: &SessionConfig) -> Result<RepairOutcome, LoadError> {
        let mut live = self.loader.load(&config.live_url)?;
        let reference = self.loader.load(&config.reference_url)?;
        let live_sheet = self.load_linked_sheet(&live, &config.live_url, &config.live_sheet_hint)?;
        let reference_sheet = self.load_linked_sheet(
            &reference,
            &config.reference_url,
            &config.reference_sheet_hint,
        )?;
        log::info!(
            target: "session",
            "repairing {} against {} ({} targets)",
            config.live_url,
            config.reference_url,
            config.targets.len()
        );

        let mut reports = Vec::with_capacity(config.targets.len());
        for target in &config.targets {
            let report = apply_target(target, &mut live, &reference, &live_sheet, &reference_sheet);
            if report.is_skip() {
                log::warn!(target: "session", "skipped {:?}: {:?}", report.target, report.outcome);
            } else {
                log::info!(
                    target: "session",
                    "applied {:?}: {} change(s)",
                    report.target,
                    report.changes.len()
                );
            }
            reports.push(report);
        }

        Ok(RepairOutcome {
            live,
            report: SessionReport { targets: reports },
        })
    }

    /// Finds the document's own stylesheet link by hint and loads it.
    fn load_linked_sheet(
        &self,
        tree: &Tree,
        document_url: &str,
        hint: &str,
    ) -> Result<Stylesheet, LoadError> {
        let mut hrefs = Vec::new();
        collect_stylesheet_hrefs(tree, &mut hrefs);
        let href = hrefs
            .iter()
            .find(|h| h.contains(hint))
            .ok_or_else(|| LoadError::MissingStylesheet {
                url: document_url.to_string(),
                hint: hint.to_string(),
            })?;
        let sheet_url = self.loader.resolve_href(document_url, href);
        self.loader.load_stylesheet(&sheet_url)
    }
}

// file: src/sync/reconcile.rs
// description: deciding whether imported highlights are new, changed or unchanged
// reference: internal sync logic

use crate::config::SearchConfig;
use crate::models::{Highlight, Searchable};
use crate::similarity::ranker::{CorpusIndex, SimilarityEngine};
use crate::sync::import::ImportedHighlight;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ReconcileAction {
    Create,
    Update { id: String },
    Skip { id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileDecision {
    pub highlight: ImportedHighlight,
    #[serde(flatten)]
    pub action: ReconcileAction,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub decisions: Vec<ReconcileDecision>,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl ReconcileReport {
    pub fn push(&mut self, decision: ReconcileDecision) {
        match decision.action {
            ReconcileAction::Create => self.created += 1,
            ReconcileAction::Update { .. } => self.updated += 1,
            ReconcileAction::Skip { .. } => self.skipped += 1,
        }
        self.decisions.push(decision);
    }

    pub fn total(&self) -> usize {
        self.decisions.len()
    }

    /// Records for highlights that did not exist yet.
    pub fn new_highlights(&self) -> Vec<Highlight> {
        self.decisions
            .iter()
            .filter(|decision| decision.action == ReconcileAction::Create)
            .map(|decision| decision.highlight.clone().into_highlight())
            .collect()
    }
}

/// Matches imported highlights against stored ones: exact normalized text
/// first, then TF-IDF duplicate detection above `duplicate_threshold`.
pub struct Reconciler<'t> {
    engine: SimilarityEngine<'t>,
    duplicate_threshold: f64,
    candidate_cap: usize,
}

impl Reconciler<'static> {
    pub fn new(config: &SearchConfig) -> Self {
        Self::with_engine(SimilarityEngine::default(), config)
    }
}

impl<'t> Reconciler<'t> {
    pub fn with_engine(engine: SimilarityEngine<'t>, config: &SearchConfig) -> Self {
        Self {
            engine,
            duplicate_threshold: config.duplicate_threshold,
            candidate_cap: config.candidate_cap,
        }
    }

    pub fn reconcile(&self, imported: Vec<ImportedHighlight>, existing: &[Highlight]) -> ReconcileReport {
        self.reconcile_with(imported, existing, |_| {})
    }

    /// Like [`Reconciler::reconcile`], reporting each decision as it is made.
    pub fn reconcile_with<F>(
        &self,
        imported: Vec<ImportedHighlight>,
        existing: &[Highlight],
        mut on_decision: F,
    ) -> ReconcileReport
    where
        F: FnMut(&ReconcileDecision),
    {
        let capped = &existing[..existing.len().min(self.candidate_cap)];
        let index = self.engine.index(capped);
        let mut report = ReconcileReport::default();

        for highlight in imported {
            let action = self.decide(&highlight, existing, &index);
            let decision = ReconcileDecision { highlight, action };
            on_decision(&decision);
            report.push(decision);
        }

        info!(
            "Reconciled {} highlights: {} new, {} updated, {} unchanged",
            report.total(),
            report.created,
            report.updated,
            report.skipped
        );
        report
    }

    fn decide(
        &self,
        imported: &ImportedHighlight,
        existing: &[Highlight],
        index: &CorpusIndex<'_, Highlight>,
    ) -> ReconcileAction {
        if let Some(current) = existing.iter().find(|current| is_exact_match(imported, current)) {
            return if has_changed(imported, current) {
                ReconcileAction::Update {
                    id: current.id.clone(),
                }
            } else {
                ReconcileAction::Skip {
                    id: current.id.clone(),
                }
            };
        }

        let query = if imported.html.is_empty() {
            &imported.text
        } else {
            &imported.html
        };

        match index.rank(query, self.duplicate_threshold).first() {
            Some(best) => {
                debug!(
                    "Treating imported highlight as a duplicate of {} ({:.3})",
                    best.document.id(),
                    best.score
                );
                ReconcileAction::Update {
                    id: best.document.id.clone(),
                }
            }
            None => ReconcileAction::Create,
        }
    }
}

/// Lowercased with runs of whitespace collapsed to one space.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn is_exact_match(imported: &ImportedHighlight, current: &Highlight) -> bool {
    let incoming = [normalize(&imported.text), normalize(&imported.html)];
    let stored = [
        normalize(&current.text),
        normalize(current.html_content.as_deref().unwrap_or("")),
    ];

    incoming
        .iter()
        .filter(|value| !value.is_empty())
        .any(|value| stored.iter().any(|other| other == value))
}

fn has_changed(imported: &ImportedHighlight, current: &Highlight) -> bool {
    imported.content_hash() != current.content_hash()
}

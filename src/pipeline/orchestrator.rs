// file: src/pipeline/orchestrator.rs
// description: coordinates highlight extraction and reconciliation for a page import
// reference: orchestrates the import workflow

use crate::config::SearchConfig;
use crate::models::{Block, Highlight};
use crate::pipeline::progress::{ImportStats, ProgressTracker};
use crate::sync::{ReconcileAction, ReconcileReport, Reconciler, extract_highlights};
use crate::utils::OperationTimer;
use tracing::{info, warn};

/// Result of one import run.
#[derive(Debug, Clone)]
pub struct ImportRun {
    pub report: ReconcileReport,
    pub stats: ImportStats,
}

pub struct ImportPipeline {
    config: SearchConfig,
    show_progress: bool,
    colored: bool,
}

impl ImportPipeline {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            show_progress: true,
            colored: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool, colored: bool) -> Self {
        self.show_progress = show_progress;
        self.colored = colored;
        self
    }

    /// Extracts highlights from `blocks` and decides, for each, whether it is
    /// new, changed or already stored in `existing`.
    pub fn run(&self, blocks: &[Block], existing: &[Highlight]) -> ImportRun {
        info!("Starting highlight import");
        let mut timer = OperationTimer::new("import");

        let imported = extract_highlights(blocks);
        if imported.is_empty() {
            warn!("No highlights found in {} blocks", blocks.len());
        }
        timer.stage("extract");

        let progress = if self.show_progress {
            ProgressTracker::with_color(imported.len(), self.colored)
        } else {
            ProgressTracker::hidden(imported.len())
        };

        progress.set_message(format!("Reconciling against {} stored", existing.len()));
        let reconciler = Reconciler::new(&self.config);
        let report = reconciler.reconcile_with(imported, existing, |decision| {
            match decision.action {
                ReconcileAction::Create => progress.inc_created(),
                ReconcileAction::Update { .. } => progress.inc_updated(),
                ReconcileAction::Skip { .. } => progress.inc_skipped(),
            }
        });

        timer.stage("reconcile");

        let mut stats = progress.get_stats();
        progress.finish();
        stats.duration = timer.finish_with_count(report.total());

        self.log_final_stats(&stats);

        ImportRun { report, stats }
    }

    fn log_final_stats(&self, stats: &ImportStats) {
        info!("Import complete");
        info!("  Highlights extracted: {}", stats.extracted);
        info!("  New: {}", stats.created);
        info!("  Updated: {}", stats.updated);
        info!(
            "  Unchanged: {} ({:.1}%)",
            stats.skipped,
            stats.unchanged_rate()
        );
        info!(
            "  Duration: {:.2}s ({:.1} highlights/sec)",
            stats.duration.as_secs_f64(),
            stats.highlights_per_second()
        );
    }
}

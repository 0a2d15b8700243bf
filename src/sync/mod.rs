// file: src/sync/mod.rs
// description: two-way highlight sync with a remote block page
// reference: internal module structure

pub mod groups;
pub mod import;
pub mod reconcile;
pub mod update;

pub use groups::{HighlightGroup, find_matching_group, split_into_groups};
pub use import::{ImportedHighlight, extract_highlights};
pub use reconcile::{ReconcileAction, ReconcileDecision, ReconcileReport, Reconciler};
pub use update::{BlockOperation, UpdatePlan, blocks_for_append, plan_update};

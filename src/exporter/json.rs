// file: src/exporter/json.rs
// description: json export of imports, reconcile reports and search outcomes

use crate::config::ExportConfig;
use crate::error::{HighlightError, Result};
use crate::models::SearchOutcome;
use crate::sync::{ImportedHighlight, ReconcileReport};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
    pretty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportManifest {
    pub exported_at: String,
    pub total_documents: usize,
    pub files: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SearchExport<'a> {
    query: &'a str,
    #[serde(flatten)]
    outcome: &'a SearchOutcome,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>, pretty: bool) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir).map_err(|source| HighlightError::FileOperation {
            path: output_dir.clone(),
            source,
        })?;
        Ok(Self { output_dir, pretty })
    }

    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        Self::new(config.output_dir.clone(), config.pretty)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub async fn export_highlights(&self, highlights: &[ImportedHighlight]) -> Result<ExportManifest> {
        let file = self.write("highlights", highlights).await?;
        self.finish(highlights.len(), vec![file]).await
    }

    pub async fn export_report(&self, report: &ReconcileReport) -> Result<ExportManifest> {
        let file = self.write("reconcile", report).await?;
        self.finish(report.total(), vec![file]).await
    }

    pub async fn export_search(&self, query: &str, outcome: &SearchOutcome) -> Result<ExportManifest> {
        let export = SearchExport { query, outcome };
        let file = self.write("search", &export).await?;
        self.finish(outcome.results.len() + outcome.similar.len(), vec![file])
            .await
    }

    async fn write<T: Serialize + ?Sized>(&self, stem: &str, value: &T) -> Result<String> {
        let name = format!("{}-{}.json", stem, Utc::now().format("%Y%m%dT%H%M%S%3f"));
        let path = self.output_dir.join(&name);

        tokio::fs::write(&path, self.to_json(value)?)
            .await
            .map_err(|source| HighlightError::FileOperation { path, source })?;

        Ok(name)
    }

    async fn finish(&self, total_documents: usize, files: Vec<String>) -> Result<ExportManifest> {
        let manifest = ExportManifest {
            exported_at: Utc::now().to_rfc3339(),
            total_documents,
            files,
        };

        let path = self.output_dir.join(MANIFEST_FILE);
        tokio::fs::write(&path, self.to_json(&manifest)?)
            .await
            .map_err(|source| HighlightError::FileOperation { path, source })?;

        info!(
            "Export complete: {} documents written to {}",
            manifest.total_documents,
            self.output_dir.display()
        );
        Ok(manifest)
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

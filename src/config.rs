// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{HighlightError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub search: SearchConfig,
    pub corpus: CorpusConfig,
    pub export: ExportConfig,
}

/// Per call-site relevance thresholds and result limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Minimum score for search-adjacent "related" highlights.
    pub related_threshold: f64,
    /// Minimum score for "more like this highlight".
    pub similar_threshold: f64,
    /// Minimum score for treating an imported highlight as an existing one.
    pub duplicate_threshold: f64,
    /// Upper bound on candidates scored per query.
    pub candidate_cap: usize,
    pub fulltext_limit: usize,
    pub result_limit: usize,
    pub similar_limit: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorpusConfig {
    pub max_file_size_mb: usize,
    #[serde(default)]
    pub skip_patterns: Vec<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub pretty: bool,
}

fn default_extensions() -> Vec<String> {
    ["json", "html", "htm", "txt", "md"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            related_threshold: 0.15,
            similar_threshold: 0.2,
            duplicate_threshold: 0.8,
            candidate_cap: 1000,
            fulltext_limit: 50,
            result_limit: 20,
            similar_limit: 10,
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 10,
            skip_patterns: vec![".git/".to_string(), "*.tmp".to_string()],
            extensions: default_extensions(),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("HIGHLIGHTS")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| HighlightError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| HighlightError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            search: SearchConfig::default(),
            corpus: CorpusConfig::default(),
            export: ExportConfig {
                output_dir: PathBuf::from("./exports"),
                pretty: true,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        let thresholds = [
            ("related_threshold", self.search.related_threshold),
            ("similar_threshold", self.search.similar_threshold),
            ("duplicate_threshold", self.search.duplicate_threshold),
        ];

        for (name, value) in thresholds {
            Validator::validate_threshold(value)
                .map_err(|e| HighlightError::Config(format!("{}: {}", name, e)))?;
        }

        if self.search.candidate_cap == 0 {
            return Err(HighlightError::Config(
                "candidate_cap must be greater than 0".to_string(),
            ));
        }

        if self.search.result_limit == 0
            || self.search.similar_limit == 0
            || self.search.fulltext_limit == 0
        {
            return Err(HighlightError::Config(
                "result limits must be greater than 0".to_string(),
            ));
        }

        if self.corpus.max_file_size_mb == 0 {
            return Err(HighlightError::Config(
                "max_file_size_mb must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

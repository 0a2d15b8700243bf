// file: src/corpus/loader.rs
// description: loading highlight corpora and remote block pages from disk
// reference: https://docs.rs/walkdir

use crate::config::CorpusConfig;
use crate::converter::strip_html;
use crate::error::{HighlightError, Result};
use crate::models::{Block, Highlight};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// JSON array of highlight records.
    Records,
    /// One highlight whose content is markup.
    Markup,
    /// One highlight whose content is plain text.
    Plain,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(SourceKind::Records),
            "html" | "htm" => Some(SourceKind::Markup),
            "txt" | "md" => Some(SourceKind::Plain),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub relative_path: String,
    pub size: u64,
    pub kind: SourceKind,
}

pub struct CorpusLoader {
    config: CorpusConfig,
}

impl CorpusLoader {
    pub fn new(config: CorpusConfig) -> Self {
        Self { config }
    }

    /// Loads highlights from a file or, recursively, from a directory.
    pub async fn load(&self, path: &Path) -> Result<Vec<Highlight>> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|source| HighlightError::FileOperation {
                path: path.to_path_buf(),
                source,
            })?;

        let highlights = if metadata.is_dir() {
            self.load_directory(path).await?
        } else {
            let kind = SourceKind::from_path(path).ok_or_else(|| {
                HighlightError::Corpus(format!("Unsupported corpus file: {}", path.display()))
            })?;
            let id = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            read_source(path, &id, kind).await?
        };

        info!("Loaded {} highlights from {}", highlights.len(), path.display());
        Ok(highlights)
    }

    async fn load_directory(&self, root: &Path) -> Result<Vec<Highlight>> {
        let files = {
            let root = root.to_path_buf();
            let config = self.config.clone();
            tokio::task::spawn_blocking(move || CorpusLoader::new(config).scan_directory(&root))
                .await
                .map_err(|e| HighlightError::Corpus(format!("Directory scan task failed: {}", e)))??
        };

        let mut highlights = Vec::new();
        for file in files {
            match read_source(&file.path, &file.relative_path, file.kind).await {
                Ok(mut loaded) => highlights.append(&mut loaded),
                Err(e) => warn!("Skipping {}: {}", file.relative_path, e),
            }
        }

        Ok(highlights)
    }

    /// Files under `root` that the loader understands, in a stable order.
    pub fn scan_directory(&self, root: &Path) -> Result<Vec<ScannedFile>> {
        if !root.is_dir() {
            return Err(HighlightError::Validation(format!(
                "Path is not a directory: {}",
                root.display()
            )));
        }

        let max_size = (self.config.max_file_size_mb * 1024 * 1024) as u64;
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if self.should_skip(path) || !self.has_accepted_extension(path) {
                debug!("Skipping file: {}", path.display());
                continue;
            }

            let Some(kind) = SourceKind::from_path(path) else {
                continue;
            };

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            if size > max_size {
                debug!(
                    "Skipping large file ({} MB): {}",
                    size / 1024 / 1024,
                    path.display()
                );
                continue;
            }

            let relative_path = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");

            files.push(ScannedFile {
                path: path.to_path_buf(),
                relative_path,
                size,
                kind,
            });
        }

        debug!("Found {} corpus files under {}", files.len(), root.display());
        Ok(files)
    }

    fn should_skip(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        self.config.skip_patterns.iter().any(|pattern| {
            if let Some(suffix) = pattern.strip_prefix('*') {
                path_str.ends_with(suffix)
            } else {
                path_str.contains(pattern.as_str())
            }
        })
    }

    fn has_accepted_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.config
                    .extensions
                    .iter()
                    .any(|accepted| accepted.eq_ignore_ascii_case(ext))
            })
    }
}

async fn read_source(path: &Path, id: &str, kind: SourceKind) -> Result<Vec<Highlight>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| HighlightError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;

    let highlights = match kind {
        SourceKind::Records => serde_json::from_str::<Vec<Highlight>>(&content)?,
        SourceKind::Markup => {
            let text = strip_html(&content);
            if text.is_empty() {
                Vec::new()
            } else {
                vec![Highlight::new(id, text).with_html(content.trim())]
            }
        }
        SourceKind::Plain => {
            let text = content.trim();
            if text.is_empty() {
                Vec::new()
            } else {
                vec![Highlight::new(id, text)]
            }
        }
    };

    Ok(highlights)
}

/// Reads a block page saved from the remote API.
pub async fn load_blocks(path: &Path) -> Result<Vec<Block>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| HighlightError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;

    parse_blocks(&content)
}

/// Accepts a bare array of blocks or one page of a paginated listing.
pub fn parse_blocks(json: &str) -> Result<Vec<Block>> {
    let value: Value = serde_json::from_str(json)?;

    let items = match value {
        Value::Array(_) => value,
        Value::Object(mut page) => page.remove("results").ok_or_else(|| {
            HighlightError::Corpus("Block page has no \"results\" array".to_string())
        })?,
        _ => {
            return Err(HighlightError::Corpus(
                "Expected an array of blocks".to_string(),
            ));
        }
    };

    Ok(serde_json::from_value(items)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn config() -> CorpusConfig {
        CorpusConfig {
            max_file_size_mb: 1,
            skip_patterns: vec![".git/".to_string(), "*.tmp".to_string()],
            extensions: vec![
                "json".to_string(),
                "html".to_string(),
                "txt".to_string(),
                "md".to_string(),
            ],
        }
    }

    #[tokio::test]
    async fn test_load_json_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("highlights.json");
        fs::write(
            &path,
            r#"[{"id": "1", "text": "First"}, {"id": "2", "text": "Second", "archived": true}]"#,
        )
        .unwrap();

        let highlights = CorpusLoader::new(config()).load(&path).await.unwrap();

        assert_eq!(highlights.len(), 2);
        assert!(highlights[1].archived);
    }

    #[tokio::test]
    async fn test_load_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("notes/.git")).unwrap();
        fs::write(temp.path().join("a.json"), r#"[{"id": "r1", "text": "record"}]"#).unwrap();
        fs::write(temp.path().join("notes/b.html"), "<p><em>marked</em> up</p>").unwrap();
        fs::write(temp.path().join("notes/c.txt"), "  plain words \n").unwrap();
        fs::write(temp.path().join("notes/d.tmp"), "scratch").unwrap();
        fs::write(temp.path().join("notes/.git/e.txt"), "ignored").unwrap();
        fs::write(temp.path().join("notes/f.csv"), "x,y").unwrap();

        let highlights = CorpusLoader::new(config()).load(temp.path()).await.unwrap();
        let ids: Vec<&str> = highlights.iter().map(|h| h.id.as_str()).collect();

        assert_eq!(ids, vec!["r1", "notes/b.html", "notes/c.txt"]);
        assert_eq!(highlights[1].text, "marked up");
        assert_eq!(highlights[1].html_content.as_deref(), Some("<p><em>marked</em> up</p>"));
        assert_eq!(highlights[2].text, "plain words");
    }

    #[tokio::test]
    async fn test_bad_json_in_directory_is_skipped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("broken.json"), "{not json").unwrap();
        fs::write(temp.path().join("ok.txt"), "fine").unwrap();

        let highlights = CorpusLoader::new(config()).load(temp.path()).await.unwrap();
        assert_eq!(highlights.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_path_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = CorpusLoader::new(config())
            .load(&temp.path().join("absent.json"))
            .await;

        assert!(matches!(result, Err(HighlightError::FileOperation { .. })));
    }

    #[tokio::test]
    async fn test_load_blocks_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("page.json");
        fs::write(
            &path,
            r#"{"object": "list", "results": [{"type": "paragraph", "paragraph": {"rich_text": []}}], "next_cursor": null}"#,
        )
        .unwrap();

        let blocks = load_blocks(&path).await.unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].is_blank_separator());
    }

    #[test]
    fn test_parse_blocks_shapes() {
        assert_eq!(parse_blocks("[]").unwrap().len(), 0);
        assert!(matches!(
            parse_blocks(r#"{"object": "list"}"#),
            Err(HighlightError::Corpus(_))
        ));
        assert!(parse_blocks("42").is_err());
    }

    #[test]
    fn test_skip_patterns() {
        let loader = CorpusLoader::new(config());

        assert!(loader.should_skip(Path::new("notes/draft.tmp")));
        assert!(loader.should_skip(Path::new("repo/.git/config")));
        assert!(!loader.should_skip(Path::new("notes/keep.txt")));
    }
}

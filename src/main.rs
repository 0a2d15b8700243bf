// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use highlight_engine::utils::logging::{
    format_error, format_info, format_score, format_step, format_success, format_warning,
    init_logger,
};
use highlight_engine::{
    Config, CorpusLoader, Highlight, Rating, HighlightSearch, ImportPipeline, JsonExporter, SearchMode,
    SearchResult, SimilarityEngine, Validator, blocks_for_append, blocks_to_markup,
    blocks_to_text, daily_selection, extract_highlights, find_matching_group, load_blocks,
    markup_to_blocks, plan_update, summarize,
};
use chrono::{Local, NaiveDate};
use highlight_engine::review::{days_in_month, month_key};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const PREVIEW_CHARS: usize = 300;

#[derive(Parser)]
#[command(name = "highlight_engine")]
#[command(version = "0.1.0")]
#[command(about = "Similarity search and block conversion for highlighted passages", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a corpus by substring or by TF-IDF similarity
    Search {
        /// Search query text
        query: String,

        #[arg(long, value_name = "PATH")]
        corpus: PathBuf,

        #[arg(short, long, default_value = "fulltext")]
        mode: SearchMode,

        /// Write the outcome to the export directory
        #[arg(long)]
        export: bool,
    },

    /// List highlights similar to a stored one
    Similar {
        #[arg(long, value_name = "PATH")]
        corpus: PathBuf,

        #[arg(long)]
        id: String,
    },

    /// Score two passages against each other
    Compare {
        a: String,
        b: String,

        /// Weight terms by this corpus instead of by the pair alone
        #[arg(long, value_name = "PATH")]
        corpus: Option<PathBuf>,
    },

    /// Convert a markup file into content blocks
    ToBlocks {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },

    /// Convert a saved block page into markup
    ToMarkup {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Print plain text instead of markup
        #[arg(long)]
        text: bool,
    },

    /// Import highlights from a saved block page and reconcile them with a corpus
    Import {
        #[arg(long, value_name = "FILE")]
        blocks: PathBuf,

        #[arg(long, value_name = "PATH")]
        corpus: Option<PathBuf>,

        #[arg(long)]
        export: bool,
    },

    /// List the highlights on a saved block page without reconciling them
    Extract {
        #[arg(long, value_name = "FILE")]
        blocks: PathBuf,

        #[arg(long)]
        export: bool,
    },

    /// Convert a markup file into the blocks that append it as a new highlight
    Append {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },

    /// Find a highlight on a saved block page and plan its replacement
    Locate {
        #[arg(long, value_name = "FILE")]
        blocks: PathBuf,

        #[arg(long)]
        text: String,

        #[arg(long)]
        markup: Option<String>,

        /// Markup file with the new content for the matched blocks
        #[arg(long, value_name = "FILE")]
        replacement: Option<PathBuf>,
    },

    /// Highlights due for review on a day of the month
    Daily {
        #[arg(long, value_name = "PATH")]
        corpus: PathBuf,

        /// Day to schedule, YYYY-MM-DD; today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Ids already reviewed this month
        #[arg(long, value_delimiter = ',')]
        reviewed: Vec<String>,
    },

    /// Aggregate the ratings a highlight received in past reviews
    Rate {
        /// Ratings as low, med or high
        #[arg(value_delimiter = ',', required = true)]
        ratings: Vec<Rating>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.color, cli.verbose);

    info!("Highlight engine");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Search {
            query,
            corpus,
            mode,
            export,
        } => {
            cmd_search(&config, &query, &corpus, mode, export).await?;
        }
        Commands::Similar { corpus, id } => {
            cmd_similar(&config, &corpus, &id).await?;
        }
        Commands::Compare { a, b, corpus } => {
            cmd_compare(&config, &a, &b, corpus.as_deref()).await?;
        }
        Commands::ToBlocks { input } => {
            cmd_to_blocks(&input).await?;
        }
        Commands::ToMarkup { input, text } => {
            cmd_to_markup(&input, text).await?;
        }
        Commands::Import {
            blocks,
            corpus,
            export,
        } => {
            cmd_import(&config, &blocks, corpus.as_deref(), export, cli.color).await?;
        }
        Commands::Extract { blocks, export } => {
            cmd_extract(&config, &blocks, export).await?;
        }
        Commands::Append { input } => {
            cmd_append(&input).await?;
        }
        Commands::Locate {
            blocks,
            text,
            markup,
            replacement,
        } => {
            cmd_locate(&blocks, &text, markup.as_deref(), replacement.as_deref()).await?;
        }
        Commands::Daily {
            corpus,
            date,
            reviewed,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            cmd_daily(&config, &corpus, date, reviewed).await?;
        }
        Commands::Rate { ratings } => {
            cmd_rate(&ratings)?;
        }
    }

    Ok(())
}

async fn load_corpus(config: &Config, path: &Path) -> Result<Vec<Highlight>> {
    Validator::validate_corpus_path(path)?;

    let loader = CorpusLoader::new(config.corpus.clone());
    let highlights = loader
        .load(path)
        .await
        .with_context(|| format!("Failed to load corpus from {}", path.display()))?;

    if highlights.is_empty() {
        warn!("Corpus at {} holds no highlights", path.display());
    }

    Ok(highlights)
}

async fn read_markup(path: &Path) -> Result<String> {
    Validator::validate_file_path(path)?;

    let markup = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(markup)
}

fn print_results(heading: &str, results: &[SearchResult]) {
    println!("\n{} ({})\n", heading, results.len());

    for (idx, result) in results.iter().enumerate() {
        let score = match result.score {
            Some(score) => format_score(score),
            None => "match".to_string(),
        };
        println!("{}. {} (Score: {})", idx + 1, result.id, score);

        let preview = Validator::truncate_text(&result.text, PREVIEW_CHARS);
        for line in preview.lines().take(5) {
            println!("     {}", line);
        }
    }
}

async fn cmd_search(
    config: &Config,
    query: &str,
    corpus_path: &Path,
    mode: SearchMode,
    export: bool,
) -> Result<()> {
    info!("Searching for: {} ({:?})", query, mode);

    let corpus = load_corpus(config, corpus_path).await?;
    let search = HighlightSearch::new(config.search.clone());
    let outcome = search.search(query, &corpus, mode);

    if outcome.is_empty() {
        println!("\nNo results found for query: \"{}\"\n", query);
        println!("Try:");
        println!("  - Using different search terms");
        println!("  - Switching between --mode fulltext and --mode semantic");
        println!("  - Checking that the corpus path holds highlights");
        return Ok(());
    }

    println!("\nSearch Results for: \"{}\"", query);
    println!("{}", "=".repeat(80));
    print_results("Results", &outcome.results);
    if !outcome.similar.is_empty() {
        print_results("Related", &outcome.similar);
    }
    println!("\n{}", "=".repeat(80));

    if export {
        let exporter = JsonExporter::from_config(&config.export)?;
        let manifest = exporter.export_search(query, &outcome).await?;
        println!(
            "{}",
            format_success(&format!(
                "Exported {} results to {}",
                manifest.total_documents,
                exporter.output_dir().display()
            ))
        );
    }

    info!("Search complete");
    Ok(())
}

async fn cmd_similar(config: &Config, corpus_path: &Path, id: &str) -> Result<()> {
    let corpus = load_corpus(config, corpus_path).await?;

    let Some(highlight) = corpus.iter().find(|highlight| highlight.id == id) else {
        println!(
            "{}",
            format_error(&format!("No highlight with id {} in the corpus", id))
        );
        return Ok(());
    };

    let search = HighlightSearch::new(config.search.clone());
    let similar = search.find_similar(highlight, &corpus);

    if similar.is_empty() {
        println!("{}", format_info(&format!("No highlights similar to {}", id)));
        return Ok(());
    }

    println!("{}", "=".repeat(80));
    print_results(&format!("Similar to {}", id), &similar);
    println!("\n{}", "=".repeat(80));

    Ok(())
}

async fn cmd_compare(config: &Config, a: &str, b: &str, corpus_path: Option<&Path>) -> Result<()> {
    let engine = SimilarityEngine::default();

    let score = match corpus_path {
        Some(path) => {
            let corpus = load_corpus(config, path).await?;
            engine.index(&corpus).pair_similarity(a, b)
        }
        None => {
            warn!("No corpus given; terms shared by both passages carry no weight");
            engine.similarity(a, b, None)
        }
    };

    println!("Similarity: {}", format_score(score));
    Ok(())
}

async fn cmd_to_blocks(input: &Path) -> Result<()> {
    let markup = read_markup(input).await?;
    Validator::validate_content_not_empty(&markup)?;

    let blocks = markup_to_blocks(&markup);
    info!("Converted {} into {} blocks", input.display(), blocks.len());

    println!(
        "{}",
        serde_json::to_string_pretty(&blocks).context("Failed to serialize blocks")?
    );
    Ok(())
}

async fn cmd_to_markup(input: &Path, text: bool) -> Result<()> {
    Validator::validate_file_path(input)?;

    let blocks = load_blocks(input)
        .await
        .with_context(|| format!("Failed to read blocks from {}", input.display()))?;

    if text {
        println!("{}", blocks_to_text(&blocks));
    } else {
        println!("{}", blocks_to_markup(&blocks));
    }
    Ok(())
}

async fn cmd_import(
    config: &Config,
    blocks_path: &Path,
    corpus_path: Option<&Path>,
    export: bool,
    colored: bool,
) -> Result<()> {
    Validator::validate_file_path(blocks_path)?;

    println!("{}", format_step(1, 3, "Reading block page"));
    let blocks = load_blocks(blocks_path)
        .await
        .with_context(|| format!("Failed to read blocks from {}", blocks_path.display()))?;

    println!("{}", format_step(2, 3, "Loading stored highlights"));
    let existing = match corpus_path {
        Some(path) => load_corpus(config, path).await?,
        None => Vec::new(),
    };

    println!("{}", format_step(3, 3, "Reconciling"));
    let pipeline = ImportPipeline::new(config.search.clone()).with_progress(true, colored);
    let run = pipeline.run(&blocks, &existing);

    println!(
        "{}",
        format_success(&format!(
            "{} new, {} updated, {} unchanged",
            run.stats.created, run.stats.updated, run.stats.skipped
        ))
    );

    if export {
        let exporter = JsonExporter::from_config(&config.export)?;
        exporter.export_report(&run.report).await?;
        println!(
            "{}",
            format_info(&format!(
                "Reconcile report written to {}",
                exporter.output_dir().display()
            ))
        );
    }

    Ok(())
}

async fn cmd_extract(config: &Config, blocks_path: &Path, export: bool) -> Result<()> {
    Validator::validate_file_path(blocks_path)?;

    let blocks = load_blocks(blocks_path)
        .await
        .with_context(|| format!("Failed to read blocks from {}", blocks_path.display()))?;
    let highlights = extract_highlights(&blocks);

    println!("{}", "=".repeat(80));
    for (idx, highlight) in highlights.iter().enumerate() {
        println!("\n{}.", idx + 1);
        for line in Validator::truncate_text(&highlight.text, PREVIEW_CHARS).lines() {
            println!("     {}", line);
        }
    }
    println!("\n{}", "=".repeat(80));

    if export {
        let exporter = JsonExporter::from_config(&config.export)?;
        let manifest = exporter.export_highlights(&highlights).await?;
        println!(
            "{}",
            format_success(&format!(
                "Exported {} highlights to {}",
                manifest.total_documents,
                exporter.output_dir().display()
            ))
        );
    }

    Ok(())
}

async fn cmd_append(input: &Path) -> Result<()> {
    let markup = read_markup(input).await?;
    Validator::validate_content_not_empty(&markup)?;

    let blocks = blocks_for_append(&markup);
    info!("{} blocks to append, separator included", blocks.len());

    println!(
        "{}",
        serde_json::to_string_pretty(&blocks).context("Failed to serialize blocks")?
    );
    Ok(())
}

async fn cmd_locate(
    blocks_path: &Path,
    text: &str,
    markup: Option<&str>,
    replacement: Option<&Path>,
) -> Result<()> {
    Validator::validate_file_path(blocks_path)?;

    let blocks = load_blocks(blocks_path)
        .await
        .with_context(|| format!("Failed to read blocks from {}", blocks_path.display()))?;

    let Some(group) = find_matching_group(&blocks, text, markup) else {
        println!("{}", format_warning("Highlight not found on the page"));
        return Ok(());
    };

    println!(
        "{}",
        format_success(&format!(
            "Found at blocks {}..{}",
            group.range().start,
            group.range().end
        ))
    );
    println!("{}", group.text());

    if let Some(path) = replacement {
        let new_markup = read_markup(path).await?;
        let plan = plan_update(&group, markup_to_blocks(&new_markup));

        println!(
            "{}",
            format_info(&format!(
                "{} operations, {} deletions",
                plan.len(),
                plan.deletions()
            ))
        );
        println!(
            "{}",
            serde_json::to_string_pretty(&plan).context("Failed to serialize update plan")?
        );
    }

    Ok(())
}

async fn cmd_daily(
    config: &Config,
    corpus_path: &Path,
    date: NaiveDate,
    reviewed: Vec<String>,
) -> Result<()> {
    let corpus = load_corpus(config, corpus_path).await?;
    let reviewed: HashSet<String> = reviewed.into_iter().collect();

    info!(
        "Scheduling {} across {} days of {}",
        date,
        days_in_month(date),
        month_key(date)
    );
    let due = daily_selection(&corpus, &reviewed, date);

    if due.is_empty() {
        println!("{}", format_info(&format!("Nothing to review on {}", date)));
        return Ok(());
    }

    println!("{}", "=".repeat(80));
    println!("\nReview for {} ({})\n", date, due.len());
    for (idx, highlight) in due.iter().enumerate() {
        println!("{}. {}", idx + 1, highlight.id);
        for line in Validator::truncate_text(&highlight.text, PREVIEW_CHARS).lines().take(5) {
            println!("     {}", line);
        }
    }
    println!("\n{}", "=".repeat(80));

    Ok(())
}

fn cmd_rate(ratings: &[Rating]) -> Result<()> {
    let summary = summarize(ratings);

    println!(
        "{}",
        format_info(&format!(
            "Average {:.2} over {} ratings",
            summary.average, summary.count
        ))
    );
    if summary.archived {
        println!("{}", format_warning("Rated low twice or more, archive it"));
    }

    Ok(())
}

//! page-harvester command-line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};

use page_harvester::config::TOP_WORD_COUNT_ENV;
use page_harvester::utils::read_lines;
use page_harvester::{Config, PageFetcher, Result, WordFrequencyAnalyzer, duplicate_report};

#[derive(Parser)]
#[command(
    name = "page-harvester",
    about = "Download article pages and rank the words in their main content",
    version
)]
struct Cli {
    /// JSON configuration file; flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging (ignored when RUST_LOG is set).
    #[arg(short, long, global = true)]
    debug: bool,

    /// Worker pool size for fetching and analysis.
    #[arg(short, long, global = true)]
    num_threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download every URL in the list into the save directory.
    Fetch {
        /// Directory the pages are written to.
        #[arg(short = 'o', long)]
        save_dir: Option<PathBuf>,

        /// Line-delimited URL list.
        #[arg(short = 'f', long)]
        url_list_file: Option<PathBuf>,

        /// Total fetch attempts per URL.
        #[arg(short = 'r', long)]
        max_retries: Option<u32>,
    },

    /// Count words across the downloaded pages and log the most frequent ones.
    Analyze {
        /// Directory of downloaded pages.
        #[arg(short = 'p', long)]
        save_dir: Option<PathBuf>,

        /// Only count words listed in this file.
        #[arg(short = 'w', long)]
        word_bank_file_path: Option<PathBuf>,

        /// Number of top words to report.
        #[arg(short = 'c', long, env = TOP_WORD_COUNT_ENV)]
        top_word_count: Option<usize>,
    },

    /// Print URLs of the list that share a file name, as JSON.
    Duplicates {
        /// Line-delimited URL list.
        #[arg(short = 'f', long)]
        url_list_file: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct RankedWord<'a> {
    word: &'a str,
    count: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = resolve_config(&cli);

    let debug = config.as_ref().map_or(cli.debug, |config| config.debug);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_log_level(debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match config {
        Ok(config) => run(cli.command, config).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "page-harvester failed");
            ExitCode::FAILURE
        }
    }
}

/// Defaults, then the JSON file, then global flags
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    config.debug |= cli.debug;
    if let Some(num_threads) = cli.num_threads {
        config.num_threads = num_threads;
    }
    Ok(config)
}

fn default_log_level(debug: bool) -> &'static str {
    if debug { "debug" } else { "info" }
}

async fn run(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Fetch {
            save_dir,
            url_list_file,
            max_retries,
        } => {
            if let Some(save_dir) = save_dir {
                config.save_dir = save_dir;
            }
            if let Some(url_list_file) = url_list_file {
                config.url_list_file = url_list_file;
            }
            if let Some(max_retries) = max_retries {
                config.retry.max_retries = max_retries;
            }

            let fetcher = PageFetcher::with_http(&config).await?;
            let summary = fetcher.run(&config.url_list_file).await?;
            info!(
                downloaded = summary.downloaded,
                not_found = summary.not_found,
                already_present = summary.already_present,
                abandoned = summary.abandoned,
                unexpected_status = summary.unexpected_status,
                exhausted = summary.exhausted,
                failed = summary.failed,
                invalid = summary.invalid,
                "fetch summary"
            );
        }

        Commands::Analyze {
            save_dir,
            word_bank_file_path,
            top_word_count,
        } => {
            if let Some(save_dir) = save_dir {
                config.save_dir = save_dir;
            }
            if word_bank_file_path.is_some() {
                config.word_bank_file_path = word_bank_file_path;
            }
            if let Some(top_word_count) = top_word_count {
                config.top_word_count = top_word_count;
            }

            let analyzer = WordFrequencyAnalyzer::new(&config)?;
            analyzer.process_all_files(&config.save_dir).await?;

            let top = analyzer.top_words(config.top_word_count);
            let ranked: Vec<RankedWord<'_>> = top
                .iter()
                .map(|(word, count)| RankedWord {
                    word,
                    count: *count,
                })
                .collect();
            info!(
                "top {} words:\n{}",
                config.top_word_count,
                serde_json::to_string_pretty(&ranked)?
            );
        }

        Commands::Duplicates { url_list_file } => {
            let path = url_list_file.unwrap_or(config.url_list_file);
            let groups = duplicate_report(read_lines(&path)?);
            info!(groups = groups.len(), path = %path.display(), "duplicate report");
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
    }

    Ok(())
}

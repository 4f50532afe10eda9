use anagram::{AnagramConfig, AnagramSession, AnagramSet, ConfigOverrides, Dictionary, EncodingMode};
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Find every anagram of a word in a dictionary file", long_about = None)]
struct Cli {
    /// Word to find anagrams of
    word: String,

    /// Dictionary file, one word per line
    #[arg(short = 'd', long)]
    dictionary: Option<PathBuf>,

    /// Encoding of the dictionary file (e.g. windows-1257, utf-8, iso-8859-13)
    #[arg(short = 'c', long)]
    charset: Option<String>,

    /// Number of verification workers
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// How to handle lines that cannot be decoded (skip|failfast)
    #[arg(long)]
    encoding: Option<EncodingMode>,

    /// Configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Print results as a JSON array
    #[arg(long, conflicts_with = "stats")]
    json: bool,

    /// Show only the number of anagrams found
    #[arg(short, long)]
    stats: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AnagramConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?
        .merge_with_cli(ConfigOverrides {
            dictionary: cli.dictionary,
            charset: cli.charset,
            thread_count: cli.threads,
            encoding_mode: cli.encoding,
            log_level: cli.log_level,
        });

    init_tracing(&config.log_level);
    debug!("Effective configuration: {:?}", config);

    let path = config.dictionary_path()?;
    let charset = config.charset()?;
    let dictionary =
        Dictionary::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let session = AnagramSession::new(dictionary.as_bytes(), &charset, config.thread_count)
        .with_encoding_mode(config.encoding_mode);
    let found = session.find(&cli.word)?;

    if cli.json {
        println!("{}", serde_json::to_string(&found.to_sorted_vec())?);
    } else {
        print_results(&found, &cli.word, cli.stats);
    }
    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_results(found: &AnagramSet, word: &str, stats_only: bool) {
    if !stats_only {
        for anagram in found.to_sorted_vec() {
            println!("{}", anagram);
        }
    }

    let summary = format!("Found {} anagrams of '{}'", found.len(), word);
    if stats_only {
        println!("{}", summary.green());
    } else {
        eprintln!("{}", summary.green());
    }
}

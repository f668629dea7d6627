use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tally_core::{features, OnlineClassifier};
use tally_finance::{CategoryRegistry, LedgerStore, Session, SessionOptions};
use tally_ingest::{read_statement, StatementFormat};

mod config;
mod logging;
mod state;

use config::{Config, ResolvedPaths};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "tally", version = VERSION, about = "Categorize bank transactions by learning from your corrections")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Category file (overrides config)
    #[arg(long, global = true)]
    categories: Option<PathBuf>,

    /// Ledger file (overrides config)
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a statement and categorize its transactions interactively
    Classify {
        /// Statement CSV to import
        #[arg(long)]
        csv: PathBuf,

        /// Statement layout: cibc or plain (date,desc,amount)
        #[arg(long, default_value = "plain")]
        format: StatementFormat,

        /// Do not clear the screen between transactions
        #[arg(long)]
        no_clear: bool,
    },

    /// List known categories with their selection numbers
    Categories,

    /// Show what the classifier would guess for a description
    Guess {
        description: String,

        /// Print the score of every category
        #[arg(long)]
        explain: bool,
    },

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a config file with the default paths
    Init,
    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let cfg = config::load_config()?;
    let home = state::tally_home()?;
    let paths = cfg.resolve_paths(&home, cli.categories, cli.ledger);
    tracing::debug!(?paths, "resolved data files");

    match cli.command {
        Command::Classify {
            csv,
            format,
            no_clear,
        } => {
            let options = SessionOptions {
                clear_screen: cfg.session.clear_screen && !no_clear,
                color: cfg.session.color,
            };
            classify(&paths, options, csv, format)?;
        }

        Command::Categories => list_categories(&paths)?,

        Command::Guess {
            description,
            explain,
        } => guess(&paths, &description, explain)?,

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => show_config(&cfg, &paths)?,
        },
    }

    Ok(())
}

fn classify(
    paths: &ResolvedPaths,
    options: SessionOptions,
    csv: PathBuf,
    format: StatementFormat,
) -> Result<()> {
    if !csv.exists() {
        bail!("CSV not found: {} (pass --csv <path>)", csv.display());
    }

    let batch = read_statement(&csv, format)
        .with_context(|| format!("parsing {}", csv.display()))?;
    if batch.is_empty() {
        println!("No transactions in {}", csv.display());
        return Ok(());
    }

    let mut registry = CategoryRegistry::load(&paths.categories)?;
    let store = LedgerStore::new(&paths.ledger);
    let existing = store.load()?;
    let mut classifier = OnlineClassifier::from_corpus(existing.training_examples());

    let total = batch.len();
    let mut outcome = Session::new(&mut registry, &mut classifier, io::stdin().lock(), io::stdout())
        .with_options(options)
        .run(batch);
    let failure = outcome.error.take();

    let resolved = outcome.resolved.len();
    let spent: f64 = outcome
        .resolved
        .iter()
        .filter(|t| t.is_outflow())
        .map(|t| t.abs_amount())
        .sum();
    let merged = LedgerStore::merge(existing, outcome.resolved);
    store
        .persist(&merged)
        .with_context(|| format!("saving ledger {}", store.path().display()))?;

    println!(
        "\nClassified {} of {} transactions ({:.2} spent). Ledger {} now holds {} rows.",
        resolved,
        total,
        spent,
        store.path().display(),
        merged.len()
    );
    if outcome.aborted {
        println!(
            "{} transactions left unclassified; re-import them to continue.",
            outcome.unresolved.len()
        );
    }

    if let Some(e) = failure {
        return Err(e).context("classification stopped early; resolved rows were saved");
    }
    Ok(())
}

fn list_categories(paths: &ResolvedPaths) -> Result<()> {
    let registry = CategoryRegistry::load(&paths.categories)?;
    if registry.is_empty() {
        println!(
            "No categories yet in {}. Type a new name during `tally classify` to add one.",
            registry.path().display()
        );
        return Ok(());
    }

    let width = (registry.len() - 1).to_string().len();
    for (i, name) in registry.iter() {
        println!("{i:>width$}  {name}");
    }
    Ok(())
}

fn guess(paths: &ResolvedPaths, description: &str, explain: bool) -> Result<()> {
    let registry = CategoryRegistry::load(&paths.categories)?;
    let ledger = LedgerStore::new(&paths.ledger).load()?;
    let classifier = OnlineClassifier::from_corpus(ledger.training_examples());

    let feats = features::extract(description);
    let prediction = classifier.predict(&feats, registry.as_slice());

    println!("Features: {}", feats.keys().cloned().collect::<Vec<_>>().join(" "));
    println!("Guess: {}", prediction.as_deref().unwrap_or("Unknown"));

    if explain {
        println!(
            "\nTrained on {} examples, {} distinct tokens.",
            classifier.len(),
            classifier.vocabulary_len()
        );
        let trained: Vec<_> = classifier.categories().collect();
        println!("Known categories: {}", trained.join(", "));
        let mut scores = classifier.scores(&feats);
        scores.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (name, score) in scores {
            println!("{score:>12.4}  {name}");
        }
    }
    Ok(())
}

fn show_config(cfg: &Config, paths: &ResolvedPaths) -> Result<()> {
    println!("Config file: {}", config::config_path()?.display());
    println!("Categories:  {}", paths.categories.display());
    println!("Ledger:      {}", paths.ledger.display());
    println!("Clear screen: {}", cfg.session.clear_screen);
    println!("Color:        {}", cfg.session.color);
    Ok(())
}

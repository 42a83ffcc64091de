//! phantomscan: daily threat intelligence for newly published PyPI/npm packages.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use phantomscan::cli::{self, AnalyzeOutcome, FetchArgs, RunAllArgs};
use phantomscan::config;
use phantomscan::model::{Corpus, Ecosystem};
use phantomscan::persistence::{self, FileStore, Store};
use phantomscan::pipeline::{self, exit_codes};
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "phantomscan")]
#[command(version)]
#[command(about = "Flags newly published PyPI/npm packages that look like slopsquats", long_about = None)]
#[command(after_help = "EXIT CODES:
    0    success
    1    generic failure
    130  interrupted

ENVIRONMENT:
    PHANTOMSCAN_OFFLINE   read from seed data, skip all outbound requests")]
struct Cli {
    /// Path to a policy YAML file (defaults to ./policy.yml, ./policy.yaml,
    /// then ~/.config/phantomscan/policy.yml)
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    /// Path to the SQLite tabular store (defaults under the OS data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Root of the file-store artifact tree (defaults to the working directory)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recently published candidates and persist the raw dump
    Fetch {
        #[arg(long, value_delimiter = ',', default_value = "pypi,npm")]
        ecosystems: Vec<String>,
        #[arg(long, default_value = "200")]
        limit: usize,
        #[arg(long)]
        date: Option<String>,
    },

    /// Score previously fetched raw candidates for a date
    Score {
        #[arg(long)]
        date: Option<String>,
    },

    /// Rank already-scored candidates into the day's feed
    Feed {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        top: Option<usize>,
    },

    /// Run the full fetch -> score -> feed pipeline for one or more ecosystems
    RunAll {
        #[arg(long, value_delimiter = ',', default_value = "pypi,npm")]
        ecosystems: Vec<String>,
        #[arg(long, default_value = "200")]
        limit: usize,
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        date: Option<String>,
    },

    /// Score one named package on demand
    Analyze {
        #[arg(long)]
        ecosystem: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        alternatives: bool,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the policy file format
    ConfigSchema {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_ecosystems(raw: &[String]) -> phantomscan::Result<Vec<Ecosystem>> {
    raw.iter()
        .map(|s| {
            Ecosystem::from_str(s)
                .map_err(phantomscan::error::PhantomScanError::validation)
        })
        .collect()
}

fn open_stores(cli: &Cli) -> phantomscan::Result<(Store, FileStore)> {
    let db_path = cli.db.clone().unwrap_or_else(persistence::default_db_path);
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(persistence::default_file_store_root);
    Ok((Store::open(&db_path)?, FileStore::new(data_dir)))
}

fn run() -> phantomscan::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match &cli.command {
        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "phantomscan", &mut io::stdout());
            return Ok(());
        }
        Commands::ConfigSchema { output } => {
            let schema = config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .map_err(|e| phantomscan::error::PhantomScanError::io(path.clone(), e))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            return Ok(());
        }
        _ => {}
    }

    let mut policy = config::load_policy(cli.policy.as_deref())?;
    let corpus = Corpus::empty();
    let (mut store, files) = open_stores(&cli)?;

    match cli.command {
        Commands::Fetch { ecosystems, limit, date } => {
            let ecosystems = parse_ecosystems(&ecosystems)?;
            let date = persistence::parse_date(date.as_deref())?;
            let total = cli::run_fetch(
                FetchArgs { ecosystems, limit, date },
                &policy,
                &mut store,
                &files,
            )?;
            println!("fetched {total} candidate(s) for {date}");
        }

        Commands::Score { date } => {
            let date = persistence::parse_date(date.as_deref())?;
            let total = cli::run_score(date, &policy, &corpus, &mut store)?;
            println!("scored {total} candidate(s) for {date}");
        }

        Commands::Feed { date, top } => {
            let date = persistence::parse_date(date.as_deref())?;
            let feed = cli::run_feed(date, top, &policy, &mut store, &files)?;
            println!("feed for {date}: {} item(s)", feed.items.len());
        }

        Commands::RunAll { ecosystems, limit, top, date } => {
            let ecosystems = parse_ecosystems(&ecosystems)?;
            let date = persistence::parse_date(date.as_deref())?;
            let stop = pipeline::install_cancellation_flag();
            let outcome = cli::run_run_all(
                RunAllArgs { ecosystems, limit, date, top_n: top },
                &mut policy,
                &corpus,
                &mut store,
                &files,
                &stop,
            )?;
            println!(
                "run-all for {date}: {} feed item(s), {} watchlisted",
                outcome.feed.items.len(),
                outcome.watchlist.len()
            );
        }

        Commands::Analyze { ecosystem, name, alternatives } => {
            let ecosystem = Ecosystem::from_str(&ecosystem)
                .map_err(phantomscan::error::PhantomScanError::validation)?;
            let AnalyzeOutcome { scored, alternatives } =
                cli::run_analyze(ecosystem, &name, alternatives, &policy, &corpus)?;
            println!(
                "{}:{} total={:.3} exists={:?}",
                scored.candidate.ecosystem, scored.candidate.name, scored.total, scored.breakdown.exists
            );
            for reason in &scored.breakdown.reasons {
                println!("  - {reason}");
            }
            for (candidate, ratio) in alternatives {
                println!("  alternative: {candidate} ({ratio:.1})");
            }
        }

        Commands::Completions { .. } | Commands::ConfigSchema { .. } => unreachable!(),
    }

    persistence::cleanup_old_data(&mut store, &files, policy.retention_days)?;
    Ok(())
}

fn main() {
    match run() {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

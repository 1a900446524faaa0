use anyhow::{bail, Context};
use clap::Parser;
use colored::Colorize;
use filescout::{
    results::{FOUND_ELSEWHERE, NOT_FOUND, NOT_FOUND_IN_DIRECTORY},
    CliOverrides, JobController, SearchConfig, SearchOutcome, SearchQuery,
};
use std::{num::NonZeroUsize, path::PathBuf, process::ExitCode, sync::Arc, thread, time::Duration};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

type Result<T> = anyhow::Result<T>;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(author, version, about = "Find files by name, falling back to your home directory", long_about = None)]
struct Cli {
    /// Part of the file name to look for (case-insensitive, empty matches everything)
    pattern: String,

    /// Directory to search in, absolute or relative to the home directory
    /// (default: the current directory)
    #[arg(short = 'd', long)]
    dir: Option<String>,

    /// Search the whole home directory instead of one directory
    #[arg(short = 'e', long, conflicts_with = "dir")]
    everywhere: bool,

    /// Number of worker threads for the directory scan
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use this directory as the home directory
    #[arg(long)]
    home: Option<PathBuf>,

    /// Where to write the session audit log
    #[arg(long)]
    audit_log: Option<PathBuf>,

    /// Do not write the session audit log
    #[arg(long)]
    no_audit: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = SearchConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?
        .merge_with_cli(CliOverrides {
            worker_count: cli.threads,
            home_dir: cli.home.clone(),
            audit_log: cli.audit_log.clone(),
            no_audit: cli.no_audit,
            log_level: cli.log_level.clone(),
        });
    init_tracing(&config.log_level);

    let env = config.search_env()?;
    let query = build_query(&cli, &config, &env.home_dir)?;
    debug!("Submitting query: {:?}", query);

    let controller = Arc::new(JobController::new(env));
    let handler_controller = Arc::clone(&controller);
    if let Err(e) = ctrlc::set_handler(move || handler_controller.cancel()) {
        warn!("Could not install Ctrl-C handler: {}", e);
    }

    if !controller.start_search(query) {
        bail!("A search is already running");
    }

    while !controller.poll_outcome().is_terminal() {
        thread::sleep(POLL_INTERVAL);
    }
    let outcome = controller.wait();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    Ok(exit_code(&outcome))
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_query(cli: &Cli, config: &SearchConfig, home: &std::path::Path) -> Result<SearchQuery> {
    let workers = config.worker_count;
    let query = if cli.everywhere {
        SearchQuery::everywhere(home, cli.pattern.clone(), workers)
    } else if let Some(dir) = &cli.dir {
        SearchQuery::from_input(dir, cli.pattern.clone(), workers, home)
    } else {
        let cwd = std::env::current_dir().context("Failed to read the current directory")?;
        SearchQuery::scoped(cwd, cli.pattern.clone(), workers)
    };
    Ok(query)
}

fn print_outcome(outcome: &SearchOutcome) {
    for line in outcome.report_lines() {
        match (outcome, line.as_str()) {
            (SearchOutcome::Failed(_), _) => println!("{}", line.red()),
            (SearchOutcome::Cancelled, _) => println!("{}", line.yellow()),
            (_, NOT_FOUND) | (_, NOT_FOUND_IN_DIRECTORY) => println!("{}", line.yellow()),
            (_, FOUND_ELSEWHERE) => println!("{}", line.bold()),
            _ => println!("{}", line.blue()),
        }
    }

    let count = outcome.paths().len();
    if count > 0 {
        println!("\nFound {} {}", count, if count == 1 { "file" } else { "files" });
    }
}

fn exit_code(outcome: &SearchOutcome) -> ExitCode {
    match outcome {
        SearchOutcome::CompletedWithMatches(_) | SearchOutcome::CompletedWithFallback(_) => {
            ExitCode::SUCCESS
        }
        SearchOutcome::Failed(_) => ExitCode::from(2),
        _ => ExitCode::from(1),
    }
}

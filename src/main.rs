//! Journal-Harvest main entry point
//!
//! This is the command-line interface for the Journal-Harvest collector.

use clap::Parser;
use journal_harvest::config::{load_config, Config, ConfigOverrides};
use journal_harvest::crawler::{first_page_url, run_harvest};
use journal_harvest::logging;
use journal_harvest::output::RunPaths;
use journal_harvest::HarvestError;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Journal-Harvest: collect journal listings from a directory search
///
/// Journal-Harvest walks every results page for a keyword, extracts the
/// journal name, link, affiliation and accreditation, and writes a CSV file,
/// two charts and a log file into a per-run directory.
#[derive(Parser, Debug)]
#[command(name = "journal-harvest")]
#[command(version)]
#[command(about = "Collect journal listings for a keyword", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Root URL of the journal directory (overrides the config file)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Search keyword (overrides the config file)
    #[arg(short, long)]
    keyword: Option<String>,

    /// Directory under which the run directory is created
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Pause after each results page, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be fetched without fetching
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Values given on the command line, applied on top of the file
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            keyword: self.keyword.clone(),
            root_dir: self.output_dir.clone(),
            page_delay_ms: self.delay_ms,
        }
    }
}

/// Everything resolved before the first request
struct Startup {
    config: Config,
    config_hash: Option<String>,
    /// `None` for a dry run, which writes nothing
    paths: Option<RunPaths>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Console only until the run directory, and with it the log file, exists
    let startup = tracing::subscriber::with_default(
        logging::console_subscriber(cli.verbose, cli.quiet),
        || prepare(&cli),
    );
    let startup = match startup {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("An error occurred: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let paths = match startup.paths {
        Some(paths) => paths,
        None => return handle_dry_run(&startup.config),
    };

    if let Err(e) = logging::init(cli.verbose, cli.quiet, &paths.log_path) {
        eprintln!("Failed to create log file {}: {}", paths.log_path.display(), e);
        return ExitCode::FAILURE;
    }

    tracing::info!("Output directory created at: {}", paths.run_dir.display());
    tracing::info!("Visualization directory created at: {}", paths.viz_dir.display());
    match (&cli.config, &startup.config_hash) {
        (Some(path), Some(hash)) => {
            tracing::info!("Configuration loaded from {} (hash: {})", path.display(), hash)
        }
        _ => tracing::info!("Using built-in configuration"),
    }

    handle_harvest(&startup.config, &paths).await
}

/// Loads the configuration and creates the run directory
///
/// Failures are logged here, while the console subscriber is active.
fn prepare(cli: &Cli) -> Result<Startup, HarvestError> {
    let (config, config_hash) = load_config(cli.config.as_deref(), &cli.overrides())
        .map_err(|e| {
            tracing::error!("Failed to load configuration: {}", e);
            e
        })?;

    if cli.dry_run {
        return Ok(Startup {
            config,
            config_hash,
            paths: None,
        });
    }

    let paths = RunPaths::new(
        Path::new(&config.output.root_dir),
        &config.source.keyword,
        chrono::Local::now(),
    );
    paths.create().map_err(|e| {
        tracing::error!(
            "Failed to create output directory {}: {}",
            paths.run_dir.display(),
            e
        );
        e
    })?;

    Ok(Startup {
        config,
        config_hash,
        paths: Some(paths),
    })
}

/// Handles the --dry-run mode: shows the request plan without fetching
fn handle_dry_run(config: &Config) -> ExitCode {
    println!("=== Journal-Harvest Dry Run ===\n");

    println!("Source:");
    println!("  Base URL: {}", config.source.base_url);
    println!("  Keyword: {}", config.source.keyword);
    match first_page_url(&config.source) {
        Ok(url) => println!("  First request: {}", url),
        Err(e) => {
            eprintln!("An error occurred: {}", e);
            return ExitCode::FAILURE;
        }
    }

    println!("\nRequests:");
    println!("  Timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Delay after each page: {}ms", config.crawler.page_delay_ms);
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nLayout:");
    for (field, selector) in config.layout.fields() {
        println!("  {}: {}", field, selector);
    }

    println!("\nOutput:");
    println!("  Root directory: {}", config.output.root_dir);

    println!("\n✓ Configuration is valid");

    ExitCode::SUCCESS
}

/// Handles the main harvest operation
///
/// The cause of a failure is already in the log; the user gets one line.
async fn handle_harvest(config: &Config, paths: &RunPaths) -> ExitCode {
    match run_harvest(config, paths).await {
        Ok(report) => {
            tracing::info!(
                "Harvest completed: {} records from {} pages",
                report.records,
                report.total_pages
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", user_message(&e, paths));
            ExitCode::FAILURE
        }
    }
}

/// Short message shown to the user when a run fails
fn user_message(error: &HarvestError, paths: &RunPaths) -> String {
    if error.is_transport() {
        format!(
            "An error occurred! Log file has been written to {}",
            paths.log_path.display()
        )
    } else if error.is_fatal_collection() {
        "Aborted, keyword not found!".to_string()
    } else {
        format!("An error occurred: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("journal-harvest").chain(args.iter().copied()))
    }

    #[test]
    fn test_flag_overrides_file_value_before_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[crawler]\npage-delay-ms = 10").unwrap();
        let path = file.path().to_str().unwrap();

        let startup = prepare(&cli(&["--config", path, "--delay-ms", "500", "--dry-run"])).unwrap();
        assert_eq!(startup.config.crawler.page_delay_ms, 500);
        assert!(startup.config_hash.is_some());
        assert!(startup.paths.is_none());

        let result = prepare(&cli(&["--config", path, "--dry-run"]));
        assert!(matches!(result, Err(HarvestError::Config(_))));
    }

    #[test]
    fn test_prepare_creates_run_directory() {
        let root = tempfile::tempdir().unwrap();
        let root_arg = root.path().to_str().unwrap();

        let startup = prepare(&cli(&["--output-dir", root_arg, "--keyword", "physics"])).unwrap();

        let paths = startup.paths.unwrap();
        assert!(paths.viz_dir.is_dir());
        assert!(paths.run_dir.starts_with(root.path()));
    }

    #[test]
    fn test_user_message_is_one_line() {
        let paths = RunPaths::new(
            Path::new("out"),
            "physics",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        );

        let transport = HarvestError::HttpStatus {
            url: "https://example.org/journals/?q=physics".to_string(),
            status: 503,
        };
        assert_eq!(
            user_message(&transport, &paths),
            format!(
                "An error occurred! Log file has been written to {}",
                paths.log_path.display()
            )
        );
        assert_eq!(
            user_message(&HarvestError::not_found("no pagination"), &paths),
            "Aborted, keyword not found!"
        );
    }
}

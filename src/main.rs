//! remind-us - batch reminder for open merge requests and feed items
//!
//! Scans the configured integrations once, renders a chat message per source
//! and posts it to the configured alerters.

use clap::Parser;
use remind_us::alerters::default_alerters;
use remind_us::cli::{generate_completions, version_string, Cli};
use remind_us::clock::{SharedClock, SystemClock};
use remind_us::config::ConfigBuilder;
use remind_us::error::{AppError, ConfigError, FetchError, ValidationError};
use remind_us::http::build_client;
use remind_us::runner::Runner;
use remind_us::sources::default_sources;

use reqwest::header::HeaderMap;
use std::sync::Arc;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    if cli.version {
        println!("{}", version_string());
        return;
    }

    let result = match cli.completions {
        Some(shell) => generate_completions(shell),
        None => run(&cli),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let config = ConfigBuilder::new()
        .with_file(&cli.config_file)?
        .with_gitlab_token(cli.gitlab_token.clone())
        .with_slack_webhook(cli.slack_webhook.clone())
        .with_timeout(cli.timeout)
        .build();

    let timeout = config.http.timeout();
    let client = build_client(timeout, HeaderMap::new())
        .map_err(|e| AppError::HttpClient(e.to_string()))?;
    let clock: SharedClock = Arc::new(SystemClock);

    let mut runner = Runner::new(
        default_sources(client.clone(), timeout, clock),
        default_alerters(client, cli.dry_run),
    );
    let report = runner.run(&config)?;

    log::debug!(
        "Run finished: {} delivered, {} skipped, {} disabled",
        report.deliveries.len(),
        report.skipped.len(),
        report.disabled.len()
    );
    Ok(())
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Config(ConfigError::FileNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Pass --config-file <PATH> or set REMIND_US_CONFIG.");
        }
        AppError::Validate {
            source: ValidationError::MissingField { field, .. },
            ..
        } if field == "token" => {
            eprintln!();
            eprintln!("Hint: Set integrations.gitlab.token or REMIND_US_GITLAB_TOKEN.");
        }
        AppError::AlerterLoad {
            source: ValidationError::MissingField { field, .. },
            ..
        } if field == "webhook" => {
            eprintln!();
            eprintln!("Hint: Set alert.slack.webhook or REMIND_US_SLACK_WEBHOOK.");
        }
        AppError::Load {
            source: FetchError::InvalidLookback { .. },
            ..
        } => {
            eprintln!();
            eprintln!("Hint: 'since' takes durations such as 90m, 18h or 1h30m.");
        }
        _ => {}
    }
}

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use viewkeeper_config::Configuration;
use viewkeeper_query_engine::AthenaQueryEngine;
use viewkeeper_refresher::{InvocationResult, RefreshRunner, ViewRefresher};

/// Shortest allowed interval between scheduled invocations.
const MIN_SCHEDULE_SECS: u64 = 60;

/// Exit code of an invocation in which at least one view failed.
const EXIT_PARTIAL_SUCCESS: u8 = 2;

/// Viewkeeper - keeps derived views fresh by re-running their named queries
#[derive(Parser)]
#[command(name = "viewkeeper")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to a JSON config file (default: read ATHENA_* / GLUE_DATABASE /
  /// NAMED_QUERY_IDS from the environment)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Refresh every configured view once
  Refresh,

  /// Refresh every configured view on a fixed interval until interrupted
  Schedule {
    /// Seconds between invocations
    #[arg(long, default_value_t = 86_400)]
    every_secs: u64,
  },
}

fn init_logging() {
  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
  let json = std::env::var("VIEWKEEPER_LOG_JSON").ok().as_deref() == Some("1");
  if json {
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(std::io::stderr)
      .json()
      .with_target(true)
      .init();
  } else {
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(std::io::stderr)
      .with_target(true)
      .init();
  }
}

fn main() -> Result<ExitCode> {
  let cli = Cli::parse();

  let Some(command) = cli.command else {
    println!("viewkeeper - use --help to see available commands");
    return Ok(ExitCode::SUCCESS);
  };

  init_logging();

  // Configuration errors abort before any view is attempted
  let config = load_config(cli.config.as_ref())?;

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async {
    match command {
      Commands::Refresh => refresh(config).await,
      Commands::Schedule { every_secs } => schedule(config, every_secs).await,
    }
  })
}

fn load_config(path: Option<&PathBuf>) -> Result<Configuration> {
  match path {
    Some(path) => Configuration::from_json_file(path)
      .with_context(|| format!("failed to load config file: {}", path.display())),
    None => Configuration::from_env().context("failed to load configuration from environment"),
  }
}

async fn build_refresher() -> ViewRefresher {
  let engine = AthenaQueryEngine::from_env().await;
  ViewRefresher::new(Arc::new(engine))
}

async fn refresh(config: Configuration) -> Result<ExitCode> {
  let refresher = build_refresher().await;
  let result = refresher.invoke(&config).await;

  print_result(&result)?;

  Ok(exit_code(&result))
}

async fn schedule(config: Configuration, every_secs: u64) -> Result<ExitCode> {
  let interval = Duration::from_secs(every_secs.max(MIN_SCHEDULE_SECS));
  let runner = RefreshRunner::new(build_refresher().await, config, interval);

  let cancel = CancellationToken::new();
  let stopper = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      info!("interrupt received, stopping after the current invocation");
      stopper.cancel();
    }
  });

  let invocations = runner
    .start(cancel, |result| {
      if let Err(e) = print_result(result) {
        warn!(error = %e, "failed to print invocation result");
      }
    })
    .await;

  info!(invocations, "scheduler stopped");
  Ok(ExitCode::SUCCESS)
}

fn print_result(result: &InvocationResult) -> Result<()> {
  println!(
    "{}",
    serde_json::to_string_pretty(result).context("failed to serialize invocation result")?
  );
  Ok(())
}

fn exit_code(result: &InvocationResult) -> ExitCode {
  if result.is_full_success() {
    ExitCode::SUCCESS
  } else {
    ExitCode::from(EXIT_PARTIAL_SUCCESS)
  }
}

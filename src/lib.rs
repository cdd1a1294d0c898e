pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod context;
pub mod controller;
pub mod credentials;
pub mod error;
pub mod runtime;
pub mod storage;
#[cfg(test)]
mod test_support;
pub mod transcription;

use clap::Parser;

use crate::bootstrap::AppPaths;
use crate::cli::{Cli, Command, TranscribeArgs};
use crate::config::{load_config, AppConfig};
use crate::error::{AppError, AppResult};
use crate::runtime::run_transcribe;

trait CommandExecutor {
    fn transcribe(&self, config: &AppConfig, args: &TranscribeArgs) -> AppResult<()>;
}

struct DefaultCommandExecutor;

impl CommandExecutor for DefaultCommandExecutor {
    fn transcribe(&self, config: &AppConfig, args: &TranscribeArgs) -> AppResult<()> {
        let report = run_transcribe(config, &args.to_request(), args.dry_run)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", report.render_text());
        }

        if report.interrupted {
            return Err(AppError::Interrupted(format!(
                "{} inputs left untouched",
                report.abandoned
            )));
        }
        Ok(())
    }
}

fn execute_command<E: CommandExecutor>(
    command: Command,
    config: &AppConfig,
    executor: &E,
) -> AppResult<()> {
    match command {
        Command::Transcribe(args) => executor.transcribe(config, &args),
    }
}

pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let paths = AppPaths::resolve()?;
    paths.ensure_dirs()?;

    let config = load_config(&paths, &cli.to_overrides())?;

    let fallback = config.diagnostics.log_level.clone();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with_target(false)
        .with_level(true)
        .compact()
        .init();

    execute_command(cli.command, &config, &DefaultCommandExecutor)
}

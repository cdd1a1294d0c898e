use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::CliOverrides;
use crate::context::RunRequest;
use crate::transcription::language::AudioFormat;

#[derive(Debug, Parser)]
#[command(name = "transcribe-tool")]
#[command(about = "Moves staged call recordings into processing and submits transcription jobs")]
pub struct Cli {
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub region: Option<String>,

    #[arg(long, global = true)]
    pub bucket: Option<String>,

    #[arg(long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Move up to `-c` inputs into processing and submit a job for each.
    #[command(alias = "TRANSCRIBE")]
    Transcribe(TranscribeArgs),
}

#[derive(Debug, Clone, Args)]
pub struct TranscribeArgs {
    /// Environment folder under Input/, Processing/ and Output/.
    #[arg(short = 'o', value_name = "output_dir")]
    pub output_dir: String,

    /// `E` for English (en-US) or `F` for French (fr-CA).
    #[arg(short = 'l', value_name = "language")]
    pub language: String,

    #[arg(short = 'c', value_name = "amount")]
    pub amount: usize,

    #[arg(short = 't', value_name = "type", value_enum)]
    pub format: AudioFormat,

    #[arg(long)]
    pub json: bool,

    /// List the candidates without moving or submitting anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn to_overrides(&self) -> CliOverrides {
        CliOverrides {
            config_path: self.config.clone(),
            region: self.region.clone(),
            bucket: self.bucket.clone(),
            profile: self.profile.clone(),
        }
    }
}

impl TranscribeArgs {
    pub fn to_request(&self) -> RunRequest {
        RunRequest {
            env: self.output_dir.clone(),
            language: self.language.clone(),
            amount: self.amount,
            format: self.format,
        }
    }
}

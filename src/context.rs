use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::transcription::language::{AudioFormat, LanguageCode};
use crate::transcription::naming::purpose_for;

pub const MAX_ITEMS_HARD_CAP: usize = 500;

/// Raw selection as typed on the command line, before validation.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub env: String,
    pub language: String,
    pub amount: usize,
    pub format: AudioFormat,
}

/// Immutable settings for one invocation, shared by reference with every
/// component of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub env: String,
    pub purpose: String,
    pub language: LanguageCode,
    pub format: AudioFormat,
    pub max_items: usize,
    pub bucket: String,
}

impl RunContext {
    pub fn prepare(request: &RunRequest, config: &AppConfig) -> AppResult<Self> {
        let env = request.env.trim();
        if env.is_empty() {
            return Err(AppError::Config(
                "transcribe requires an output directory (-o)".to_owned(),
            ));
        }
        if !env
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(AppError::Config(format!(
                "output directory `{env}` may only contain letters, digits, `.`, `_` and `-`"
            )));
        }

        let language = LanguageCode::from_short_code(request.language.trim())?;

        let ceiling = config.batch.max_items_ceiling.min(MAX_ITEMS_HARD_CAP);
        if request.amount == 0 {
            return Err(AppError::Config(
                "transcribe requires an amount (-c) greater than 0".to_owned(),
            ));
        }
        if request.amount > ceiling {
            return Err(AppError::Config(format!(
                "please enter an amount less than or equal to {ceiling}"
            )));
        }

        if config.aws.bucket.trim().is_empty() {
            return Err(AppError::Config("aws.bucket must not be empty".to_owned()));
        }

        Ok(Self {
            env: env.to_owned(),
            purpose: purpose_for(env, &config.batch.purpose_suffix),
            language,
            format: request.format,
            max_items: request.amount,
            bucket: config.aws.bucket.clone(),
        })
    }

    pub fn extension(&self) -> String {
        self.format.extension()
    }
}

use std::path::PathBuf;

use regex::Regex;

use crate::bootstrap::AppPaths;
use crate::config::schema::{AppConfig, AwsConfig};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub region: Option<String>,
    pub bucket: Option<String>,
    pub profile: Option<String>,
}

pub fn load_config(paths: &AppPaths, overrides: &CliOverrides) -> AppResult<AppConfig> {
    let config_path = overrides
        .config_path
        .clone()
        .unwrap_or_else(|| paths.config_file.clone());

    let mut config = if config_path.exists() {
        let raw = std::fs::read_to_string(&config_path)?;
        toml::from_str::<AppConfig>(&raw)?
    } else {
        let defaults = AppConfig::default();
        write_default_config(&config_path, &defaults)?;
        defaults
    };

    apply_env_overrides(&mut config);
    apply_cli_overrides(&mut config, overrides);

    validate(&config)?;
    Ok(config)
}

fn write_default_config(path: &PathBuf, defaults: &AppConfig) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let data = toml::to_string_pretty(defaults)?;
    std::fs::write(path, data)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }

    Ok(())
}

fn validate(config: &AppConfig) -> AppResult<()> {
    if config.aws.region.trim().is_empty() {
        return Err(AppError::Config("aws.region must not be empty".to_owned()));
    }

    if !(900..=43_200).contains(&config.aws.session_duration_seconds) {
        return Err(AppError::Config(
            "aws.session_duration_seconds must be between 900 and 43200".to_owned(),
        ));
    }

    if config.aws.credential_refresh_seconds >= config.aws.session_duration_seconds {
        return Err(AppError::Config(
            "aws.credential_refresh_seconds must be shorter than aws.session_duration_seconds"
                .to_owned(),
        ));
    }

    if config.batch.purpose_suffix.trim().is_empty() {
        return Err(AppError::Config(
            "batch.purpose_suffix must not be empty".to_owned(),
        ));
    }

    if config.batch.max_items_ceiling == 0 {
        return Err(AppError::Config(
            "batch.max_items_ceiling must be > 0".to_owned(),
        ));
    }

    if config.batch.cooldown_every == 0 {
        return Err(AppError::Config(
            "batch.cooldown_every must be > 0".to_owned(),
        ));
    }

    for (field, arn) in [
        ("aws.transcribe_role_arn", &config.aws.transcribe_role_arn),
        ("aws.storage_role_arn", &config.aws.storage_role_arn),
    ] {
        if !arn.is_empty() && !role_arn_pattern()?.is_match(arn) {
            return Err(AppError::Config(format!(
                "{field} `{arn}` is not an IAM role ARN"
            )));
        }
    }

    Ok(())
}

/// Both roles must be set before any AWS session is opened.
pub fn require_roles(aws: &AwsConfig) -> AppResult<()> {
    if aws.transcribe_role_arn.trim().is_empty() {
        return Err(AppError::Config(
            "aws.transcribe_role_arn is required".to_owned(),
        ));
    }
    if aws.storage_role_arn.trim().is_empty() {
        return Err(AppError::Config(
            "aws.storage_role_arn is required".to_owned(),
        ));
    }
    Ok(())
}

fn role_arn_pattern() -> AppResult<Regex> {
    Regex::new(r"^arn:aws[a-z-]*:iam::\d{12}:role/[\w+=,.@/-]+$")
        .map_err(|error| AppError::Config(format!("role arn pattern: {error}")))
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(value) = std::env::var("TRANSCRIBE_TOOL_REGION") {
        config.aws.region = value;
    }
    if let Ok(value) = std::env::var("TRANSCRIBE_TOOL_BUCKET") {
        config.aws.bucket = value;
    }
    if let Ok(value) = std::env::var("TRANSCRIBE_TOOL_PROFILE") {
        config.aws.profile = value;
    }
    if let Ok(value) = std::env::var("TRANSCRIBE_TOOL_TRANSCRIBE_ROLE_ARN") {
        config.aws.transcribe_role_arn = value.trim().to_owned();
    }
    if let Ok(value) = std::env::var("TRANSCRIBE_TOOL_STORAGE_ROLE_ARN") {
        config.aws.storage_role_arn = value.trim().to_owned();
    }
    if let Ok(value) = std::env::var("TRANSCRIBE_TOOL_SESSION_DURATION_SECONDS") {
        if let Ok(parsed) = value.parse::<u32>() {
            config.aws.session_duration_seconds = parsed;
        }
    }
    if let Ok(value) = std::env::var("TRANSCRIBE_TOOL_CREDENTIAL_REFRESH_SECONDS") {
        if let Ok(parsed) = value.parse::<u32>() {
            config.aws.credential_refresh_seconds = parsed;
        }
    }
    if let Ok(value) = std::env::var("TRANSCRIBE_TOOL_PURPOSE_SUFFIX") {
        config.batch.purpose_suffix = value;
    }
    if let Ok(value) = std::env::var("TRANSCRIBE_TOOL_COOLDOWN_EVERY") {
        if let Ok(parsed) = value.parse::<usize>() {
            config.batch.cooldown_every = parsed;
        }
    }
    if let Ok(value) = std::env::var("TRANSCRIBE_TOOL_COOLDOWN_SECONDS") {
        if let Ok(parsed) = value.parse::<u64>() {
            config.batch.cooldown_seconds = parsed;
        }
    }
    if let Ok(value) = std::env::var("TRANSCRIBE_TOOL_LOG_LEVEL") {
        config.diagnostics.log_level = value;
    }
}

fn apply_cli_overrides(config: &mut AppConfig, overrides: &CliOverrides) {
    if let Some(value) = &overrides.region {
        config.aws.region = value.clone();
    }
    if let Some(value) = &overrides.bucket {
        config.aws.bucket = value.clone();
    }
    if let Some(value) = &overrides.profile {
        config.aws.profile = value.clone();
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("toml serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("credential acquisition failed: {0}")]
    Credentials(String),

    #[error("credentials expired: {0}")]
    CredentialsExpired(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("transcription request failed: {0}")]
    Transcription(String),

    #[error("interrupted: {0}")]
    Interrupted(String),
}

impl AppError {
    /// Faults that abort the whole run instead of a single item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Config(_) | AppError::Credentials(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::AppError;
    use serde::ser::Error as _;

    #[test]
    fn display_messages_cover_all_variants() {
        let cases = vec![
            (
                AppError::Io(std::io::Error::other("disk gone")),
                "io error: disk gone",
            ),
            (
                AppError::TomlParse(toml::from_str::<toml::Value>("not= [valid").unwrap_err()),
                "toml parse error: ",
            ),
            (
                AppError::TomlSerialize(toml::ser::Error::custom("serialize failed")),
                "toml serialize error: serialize failed",
            ),
            (
                AppError::Json(serde_json::from_str::<serde_json::Value>("{bad").unwrap_err()),
                "json error: ",
            ),
            (
                AppError::Config("bad config".to_owned()),
                "invalid configuration: bad config",
            ),
            (
                AppError::Credentials("access denied".to_owned()),
                "credential acquisition failed: access denied",
            ),
            (
                AppError::CredentialsExpired("token".to_owned()),
                "credentials expired: token",
            ),
            (
                AppError::Storage("copy failed".to_owned()),
                "storage error: copy failed",
            ),
            (
                AppError::Transcription("throttled".to_owned()),
                "transcription request failed: throttled",
            ),
            (
                AppError::Interrupted("ctrl-c".to_owned()),
                "interrupted: ctrl-c",
            ),
        ];

        for (error, expected_prefix) in cases {
            let display = format!("{error}");
            let debug = format!("{error:?}");
            assert!(
                display.starts_with(expected_prefix),
                "display message `{display}` did not start with `{expected_prefix}`"
            );
            assert!(!display.trim().is_empty());
            assert!(!debug.trim().is_empty());
        }
    }

    #[test]
    fn only_preflight_faults_are_fatal() {
        assert!(AppError::Config("x".to_owned()).is_fatal());
        assert!(AppError::Credentials("x".to_owned()).is_fatal());
        assert!(!AppError::Storage("x".to_owned()).is_fatal());
        assert!(!AppError::Transcription("x".to_owned()).is_fatal());
        assert!(!AppError::CredentialsExpired("x".to_owned()).is_fatal());
    }
}

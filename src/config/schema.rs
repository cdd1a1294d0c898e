use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::controller::CooldownPolicy;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub aws: AwsConfig,
    pub batch: BatchConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    pub region: String,
    pub bucket: String,
    /// Named profile holding the long-lived identity used to assume roles.
    pub profile: String,
    pub transcribe_role_arn: String,
    pub storage_role_arn: String,
    pub transcribe_session_name: String,
    pub storage_session_name: String,
    pub session_duration_seconds: u32,
    /// Cached credentials are replaced once they are this close to expiry.
    pub credential_refresh_seconds: u32,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: "ca-central-1".to_owned(),
            bucket: "test-transcripts-calls".to_owned(),
            profile: "transcribe".to_owned(),
            transcribe_role_arn: String::new(),
            storage_role_arn: String::new(),
            transcribe_session_name: "transcribe_session".to_owned(),
            storage_session_name: "s3_session".to_owned(),
            session_duration_seconds: 3_600,
            credential_refresh_seconds: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub purpose_suffix: String,
    pub max_items_ceiling: usize,
    pub cooldown_every: usize,
    pub cooldown_seconds: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            purpose_suffix: "test".to_owned(),
            max_items_ceiling: 500,
            cooldown_every: 100,
            cooldown_seconds: 30,
        }
    }
}

impl BatchConfig {
    pub fn cooldown_policy(&self) -> CooldownPolicy {
        CooldownPolicy {
            every: self.cooldown_every,
            pause: Duration::from_secs(self.cooldown_seconds),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub log_level: String,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
        }
    }
}

use std::sync::Arc;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_sts::error::DisplayErrorContext;
use chrono::{DateTime, Utc};
use tokio::runtime::Runtime;

use crate::credentials::session::{CredentialProvider, RoleSession, TemporaryCredentials};
use crate::error::{AppError, AppResult};

/// Exchanges the long-lived profile identity for role-scoped credentials.
pub struct StsCredentialProvider {
    runtime: Arc<Runtime>,
    client: aws_sdk_sts::Client,
    duration_seconds: i32,
}

impl StsCredentialProvider {
    pub fn new(runtime: Arc<Runtime>, profile: &str, region: &str, duration_seconds: u32) -> Self {
        let sdk_config = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .profile_name(profile)
                .region(Region::new(region.to_owned()))
                .load(),
        );
        let duration_seconds = i32::try_from(duration_seconds).unwrap_or(i32::MAX);

        Self {
            runtime,
            client: aws_sdk_sts::Client::new(&sdk_config),
            duration_seconds,
        }
    }
}

impl CredentialProvider for StsCredentialProvider {
    fn assume_role(&self, session: &RoleSession) -> AppResult<TemporaryCredentials> {
        let output = self
            .runtime
            .block_on(
                self.client
                    .assume_role()
                    .role_arn(&session.role_arn)
                    .role_session_name(&session.session_name)
                    .duration_seconds(self.duration_seconds)
                    .send(),
            )
            .map_err(|error| {
                AppError::Credentials(format!(
                    "assume role `{}` failed: {}",
                    session.role_arn,
                    DisplayErrorContext(&error)
                ))
            })?;

        let credentials = output.credentials().ok_or_else(|| {
            AppError::Credentials(format!(
                "assume role `{}` returned no credentials",
                session.role_arn
            ))
        })?;
        let expires_at = DateTime::<Utc>::from_timestamp(credentials.expiration().secs(), 0)
            .ok_or_else(|| {
                AppError::Credentials(format!(
                    "assume role `{}` returned an invalid expiration",
                    session.role_arn
                ))
            })?;

        Ok(TemporaryCredentials {
            access_key_id: credentials.access_key_id().to_owned(),
            secret_access_key: credentials.secret_access_key().to_owned(),
            session_token: credentials.session_token().to_owned(),
            expires_at,
        })
    }
}

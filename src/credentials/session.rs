use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};

use crate::error::{AppError, AppResult};

/// Time-boxed credentials returned by a role assumption.
#[derive(Clone, PartialEq, Eq)]
pub struct TemporaryCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
}

impl TemporaryCredentials {
    pub fn expires_within(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        self.expires_at - margin <= now
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for TemporaryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemporaryCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSession {
    pub role_arn: String,
    pub session_name: String,
}

pub trait CredentialProvider: Send + Sync {
    fn assume_role(&self, session: &RoleSession) -> AppResult<TemporaryCredentials>;
}

/// Caches one role's credentials and re-acquires them before they expire.
pub struct SessionCache {
    provider: Arc<dyn CredentialProvider>,
    session: RoleSession,
    refresh_margin: Duration,
    cached: Mutex<Option<TemporaryCredentials>>,
}

impl SessionCache {
    pub fn new(provider: Arc<dyn CredentialProvider>, session: RoleSession) -> Self {
        Self {
            provider,
            session,
            refresh_margin: Duration::minutes(5),
            cached: Mutex::new(None),
        }
    }

    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    pub fn session(&self) -> &RoleSession {
        &self.session
    }

    pub fn current(&self) -> AppResult<TemporaryCredentials> {
        let mut cached = self.lock();
        if let Some(credentials) = cached.as_ref() {
            if !credentials.expires_within(Utc::now(), self.refresh_margin) {
                return Ok(credentials.clone());
            }
            tracing::debug!(role = %self.session.role_arn, "cached credentials near expiry");
        }

        let fresh = self.provider.assume_role(&self.session)?;
        tracing::debug!(
            role = %self.session.role_arn,
            session = %self.session.session_name,
            expires_at = %fresh.expires_at.to_rfc3339(),
            "acquired temporary credentials"
        );
        *cached = Some(fresh.clone());
        Ok(fresh)
    }

    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    /// Runs `op` with current credentials; an expired-token fault triggers
    /// one re-acquisition and a single retry.
    pub fn with_refresh<T, F>(&self, mut op: F) -> AppResult<T>
    where
        F: FnMut(&TemporaryCredentials) -> AppResult<T>,
    {
        let credentials = self.current()?;
        match op(&credentials) {
            Err(AppError::CredentialsExpired(detail)) => {
                tracing::warn!(
                    role = %self.session.role_arn,
                    "credentials rejected as expired, re-acquiring: {detail}"
                );
                self.invalidate();
                let fresh = self.current()?;
                op(&fresh)
            }
            other => other,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<TemporaryCredentials>> {
        self.cached
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

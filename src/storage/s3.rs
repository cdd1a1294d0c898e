use std::sync::{Arc, Mutex, MutexGuard};

use futures::{StreamExt, TryStreamExt};
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as StorePath;
use object_store::ObjectStore;
use tokio::runtime::Runtime;

use crate::credentials::{SessionCache, TemporaryCredentials};
use crate::error::{AppError, AppResult};
use crate::storage::gateway::StorageGateway;

/// Blocking S3 gateway bound to one bucket. The underlying store is rebuilt
/// whenever the session hands out new credentials.
pub struct S3Storage {
    runtime: Arc<Runtime>,
    bucket: String,
    region: String,
    session: SessionCache,
    store: Mutex<Option<(String, Arc<AmazonS3>)>>,
}

impl S3Storage {
    pub fn new(
        runtime: Arc<Runtime>,
        bucket: impl Into<String>,
        region: impl Into<String>,
        session: SessionCache,
    ) -> Self {
        Self {
            runtime,
            bucket: bucket.into(),
            region: region.into(),
            session,
            store: Mutex::new(None),
        }
    }

    fn store_for(&self, credentials: &TemporaryCredentials) -> AppResult<Arc<AmazonS3>> {
        let mut cached = self.lock_store();
        if let Some((access_key_id, store)) = cached.as_ref() {
            if access_key_id == &credentials.access_key_id {
                return Ok(store.clone());
            }
        }

        let store = AmazonS3Builder::new()
            .with_region(&self.region)
            .with_bucket_name(&self.bucket)
            .with_access_key_id(&credentials.access_key_id)
            .with_secret_access_key(&credentials.secret_access_key)
            .with_token(&credentials.session_token)
            .build()
            .map_err(|error| AppError::Storage(format!("s3 client init failed: {error}")))?;
        let store = Arc::new(store);
        *cached = Some((credentials.access_key_id.clone(), store.clone()));
        Ok(store)
    }

    fn lock_store(&self) -> MutexGuard<'_, Option<(String, Arc<AmazonS3>)>> {
        self.store
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

/// Listed locations come back verbatim, so keys are parsed as-is rather than
/// re-encoded with `Path::from`.
fn store_path(key: &str) -> AppResult<StorePath> {
    StorePath::parse(key)
        .map_err(|error| AppError::Storage(format!("invalid object key `{key}`: {error}")))
}

// HEAD responses carry no body, so an expired token on `exists` is only
// caught by the session's proactive refresh, not by this text match.
fn classify(operation: &str, key: &str, error: object_store::Error) -> AppError {
    let detail = error.to_string();
    if detail.contains("ExpiredToken") || detail.contains("TokenRefreshRequired") {
        AppError::CredentialsExpired(format!("{operation} `{key}`: {detail}"))
    } else {
        AppError::Storage(format!("{operation} `{key}` failed: {detail}"))
    }
}

impl StorageGateway for S3Storage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn exists(&self, key: &str) -> AppResult<bool> {
        tracing::debug!(bucket = %self.bucket, key, "head object");
        let path = store_path(key)?;
        self.session.with_refresh(|credentials| {
            let store = self.store_for(credentials)?;
            match self.runtime.block_on(store.head(&path)) {
                Ok(_) => Ok(true),
                Err(object_store::Error::NotFound { .. }) => Ok(false),
                Err(error) => Err(classify("head", key, error)),
            }
        })
    }

    fn copy(&self, source_key: &str, dest_key: &str) -> AppResult<()> {
        tracing::debug!(bucket = %self.bucket, source_key, dest_key, "copy object");
        let from = store_path(source_key)?;
        let to = store_path(dest_key)?;
        self.session.with_refresh(|credentials| {
            let store = self.store_for(credentials)?;
            self.runtime
                .block_on(store.copy(&from, &to))
                .map_err(|error| classify("copy", source_key, error))
        })
    }

    fn delete(&self, key: &str) -> AppResult<()> {
        tracing::debug!(bucket = %self.bucket, key, "delete object");
        let path = store_path(key)?;
        self.session.with_refresh(|credentials| {
            let store = self.store_for(credentials)?;
            self.runtime
                .block_on(store.delete(&path))
                .map_err(|error| classify("delete", key, error))
        })
    }

    fn list(&self, prefix: &str, max_items: usize) -> AppResult<Vec<String>> {
        tracing::debug!(bucket = %self.bucket, prefix, max_items, "list objects");
        let path = store_path(prefix)?;
        self.session.with_refresh(|credentials| {
            let store = self.store_for(credentials)?;
            self.runtime
                .block_on(async {
                    store
                        .list(Some(&path))
                        .take(max_items)
                        .map_ok(|meta| meta.location.to_string())
                        .try_collect::<Vec<_>>()
                        .await
                })
                .map_err(|error| classify("list", prefix, error))
        })
    }
}

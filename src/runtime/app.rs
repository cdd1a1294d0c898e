use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Duration;

use crate::config::{require_roles, AppConfig};
use crate::context::{RunContext, RunRequest};
use crate::controller::{BatchOrchestrator, BatchReport, ThreadSleeper};
use crate::credentials::{CredentialProvider, RoleSession, SessionCache, StsCredentialProvider};
use crate::error::{AppError, AppResult};
use crate::storage::S3Storage;
use crate::transcription::AwsTranscribeService;

/// Validates the request, opens both role sessions and drives one batch
/// against the configured bucket.
pub fn run_transcribe(
    config: &AppConfig,
    request: &RunRequest,
    dry_run: bool,
) -> AppResult<BatchReport> {
    let context = RunContext::prepare(request, config)?;
    require_roles(&config.aws)?;

    let runtime = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?,
    );

    let provider: Arc<dyn CredentialProvider> = Arc::new(StsCredentialProvider::new(
        runtime.clone(),
        &config.aws.profile,
        &config.aws.region,
        config.aws.session_duration_seconds,
    ));
    let refresh_margin = Duration::seconds(i64::from(config.aws.credential_refresh_seconds));
    let storage_session = SessionCache::new(
        provider.clone(),
        RoleSession {
            role_arn: config.aws.storage_role_arn.clone(),
            session_name: config.aws.storage_session_name.clone(),
        },
    )
    .with_refresh_margin(refresh_margin);
    let transcribe_session = SessionCache::new(
        provider,
        RoleSession {
            role_arn: config.aws.transcribe_role_arn.clone(),
            session_name: config.aws.transcribe_session_name.clone(),
        },
    )
    .with_refresh_margin(refresh_margin);

    storage_session.current()?;
    if !dry_run {
        transcribe_session.current()?;
    }
    tracing::info!(
        bucket = %context.bucket,
        region = %config.aws.region,
        env = %context.env,
        purpose = %context.purpose,
        storage_role = %storage_session.session().role_arn,
        transcribe_role = %transcribe_session.session().role_arn,
        "sessions established"
    );

    let storage = S3Storage::new(
        runtime.clone(),
        context.bucket.clone(),
        config.aws.region.clone(),
        storage_session,
    );
    let service = AwsTranscribeService::new(runtime, config.aws.region.clone(), transcribe_session);

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .map_err(|error| {
        AppError::Interrupted(format!("failed to register ctrl-c handler: {error}"))
    })?;

    let sleeper = ThreadSleeper;
    let orchestrator = BatchOrchestrator::new(&context, &storage, &service, &sleeper)
        .with_cooldown(config.batch.cooldown_policy())
        .with_shutdown(&shutdown);

    if dry_run {
        orchestrator.plan()
    } else {
        orchestrator.run()
    }
}

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

use aws_sdk_transcribe::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_transcribe::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_transcribe::operation::start_transcription_job::StartTranscriptionJobError;
use aws_sdk_transcribe::types::{LanguageCode, Media, MediaFormat, Settings};
use tokio::runtime::Runtime;

use crate::credentials::{SessionCache, TemporaryCredentials};
use crate::error::{AppError, AppResult};
use crate::transcription::request_builder::JobDescriptor;

pub trait TranscriptionService {
    fn start_job(&self, job: &JobDescriptor) -> AppResult<()>;
}

pub struct AwsTranscribeService {
    runtime: Arc<Runtime>,
    region: String,
    session: SessionCache,
    client: Mutex<Option<(String, aws_sdk_transcribe::Client)>>,
}

impl AwsTranscribeService {
    pub fn new(runtime: Arc<Runtime>, region: impl Into<String>, session: SessionCache) -> Self {
        Self {
            runtime,
            region: region.into(),
            session,
            client: Mutex::new(None),
        }
    }

    fn client_for(&self, credentials: &TemporaryCredentials) -> aws_sdk_transcribe::Client {
        let mut cached = self.lock_client();
        if let Some((access_key_id, client)) = cached.as_ref() {
            if access_key_id == &credentials.access_key_id {
                return client.clone();
            }
        }

        let provider = Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            Some(credentials.session_token.clone()),
            Some(SystemTime::from(credentials.expires_at)),
            "sts-assume-role",
        );
        let config = aws_sdk_transcribe::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .credentials_provider(provider)
            .build();
        let client = aws_sdk_transcribe::Client::from_conf(config);
        *cached = Some((credentials.access_key_id.clone(), client.clone()));
        client
    }

    fn lock_client(&self) -> MutexGuard<'_, Option<(String, aws_sdk_transcribe::Client)>> {
        self.client
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl TranscriptionService for AwsTranscribeService {
    fn start_job(&self, job: &JobDescriptor) -> AppResult<()> {
        let media = Media::builder().media_file_uri(&job.media_uri).build();
        let settings = Settings::builder()
            .channel_identification(job.settings.channel_identification)
            .show_speaker_labels(job.settings.show_speaker_labels)
            .max_speaker_labels(job.settings.max_speaker_labels)
            .show_alternatives(job.settings.show_alternatives)
            .max_alternatives(job.settings.max_alternatives)
            .build();

        self.session.with_refresh(|credentials| {
            let client = self.client_for(credentials);
            self.runtime
                .block_on(
                    client
                        .start_transcription_job()
                        .transcription_job_name(&job.job_name)
                        .media_format(MediaFormat::from(job.media_format.as_str()))
                        .media(media.clone())
                        .language_code(LanguageCode::from(job.language.as_str()))
                        .output_bucket_name(&job.output_bucket)
                        .output_key(&job.output_key)
                        .settings(settings.clone())
                        .send(),
                )
                .map(|_| ())
                .map_err(|error| classify(&job.job_name, error))
        })
    }
}

fn classify<R>(job_name: &str, error: SdkError<StartTranscriptionJobError, R>) -> AppError
where
    R: std::fmt::Debug,
{
    if let Some(service_error) = error.as_service_error() {
        if service_error.is_conflict_exception() {
            return AppError::Transcription(format!(
                "job `{job_name}` already exists: {}",
                service_error.message().unwrap_or("conflict")
            ));
        }
        if service_error.is_limit_exceeded_exception() {
            return AppError::Transcription(format!(
                "job `{job_name}` rejected, service limit exceeded: {}",
                service_error.message().unwrap_or("limit exceeded")
            ));
        }
        if matches!(
            service_error.code(),
            Some("ExpiredTokenException" | "ExpiredToken")
        ) {
            return AppError::CredentialsExpired(format!("start job `{job_name}`"));
        }
    }

    AppError::Transcription(format!(
        "start job `{job_name}` failed: {}",
        DisplayErrorContext(&error)
    ))
}

use serde::Serialize;

use crate::context::RunContext;
use crate::error::AppResult;
use crate::storage::{basename, StorageGateway};
use crate::transcription::engine::TranscriptionService;
use crate::transcription::guard::IdempotencyGuard;
use crate::transcription::naming::{derive_job_id, derive_output_key};
use crate::transcription::request_builder::build_request;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Submitted { job_name: String, output_key: String },
    AlreadyTranscribed { output_key: String },
}

pub struct JobSubmitter<'a> {
    context: &'a RunContext,
    storage: &'a dyn StorageGateway,
    service: &'a dyn TranscriptionService,
}

impl<'a> JobSubmitter<'a> {
    pub fn new(
        context: &'a RunContext,
        storage: &'a dyn StorageGateway,
        service: &'a dyn TranscriptionService,
    ) -> Self {
        Self {
            context,
            storage,
            service,
        }
    }

    pub fn submit(&self, processing_key: &str) -> AppResult<SubmitOutcome> {
        let job_name = derive_job_id(&self.context.purpose, basename(processing_key));
        let output_key = derive_output_key(&self.context.env, &job_name);

        if IdempotencyGuard::new(self.storage).already_transcribed(&output_key)? {
            tracing::info!(output_key = %output_key, "{output_key} key is already transcribed");
            return Ok(SubmitOutcome::AlreadyTranscribed { output_key });
        }

        let request = build_request(self.context, job_name, processing_key, output_key);
        self.service.start_job(&request)?;
        tracing::info!(
            job_name = %request.job_name,
            media_uri = %request.media_uri,
            output_key = %request.output_key,
            "transcription job started"
        );

        Ok(SubmitOutcome::Submitted {
            job_name: request.job_name,
            output_key: request.output_key,
        })
    }
}

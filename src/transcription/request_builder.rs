use serde::Serialize;

use crate::context::RunContext;
use crate::transcription::language::{AudioFormat, LanguageCode};

/// Fixed service settings applied to every job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TranscriptionSettings {
    pub channel_identification: bool,
    pub show_speaker_labels: bool,
    pub max_speaker_labels: i32,
    pub show_alternatives: bool,
    pub max_alternatives: i32,
}

pub const SETTINGS_POLICY: TranscriptionSettings = TranscriptionSettings {
    channel_identification: false,
    show_speaker_labels: true,
    max_speaker_labels: 3,
    show_alternatives: true,
    max_alternatives: 2,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobDescriptor {
    pub job_name: String,
    pub media_format: AudioFormat,
    pub media_uri: String,
    pub language: LanguageCode,
    pub output_bucket: String,
    pub output_key: String,
    pub settings: TranscriptionSettings,
}

pub fn media_uri(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}

pub fn build_request(
    context: &RunContext,
    job_name: String,
    processing_key: &str,
    output_key: String,
) -> JobDescriptor {
    JobDescriptor {
        job_name,
        media_format: context.format,
        media_uri: media_uri(&context.bucket, processing_key),
        language: context.language,
        output_bucket: context.bucket.clone(),
        output_key,
        settings: SETTINGS_POLICY,
    }
}

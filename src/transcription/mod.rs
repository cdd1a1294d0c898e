pub mod engine;
pub mod guard;
pub mod language;
pub mod naming;
pub mod request_builder;
pub mod submitter;

pub use engine::{AwsTranscribeService, TranscriptionService};
pub use guard::IdempotencyGuard;
pub use language::{AudioFormat, LanguageCode};
pub use request_builder::{JobDescriptor, TranscriptionSettings, SETTINGS_POLICY};
pub use submitter::{JobSubmitter, SubmitOutcome};

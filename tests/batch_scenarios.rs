use std::sync::Mutex;
use std::time::Duration;

use transcribe_tool::config::AppConfig;
use transcribe_tool::context::{RunContext, RunRequest};
use transcribe_tool::controller::{BatchOrchestrator, ItemState, Sleeper};
use transcribe_tool::error::AppResult;
use transcribe_tool::storage::{MemoryStorage, TransitionKind};
use transcribe_tool::transcription::{
    AudioFormat, JobDescriptor, LanguageCode, TranscriptionService,
};

const BUCKET: &str = "test-transcripts-calls";

/// Accepts every job and, when given a bucket, drops the finished
/// transcript into it the way the real service eventually does.
struct CompletingService<'a> {
    output: Option<&'a MemoryStorage>,
    jobs: Mutex<Vec<JobDescriptor>>,
}

impl<'a> CompletingService<'a> {
    fn pending() -> Self {
        Self {
            output: None,
            jobs: Mutex::new(Vec::new()),
        }
    }

    fn writing_to(storage: &'a MemoryStorage) -> Self {
        Self {
            output: Some(storage),
            jobs: Mutex::new(Vec::new()),
        }
    }

    fn jobs(&self) -> Vec<JobDescriptor> {
        self.jobs.lock().expect("lock jobs").clone()
    }
}

impl TranscriptionService for CompletingService<'_> {
    fn start_job(&self, job: &JobDescriptor) -> AppResult<()> {
        if let Some(storage) = self.output {
            storage.put(job.output_key.clone(), b"{}".to_vec());
        }
        self.jobs.lock().expect("lock jobs").push(job.clone());
        Ok(())
    }
}

#[derive(Default)]
struct NoSleep {
    pauses: Mutex<Vec<Duration>>,
}

impl Sleeper for NoSleep {
    fn sleep(&self, duration: Duration) {
        self.pauses.lock().expect("lock pauses").push(duration);
    }
}

fn dev_context(amount: usize) -> RunContext {
    RunContext::prepare(
        &RunRequest {
            env: "dev".to_owned(),
            language: "E".to_owned(),
            amount,
            format: AudioFormat::Wav,
        },
        &AppConfig::default(),
    )
    .expect("valid request")
}

#[test]
fn fresh_input_is_moved_and_submitted() {
    let context = dev_context(10);
    let storage = MemoryStorage::with_objects(BUCKET, ["Input/dev/call1.wav"]);
    let service = CompletingService::pending();
    let sleeper = NoSleep::default();

    let report = BatchOrchestrator::new(&context, &storage, &service, &sleeper)
        .run()
        .expect("run");

    assert!(!storage.contains("Input/dev/call1.wav"));
    assert!(storage.contains("Processing/dev/call1.wav"));

    let jobs = service.jobs();
    assert_eq!(jobs.len(), 1);
    let job = &jobs[0];
    assert_eq!(job.job_name, "dev-test-call1");
    assert_eq!(
        job.media_uri,
        "s3://test-transcripts-calls/Processing/dev/call1.wav"
    );
    assert_eq!(job.output_bucket, BUCKET);
    assert_eq!(job.output_key, "Output/dev/dev-test-call1.json");
    assert_eq!(job.language, LanguageCode::EnUs);
    assert_eq!(job.media_format, AudioFormat::Wav);

    assert_eq!(report.listed, 1);
    assert_eq!(report.submitted, 1);
    assert_eq!(report.items[0].state, ItemState::Submitted);
    assert_eq!(report.items[0].transition, Some(TransitionKind::Moved));
}

#[test]
fn rerun_with_existing_transcript_moves_but_submits_nothing() {
    let context = dev_context(10);
    let storage = MemoryStorage::with_objects(
        BUCKET,
        ["Input/dev/call1.wav", "Output/dev/dev-test-call1.json"],
    );
    let service = CompletingService::pending();
    let sleeper = NoSleep::default();

    let report = BatchOrchestrator::new(&context, &storage, &service, &sleeper)
        .run()
        .expect("run");

    assert!(storage.contains("Processing/dev/call1.wav"));
    assert!(!storage.contains("Input/dev/call1.wav"));
    assert!(service.jobs().is_empty());
    assert_eq!(report.skipped, 1);
    assert_eq!(report.items[0].state, ItemState::Skipped);
    assert_eq!(
        report.items[0].output_key.as_deref(),
        Some("Output/dev/dev-test-call1.json")
    );
}

#[test]
fn reuploaded_input_is_transcribed_only_once() {
    let context = dev_context(10);
    let storage = MemoryStorage::with_objects(BUCKET, ["Input/dev/call1.wav"]);
    let service = CompletingService::writing_to(&storage);
    let sleeper = NoSleep::default();
    let orchestrator = BatchOrchestrator::new(&context, &storage, &service, &sleeper);

    let first = orchestrator.run().expect("first run");
    storage.put("Input/dev/call1.wav", Vec::new());
    let second = orchestrator.run().expect("second run");

    assert_eq!(first.submitted, 1);
    assert_eq!(second.submitted, 0);
    assert_eq!(second.skipped, 1);
    assert_eq!(service.jobs().len(), 1);
}

#[test]
fn undeletable_input_is_left_duplicated_and_still_submitted() {
    let context = dev_context(10);
    let storage = MemoryStorage::with_objects(BUCKET, ["Input/dev/call2.wav"]);
    storage.fail_delete_of("Input/dev/call2.wav");
    let service = CompletingService::pending();
    let sleeper = NoSleep::default();

    let report = BatchOrchestrator::new(&context, &storage, &service, &sleeper)
        .run()
        .expect("run");

    assert!(storage.contains("Input/dev/call2.wav"));
    assert!(storage.contains("Processing/dev/call2.wav"));
    assert_eq!(report.items[0].transition, Some(TransitionKind::DuplicateLeft));
    assert_eq!(report.submitted, 1);
    assert_eq!(service.jobs()[0].job_name, "dev-test-call2");
}

#[test]
fn other_envs_and_formats_are_left_alone() {
    let context = dev_context(10);
    let storage = MemoryStorage::with_objects(
        BUCKET,
        [
            "Input/dev/a.wav",
            "Input/dev/b.mp3",
            "Input/dev2/c.wav",
            "Input/prod/d.wav",
        ],
    );
    let service = CompletingService::pending();
    let sleeper = NoSleep::default();

    let report = BatchOrchestrator::new(&context, &storage, &service, &sleeper)
        .run()
        .expect("run");

    assert_eq!(report.listed, 1);
    assert!(storage.contains("Input/dev/b.mp3"));
    assert!(storage.contains("Input/dev2/c.wav"));
    assert!(storage.contains("Input/prod/d.wav"));
    assert_eq!(service.jobs().len(), 1);
    assert!(sleeper.pauses.lock().expect("lock pauses").is_empty());
}

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::Duration;

use crate::controller::cooldown::Sleeper;
use crate::error::{AppError, AppResult};
use crate::transcription::engine::TranscriptionService;
use crate::transcription::request_builder::JobDescriptor;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

pub fn env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

pub fn lock_env() -> MutexGuard<'static, ()> {
    env_lock()
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

#[derive(Default)]
pub struct RecordingService {
    jobs: Mutex<Vec<JobDescriptor>>,
    failing: HashSet<String>,
}

impl RecordingService {
    pub fn failing_for(job_name: &str) -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
            failing: HashSet::from([job_name.to_owned()]),
        }
    }

    pub fn jobs(&self) -> Vec<JobDescriptor> {
        self.jobs.lock().expect("lock jobs").clone()
    }
}

impl TranscriptionService for RecordingService {
    fn start_job(&self, job: &JobDescriptor) -> AppResult<()> {
        if self.failing.contains(&job.job_name) {
            return Err(AppError::Transcription(format!(
                "job `{}` already exists",
                job.job_name
            )));
        }
        self.jobs.lock().expect("lock jobs").push(job.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().expect("lock pauses").clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.pauses.lock().expect("lock pauses").push(duration);
    }
}

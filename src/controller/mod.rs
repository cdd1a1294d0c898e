pub mod cooldown;
pub mod report;
pub mod state;

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;

use crate::context::RunContext;
use crate::controller::cooldown::CooldownLimiter;
use crate::controller::state::ItemOutcome;
use crate::error::{AppError, AppResult};
use crate::storage::{filter_by_extension, Folder, StateTransitionManager, StorageGateway};
use crate::transcription::{JobSubmitter, TranscriptionService};

pub use cooldown::{CooldownPolicy, Sleeper, ThreadSleeper};
pub use report::BatchReport;
pub use state::ItemState;

/// Drives every listed input through move, idempotency check and submission,
/// one item at a time.
pub struct BatchOrchestrator<'a> {
    context: &'a RunContext,
    storage: &'a dyn StorageGateway,
    service: &'a dyn TranscriptionService,
    sleeper: &'a dyn Sleeper,
    cooldown: CooldownPolicy,
    shutdown: Option<&'a AtomicBool>,
}

impl<'a> BatchOrchestrator<'a> {
    pub fn new(
        context: &'a RunContext,
        storage: &'a dyn StorageGateway,
        service: &'a dyn TranscriptionService,
        sleeper: &'a dyn Sleeper,
    ) -> Self {
        Self {
            context,
            storage,
            service,
            sleeper,
            cooldown: CooldownPolicy::default(),
            shutdown: None,
        }
    }

    pub fn with_cooldown(mut self, cooldown: CooldownPolicy) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Items not yet started are abandoned once `flag` is set.
    pub fn with_shutdown(mut self, flag: &'a AtomicBool) -> Self {
        self.shutdown = Some(flag);
        self
    }

    /// Candidate input keys, in listing order.
    pub fn discover(&self) -> AppResult<Vec<String>> {
        let prefix = Folder::Input.prefix(&self.context.env);
        let extension = self.context.extension();
        let keys = self.storage.list(&prefix, self.context.max_items)?;
        let candidates = filter_by_extension(keys, &extension);

        tracing::info!(
            prefix = %prefix,
            max_items = self.context.max_items,
            "listing a max of {} `{extension}` files from bucket {}",
            self.context.max_items,
            self.storage.bucket()
        );
        for (index, key) in candidates.iter().enumerate() {
            tracing::info!("file #{} found in bucket: `{key}`", index + 1);
        }

        Ok(candidates)
    }

    /// Lists candidates without moving or submitting anything.
    pub fn plan(&self) -> AppResult<BatchReport> {
        let mut report = BatchReport::start(self.context, Utc::now(), true);
        let candidates = self.discover()?;
        report.listed = candidates.len();
        for key in &candidates {
            report.record(ItemOutcome::discovered(key));
        }
        report.finish(Utc::now());
        Ok(report)
    }

    pub fn run(&self) -> AppResult<BatchReport> {
        let mut report = BatchReport::start(self.context, Utc::now(), false);
        let candidates = self.discover()?;
        report.listed = candidates.len();

        let mut limiter = CooldownLimiter::new(self.cooldown);
        for (index, key) in candidates.iter().enumerate() {
            let remaining = candidates.len() - index;
            if self.shutdown_requested() {
                tracing::warn!(
                    abandoned = remaining,
                    "shutdown requested, leaving remaining inputs untouched"
                );
                report.abandoned = remaining;
                report.interrupted = true;
                break;
            }

            let (outcome, fault) = self.process_item(key);
            report.record(outcome);

            if let Some(error) = fault.filter(AppError::is_fatal) {
                tracing::error!(abandoned = remaining - 1, "aborting batch: {error}");
                report.abandoned = remaining - 1;
                break;
            }

            // Every processed item counts toward the window, failed ones included.
            if let Some(pause) = limiter.record(remaining > 1) {
                tracing::info!(
                    processed = limiter.processed(),
                    pause_secs = pause.as_secs(),
                    "cooling down before the next submissions"
                );
                self.sleeper.sleep(pause);
                report.cooldowns += 1;
            }
        }

        report.finish(Utc::now());
        tracing::info!(
            run_id = %report.run_id,
            listed = report.listed,
            submitted = report.submitted,
            skipped = report.skipped,
            failed = report.failed,
            abandoned = report.abandoned,
            "batch finished"
        );
        Ok(report)
    }

    fn process_item(&self, key: &str) -> (ItemOutcome, Option<AppError>) {
        let item = ItemOutcome::discovered(key);

        let transition = match StateTransitionManager::new(self.storage, &self.context.env)
            .move_to_processing(key)
        {
            Ok(transition) => transition,
            Err(error) => return fail(item, error),
        };
        let item = item.moved(transition.key, transition.kind);

        tracing::info!(key = %item.key, "START job");
        match JobSubmitter::new(self.context, self.storage, self.service).submit(&item.key) {
            Ok(outcome) => (item.settled(outcome), None),
            Err(error) => fail(item, error),
        }
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }
}

fn fail(item: ItemOutcome, error: AppError) -> (ItemOutcome, Option<AppError>) {
    tracing::error!(key = %item.key, state = ?item.state, "item failed: {error}");
    (item.failed(error.to_string()), Some(error))
}

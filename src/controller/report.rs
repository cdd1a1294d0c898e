use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::context::RunContext;
use crate::controller::state::{ItemOutcome, ItemState};

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub run_id: String,
    pub env: String,
    pub purpose: String,
    pub bucket: String,
    pub dry_run: bool,
    pub interrupted: bool,
    pub started_at_rfc3339: String,
    pub finished_at_rfc3339: String,
    pub listed: usize,
    pub submitted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub abandoned: usize,
    pub cooldowns: usize,
    pub items: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn start(context: &RunContext, started_at: DateTime<Utc>, dry_run: bool) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            env: context.env.clone(),
            purpose: context.purpose.clone(),
            bucket: context.bucket.clone(),
            dry_run,
            interrupted: false,
            started_at_rfc3339: started_at.to_rfc3339(),
            finished_at_rfc3339: String::new(),
            listed: 0,
            submitted: 0,
            skipped: 0,
            failed: 0,
            abandoned: 0,
            cooldowns: 0,
            items: Vec::new(),
        }
    }

    pub fn record(&mut self, item: ItemOutcome) {
        match item.state {
            ItemState::Submitted => self.submitted += 1,
            ItemState::Skipped => self.skipped += 1,
            ItemState::Failed => self.failed += 1,
            ItemState::Discovered | ItemState::Moved => {}
        }
        self.items.push(item);
    }

    pub fn finish(&mut self, finished_at: DateTime<Utc>) {
        self.finished_at_rfc3339 = finished_at.to_rfc3339();
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.items
            .iter()
            .filter(|item| item.state == ItemState::Failed)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Batch run: {}\n", self.run_id));
        out.push_str(&format!(
            "Env: {}  Purpose: {}  Bucket: {}{}\n",
            self.env,
            self.purpose,
            self.bucket,
            if self.dry_run { "  (dry run)" } else { "" }
        ));
        out.push_str(&format!(
            "Started: {}  Finished: {}\n\n",
            self.started_at_rfc3339, self.finished_at_rfc3339
        ));
        out.push_str(&format!(
            "listed={} submitted={} skipped={} failed={} abandoned={} cooldowns={}\n",
            self.listed, self.submitted, self.skipped, self.failed, self.abandoned, self.cooldowns
        ));
        if self.interrupted {
            out.push_str("Interrupted before all inputs were processed.\n");
        }

        if !self.items.is_empty() {
            out.push('\n');
            out.push_str(&format!(
                "{:<10} {:<11} {:<40} {}\n",
                "STATE", "FOLDER", "KEY", "DETAIL"
            ));
            out.push_str(&format!(
                "{:<10} {:<11} {:<40} {}\n",
                "-----", "------", "---", "------"
            ));
        }
        for item in &self.items {
            let detail = item
                .error
                .as_deref()
                .or(item.job_name.as_deref())
                .or(item.output_key.as_deref())
                .unwrap_or("");
            out.push_str(&format!(
                "{:<10} {:<11} {:<40} {}\n",
                state_label(item.state),
                item.folder.map(|folder| folder.as_str()).unwrap_or("-"),
                item.key,
                detail
            ));
        }

        if self.failed > 0 {
            out.push_str("\nFailures:\n");
            for item in self.failures() {
                out.push_str(&format!(
                    "  {}: {}\n",
                    item.source_key,
                    item.error.as_deref().unwrap_or("unknown error")
                ));
            }
        }

        out
    }
}

fn state_label(state: ItemState) -> &'static str {
    match state {
        ItemState::Discovered => "FOUND",
        ItemState::Moved => "MOVED",
        ItemState::Submitted => "SUBMITTED",
        ItemState::Skipped => "SKIPPED",
        ItemState::Failed => "FAILED",
    }
}

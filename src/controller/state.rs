use serde::Serialize;

use crate::storage::{AudioObject, Folder, TransitionKind};
use crate::transcription::SubmitOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    Discovered,
    Moved,
    Submitted,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOutcome {
    pub source_key: String,
    pub key: String,
    /// Folder the object sits in after the last step applied to it.
    pub folder: Option<Folder>,
    pub state: ItemState,
    pub transition: Option<TransitionKind>,
    pub job_name: Option<String>,
    pub output_key: Option<String>,
    pub error: Option<String>,
}

impl ItemOutcome {
    pub fn discovered(key: &str) -> Self {
        Self {
            source_key: key.to_owned(),
            key: key.to_owned(),
            folder: AudioObject::new(key).folder(),
            state: ItemState::Discovered,
            transition: None,
            job_name: None,
            output_key: None,
            error: None,
        }
    }

    pub fn moved(mut self, key: String, kind: TransitionKind) -> Self {
        self.folder = AudioObject::new(key.as_str()).folder();
        self.key = key;
        self.transition = Some(kind);
        self.state = ItemState::Moved;
        self
    }

    pub fn settled(mut self, outcome: SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Submitted {
                job_name,
                output_key,
            } => {
                self.state = ItemState::Submitted;
                self.job_name = Some(job_name);
                self.output_key = Some(output_key);
            }
            SubmitOutcome::AlreadyTranscribed { output_key } => {
                self.state = ItemState::Skipped;
                self.output_key = Some(output_key);
            }
        }
        self
    }

    pub fn failed(mut self, error: String) -> Self {
        self.state = ItemState::Failed;
        self.error = Some(error);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{ItemOutcome, ItemState};
    use crate::storage::{Folder, TransitionKind};
    use crate::transcription::SubmitOutcome;

    #[test]
    fn item_walks_discovered_moved_submitted() {
        let item = ItemOutcome::discovered("Input/dev/a.wav");
        assert_eq!(item.state, ItemState::Discovered);
        assert_eq!(item.folder, Some(Folder::Input));

        let item = item.moved("Processing/dev/a.wav".to_owned(), TransitionKind::Moved);
        assert_eq!(item.state, ItemState::Moved);
        assert_eq!(item.folder, Some(Folder::Processing));
        assert_eq!(item.source_key, "Input/dev/a.wav");

        let item = item.settled(SubmitOutcome::Submitted {
            job_name: "dev-test-a".to_owned(),
            output_key: "Output/dev/dev-test-a.json".to_owned(),
        });
        assert_eq!(item.state, ItemState::Submitted);
        assert_eq!(item.folder, Some(Folder::Processing));
        assert_eq!(item.job_name.as_deref(), Some("dev-test-a"));
    }

    #[test]
    fn skip_and_failure_keep_their_details() {
        let skipped = ItemOutcome::discovered("a").settled(SubmitOutcome::AlreadyTranscribed {
            output_key: "Output/x.json".to_owned(),
        });
        assert_eq!(skipped.state, ItemState::Skipped);
        assert!(skipped.job_name.is_none());

        let failed = ItemOutcome::discovered("a").failed("boom".to_owned());
        assert_eq!(failed.state, ItemState::Failed);
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }

    #[test]
    fn source_missing_keeps_the_listed_folder() {
        let item = ItemOutcome::discovered("Input/dev/a.wav")
            .moved("Input/dev/a.wav".to_owned(), TransitionKind::SourceMissing);
        assert_eq!(item.folder, Some(Folder::Input));
    }

    #[test]
    fn states_and_folders_serialize_as_snake_case() {
        let json = serde_json::to_string(&ItemState::Skipped).expect("json");
        assert_eq!(json, "\"skipped\"");
        let item = ItemOutcome::discovered("Processing/dev/a.wav");
        let value = serde_json::to_value(&item).expect("json");
        assert_eq!(value["folder"], "processing");
    }
}

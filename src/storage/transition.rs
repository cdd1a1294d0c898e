use serde::Serialize;

use crate::error::AppResult;
use crate::storage::gateway::StorageGateway;
use crate::storage::keys::{AudioObject, Folder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Moved,
    /// Nothing at the input key; the caller keeps using the key it passed in.
    SourceMissing,
    /// Copied, but the input delete failed: the object now exists in both folders.
    DuplicateLeft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub key: String,
    pub kind: TransitionKind,
}

pub struct StateTransitionManager<'a> {
    storage: &'a dyn StorageGateway,
    env: &'a str,
}

impl<'a> StateTransitionManager<'a> {
    pub fn new(storage: &'a dyn StorageGateway, env: &'a str) -> Self {
        Self { storage, env }
    }

    pub fn move_to_processing(&self, audio_key: &str) -> AppResult<Transition> {
        let object = AudioObject::new(audio_key);
        let file = object.base_filename();
        let input_key = Folder::Input.key(self.env, file);

        if !self.storage.exists(&input_key)? {
            tracing::info!(key = %input_key, "input object missing, cannot move it to Processing");
            return Ok(Transition {
                key: audio_key.to_owned(),
                kind: TransitionKind::SourceMissing,
            });
        }

        let processing_key = Folder::Processing.key(self.env, file);
        self.storage.copy(&input_key, &processing_key)?;

        if let Err(error) = self.storage.delete(&input_key) {
            if error.is_fatal() {
                return Err(error);
            }
            tracing::warn!(
                input_key = %input_key,
                processing_key = %processing_key,
                "copied to Processing but input delete failed, object left in both folders: {error}"
            );
            return Ok(Transition {
                key: processing_key,
                kind: TransitionKind::DuplicateLeft,
            });
        }

        tracing::info!(key = %processing_key, "moved `{file}` to the {} folder", Folder::Processing.prefix(self.env));
        Ok(Transition {
            key: processing_key,
            kind: TransitionKind::Moved,
        })
    }
}

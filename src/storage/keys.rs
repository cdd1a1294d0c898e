use std::fmt;

use serde::Serialize;

/// Logical folder an object lives in, encoded as the first key segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Folder {
    Input,
    Processing,
    Output,
}

impl Folder {
    pub fn as_str(self) -> &'static str {
        match self {
            Folder::Input => "Input",
            Folder::Processing => "Processing",
            Folder::Output => "Output",
        }
    }

    /// Prefix holding every object of `env` in this folder.
    pub fn prefix(self, env: &str) -> String {
        if env.is_empty() {
            self.as_str().to_owned()
        } else {
            format!("{}/{env}", self.as_str())
        }
    }

    pub fn key(self, env: &str, file: &str) -> String {
        format!("{}/{file}", self.prefix(env))
    }

    pub fn of_key(key: &str) -> Option<Folder> {
        match key.split('/').next()? {
            "Input" => Some(Folder::Input),
            "Processing" => Some(Folder::Processing),
            "Output" => Some(Folder::Output),
            _ => None,
        }
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last path segment of a storage key.
pub fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// View of an audio object derived entirely from its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioObject {
    pub key: String,
}

impl AudioObject {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn base_filename(&self) -> &str {
        basename(&self.key)
    }

    pub fn folder(&self) -> Option<Folder> {
        Folder::of_key(&self.key)
    }

    pub fn has_extension(&self, extension: &str) -> bool {
        self.key.ends_with(extension)
    }
}

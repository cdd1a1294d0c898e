use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "fr-CA")]
    FrCa,
}

impl LanguageCode {
    /// Maps the one-letter code accepted on the command line.
    pub fn from_short_code(code: &str) -> AppResult<Self> {
        match code {
            "E" => Ok(LanguageCode::EnUs),
            "F" => Ok(LanguageCode::FrCa),
            other => Err(AppError::Config(format!(
                "unsupported language code `{other}` (expected `E` or `F`)"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageCode::EnUs => "en-US",
            LanguageCode::FrCa => "fr-CA",
        }
    }
}

/// Media formats the transcription service accepts; doubles as the listing
/// extension filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
    Mp4,
    Flac,
    Ogg,
    Amr,
    Webm,
    M4a,
}

impl AudioFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Mp4 => "mp4",
            AudioFormat::Flac => "flac",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Amr => "amr",
            AudioFormat::Webm => "webm",
            AudioFormat::M4a => "m4a",
        }
    }

    pub fn extension(self) -> String {
        format!(".{}", self.as_str())
    }
}

use async_trait::async_trait;
use thiserror::Error;

use crate::audio::AudioRecord;
use crate::language::Language;

/// Recognition failures, both terminal for the current request only.
#[derive(Debug, Clone, Error)]
pub enum RecognizeError {
    /// The service answered but produced no usable hypothesis.
    #[error("could not understand audio")]
    Unintelligible,

    /// The service was unreachable, rejected the request, or answered with
    /// something unparseable.
    #[error("recognition request failed: {0}")]
    Request(String),
}

/// Remote speech-recognition seam.
#[async_trait]
pub trait RecognizerInterface: Send + Sync {
    /// Submit one audio record and return the transcribed text.
    ///
    /// # Arguments
    /// * `record` - The captured audio segment
    /// * `language` - BCP-47 language the service should decode against
    async fn transcribe(
        &self,
        record: &AudioRecord,
        language: Language,
    ) -> Result<String, RecognizeError>;
}

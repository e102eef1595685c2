use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use super::client::GoogleSpeechClient;
use super::interface::RecognizerInterface;
use crate::config::RecognitionConfig;

/// Factory for creating the remote recognition client.
pub struct RecognizerFactory;

impl RecognizerFactory {
    /// Create a recognizer from configuration.
    ///
    /// # Arguments
    /// * `config` - Recognition section of the loaded configuration
    ///
    /// # Returns
    /// Shared RecognizerInterface implementation
    pub fn create(config: &RecognitionConfig) -> Result<Arc<dyn RecognizerInterface>> {
        info!("Initializing speech recognizer: {}", config.endpoint);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Arc::new(GoogleSpeechClient::new(
            http,
            config.endpoint.clone(),
            config.api_key.clone(),
        )))
    }
}

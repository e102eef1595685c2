use std::sync::Arc;

use crate::config::Config;
use crate::recognizer::{RecognizerFactory, RecognizerInterface};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub recognizer: Arc<dyn RecognizerInterface>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let recognizer = RecognizerFactory::create(&config.recognition)?;

        Ok(Self { config, recognizer })
    }

    #[cfg(test)]
    pub fn with_recognizer(config: Config, recognizer: Arc<dyn RecognizerInterface>) -> Self {
        Self { config, recognizer }
    }
}

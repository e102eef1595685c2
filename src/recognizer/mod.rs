pub mod client;
pub mod factory;
pub mod interface;

pub use client::GoogleSpeechClient;
pub use factory::RecognizerFactory;
pub use interface::{RecognizeError, RecognizerInterface};

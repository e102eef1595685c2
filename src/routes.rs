use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;
use std::time::Duration;
use tower_http::services::ServeDir;
use tracing::{debug, info};
use uuid::Uuid;

use crate::audio::{adjust_for_ambient_noise, AudioSource};
use crate::error::ApiError;
use crate::language::Language;
use crate::state::AppState;

/// Uploads beyond this are rejected by the body limit layer.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn create_routes(state: AppState) -> Router<AppState> {
    let system_config = &state.config.system_config;

    Router::new()
        // Health check
        .route("/api/health", get(health_check))
        // REST API routes
        .route("/api/languages", get(get_languages))
        .route("/api/transcribe", post(transcribe_audio))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        // Form page and assets
        .fallback_service(ServeDir::new(&system_config.static_dir))
}

/// Which input branch produced the audio bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioOrigin {
    Mic,
    Upload,
}

impl FromStr for AudioOrigin {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mic" => Ok(AudioOrigin::Mic),
            "upload" => Ok(AudioOrigin::Upload),
            _ => Err(()),
        }
    }
}

/// Echo of the request metadata, returned alongside the transcript.
#[derive(Debug, Serialize, Deserialize)]
pub struct RequestEcho {
    pub source: AudioOrigin,
    pub mime: String,
    pub lang: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscribeResponse {
    pub text: String,
    pub request: RequestEcho,
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "recognition_endpoint": state.config.recognition.endpoint
    }))
}

async fn get_languages() -> Json<Value> {
    let languages: Vec<Value> = Language::ALL
        .iter()
        .map(|lang| {
            json!({
                "code": lang.as_tag(),
                "label": lang.label(),
                "default": *lang == Language::default()
            })
        })
        .collect();
    Json(json!(languages))
}

struct AudioPart {
    bytes: axum::body::Bytes,
    filename: Option<String>,
    mime: Option<String>,
}

async fn transcribe_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let mut audio: Option<AudioPart> = None;
    let mut source = AudioOrigin::Upload;
    let mut language = Language::default();

    while let Some(field) = multipart.next_field().await.unwrap_or(None) {
        match field.name() {
            Some("audio") => {
                let filename = field.file_name().map(|s| s.to_string());
                let mime = field.content_type().map(|s| s.to_string());
                let bytes = field.bytes().await.map_err(|_| ApiError::MissingInput)?;
                audio = Some(AudioPart {
                    bytes,
                    filename,
                    mime,
                });
            }
            Some("source") => {
                let value = field.text().await.map_err(|_| ApiError::MissingInput)?;
                source = value
                    .parse()
                    .map_err(|_| ApiError::UnknownSource(value.clone()))?;
            }
            Some("language") => {
                let value = field.text().await.map_err(|_| ApiError::MissingInput)?;
                language = value
                    .parse()
                    .map_err(|_| ApiError::UnknownLanguage(value.clone()))?;
            }
            _ => {}
        }
    }

    // Preconditions are checked before anything goes near the network.
    let part = audio.ok_or(ApiError::MissingInput)?;
    if part.bytes.is_empty() {
        return Err(ApiError::MissingInput);
    }

    let mime = part.mime.clone().unwrap_or_default();
    if source == AudioOrigin::Mic && !mime.to_lowercase().contains("wav") {
        return Err(ApiError::NotWav(mime));
    }

    let request_id = Uuid::new_v4();
    info!(
        "[{}] transcribe request: source={:?} lang={} bytes={}",
        request_id,
        source,
        language,
        part.bytes.len()
    );

    let mut audio_source = AudioSource::from_wav_bytes(&part.bytes)?;
    let window = Duration::from_millis(state.config.recognition.calibration_ms);
    let noise_floor = adjust_for_ambient_noise(&mut audio_source, window);
    debug!(
        "[{}] ambient noise floor: {:.1} ({} frames remain)",
        request_id,
        noise_floor,
        audio_source.remaining()
    );

    let record = audio_source.record();
    if record.is_empty() {
        // Calibration consumed the whole clip; nothing left to submit.
        return Err(ApiError::Unintelligible);
    }
    info!(
        "[{}] captured {} ms of audio after calibration",
        request_id,
        record.duration_ms()
    );
    let text = state.recognizer.transcribe(&record, language).await?;
    info!(
        "[{}] transcription complete: {} characters",
        request_id,
        text.chars().count()
    );

    Ok(Json(TranscribeResponse {
        text,
        request: RequestEcho {
            source,
            mime,
            lang: language,
            filename: part.filename,
        },
    }))
}

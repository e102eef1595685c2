use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, error};

use super::interface::{RecognizeError, RecognizerInterface};
use crate::audio::AudioRecord;
use crate::language::Language;

/// Client for the Google Web Speech API.
///
/// Audio goes up as raw signed 16-bit little-endian PCM (`audio/l16`); the
/// service answers with one JSON object per line, most of them empty
/// `{"result":[]}` placeholders ahead of the real hypothesis list.
pub struct GoogleSpeechClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleSpeechClient {
    pub fn new(http: reqwest::Client, endpoint: String, api_key: String) -> Self {
        Self {
            http,
            endpoint,
            api_key,
        }
    }

    fn request_url(&self, language: Language) -> String {
        format!(
            "{}?client=chromium&lang={}&key={}",
            self.endpoint,
            language.as_tag(),
            self.api_key
        )
    }
}

#[async_trait]
impl RecognizerInterface for GoogleSpeechClient {
    async fn transcribe(
        &self,
        record: &AudioRecord,
        language: Language,
    ) -> Result<String, RecognizeError> {
        let url = self.request_url(language);
        let body = record.to_l16_le();
        debug!(
            "Submitting {} bytes of L16 audio at {} Hz, lang={}",
            body.len(),
            record.sample_rate(),
            language
        );

        let response = self
            .http
            .post(&url)
            .header(
                CONTENT_TYPE,
                format!("audio/l16; rate={}", record.sample_rate()),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!("Recognition request failed: {}", e);
                RecognizeError::Request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Recognition service returned {}", status);
            return Err(RecognizeError::Request(format!(
                "recognition service returned {}",
                status
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| RecognizeError::Request(e.to_string()))?;
        parse_transcript(&text)
    }
}

/// Extract the best transcript from the service's JSON-lines response.
///
/// Lines with an empty `result` array are skipped; the first non-empty result
/// wins. When alternatives carry confidence values the highest-confidence one
/// is chosen, otherwise the first listed. No usable hypothesis at all means
/// the audio was unintelligible, not that the request failed.
fn parse_transcript(body: &str) -> Result<String, RecognizeError> {
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(line)
            .map_err(|e| RecognizeError::Request(format!("unparseable response: {}", e)))?;

        let results = match value.get("result").and_then(|r| r.as_array()) {
            Some(results) if !results.is_empty() => results,
            _ => continue,
        };

        let alternatives = results[0]
            .get("alternative")
            .and_then(|a| a.as_array())
            .filter(|a| !a.is_empty())
            .ok_or(RecognizeError::Unintelligible)?;

        let has_confidence = alternatives
            .iter()
            .any(|a| a.get("confidence").is_some());
        let best = if has_confidence {
            alternatives.iter().max_by(|a, b| {
                let ca = a.get("confidence").and_then(|c| c.as_f64()).unwrap_or(0.0);
                let cb = b.get("confidence").and_then(|c| c.as_f64()).unwrap_or(0.0);
                ca.total_cmp(&cb)
            })
        } else {
            // Keep the service's ordering when confidence is absent.
            alternatives.first()
        }
        .ok_or(RecognizeError::Unintelligible)?;

        return best
            .get("transcript")
            .and_then(|t| t.as_str())
            .map(|t| t.to_string())
            .ok_or(RecognizeError::Unintelligible);
    }

    Err(RecognizeError::Unintelligible)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GoogleSpeechClient {
        GoogleSpeechClient::new(
            reqwest::Client::new(),
            "http://speech.invalid/v2/recognize".to_string(),
            "test-key".to_string(),
        )
    }

    #[test]
    fn test_url_carries_language_tag() {
        let client = client();
        let url = client.request_url(Language::Indonesian);
        assert!(url.contains("lang=id-ID"));
        assert!(url.contains("client=chromium"));
        assert!(url.contains("key=test-key"));

        // Only the lang parameter changes between languages.
        let other = client.request_url(Language::EnglishUs);
        assert_eq!(
            url.replace("lang=id-ID", "lang=en-US"),
            other
        );
    }

    #[test]
    fn test_parse_skips_empty_result_lines() {
        let body = "{\"result\":[]}\n{\"result\":[{\"alternative\":[{\"transcript\":\"hello world\",\"confidence\":0.93}],\"final\":true}],\"result_index\":0}\n";
        assert_eq!(parse_transcript(body).unwrap(), "hello world");
    }

    #[test]
    fn test_parse_picks_highest_confidence() {
        let body = "{\"result\":[{\"alternative\":[{\"transcript\":\"low\",\"confidence\":0.1},{\"transcript\":\"high\",\"confidence\":0.9}]}]}";
        assert_eq!(parse_transcript(body).unwrap(), "high");
    }

    #[test]
    fn test_parse_without_confidence_takes_first() {
        let body = "{\"result\":[{\"alternative\":[{\"transcript\":\"first\"},{\"transcript\":\"second\"}]}]}";
        assert_eq!(parse_transcript(body).unwrap(), "first");
    }

    #[test]
    fn test_all_empty_results_is_unintelligible() {
        let body = "{\"result\":[]}\n{\"result\":[]}\n";
        assert!(matches!(
            parse_transcript(body),
            Err(RecognizeError::Unintelligible)
        ));
    }

    #[test]
    fn test_empty_body_is_unintelligible() {
        assert!(matches!(
            parse_transcript(""),
            Err(RecognizeError::Unintelligible)
        ));
    }

    #[test]
    fn test_non_json_body_is_a_service_error() {
        assert!(matches!(
            parse_transcript("<html>502 Bad Gateway</html>"),
            Err(RecognizeError::Request(_))
        ));
    }

    #[test]
    fn test_missing_transcript_field_is_unintelligible() {
        let body = "{\"result\":[{\"alternative\":[{\"confidence\":0.5}]}]}";
        assert!(matches!(
            parse_transcript(body),
            Err(RecognizeError::Unintelligible)
        ));
    }
}

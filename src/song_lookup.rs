//! Song search backed by the Gemini `generateContent` API.
//!
//! The model is asked to act as a music video search and answer with a JSON
//! array constrained by a response schema, so the reply can be decoded
//! straight into [`SongCandidate`]s.

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Results shown per search.
pub const MAX_RESULTS: usize = 4;

/// Errors from a single lookup. The messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Song search is not configured: set API_KEY to a Gemini API key.")]
    MissingApiKey,

    #[error("Could not reach the song search service: {0}")]
    Network(String),

    #[error("The song search service refused the request (HTTP {status}). Check your API key and try again.")]
    Provider { status: u16 },

    #[error("Could not read the song results: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongCandidate {
    pub video_id: String,
    pub title: String,
    pub channel: String,
}

/// Anything that can turn a free-text query into ranked song candidates.
pub trait SongLookup: Send + Sync {
    fn search(&self, query: &str) -> BoxFuture<'static, Result<Vec<SongCandidate>, LookupError>>;
}

pub struct GeminiSongLookup {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiSongLookup {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        GeminiSongLookup {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn request_body(query: &str) -> Value {
        let prompt = format!(
            "You are a YouTube Music search API. Find the {MAX_RESULTS} most relevant music \
             videos for the following query: \"{query}\". Give only the video ID, the title \
             and the channel name for each result. Do not include any other commentary or text."
        );

        json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "videoId": {
                                "type": "STRING",
                                "description": "The 11 character YouTube video ID."
                            },
                            "title": {
                                "type": "STRING",
                                "description": "The title of the YouTube video."
                            },
                            "channel": {
                                "type": "STRING",
                                "description": "The name of the channel that uploaded the video."
                            }
                        },
                        "required": ["videoId", "title", "channel"]
                    }
                }
            }
        })
    }
}

impl SongLookup for GeminiSongLookup {
    fn search(&self, query: &str) -> BoxFuture<'static, Result<Vec<SongCandidate>, LookupError>> {
        let client = self.client.clone();
        let api_key = self.api_key.clone();
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = Self::request_body(query);
        let query = query.to_string();

        async move {
            let api_key = api_key.ok_or(LookupError::MissingApiKey)?;
            debug!(%query, "Searching songs");

            let response = client
                .post(&url)
                .header("x-goog-api-key", api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    warn!(error = %e, "Song search request failed");
                    LookupError::Network(e.to_string())
                })?;

            let status = response.status();
            if !status.is_success() {
                warn!(status = status.as_u16(), "Song search rejected");
                return Err(LookupError::Provider {
                    status: status.as_u16(),
                });
            }

            let reply: GenerateContentResponse = response
                .json()
                .await
                .map_err(|e| LookupError::Malformed(e.to_string()))?;
            reply.into_candidates()
        }
        .boxed()
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_candidates(self) -> Result<Vec<SongCandidate>, LookupError> {
        let text = self
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .ok_or_else(|| LookupError::Malformed("the reply had no content".to_string()))?;
        parse_candidates(&text)
    }
}

/// Decode the model's JSON text into at most [`MAX_RESULTS`] candidates.
pub fn parse_candidates(text: &str) -> Result<Vec<SongCandidate>, LookupError> {
    let mut candidates: Vec<SongCandidate> =
        serde_json::from_str(text.trim()).map_err(|e| LookupError::Malformed(e.to_string()))?;
    candidates.truncate(MAX_RESULTS);
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_caps_results() {
        let text = r#"[
            {"videoId":"a1","title":"One","channel":"C1"},
            {"videoId":"a2","title":"Two","channel":"C2"},
            {"videoId":"a3","title":"Three","channel":"C3"},
            {"videoId":"a4","title":"Four","channel":"C4"},
            {"videoId":"a5","title":"Five","channel":"C5"}
        ]"#;
        let parsed = parse_candidates(text).unwrap();
        assert_eq!(parsed.len(), MAX_RESULTS);
        assert_eq!(parsed[0].video_id, "a1");
        assert_eq!(parsed[3].channel, "C4");
    }

    #[test]
    fn non_array_text_is_malformed() {
        assert!(matches!(
            parse_candidates("Sorry, I can't help with that."),
            Err(LookupError::Malformed(_))
        ));
    }

    #[test]
    fn reads_first_text_part_of_reply() {
        let reply: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "parts": [{"text": "[{\"videoId\":\"x\",\"title\":\"T\",\"channel\":\"C\"}]"}],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        let found = reply.into_candidates().unwrap();
        assert_eq!(found[0].title, "T");
    }

    #[test]
    fn empty_reply_is_malformed() {
        let reply: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            reply.into_candidates(),
            Err(LookupError::Malformed(_))
        ));
    }

    #[test]
    fn request_asks_for_json_array() {
        let body = GeminiSongLookup::request_body("lofi beats");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("\"lofi beats\""));
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let lookup = GeminiSongLookup::new(Some("   ".into()), DEFAULT_MODEL);
        assert!(!lookup.is_configured());
        assert_eq!(
            lookup.search("anything").await,
            Err(LookupError::MissingApiKey)
        );
    }
}

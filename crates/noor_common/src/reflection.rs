//! Reflection client
//!
//! Fetches the daily hadith + reflection from a hosted model with a strict
//! three-field JSON shape. Gemini, OpenAI-compatible and Ollama backends are
//! supported, plus a fake client for tests. Any failure yields the canned
//! `fallback_reflection()`; there is no retry.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::ReflectionError;
use crate::types::Reflection;

/// Backend wire protocol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectionProvider {
    #[default]
    Gemini,
    OpenaiCompatible,
    Ollama,
}

impl ReflectionProvider {
    fn label(&self) -> &'static str {
        match self {
            ReflectionProvider::Gemini => "gemini",
            ReflectionProvider::OpenaiCompatible => "openai_compatible",
            ReflectionProvider::Ollama => "ollama",
        }
    }
}

/// Reflection service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub provider: ReflectionProvider,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Falls back to GEMINI_API_KEY, then API_KEY
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: ReflectionProvider::default(),
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ReflectionConfig {
    /// Configured key, or the first of GEMINI_API_KEY / API_KEY that is not blank
    pub fn resolved_api_key(&self) -> Option<String> {
        first_api_key([
            self.api_key.clone(),
            std::env::var("GEMINI_API_KEY").ok(),
            std::env::var("API_KEY").ok(),
        ])
    }
}

/// First candidate that is not blank
fn first_api_key<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|k| !k.trim().is_empty())
}

const REFLECTION_PROMPT: &str = "Generate a daily Islamic spiritual reflection and a short Hadith in Urdu.
The response must be in JSON format with the following keys:
- hadith: A short authentic Hadith text in Urdu.
- reference: The source of the Hadith (e.g., Sahih Bukhari).
- reflection: A short 1-2 sentence spiritual benefit or reflection in Urdu.
Focus on themes of prayer, mindfulness, or kindness.";

/// Canned reflection used whenever the service cannot deliver
pub fn fallback_reflection() -> Reflection {
    Reflection {
        hadith_text: "نماز مومن کی معراج ہے۔".to_string(),
        reference_label: "حدیثِ نبوی ﷺ".to_string(),
        reflection_text: "نماز اللہ تعالیٰ سے گفتگو کا بہترین ذریعہ ہے، اسے خشوع و خضوع کے ساتھ ادا کریں۔"
            .to_string(),
    }
}

/// Reflection-content service
pub trait ReflectionClient: Send + Sync {
    fn fetch(&self) -> Result<Reflection, ReflectionError>;
}

/// Fetch once; on failure log and return the canned reflection
pub fn fetch_daily_reflection(client: &dyn ReflectionClient) -> Reflection {
    match client.fetch() {
        Ok(reflection) => {
            info!(reference = %reflection.reference_label, "Fetched daily reflection");
            reflection
        }
        Err(e) => {
            warn!(error = %e, "Reflection service failed, using canned reflection");
            fallback_reflection()
        }
    }
}

/// Build the configured HTTP client and fetch once, falling back on any failure
///
/// Blocking; call from a blocking context.
pub fn fetch_configured_reflection(config: ReflectionConfig) -> Reflection {
    match HttpReflectionClient::new(config) {
        Ok(client) => fetch_daily_reflection(&client),
        Err(e) => {
            warn!(error = %e, "Reflection client unavailable, using canned reflection");
            fallback_reflection()
        }
    }
}

/// HTTP client for the configured backend
pub struct HttpReflectionClient {
    config: ReflectionConfig,
    client: reqwest::blocking::Client,
}

impl HttpReflectionClient {
    pub fn new(config: ReflectionConfig) -> Result<Self, ReflectionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ReflectionError::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> Result<serde_json::Value, ReflectionError> {
        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                ReflectionError::Timeout(self.config.timeout_secs)
            } else {
                ReflectionError::HttpError(format!("Request failed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            return Err(ReflectionError::HttpError(format!(
                "HTTP {} from {}",
                response.status(),
                self.config.provider.label()
            )));
        }

        response
            .json()
            .map_err(|e| ReflectionError::InvalidJson(format!("Failed to parse response: {}", e)))
    }

    fn call_gemini(&self) -> Result<Reflection, ReflectionError> {
        let api_key = self
            .config
            .resolved_api_key()
            .ok_or(ReflectionError::MissingApiKey("gemini"))?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );

        let request_body = serde_json::json!({
            "contents": [{"parts": [{"text": REFLECTION_PROMPT}]}],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "hadith": {"type": "STRING"},
                        "reference": {"type": "STRING"},
                        "reflection": {"type": "STRING"},
                    },
                    "required": ["hadith", "reference", "reflection"],
                },
            },
        });

        let request = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request_body);
        parse_gemini_response(&self.send(request)?)
    }

    fn call_openai_compatible(&self) -> Result<Reflection, ReflectionError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );

        let request_body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "user", "content": REFLECTION_PROMPT},
            ],
            "response_format": {"type": "json_object"},
        });

        let mut request = self.client.post(&url).json(&request_body);
        if let Some(api_key) = self.config.resolved_api_key() {
            request = request.bearer_auth(api_key);
        }
        parse_openai_response(&self.send(request)?)
    }

    fn call_ollama(&self) -> Result<Reflection, ReflectionError> {
        let url = format!("{}/api/generate", self.config.endpoint.trim_end_matches('/'));

        let request_body = serde_json::json!({
            "model": self.config.model,
            "prompt": REFLECTION_PROMPT,
            "stream": false,
            "format": "json",
        });

        let request = self.client.post(&url).json(&request_body);
        parse_ollama_response(&self.send(request)?)
    }
}

impl ReflectionClient for HttpReflectionClient {
    fn fetch(&self) -> Result<Reflection, ReflectionError> {
        if !self.config.enabled {
            return Err(ReflectionError::Disabled);
        }

        debug!(
            provider = self.config.provider.label(),
            model = %self.config.model,
            "Requesting daily reflection"
        );

        match self.config.provider {
            ReflectionProvider::Gemini => self.call_gemini(),
            ReflectionProvider::OpenaiCompatible => self.call_openai_compatible(),
            ReflectionProvider::Ollama => self.call_ollama(),
        }
    }
}

/// Parse the model's text output as a reflection
pub fn parse_reflection_text(text: &str) -> Result<Reflection, ReflectionError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ReflectionError::EmptyResponse);
    }
    serde_json::from_str(text)
        .map_err(|e| ReflectionError::InvalidJson(format!("Model output is not a reflection: {}", e)))
}

fn parse_gemini_response(json: &serde_json::Value) -> Result<Reflection, ReflectionError> {
    let text = json
        .get("candidates")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("content"))
        .and_then(|v| v.get("parts"))
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("text"))
        .and_then(|v| v.as_str())
        .ok_or(ReflectionError::EmptyResponse)?;
    parse_reflection_text(text)
}

fn parse_openai_response(json: &serde_json::Value) -> Result<Reflection, ReflectionError> {
    let text = json
        .get("choices")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("message"))
        .and_then(|v| v.get("content"))
        .and_then(|v| v.as_str())
        .ok_or(ReflectionError::EmptyResponse)?;
    parse_reflection_text(text)
}

fn parse_ollama_response(json: &serde_json::Value) -> Result<Reflection, ReflectionError> {
    let text = json
        .get("response")
        .and_then(|v| v.as_str())
        .ok_or(ReflectionError::EmptyResponse)?;
    parse_reflection_text(text)
}

/// Fake reflection client for testing
pub struct FakeReflectionClient {
    responses: std::sync::Mutex<Vec<Result<Reflection, ReflectionError>>>,
    call_count: std::sync::Mutex<usize>,
}

impl FakeReflectionClient {
    /// Responses are handed out in order; the last one repeats
    pub fn new(responses: Vec<Result<Reflection, ReflectionError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            call_count: std::sync::Mutex::new(0),
        }
    }

    pub fn always_valid(reflection: Reflection) -> Self {
        Self::new(vec![Ok(reflection)])
    }

    pub fn always_error(error: ReflectionError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        self.call_count.lock().map(|c| *c).unwrap_or(0)
    }
}

impl ReflectionClient for FakeReflectionClient {
    fn fetch(&self) -> Result<Reflection, ReflectionError> {
        if let Ok(mut count) = self.call_count.lock() {
            *count += 1;
        }

        let mut responses = self
            .responses
            .lock()
            .map_err(|_| ReflectionError::HttpError("fake client poisoned".to_string()))?;
        match responses.len() {
            0 => Err(ReflectionError::EmptyResponse),
            1 => responses[0].clone(),
            _ => responses.remove(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Reflection {
        Reflection {
            hadith_text: "Actions are judged by intentions.".to_string(),
            reference_label: "Sahih Bukhari 1".to_string(),
            reflection_text: "Begin each prayer with a renewed intention.".to_string(),
        }
    }

    #[test]
    fn test_config_default() {
        let config = ReflectionConfig::default();
        assert!(config.enabled);
        assert_eq!(config.provider, ReflectionProvider::Gemini);
        assert_eq!(config.model, "gemini-3-flash-preview");
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout_secs, 20);
    }

    #[test]
    fn test_blank_keys_are_skipped() {
        let key = |s: &str| Some(s.to_string());
        assert_eq!(first_api_key([key("cfg"), key("gemini"), key("api")]), key("cfg"));
        assert_eq!(first_api_key([None, key(""), key("api")]), key("api"));
        assert_eq!(first_api_key([key("  "), key(" "), key("api")]), key("api"));
        assert_eq!(first_api_key([None, key("gemini"), key("api")]), key("gemini"));
        assert_eq!(first_api_key([None, key(""), None]), None);
    }

    #[test]
    fn test_fallback_triple_is_fixed() {
        let r = fallback_reflection();
        assert_eq!(r.hadith_text, "نماز مومن کی معراج ہے۔");
        assert_eq!(r.reference_label, "حدیثِ نبوی ﷺ");
        assert_eq!(
            r.reflection_text,
            "نماز اللہ تعالیٰ سے گفتگو کا بہترین ذریعہ ہے، اسے خشوع و خضوع کے ساتھ ادا کریں۔"
        );
    }

    #[test]
    fn test_fetch_success_passes_through() {
        let client = FakeReflectionClient::always_valid(sample());
        assert_eq!(fetch_daily_reflection(&client), sample());
        assert_eq!(client.call_count(), 1);
    }

    #[test]
    fn test_fetch_failure_uses_fallback() {
        let client = FakeReflectionClient::always_error(ReflectionError::Timeout(20));
        assert_eq!(fetch_daily_reflection(&client), fallback_reflection());
    }

    #[test]
    fn test_disabled_client_falls_back() {
        let config = ReflectionConfig {
            enabled: false,
            ..ReflectionConfig::default()
        };
        let client = HttpReflectionClient::new(config).unwrap();
        assert_eq!(client.fetch().unwrap_err(), ReflectionError::Disabled);
        assert_eq!(fetch_daily_reflection(&client), fallback_reflection());
    }

    #[test]
    fn test_fake_client_sequence() {
        let client = FakeReflectionClient::new(vec![
            Ok(sample()),
            Err(ReflectionError::EmptyResponse),
        ]);
        assert!(client.fetch().is_ok());
        assert!(client.fetch().is_err());
        assert!(client.fetch().is_err());
        assert_eq!(client.call_count(), 3);
    }

    #[test]
    fn test_parse_gemini_response() {
        let json = serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"hadith\":\"h\",\"reference\":\"r\",\"reflection\":\"x\"}\n"}]}
            }]
        });
        let r = parse_gemini_response(&json).unwrap();
        assert_eq!(r.hadith_text, "h");
        assert_eq!(r.reflection_text, "x");
    }

    #[test]
    fn test_parse_openai_response() {
        let json = serde_json::json!({
            "choices": [{"message": {"content": "{\"hadith\":\"h\",\"reference\":\"r\",\"reflection\":\"x\"}"}}]
        });
        assert_eq!(parse_openai_response(&json).unwrap().reference_label, "r");
    }

    #[test]
    fn test_parse_ollama_missing_field() {
        let json = serde_json::json!({"response": "{\"hadith\":\"h\"}"});
        assert!(matches!(
            parse_ollama_response(&json),
            Err(ReflectionError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_parse_empty_text() {
        assert_eq!(
            parse_reflection_text("   ").unwrap_err(),
            ReflectionError::EmptyResponse
        );
        assert_eq!(
            parse_gemini_response(&serde_json::json!({"candidates": []})).unwrap_err(),
            ReflectionError::EmptyResponse
        );
    }
}

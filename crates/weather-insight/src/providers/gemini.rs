use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DashboardError;
use crate::model::ForecastResult;
use crate::prompt::{PromptLanguage, build_prompt};

use super::{InterpretationApi, build_http_client, execute_request};

pub const API_KEY_PLACEHOLDER: &str = "GEMINI_API_KEY_PLACEHOLDER";
const API_KEY_HEADER: &str = "x-goog-api-key";
const MISSING_KEY_MESSAGE: &str =
    "Gemini API key is not configured. Set GEMINI_API_KEY to enable AI insights.";
const EMPTY_RESPONSE_MESSAGE: &str = "AI did not return a valid interpretation.";
const FALLBACK_MESSAGE: &str = "Failed to generate content";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Blocking `generateContent` client. The credential is supplied by the caller.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
    language: PromptLanguage,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
        language: PromptLanguage,
    ) -> Result<Self, DashboardError> {
        Ok(Self {
            client: build_http_client()?,
            api_key,
            model: model.into(),
            endpoint: endpoint.into(),
            language,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

/// Returns the usable key, rejecting absent, blank and placeholder values.
pub fn usable_api_key(api_key: Option<&str>) -> Result<&str, DashboardError> {
    api_key
        .map(str::trim)
        .filter(|key| !key.is_empty() && *key != API_KEY_PLACEHOLDER)
        .ok_or_else(|| DashboardError::Configuration(MISSING_KEY_MESSAGE.to_string()))
}

impl InterpretationApi for GeminiClient {
    fn interpret(&self, forecast: &ForecastResult) -> Result<String, DashboardError> {
        let api_key = usable_api_key(self.api_key.as_deref())?;
        let prompt = build_prompt(forecast, self.language);
        let request = GenerateRequest {
            contents: [Content {
                parts: [Part { text: &prompt }],
            }],
        };
        debug!(model = %self.model, language = self.language.as_str(), "requesting interpretation");

        let body = execute_request(
            self.client
                .post(self.url())
                .header(API_KEY_HEADER, api_key)
                .json(&request),
            FALLBACK_MESSAGE,
        )?;
        parse_generate_response(&body)
    }
}

pub fn parse_generate_response(body: &str) -> Result<String, DashboardError> {
    let payload: GenerateResponse = serde_json::from_str(body)
        .map_err(|error| DashboardError::provider(None, format!("generate payload: {error}")))?;

    let text: String = payload
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(DashboardError::provider(None, EMPTY_RESPONSE_MESSAGE));
    }
    Ok(text.to_string())
}

use std::env;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::{debug, error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::model::AnalysisResult;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const API_KEY_VAR: &str = "GEMINI_API_KEY";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Errors that can occur during an analysis attempt.
///
/// Every variant is terminal for the attempt; the caller surfaces the
/// message verbatim and never retries.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("API key is missing. Please set GEMINI_API_KEY in your environment.")]
    MissingApiKey,

    #[error("Request to the analysis service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Analysis service error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Empty response from the analysis service")]
    EmptyResponse,

    #[error("Failed to process the document content properly: {0}")]
    MalformedResponse(String),
}

/// Thin wrapper around the Gemini `generateContent` endpoint.
///
/// One request per analysis attempt, no caching, no streaming. The reply is
/// schema-constrained JSON which is parsed directly into [`AnalysisResult`].
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    client: Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
enum Part {
    #[serde(rename = "inlineData")]
    InlineData {
        #[serde(rename = "mimeType")]
        mime_type: String,
        data: String,
    },
    #[serde(rename = "text")]
    Text(String),
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl AnalysisClient {
    /// Create a client from the process environment.
    ///
    /// Fails with [`AnalysisError::MissingApiKey`] before any network
    /// activity when no credential is configured.
    pub fn from_env() -> Result<Self, AnalysisError> {
        let api_key = env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(AnalysisError::MissingApiKey)?;
        Self::new(api_key)
    }

    pub fn new(api_key: String) -> Result<Self, AnalysisError> {
        if api_key.is_empty() {
            return Err(AnalysisError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Analyze a PDF document and extract its key terms.
    ///
    /// Single request/single response; the call suspends until the remote
    /// service replies or the request times out.
    pub async fn analyze(
        &self,
        pdf_bytes: &[u8],
        file_name: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        info!("Analyzing '{}' ({} bytes)", file_name, pdf_bytes.len());

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        mime_type: "application/pdf".to_string(),
                        data: BASE64.encode(pdf_bytes),
                    },
                    Part::Text(analysis_prompt().to_string()),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            BASE_URL, self.model, self.api_key
        );
        debug!(
            "Sending analysis request to {}",
            url.replace(&self.api_key, "***")
        );

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Analysis service response status: {}", status);

        if !status.is_success() {
            error!("Analysis service error: {} - {}", status, body);
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let reply: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

        let text = reply
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .unwrap_or("");

        parse_result_text(text)
    }
}

/// Parse the model's reply text into a structured result.
///
/// The reply is expected to already be schema-constrained JSON; no repair
/// is attempted.
pub fn parse_result_text(text: &str) -> Result<AnalysisResult, AnalysisError> {
    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    serde_json::from_str(text).map_err(|e| AnalysisError::MalformedResponse(e.to_string()))
}

fn analysis_prompt() -> &'static str {
    "Analyze this study material and extract all important definitions, \
     technical terms, and concepts. Create a clear title for the study set \
     based on the content. Provide a brief 1-2 sentence summary of the \
     material. Return the response in a structured JSON format."
}

/// Response schema constraining the reply to `{title, summary, definitions[]}`
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "summary": { "type": "STRING" },
            "definitions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "term": { "type": "STRING" },
                        "definition": { "type": "STRING" },
                        "context": {
                            "type": "STRING",
                            "description": "Optional sentence where the term was used"
                        }
                    },
                    "required": ["term", "definition"]
                }
            }
        },
        "required": ["title", "summary", "definitions"]
    })
}

//! GeminiGenerator - Direct REST API implementation of [`TextGenerator`].
//!
//! Talks to the Gemini `generateContent` endpoint without any SDK
//! dependency. The API key comes from the caller or the `GEMINI_API_KEY`
//! environment variable.

use amanah_core::error::{AmanahError, Result};
use amanah_core::generator::{Attachment, GenerateRequest, TextGenerator};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Overall request timeout. Expiry is surfaced as a retryable generation
/// error; retrying is the caller's decision.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// [`TextGenerator`] implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl GeminiGenerator {
    /// Creates a new generator with the provided API key and the default
    /// model and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Loads the API key from the `GEMINI_API_KEY` environment variable.
    pub fn try_from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            AmanahError::config(
                "GEMINI_API_KEY not found. Please set it in your environment or .env file.",
            )
        })?;
        Ok(Self::new(api_key))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_parts(request: &GenerateRequest) -> Result<Vec<Part>> {
        let mut parts = Vec::new();
        if !request.prompt.trim().is_empty() {
            parts.push(Part::Text {
                text: request.prompt.clone(),
            });
        }

        if let Some(attachment) = &request.attachment {
            parts.push(Self::attachment_to_part(attachment));
        }

        if parts.is_empty() {
            return Err(AmanahError::generation(
                "Gemini request must include prompt text or an attachment",
            ));
        }

        Ok(parts)
    }

    fn attachment_to_part(attachment: &Attachment) -> Part {
        Part::InlineData {
            inline_data: InlineDataPayload {
                mime_type: attachment.mime_type.clone(),
                data: BASE64_STANDARD.encode(&attachment.data),
            },
        }
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = self.model,
            api_key = self.api_key
        );

        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|err| AmanahError::Generation {
                status_code: None,
                message: format!("Gemini API request failed: {err}"),
                is_retryable: err.is_connect() || err.is_timeout(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            AmanahError::parse("JSON", format!("Failed to parse Gemini response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, request: GenerateRequest) -> Result<String> {
        let contents = vec![Content {
            role: "user".to_string(),
            parts: Self::build_parts(&request)?,
        }];

        let system_instruction = request.system_instruction.as_ref().map(|text| Content {
            role: "system".to_string(),
            parts: vec![Part::Text {
                text: text.clone(),
            }],
        });

        let generation_config = request.temperature.map(|temperature| GenerationConfig {
            temperature,
        });

        let body = GenerateContentRequest {
            contents,
            system_instruction,
            generation_config,
            safety_settings: default_safety_settings(),
        };
        self.send_request(&body).await
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

fn default_safety_settings() -> Vec<SafetySetting> {
    [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category,
        threshold: "BLOCK_ONLY_HIGH",
    })
    .collect()
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| {
            AmanahError::generation("Gemini API returned no text in the response candidates")
        })
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> AmanahError {
    let mut message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    if let Some(delay) = retry_after {
        message = format!("{message} (retry after {}s)", delay.as_secs());
    }

    AmanahError::Generation {
        status_code: Some(status.as_u16()),
        message,
        is_retryable,
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    // Retry-After HTTP-date parsing is omitted for simplicity
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_from_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "hello"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text_response(response).unwrap(), "hello");
    }

    #[test]
    fn test_empty_candidates_is_a_generation_error() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(extract_text_response(response).unwrap_err().is_generation());
    }

    #[test]
    fn test_map_http_error_parses_api_error_body() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string(), None);
        match err {
            AmanahError::Generation {
                status_code,
                message,
                is_retryable,
            } => {
                assert_eq!(status_code, Some(429));
                assert!(message.contains("RESOURCE_EXHAUSTED"));
                assert!(message.contains("Quota exceeded"));
                assert!(is_retryable);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_client_errors_not_retryable() {
        let err = map_http_error(StatusCode::BAD_REQUEST, "bad request".to_string(), None);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_parse_retry_after_seconds() {
        let header = HeaderValue::from_static("30");
        assert_eq!(
            parse_retry_after(Some(&header)),
            Some(Duration::from_secs(30))
        );
        assert_eq!(parse_retry_after(None), None);
    }

    #[test]
    fn test_build_parts_rejects_empty_request() {
        let err = GeminiGenerator::build_parts(&GenerateRequest::new("  ")).unwrap_err();
        assert!(err.is_generation());
    }

    #[test]
    fn test_build_parts_includes_attachment() {
        let request = GenerateRequest::new("review this")
            .with_attachment(Attachment::pdf(vec![0x25, 0x50, 0x44, 0x46]));
        let parts = GeminiGenerator::build_parts(&request).unwrap();
        assert_eq!(parts.len(), 2);
    }
}

use crate::config::toml_config::AiConfig;
use crate::core::{CompletionRequest, CompletionService};
use crate::utils::error::{Result, ServiceError};
use crate::utils::validation::Validate;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// `generateContent` client for the Gemini REST API.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
    timeout_seconds: Option<u64>,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> Result<Self> {
        config.validate()?;
        let api_key = config.require_api_key()?.to_string();

        Ok(Self {
            client: Client::new(),
            api_key,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            timeout_seconds: config.timeout_seconds,
        })
    }

    fn url_for(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, model)
    }
}

#[async_trait]
impl CompletionService for GeminiClient {
    async fn generate(&self, request: CompletionRequest) -> std::result::Result<String, ServiceError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: request.response_schema.as_ref().map(|schema| GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            }),
        };

        let url = self.url_for(&request.model);
        tracing::debug!(
            "Making AI request to: {} (schema: {})",
            url,
            request.response_schema.is_some()
        );

        let mut http_request = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body);

        // 設定超時
        if let Some(timeout) = self.timeout_seconds {
            http_request = http_request.timeout(std::time::Duration::from_secs(timeout));
        }

        let response = http_request.send().await?;
        let status = response.status();
        tracing::debug!("AI response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&raw).map_err(|e| ServiceError::Malformed(e.to_string()))?;
        parsed.text().ok_or(ServiceError::EmptyResponse)
    }
}

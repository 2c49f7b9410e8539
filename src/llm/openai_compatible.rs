// ABOUTME: OpenAI-compatible chat completions client with forced function calling
// ABOUTME: Implements GenerationClient by turning the output schema into a required tool call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! Sends one chat completion per request with a single tool whose parameters
//! are the output schema, and sets `tool_choice` to that function so the
//! model must answer with structured arguments rather than free text.
//!
//! Works against `OpenAI` itself and any endpoint implementing the same
//! chat completions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use super::{ChatMessage, GenerationClient, StructuredOutput, StructuredRequest, TokenUsage};
use crate::config::GenerationConfig;
use crate::errors::{AppError, AppResult};

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Hard ceiling on a request; the pipeline applies its own tighter bound
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Service name used in error messages
const SERVICE_NAME: &str = "OpenAI";

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    temperature: f32,
    tools: Vec<OpenAiTool<'a>>,
    tool_choice: OpenAiToolChoice<'a>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for OpenAiMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAiTool<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: OpenAiFunction<'a>,
}

#[derive(Debug, Serialize)]
struct OpenAiFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

/// `{"type": "function", "function": {"name": ...}}`
#[derive(Debug, Serialize)]
struct OpenAiToolChoice<'a> {
    #[serde(rename = "type")]
    choice_type: &'static str,
    function: OpenAiToolChoiceFunction<'a>,
}

#[derive(Debug, Serialize)]
struct OpenAiToolChoiceFunction<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAiToolCall {
    function: OpenAiFunctionCall,
}

#[derive(Debug, Deserialize)]
struct OpenAiFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API, e.g. <https://api.openai.com/v1>
    pub base_url: String,
    /// Bearer API key
    pub api_key: Option<String>,
    /// Model to use
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
}

impl From<&GenerationConfig> for OpenAiCompatibleConfig {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// `OpenAI`-compatible structured generation client
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: OpenAiCompatibleConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// Attach the bearer key when one is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Map a non-success status to an upstream failure
    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        let detail = serde_json::from_str::<OpenAiErrorResponse>(body).map_or_else(
            |_| body.chars().take(200).collect::<String>(),
            |parsed| {
                format!(
                    "{} - {}",
                    parsed.error.error_type.unwrap_or_else(|| "unknown".to_owned()),
                    parsed.error.message
                )
            },
        );

        match status.as_u16() {
            401 | 403 => AppError::upstream(SERVICE_NAME, format!("API authentication failed: {detail}")),
            429 => AppError::upstream(SERVICE_NAME, format!("Rate limit reached: {detail}")),
            _ => AppError::upstream(SERVICE_NAME, format!("API error ({status}): {detail}")),
        }
    }

    fn build_request<'a>(&'a self, request: &'a StructuredRequest) -> OpenAiRequest<'a> {
        OpenAiRequest {
            model: &self.config.model,
            messages: vec![
                OpenAiMessage::from(&request.system),
                OpenAiMessage::from(&request.user),
            ],
            temperature: self.config.temperature,
            tools: vec![OpenAiTool {
                tool_type: "function",
                function: OpenAiFunction {
                    name: &request.schema.name,
                    description: &request.schema.description,
                    parameters: &request.schema.parameters,
                },
            }],
            tool_choice: OpenAiToolChoice {
                choice_type: "function",
                function: OpenAiToolChoiceFunction {
                    name: &request.schema.name,
                },
            },
        }
    }
}

#[async_trait]
impl GenerationClient for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[instrument(skip(self, request), fields(model = %self.config.model, function = %request.schema.name))]
    async fn generate(&self, request: &StructuredRequest) -> AppResult<StructuredOutput> {
        let body = self.build_request(request);
        debug!(
            system_len = request.system.content.len(),
            user_len = request.user.content.len(),
            "Sending structured generation request"
        );

        let response = self
            .add_auth_header(self.client.post(self.api_url("chat/completions")))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to {}: {}", SERVICE_NAME, e);
                if e.is_timeout() {
                    AppError::upstream(SERVICE_NAME, "Request timed out")
                } else {
                    AppError::upstream(SERVICE_NAME, format!("Failed to connect: {e}"))
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Failed to read API response: {}", e);
            AppError::upstream(SERVICE_NAME, format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &text));
        }

        let parsed: OpenAiResponse = serde_json::from_str(&text).map_err(|e| {
            error!(
                "Failed to parse API response: {} - body: {}",
                e,
                text.chars().take(500).collect::<String>()
            );
            AppError::generation_failed(format!(
                "{SERVICE_NAME} returned an unreadable completion: {e}"
            ))
        })?;

        let model = parsed.model;
        let usage = parsed.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt,
            completion_tokens: u.completion,
            total_tokens: u.total,
        });

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(AppError::generation_failed(
                "Generation service returned no choices",
            ));
        };

        let arguments = choice.message.tool_calls.and_then(|calls| {
            calls
                .into_iter()
                .find(|call| call.function.name == request.schema.name)
                .map(|call| call.function.arguments)
        });
        let content = choice.message.content.filter(|c| !c.trim().is_empty());

        if arguments.is_none() && content.is_none() {
            warn!("Generation response carried neither tool call nor content");
            return Err(AppError::generation_failed(
                "Generation service returned no structured output",
            ));
        }

        Ok(StructuredOutput {
            arguments,
            content,
            model,
            usage,
        })
    }
}

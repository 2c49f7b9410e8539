// ABOUTME: Schema-constrained text generation abstraction
// ABOUTME: Defines the GenerationClient contract and the request/response types it exchanges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Structured Generation Interface
//!
//! The plan pipeline never talks to a model vendor directly. It hands a
//! [`StructuredRequest`] (system instruction, user instruction, output
//! schema) to a [`GenerationClient`] and receives a [`StructuredOutput`].
//! Swapping the provider does not touch the prompt builder or the parser.
//!
//! ## Example: Using a client
//!
//! ```rust,no_run
//! use pierre_coach::llm::{GenerationClient, OutputSchema, StructuredRequest};
//! use serde_json::json;
//!
//! async fn example(client: &dyn GenerationClient) {
//!     let schema = OutputSchema::new("echo", "Echo a word", json!({"type": "object"}));
//!     let request = StructuredRequest::new("You echo words.", "Echo: hello", schema);
//!     let output = client.generate(&request).await;
//! }
//! ```

mod openai_compatible;

pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppResult;

/// Message role in a chat-style exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instruction that frames the model's behaviour
    System,
    /// Request content
    User,
    /// Model reply
    Assistant,
}

impl MessageRole {
    /// Wire name of the role
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Single message with role and content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role
    pub role: MessageRole,
    /// Text content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Named JSON schema the model is forced to fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSchema {
    /// Function name presented to the model
    pub name: String,
    /// What the function produces
    pub description: String,
    /// JSON Schema of the arguments
    pub parameters: Value,
}

impl OutputSchema {
    /// Create a schema definition
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// One schema-constrained generation request
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredRequest {
    /// System instruction
    pub system: ChatMessage,
    /// Per-request instruction
    pub user: ChatMessage,
    /// Required output shape
    pub schema: OutputSchema,
}

impl StructuredRequest {
    /// Build a request from instruction text and a schema
    #[must_use]
    pub fn new(system: impl Into<String>, user: impl Into<String>, schema: OutputSchema) -> Self {
        Self {
            system: ChatMessage::system(system),
            user: ChatMessage::user(user),
            schema,
        }
    }
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TokenUsage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Completion tokens
    pub completion_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

/// What the provider returned
///
/// `arguments` is the schema-constrained payload. `content` is any free
/// text the model produced alongside it, kept for the fenced-JSON fallback.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructuredOutput {
    /// Raw JSON arguments of the forced function call
    pub arguments: Option<String>,
    /// Free-text assistant content
    pub content: Option<String>,
    /// Model that produced the output
    pub model: Option<String>,
    /// Token accounting
    pub usage: Option<TokenUsage>,
}

impl StructuredOutput {
    /// Output carrying a structured payload
    #[must_use]
    pub fn from_arguments(arguments: impl Into<String>) -> Self {
        Self {
            arguments: Some(arguments.into()),
            ..Self::default()
        }
    }

    /// Output carrying only free text
    #[must_use]
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

/// Schema-constrained text generation service
///
/// Failure contract: transport or service errors map to `UpstreamFailure`;
/// a successful response that is unreadable or carries no payload maps to
/// `GenerationFailed`.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Perform one generation call; never retried by the caller
    async fn generate(&self, request: &StructuredRequest) -> AppResult<StructuredOutput>;
}

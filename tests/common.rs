// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: In-memory database, token minting, scripted generation client and resource assembly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `pierre_coach`

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use pierre_coach::{
    config::{IdentityConfig, ServerConfig},
    database::Database,
    errors::{AppError, AppResult},
    identity::{build_verifier, IdentityClaims},
    llm::{GenerationClient, StructuredOutput, StructuredRequest},
    resources::ServerResources,
};

static INIT_LOGGER: Once = Once::new();

/// Secret shared by minted tokens and the test verifier
pub const TEST_JWT_SECRET: &str = "pierre-coach-test-secret-0123456789abcdef";

/// Audience expected by the test verifier
pub const TEST_AUDIENCE: &str = "authenticated";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database")
}

/// Mint a bearer token for `user_id` valid for one hour
pub fn mint_token(user_id: &str) -> String {
    mint_token_with(user_id, TEST_AUDIENCE, 3600)
}

/// Mint a bearer token with explicit audience and lifetime
pub fn mint_token_with(user_id: &str, audience: &str, ttl_secs: i64) -> String {
    let claims = IdentityClaims {
        sub: user_id.to_owned(),
        exp: Utc::now().timestamp() + ttl_secs,
        aud: Some(audience.to_owned()),
        email: None,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to mint token")
}

/// Generation client that replays queued outputs and records every request
pub struct ScriptedGenerationClient {
    outputs: Mutex<VecDeque<AppResult<StructuredOutput>>>,
    requests: Mutex<Vec<StructuredRequest>>,
    delay: Option<Duration>,
}

impl ScriptedGenerationClient {
    /// Replay `outputs` in order
    pub fn new(outputs: Vec<AppResult<StructuredOutput>>) -> Arc<Self> {
        Arc::new(Self {
            outputs: Mutex::new(outputs.into()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        })
    }

    /// Always answer with these function-call arguments
    pub fn with_arguments(arguments: &str) -> Arc<Self> {
        Self::new(vec![Ok(StructuredOutput::from_arguments(arguments))])
    }

    /// Sleep for `delay` before every answer
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            outputs: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            delay: Some(delay),
        })
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<StructuredRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationClient for ScriptedGenerationClient {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, request: &StructuredRequest) -> AppResult<StructuredOutput> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut outputs = self.outputs.lock().unwrap();
        // The last scripted output repeats so identical calls keep succeeding
        if outputs.len() > 1 {
            outputs.pop_front().unwrap()
        } else {
            match outputs.front() {
                Some(Ok(output)) => Ok(output.clone()),
                Some(Err(e)) => Err(AppError::new(e.code, e.message.clone())),
                None => Ok(StructuredOutput::default()),
            }
        }
    }
}

/// Test configuration: JWT identity with the test secret
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.identity = IdentityConfig {
        jwt_secret: Some(TEST_JWT_SECRET.to_owned()),
        jwt_audience: TEST_AUDIENCE.to_owned(),
        ..IdentityConfig::default()
    };
    config.generation.timeout = Duration::from_secs(5);
    config
}

/// Resources over a fresh in-memory database
pub async fn create_test_resources(
    generation: Arc<dyn GenerationClient>,
    config: ServerConfig,
) -> Arc<ServerResources> {
    let database = create_test_database().await;
    let identity = build_verifier(&config.identity).expect("Failed to build verifier");
    Arc::new(ServerResources::new(database, identity, generation, config))
}

/// A valid single-plan payload
pub const PLAN_ARGUMENTS: &str = r#"{"exercises":[
    {"name":"Goblet Squat","sets":4,"reps":"8-10","weight":"24kg"},
    {"name":"Romanian Deadlift","sets":3,"reps":"10"},
    {"name":"Walking Lunge","sets":3,"reps":"12 per leg"}
]}"#;

/// A valid seven-session microcycle payload
pub fn microcycle_arguments() -> String {
    let styles = [
        "strength",
        "conditioning",
        "recovery",
        "strength",
        "hypertrophy",
        "conditioning",
        "recovery",
    ];
    let sessions: Vec<serde_json::Value> = styles
        .iter()
        .map(|style| {
            serde_json::json!({
                "style": style,
                "duration_min": 45,
                "primary_muscles": ["legs", "core"],
                "exercises": [{"name": "Squat", "sets": 3, "reps": "8"}]
            })
        })
        .collect();
    serde_json::json!({ "sessions": sessions }).to_string()
}

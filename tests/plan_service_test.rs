// ABOUTME: Integration tests for the plan pipeline service driven without HTTP
// ABOUTME: Covers generation metadata pass-through and period validation inside the stage machine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use std::time::Duration;

use chrono::NaiveDate;
use common::{create_test_database, ScriptedGenerationClient, PLAN_ARGUMENTS};
use pierre_coach::config::HistoryConfig;
use pierre_coach::errors::ErrorCode;
use pierre_coach::llm::{OutputSchema, StructuredOutput, StructuredRequest, TokenUsage};
use pierre_coach::plans::PlanService;
use serde_json::json;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

#[tokio::test]
async fn test_generation_metadata_reaches_caller() {
    let database = create_test_database().await;
    let output = StructuredOutput {
        arguments: Some(PLAN_ARGUMENTS.to_owned()),
        content: None,
        model: Some("coach-model".to_owned()),
        usage: Some(TokenUsage {
            prompt_tokens: 120,
            completion_tokens: 80,
            total_tokens: 200,
        }),
    };
    let client = ScriptedGenerationClient::new(vec![Ok(output)]);
    let service = PlanService::new(
        database,
        client,
        Duration::from_secs(5),
        HistoryConfig::default(),
    );

    let request = StructuredRequest::new(
        "system",
        "user",
        OutputSchema::new("generate_workout_plan", "Plan", json!({"type": "object"})),
    );
    let output = service.generate_structured(&request).await.unwrap();

    assert_eq!(output.model.as_deref(), Some("coach-model"));
    assert_eq!(output.usage.unwrap().total_tokens, 200);
}

#[tokio::test]
async fn test_unknown_period_rejected_before_any_work() {
    let database = create_test_database().await;
    let client = ScriptedGenerationClient::with_arguments(PLAN_ARGUMENTS);
    let service = PlanService::new(
        database.clone(),
        client.clone(),
        Duration::from_secs(5),
        HistoryConfig::default(),
    );

    let err = service
        .plan_period("user-1", "fortnight", today())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::BadRequest);
    assert_eq!(err.message, "period must be \"week\" or \"month\"");
    assert!(client.requests().is_empty());
    assert_eq!(database.count_workout_sessions("user-1").await.unwrap(), 0);
}

// ABOUTME: HTTP integration tests for nutrition analysis and food transcript classification
// ABOUTME: Classified foods are logged and show up in the same day's analysis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;
mod helpers;

use common::{create_test_resources, mint_token, test_config, ScriptedGenerationClient};
use helpers::axum_test::AxumTestRequest;
use pierre_coach::llm::StructuredOutput;
use pierre_coach::server::router;
use serde_json::{json, Value};

const FOODS: &str = r#"{"foods":[
    {"name":"Oatmeal","quantity":"1 cup","meal":"breakfast"},
    {"name":"Banana","quantity":"a medium one","meal":"morning snack"}
]}"#;

async fn save_profile(app: axum::Router, token: &str) {
    let response = AxumTestRequest::put("/profile")
        .bearer(token)
        .json(&json!({
            "age": 30,
            "gender": "male",
            "height": 180,
            "weight": 80,
            "activityLevel": "moderate",
            "goal": "maintain"
        }))
        .send(app)
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_analysis_without_profile_is_not_found() {
    let client = ScriptedGenerationClient::with_arguments(FOODS);
    let resources = create_test_resources(client, test_config()).await;

    let response = AxumTestRequest::post("/analyze_nutrition")
        .bearer(&mint_token("user-1"))
        .json(&json!({"userId": "user-1"}))
        .send(router(resources))
        .await;

    assert_eq!(response.status(), 404);
    let body: Value = response.json();
    assert_eq!(body["error"], "Profile not found");
}

#[tokio::test]
async fn test_analysis_with_incomplete_profile_is_bad_request() {
    let client = ScriptedGenerationClient::with_arguments(FOODS);
    let resources = create_test_resources(client, test_config()).await;
    let app = router(resources);
    let token = mint_token("user-1");

    let response = AxumTestRequest::get("/profile")
        .bearer(&token)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);

    let response = AxumTestRequest::post("/analyze_nutrition")
        .bearer(&token)
        .json(&json!({"userId": "user-1"}))
        .send(app)
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_empty_week_reports_targets_and_advice() {
    let client = ScriptedGenerationClient::with_arguments(FOODS);
    let resources = create_test_resources(client, test_config()).await;
    let app = router(resources);
    let token = mint_token("user-1");
    save_profile(app.clone(), &token).await;

    let response = AxumTestRequest::post("/analyze_nutrition")
        .bearer(&token)
        .json(&json!({"userId": "user-1"}))
        .send(app)
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    let totals = body["dailyTotals"].as_array().unwrap();
    assert_eq!(totals.len(), 7);
    assert!(totals.iter().all(|day| day["calories"] == 0));
    assert_eq!(body["todayNutrition"]["target"]["calories"], 2759);
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_classified_foods_are_logged_and_counted() {
    let client = ScriptedGenerationClient::with_arguments(FOODS);
    let resources = create_test_resources(client.clone(), test_config()).await;
    let app = router(resources);
    let token = mint_token("user-1");
    save_profile(app.clone(), &token).await;

    let response = AxumTestRequest::post("/classify_food_recordings")
        .bearer(&token)
        .json(&json!({
            "userId": "user-1",
            "transcript": "I had a cup of oatmeal for breakfast and a banana later"
        }))
        .send(app.clone())
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["identified"], 2);
    assert_eq!(body["logged"], 2);
    assert_eq!(body["items"][0]["meal"], "breakfast");
    assert_eq!(body["items"][0]["grams"], 240.0);
    assert_eq!(body["items"][1]["meal"], "snack");
    assert_eq!(body["items"][1]["grams"], 100.0);
    assert_eq!(client.requests()[0].schema.name, "classify_food_recordings");

    let analysis: Value = AxumTestRequest::post("/analyze_nutrition")
        .bearer(&token)
        .json(&json!({"userId": "user-1"}))
        .send(app)
        .await
        .json();
    let totals = analysis["dailyTotals"].as_array().unwrap();
    assert_eq!(totals[6]["calories"], 340);
    assert_eq!(totals[6]["protein"], 17);
}

#[tokio::test]
async fn test_classification_requires_transcript() {
    let client = ScriptedGenerationClient::with_arguments(FOODS);
    let resources = create_test_resources(client.clone(), test_config()).await;

    let response = AxumTestRequest::post("/classify_food_recordings")
        .bearer(&mint_token("user-1"))
        .json(&json!({"userId": "user-1", "transcript": "   "}))
        .send(router(resources))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "userId and transcript are required");
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn test_classification_without_payload_fails() {
    let client = ScriptedGenerationClient::new(vec![Ok(StructuredOutput::from_content(
        "Sounds like a healthy breakfast!",
    ))]);
    let resources = create_test_resources(client, test_config()).await;

    let response = AxumTestRequest::post("/classify_food_recordings")
        .bearer(&mint_token("user-1"))
        .json(&json!({"userId": "user-1", "transcript": "oatmeal"}))
        .send(router(resources))
        .await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "GENERATION_FAILED");
}

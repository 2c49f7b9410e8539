// ABOUTME: HTTP integration tests for profile editing, exercise logging and session reads
// ABOUTME: Logged RPE must flow into the next generation prompt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;
mod helpers;

use common::{
    create_test_resources, mint_token, test_config, ScriptedGenerationClient, PLAN_ARGUMENTS,
};
use helpers::axum_test::AxumTestRequest;
use pierre_coach::server::router;
use serde_json::{json, Value};

#[tokio::test]
async fn test_profile_is_created_on_first_read() {
    let client = ScriptedGenerationClient::with_arguments(PLAN_ARGUMENTS);
    let resources = create_test_resources(client, test_config()).await;

    let response = AxumTestRequest::get("/profile")
        .bearer(&mint_token("user-1"))
        .send(router(resources.clone()))
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["userId"], "user-1");
    assert_eq!(body["heightUnit"], "cm");
    assert_eq!(body["weightUnit"], "kg");
    assert!(body["age"].is_null());
    assert!(resources.database.get_profile("user-1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_profile_update_round_trips() {
    let client = ScriptedGenerationClient::with_arguments(PLAN_ARGUMENTS);
    let resources = create_test_resources(client, test_config()).await;
    let app = router(resources);
    let token = mint_token("user-1");

    let response = AxumTestRequest::put("/profile")
        .bearer(&token)
        .json(&json!({
            "age": 29,
            "gender": "female",
            "height": 64,
            "heightUnit": "in",
            "weight": 135,
            "weightUnit": "lbs",
            "fitnessLevel": "intermediate",
            "goal": "Lose_Weight"
        }))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);

    let body: Value = AxumTestRequest::get("/profile")
        .bearer(&token)
        .send(app)
        .await
        .json();
    assert_eq!(body["age"], 29);
    assert_eq!(body["gender"], "female");
    assert_eq!(body["heightUnit"], "in");
    assert_eq!(body["weightUnit"], "lbs");
    assert_eq!(body["fitnessLevel"], "intermediate");
    assert_eq!(body["goal"], "lose_weight");
}

#[tokio::test]
async fn test_profile_update_rejects_invalid_enum() {
    let client = ScriptedGenerationClient::with_arguments(PLAN_ARGUMENTS);
    let resources = create_test_resources(client, test_config()).await;

    let response = AxumTestRequest::put("/profile")
        .bearer(&mint_token("user-1"))
        .json(&json!({"gender": "robot"}))
        .send(router(resources))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid gender: robot");
}

#[tokio::test]
async fn test_profile_requires_token() {
    let client = ScriptedGenerationClient::with_arguments(PLAN_ARGUMENTS);
    let resources = create_test_resources(client, test_config()).await;

    let response = AxumTestRequest::get("/profile")
        .send(router(resources))
        .await;

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_logged_exertion_reaches_generation_prompt() {
    let client = ScriptedGenerationClient::with_arguments(PLAN_ARGUMENTS);
    let resources = create_test_resources(client.clone(), test_config()).await;
    let app = router(resources);
    let token = mint_token("user-1");

    let logged = AxumTestRequest::post("/exercise_logs")
        .bearer(&token)
        .json(&json!({
            "userId": "user-1",
            "exerciseName": "Back Squat",
            "sets": [
                {"weight": 100, "reps": 5, "rpe": 8},
                {"weight": 100, "reps": 5, "rpe": 9}
            ]
        }))
        .send(app.clone())
        .await;
    assert_eq!(logged.status(), 200);
    let logged: Value = logged.json();
    assert!(logged["id"].as_str().is_some());

    let response = AxumTestRequest::post("/generateWorkoutPlan")
        .bearer(&token)
        .json(&json!({
            "userId": "user-1",
            "muscles": ["legs"],
            "style": "strength",
            "duration": 60,
            "goal": "maintain"
        }))
        .send(app)
        .await;
    assert_eq!(response.status(), 200);

    let requests = client.requests();
    assert!(requests[0].user.content.contains("- Back Squat: 8.5"));
}

#[tokio::test]
async fn test_exercise_log_rejects_out_of_range_rpe() {
    let client = ScriptedGenerationClient::with_arguments(PLAN_ARGUMENTS);
    let resources = create_test_resources(client, test_config()).await;

    let response = AxumTestRequest::post("/exercise_logs")
        .bearer(&mint_token("user-1"))
        .json(&json!({
            "userId": "user-1",
            "exerciseName": "Bench Press",
            "sets": [{"reps": 5, "rpe": 11}]
        }))
        .send(router(resources))
        .await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_session_of_another_user_is_not_found() {
    let client = ScriptedGenerationClient::with_arguments(PLAN_ARGUMENTS);
    let resources = create_test_resources(client, test_config()).await;
    let app = router(resources);

    let created: Value = AxumTestRequest::post("/generateWorkoutPlan")
        .bearer(&mint_token("owner"))
        .json(&json!({
            "userId": "owner",
            "muscles": ["back"],
            "style": "hypertrophy",
            "duration": 40,
            "goal": "gain_muscle"
        }))
        .send(app.clone())
        .await
        .json();
    let session_id = created["sessionId"].as_str().unwrap();

    let response = AxumTestRequest::get(&format!("/workout_sessions/{session_id}"))
        .bearer(&mint_token("intruder"))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 404);
    let body: Value = response.json();
    assert_eq!(body["error"], "Workout session not found");

    let missing = AxumTestRequest::get("/workout_sessions/does-not-exist")
        .bearer(&mint_token("owner"))
        .send(app)
        .await;
    assert_eq!(missing.status(), 404);
}

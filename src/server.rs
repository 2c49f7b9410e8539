// ABOUTME: HTTP server assembly: route merging, tracing, CORS, body limits and graceful shutdown
// ABOUTME: Routes are stateless beyond the shared ServerResources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{extract::Request, middleware::map_response, Router};
use tower_http::{
    classify::ServerErrorsFailureClass, limit::RequestBodyLimitLayer, timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, Span};

use crate::errors::AppError;
use crate::middleware::{create_request_span, json_error_bodies, setup_cors};
use crate::resources::ServerResources;
use crate::routes::{
    ExerciseLogRoutes, HealthRoutes, NutritionRoutes, PlanRoutes, ProfileRoutes, SessionRoutes,
};

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 256 * 1024;

/// Slack added to the generation timeout for the whole request
const REQUEST_TIMEOUT_MARGIN_SECS: u64 = 15;

/// Build the application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    let request_timeout =
        resources.config.generation.timeout + Duration::from_secs(REQUEST_TIMEOUT_MARGIN_SECS);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(PlanRoutes::routes(Arc::clone(&resources)))
        .merge(SessionRoutes::routes(Arc::clone(&resources)))
        .merge(ProfileRoutes::routes(Arc::clone(&resources)))
        .merge(ExerciseLogRoutes::routes(Arc::clone(&resources)))
        .merge(NutritionRoutes::routes(Arc::clone(&resources)))
        .fallback(|| async { AppError::not_found("Route") })
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(map_response(json_error_bodies))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| create_request_span(request))
                .on_request(|_request: &Request, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, _span: &Span| {
                        let status = response.status();
                        let latency_ms = latency.as_millis();
                        if status.is_server_error() {
                            error!(status = %status, latency_ms = %latency_ms, "Request failed with server error");
                        } else {
                            info!(status = %status, latency_ms = %latency_ms, "Request completed");
                        }
                    },
                )
                .on_failure(
                    |failure: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                        error!(error = %failure, latency_ms = %latency.as_millis(), "Request failed");
                    },
                ),
        )
        .layer(setup_cors(&resources.config.cors_origins))
}

/// Serve until Ctrl-C or SIGTERM
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails
pub async fn run(resources: Arc<ServerResources>, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, "HTTP server listening");

    axum::serve(listener, router(resources))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}

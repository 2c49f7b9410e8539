// ABOUTME: Main library entry point for the Pierre coaching API
// ABOUTME: Workout and nutrition plan generation backed by schema-constrained LLM calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # Pierre Coach
//!
//! HTTP API that turns a user's profile and training history into workout
//! plans. Each plan request runs one pipeline:
//!
//! 1. authenticate the caller and check they own the `userId` in the body
//! 2. load the profile (created empty on first access) and the recent
//!    per-exercise exertion averages
//! 3. build the prompt and call the generation service with a forced schema
//! 4. validate the structured output; anything unparsable is a hard failure
//! 5. persist the session(s) and return the identifier(s)
//!
//! Nutrition analysis and food transcript classification reuse the same
//! authentication, storage and generation layers.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_coach::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Pierre Coach configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// Persistence for profiles, logs and sessions
pub mod database;

/// Error types re-exported from the core crate
pub mod errors;

/// Bearer token verification
pub mod identity;

/// Structured text generation clients
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Nutrition analysis and food classification
pub mod nutrition;

/// Workout plan pipeline
pub mod plans;

/// Shared server resources
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// HTTP server assembly
pub mod server;

pub use pierre_coach_core::models;

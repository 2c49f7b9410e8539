// ABOUTME: Error handling facade for the server crate
// ABOUTME: Re-exports the unified AppError and ErrorCode from pierre-coach-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Error types live in `pierre-coach-core` so models and errors compile
//! independently of the server. This module keeps `crate::errors::*`
//! paths stable for the rest of the crate.

pub use pierre_coach_core::errors::{AppError, AppResult, ErrorCode, ErrorResponse};

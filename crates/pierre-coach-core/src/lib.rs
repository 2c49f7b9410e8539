// ABOUTME: Core types for the Pierre Coach plan generation service
// ABOUTME: Foundation crate with error handling and domain models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Coach Core
//!
//! Shared types for the Pierre Coach service. This crate changes rarely,
//! which keeps incremental builds of the server crate fast.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode` and their HTTP mapping
//! - **models**: profiles, plans, sessions and exercise logs

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Domain models (profile, plan, session, exercise log)
pub mod models;

// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration for the Pierre Coach server. All settings come from
//! environment variables; there is no configuration file.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    DatabaseUrl, Environment, GenerationConfig, HistoryConfig, IdentityConfig, IdentityMode,
    ServerConfig,
};

// ABOUTME: Shared server resources injected into every route
// ABOUTME: Holds the database, identity verifier, generation client and configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::database::Database;
use crate::identity::IdentityVerifier;
use crate::llm::GenerationClient;

/// Centralized resource container for dependency injection
///
/// Built once at startup. Requests share it read-only; there is no
/// per-request mutable state.
#[derive(Clone)]
pub struct ServerResources {
    /// Relational store
    pub database: Database,
    /// Bearer token verifier selected by configuration
    pub identity: Arc<dyn IdentityVerifier>,
    /// Structured text generation
    pub generation: Arc<dyn GenerationClient>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Bundle the collaborators
    #[must_use]
    pub fn new(
        database: Database,
        identity: Arc<dyn IdentityVerifier>,
        generation: Arc<dyn GenerationClient>,
        config: ServerConfig,
    ) -> Self {
        Self {
            database,
            identity,
            generation,
            config: Arc::new(config),
        }
    }
}

// ABOUTME: Server binary wiring configuration, storage, identity and generation into the HTTP API
// ABOUTME: Reads configuration from the environment with an optional port override
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Pierre Coach Server Binary

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use pierre_coach::{
    config::ServerConfig,
    database::Database,
    identity::build_verifier,
    llm::{OpenAiCompatibleConfig, OpenAiCompatibleProvider},
    logging,
    resources::ServerResources,
    server,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pierre-coach-server")]
#[command(about = "Pierre Coach - workout and nutrition plan generation API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Pierre Coach API");
    info!("{}", config.summary());

    let database = Database::new(&config.database_url.to_connection_string()).await?;
    info!(
        "Database initialized: {}",
        config.database_url.to_connection_string()
    );

    let identity = build_verifier(&config.identity)?;
    let generation = Arc::new(OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::from(
        &config.generation,
    ))?);
    info!(model = %config.generation.model, "Generation client ready");

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(database, identity, generation, config));

    if let Err(e) = server::run(resources, port).await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}

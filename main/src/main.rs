use std::{sync::Arc, time::Duration};

use anyhow::Context;
use api_router::{api_state::ApiState, exercise_routes};
use axum::Router;
use common::{
    storage::graph_store::GraphStore,
    utils::{
        config::{get_config, AppConfig},
        graph_templates::GraphTemplates,
    },
};
use ingestion_pipeline::{run_refresh_loop, GithubDirectory, IngestionPipeline};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set up tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let config = get_config().context("failed to load configuration")?;

    // Templates and the access token are required before any traffic is served.
    let templates = Arc::new(GraphTemplates::load(&config).await?);
    let token = config.load_access_token().await?;

    let graph_store = Arc::new(
        GraphStore::open(
            config.linked_data_path(),
            config.node_link_path(),
            &templates,
        )
        .await?,
    );

    let directory = Arc::new(GithubDirectory::new(
        &config.github_api_url,
        token,
        Duration::from_secs(config.remote_timeout_secs),
    )?);
    let pipeline = Arc::new(IngestionPipeline::new(
        directory,
        Arc::clone(&graph_store),
        Arc::clone(&templates),
        &config,
    ));

    let app = build_router(ApiState::new(
        graph_store,
        templates,
        Arc::clone(&pipeline),
    ));

    schedule_refreshes(&config, &pipeline);

    let serve_address = format!("0.0.0.0:{}", config.http_port);
    info!(organization = %config.github_org, "Starting server listening on {serve_address}");
    let listener = tokio::net::TcpListener::bind(&serve_address).await?;

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

fn build_router(api_state: ApiState) -> Router {
    Router::new().merge(exercise_routes()).with_state(api_state)
}

fn schedule_refreshes(config: &AppConfig, pipeline: &Arc<IngestionPipeline>) {
    if config.refresh_on_startup && pipeline.spawn_refresh() {
        info!("Startup refresh started");
    }

    if let Some(secs) = config.refresh_interval_secs.filter(|secs| *secs > 0) {
        info!(interval_secs = secs, "Periodic refresh enabled");
        tokio::spawn(run_refresh_loop(
            Arc::clone(pipeline),
            Duration::from_secs(secs),
        ));
    }
}

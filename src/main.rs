//! Course Search service entry point

use anyhow::Result;
use course_search::{
    config,
    index::IndexLoader,
    provision::Provisioner,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting Course Search v{}", course_search::VERSION);

    // Load configuration
    let settings = config::load()?;

    // Connect to the index
    let index = IndexLoader::load(&settings.index)?;

    // Prepare the index before taking traffic
    if settings.provisioning.enabled {
        let report = Provisioner::new(index.as_ref(), &settings.provisioning)
            .run()
            .await?;
        info!(
            "Provisioning done: {} loaded, {} indexed",
            report.loaded, report.indexed
        );
    } else {
        info!("Provisioning disabled, serving the index as-is");
    }

    // Bind address
    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    // Create router
    let app = create_router(AppState::new(settings, index));

    info!("Starting server on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

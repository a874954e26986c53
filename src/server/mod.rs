pub mod app;
pub mod error;
pub mod handlers;

use anyhow::Result;
use tracing::info;

use crate::config::AppConfig;
use crate::storage::SeriesStore;

pub async fn start_server(config: &AppConfig) -> Result<()> {
    let store = SeriesStore::new(&config.data_dir);
    store.ensure_root()?;
    info!("Storing series under {}", store.root().display());

    let app = app::create_app(store).await?;

    log_routes(config);

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    info!("Server running on http://{}", config.listen_addr());

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes(config: &AppConfig) {
    info!("Endpoints:");
    info!("  /                           - Rate tracker page (?game=<name>)");
    info!("  /series/add                 - Append a rate (POST form)");
    info!("  /series/save                - Replace a series with edited rows (POST form)");
    info!("  /series/chart.svg           - Chart of one series (?game=<name>)");
    info!("  /health                     - Health check");
    info!("Open http://{}/ in a browser", config.listen_addr());
}

use clap::Parser;
use log::info;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{Config, DataSourceMode};
use crate::services::{refresher, AppContext};

/// IPO & grey market premium tracking service
#[derive(Parser)]
#[command(name = "ipotrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Listening port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Listing store path (overrides IPOTRACK_STORE)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Where listing data comes from (overrides IPOTRACK_DATA_SOURCE)
    #[arg(long, value_enum)]
    data_source: Option<DataSourceMode>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::from_env()?;
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(store) = self.store {
            config.store_path = store;
        }
        if let Some(mode) = self.data_source {
            config.data_source = mode;
        }

        let port = config.port;
        let live = config.data_source == DataSourceMode::Live;
        let ctx = Arc::new(AppContext::new(config)?);

        // populate the cache before serving
        refresher::refresh(&ctx).await;

        // timers only matter when there is something to re-scrape
        if live {
            tokio::spawn(refresher::run_scheduler(Arc::clone(&ctx)));
        }

        let app = crate::http::router(ctx);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("ipotrack listening on {addr}");
        axum::serve(listener, app).await?;
        Ok(())
    }
}

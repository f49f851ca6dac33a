mod cli;
mod config;
mod http;
mod services;
mod sources;
mod types;

use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    Cli::parse().run().await
}

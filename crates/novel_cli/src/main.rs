mod app;
mod cli;
mod effects;
mod logging;
mod render;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();
    logging::initialize(cli.log, cli.log_level());
    app::run(cli).await
}

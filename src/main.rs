use bizdesk_lib::bootstrap::tracing::init_tracing_subscriber;
use bizdesk_lib::cli::Cli;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_subscriber(cli.log_file)?;
    cli.run().await
}

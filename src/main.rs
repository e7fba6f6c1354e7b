use anyhow::Result;
use clap::Parser;
use vouchers::cli::Cli;
use vouchers::logging::init_cli_logger;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_cli_logger(cli.verbose);
    cli.run().await
}

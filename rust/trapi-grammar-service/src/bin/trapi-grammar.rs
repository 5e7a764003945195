use anyhow::Result;
use clap::Parser;
use trapi_grammar_service::cli::Cli;

#[tokio::main]
pub async fn main() -> Result<()> {
    let cli = Cli::parse();
    trapi_grammar_service::init_tracing(cli.verbose);
    trapi_grammar_service::run(cli).await
}

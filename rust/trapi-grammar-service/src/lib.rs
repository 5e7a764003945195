//! Command line and HTTP front end for [`trapi_grammar`].

pub mod cli;
pub mod server;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use trapi_grammar::{QueryGraph, Translator};

use crate::cli::{Cli, Command};
use crate::server::Server;

/// Install the log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.grammar_config()?;
    let translator = Translator::from_config(&config).await?;

    match cli.command {
        Command::Parse { question } => {
            let graph = translator.parse_question(&question).await?;
            println!("{}", serde_json::to_string_pretty(&graph)?);
        }
        Command::Encode { graph } => {
            let graph = read_graph(&graph)?;
            println!("{}", translator.encode_graph(&graph).await?);
        }
        Command::Serve { bind } => {
            let server = Server::start(bind, Arc::new(translator)).await?;
            tokio::signal::ctrl_c().await?;
            tracing::info!("shutting down");
            server.stop().await?;
        }
    }
    Ok(())
}

fn read_graph(path: &Path) -> anyhow::Result<QueryGraph> {
    let json = if path == Path::new("-") {
        let mut json = String::new();
        std::io::stdin().read_to_string(&mut json)?;
        json
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&json)?)
}

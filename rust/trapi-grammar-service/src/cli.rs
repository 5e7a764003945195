use std::path::PathBuf;

use clap::{Parser, Subcommand};
use trapi_grammar::GrammarConfig;

#[derive(Debug, Parser)]
#[command(name = "trapi-grammar")]
#[command(bin_name = "trapi-grammar")]
#[command(about = "Translate between biomedical questions and TRAPI query graphs", long_about = None)]
pub struct Cli {
    /// Grammar configuration (JSON); defaults apply when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a question and print its query graph
    Parse { question: String },

    /// Print the question a query graph asks; `-` reads from stdin
    Encode { graph: PathBuf },

    /// Serve `/to_trapi` and `/to_english` over HTTP
    Serve {
        #[arg(short, long, default_value = "127.0.0.1:8080")]
        bind: String,
    },
}

impl Cli {
    pub fn grammar_config(&self) -> anyhow::Result<GrammarConfig> {
        Ok(match &self.config {
            Some(path) => GrammarConfig::from_path(path)?,
            None => GrammarConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommands() {
        let cli = Cli::parse_from(["trapi-grammar", "parse", "What drugs treat asthma?"]);
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Command::Parse { ref question } if question == "What drugs treat asthma?"));

        let cli = Cli::parse_from(["trapi-grammar", "serve", "--verbose", "--bind", "0.0.0.0:9000"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Serve { ref bind } if bind == "0.0.0.0:9000"));
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

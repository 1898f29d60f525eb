//! CLI definitions: argument parsing, subcommands, and help text.

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  intelliserve                          Launch interactive TUI
  intelliserve -p \"explain X\"           Single prompt, print the reply to stdout
  intelliserve -p - -m grok-beta        Read prompt from stdin, ask Grok
  intelliserve models --query llama     List matching models
  intelliserve config                   Show config paths and API key status
  intelliserve completions zsh          Generate zsh completions

ENVIRONMENT:
  XAI_API_KEY, GROQ_API_KEY             Provider API keys (at least one required)
  XAI_BASE_URL, GROQ_BASE_URL           Override provider endpoints
  INTELLISERVE_MODEL                    Initial model id (default llama3-70b-8192)
  INTELLISERVE_TEMPERATURE              Sampling temperature (default 0.7)
  INTELLISERVE_TIMEOUT_SECS             Connect/request timeout (default 30)
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    name = "intelliserve",
    author,
    version,
    about = "Chat with Grok and Groq-hosted models from the terminal",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Send a single prompt then exit (without opening the TUI)
    #[arg(
        short = 'p',
        long,
        help = "Provide a prompt to get an immediate reply (use '-' to read from stdin)"
    )]
    pub prompt: Option<String>,

    /// Override the model
    #[arg(short = 'm', long, help = "Model ID (e.g. llama3-70b-8192)")]
    pub model: Option<String>,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show config paths, model, and API key status
    Config,
    /// List available models
    Models {
        /// Filter models by id or name
        #[arg(long)]
        query: Option<String>,
    },
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn log_level_from_flags() {
        let args = Args::parse_from(["intelliserve"]);
        assert_eq!(args.log_level(), "warn");
        let args = Args::parse_from(["intelliserve", "-vv"]);
        assert_eq!(args.log_level(), "debug");
        let args = Args::parse_from(["intelliserve", "-v", "-q"]);
        assert_eq!(args.log_level(), "error");
    }

    #[test]
    fn prompt_and_model_flags() {
        let args = Args::parse_from(["intelliserve", "-p", "Hello", "-m", "grok-beta"]);
        assert_eq!(args.prompt.as_deref(), Some("Hello"));
        assert_eq!(args.model.as_deref(), Some("grok-beta"));
        assert!(args.command.is_none());
    }

    #[test]
    fn models_subcommand_with_query() {
        let args = Args::parse_from(["intelliserve", "models", "--query", "llama"]);
        match args.command {
            Some(Commands::Models { query }) => assert_eq!(query.as_deref(), Some("llama")),
            _ => panic!("expected models subcommand"),
        }
    }
}

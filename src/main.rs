//! # IntelliServe - terminal chat client for hosted LLMs
//!
//! Chat with x.ai Grok and Groq-hosted Llama, Mixtral, and Gemma models.
//!
//! ## Modes
//! - Interactive terminal UI (default)
//! - Single prompt with `-p` / `--prompt`
//! - `models`, `config`, and `completions` subcommands

mod cli;
mod core;
mod run;
mod tui;

use clap::{CommandFactory, Parser};
use dotenv::dotenv;

use cli::{Args, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();

    let args = Args::parse();
    run::init_logger(&args);

    match &args.command {
        Some(Commands::Config) => {
            core::cli::run_config();
            return Ok(());
        }
        Some(Commands::Models { query }) => {
            core::cli::run_models(query.as_deref());
            return Ok(());
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Args::command();
            let name = cmd.get_name().to_string();
            cli::generate(*shell, &mut cmd, name, &mut std::io::stdout());
            return Ok(());
        }
        None => {}
    }

    // Print user-friendly message; exit uses Display not Debug
    let config = core::config::load().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let result = match args.prompt.as_deref() {
        Some(prompt) => run::run_single_prompt(&args, prompt, &config).await,
        None => run::launch_tui(config).await,
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

//! Application run modes: logger init, single prompt, TUI launch.

use std::io;

use tokio::runtime::Handle;

use crate::cli::Args;
use crate::core;
use crate::core::config::Config;
use crate::core::conversation::{ConversationController, SendOutcome};
use crate::core::setup;

/// Initialize env_logger. In TUI mode, writes to file to avoid corrupting the display.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level));

    if args.prompt.is_none() && args.command.is_none() {
        let log_path = core::paths::cache_dir().and_then(|d| {
            std::fs::create_dir_all(&d).ok()?;
            Some(d.join(format!("{}.log", core::app::NAME)))
        });
        if let Some(path) = log_path
            && let Ok(file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
        {
            logger.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }
    let _ = logger.try_init();
}

/// Run single prompt mode: one chat turn, reply printed to stdout.
pub async fn run_single_prompt(
    args: &Args,
    prompt_arg: &str,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let prompt = if prompt_arg == "-" {
        io::read_to_string(io::stdin())?
    } else {
        prompt_arg.to_string()
    };
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err("empty prompt".into());
    }

    let setup = setup::prepare(config, args.model.as_deref())?;
    let mut conversation = ConversationController::new(
        setup.router,
        setup.models,
        &setup.initial_model.id,
        Handle::current(),
    );

    if let SendOutcome::Ignored(reason) = conversation.send_message(prompt) {
        return Err(format!("prompt not sent: {:?}", reason).into());
    }
    let reply = conversation
        .next_completion()
        .await
        .ok_or("no reply received")?;

    match reply.error {
        Some(error) => Err(error.into()),
        None => {
            println!("{}", reply.text);
            Ok(())
        }
    }
}

/// Launch the TUI in a blocking thread. Returns on panic or IO error.
pub async fn launch_tui(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let setup = setup::prepare(&config, None)?;
    let join_result: Result<io::Result<()>, tokio::task::JoinError> =
        tokio::task::spawn_blocking(move || crate::tui::run(setup)).await;

    match join_result {
        Ok(io_result) => io_result?,
        Err(join_err) => {
            if let Ok(panic) = join_err.try_into_panic() {
                let msg = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    format!("{:?}", panic)
                };
                eprintln!("TUI panic: {}", msg);
            }
            return Err(
                Box::new(io::Error::other("TUI thread panicked")) as Box<dyn std::error::Error>
            );
        }
    }
    Ok(())
}

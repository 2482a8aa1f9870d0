use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod commands;
mod config;
mod controller;
mod conversation;
mod core;
mod display;
mod input;
mod providers;
mod transcript;
mod utils;

use crate::app::Application;
use crate::cli::Args;
use crate::commands::create_command_registry;
use crate::config::{API_KEY_ENV, Config};
use crate::controller::{ChatController, Notice};
use crate::conversation::{ContextWindow, ConversationClient};
use crate::core::error::ChatError;
use crate::providers::gemini::GeminiProvider;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("gchat=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<(), ChatError> {
    let config = Config::load()?;
    let settings = config.resolve(&args, std::env::var(API_KEY_ENV).ok())?;
    tracing::info!(model = %settings.model, base_url = %settings.base_url, "starting session");

    let provider = GeminiProvider::new(&settings)?;
    let window = match settings.max_context_turns {
        Some(turns) => ContextWindow::last_turns(turns),
        None => ContextWindow::unbounded(),
    };
    let client = ConversationClient::new(Box::new(provider), window);
    let controller = ChatController::new(client, &settings.greeting);

    let mut app = Application::new(args, controller, create_command_registry());
    app.run().await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        display::display_notification(&Notice {
            title: "Error".to_string(),
            message: e.to_string(),
        });
        std::process::exit(1);
    }
}

//! CLI entry point for promptdeck.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

mod client;
mod config;
mod conversation;
mod layout;
mod logging;
mod models;
mod palette;
mod persistence;
mod settings;
mod tui;

use crate::config::Config;
use crate::persistence::PaneStore;
use crate::settings::Settings;
use crate::tui::TuiOptions;

#[derive(Parser, Debug)]
#[command(
    name = "promptdeck",
    author,
    version,
    about = "Multi-pane terminal workbench for prompting LLMs",
    long_about = "promptdeck arranges prompt, context, model selection and response\n\
                  panes in one resizable terminal layout.\n\nJust run 'promptdeck' to start."
)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Model for this session (full 'provider:model' id)
    #[arg(short, long)]
    model: Option<String>,

    /// External editor command override
    #[arg(long)]
    editor: Option<String>,

    /// Disable the alternate screen buffer (inline mode)
    #[arg(long = "no-alt-screen")]
    no_alt_screen: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print resolved configuration and data paths
    ConfigPath,
    /// Update a persistent setting (editor, streaming, default_model, ...)
    Set { key: String, value: String },
    /// List the models available for selection
    Models,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let cli = Cli::parse();
    logging::set_verbose(cli.verbose);

    match cli.command {
        Some(Commands::ConfigPath) => {
            println!("settings: {}", Settings::path()?.display());
            println!("data:     {}", PaneStore::default_location()?.data_dir().display());
            return Ok(());
        }
        Some(Commands::Set { key, value }) => {
            let mut settings = Settings::load()?;
            settings.set(&key, &value)?;
            settings.save()?;
            println!("{key} = {value}");
            return Ok(());
        }
        Some(Commands::Models) => {
            for model in models::AVAILABLE_MODELS {
                println!("{:<36} {}", model.name, model.display_name);
            }
            return Ok(());
        }
        None => {}
    }

    let settings = Settings::load().unwrap_or_else(|_| Settings::default());
    let mut options = TuiOptions::from_settings(&settings);
    options.use_alt_screen = !cli.no_alt_screen;
    if let Some(editor) = cli.editor {
        options.editor = editor;
    }
    if let Some(model) = cli.model {
        if models::model_config(&model).is_none() {
            anyhow::bail!("Unknown model '{model}'. Run 'promptdeck models' for the list.");
        }
        options.model_override = Some(model);
    }

    let config = Config::from_env();
    if !config.has_api_key(models::Provider::OpenAi)
        && !config.has_api_key(models::Provider::Anthropic)
    {
        logging::warn("No API keys configured; set OPENAI_API_KEY or ANTHROPIC_API_KEY");
    }
    logging::info("starting promptdeck TUI");
    tui::run_tui(&config, &settings, options).await
}

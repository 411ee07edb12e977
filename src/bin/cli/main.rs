mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "studybuddy-cli", about = "StudyBuddy spaced repetition reviews", version)]
struct Cli {
    /// User whose schedule to use (default: user_id from config)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Directory holding user documents
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Add an item to the review schedule
    Add {
        question: String,
        answer: String,
        /// Item type tag (default from config, usually "flashcard")
        #[arg(long = "type")]
        item_type: Option<String>,
    },

    /// List items due for review
    Due,

    /// List every item in the schedule
    List,

    /// Record a review grade for an item
    Review {
        /// Item ID
        id: String,
        /// How well you knew it (1-5)
        quality: i32,
    },

    /// Show the interval each grade would give an item
    Preview {
        /// Item ID
        id: String,
    },

    /// Show schedule statistics
    Stats,

    /// Review due items interactively
    Study,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();

    let mut app = app::App::new(cli.config.as_deref(), cli.user.as_deref(), cli.data_dir).await?;

    match cli.command {
        Command::Add { question, answer, item_type } => {
            commands::add::run(&mut app, question, answer, item_type, &cli.format).await?;
        }
        Command::Due => {
            commands::list::run_due(&app, &cli.format, use_color)?;
        }
        Command::List => {
            commands::list::run_all(&app, &cli.format, use_color)?;
        }
        Command::Review { id, quality } => {
            commands::review::run(&mut app, &id, quality, &cli.format).await?;
        }
        Command::Preview { id } => {
            commands::review::run_preview(&app, &id, &cli.format)?;
        }
        Command::Stats => {
            commands::stats::run(&app, &cli.format)?;
        }
        Command::Study => {
            commands::study::run(&mut app, use_color).await?;
        }
    }

    app.check_persisted()
}

//! civiquiz CLI: civic education quizzes in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "civiquiz", version, about = "Civic education quizzes for Nepal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options for an interactive quiz.
#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Category to play
    #[arg(long)]
    pub category: String,

    /// Deck file or directory to play offline (default: the quiz server)
    #[arg(long)]
    pub deck: Option<PathBuf>,

    /// Name reported with submitted results
    #[arg(long)]
    pub name: Option<String>,

    /// Seed for reproducible shuffling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Keep options in their original order
    #[arg(long)]
    pub no_shuffle: bool,

    /// Also shuffle question order
    #[arg(long)]
    pub shuffle_questions: bool,

    /// Type answers instead of picking a number
    #[arg(long)]
    pub free_text: bool,

    /// Seconds allowed per question
    #[arg(long)]
    pub time_limit: Option<u64>,

    /// Submit results to the quiz server when done
    #[arg(long)]
    pub submit: bool,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List quiz categories
    Categories {
        /// Deck file or directory to list instead of the quiz server
        #[arg(long)]
        deck: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Play a quiz
    Play(PlayArgs),

    /// Sort cards into bins
    Sort {
        /// Sorting deck file
        #[arg(long)]
        deck: PathBuf,

        /// Seed for the card order
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Validate deck TOML files
    Validate {
        /// Path to deck file or directory
        #[arg(long)]
        decks: PathBuf,
    },

    /// Ask the civic-law assistant a question
    Chat {
        /// The question to ask
        question: String,

        /// Conversation id to continue
        #[arg(long)]
        session_id: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example deck
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("civiquiz=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Categories { deck, config } => commands::categories::execute(deck, config).await,
        Commands::Play(args) => commands::play::execute(args).await,
        Commands::Sort { deck, seed } => commands::sort::execute(deck, seed).await,
        Commands::Validate { decks } => commands::validate::execute(decks),
        Commands::Chat {
            question,
            session_id,
            config,
        } => commands::chat::execute(question, session_id, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

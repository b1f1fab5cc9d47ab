//! chalkboard CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "chalkboard", version, about = "Exam question bank review tool")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Library data directory (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and a sample question bank
    Init,

    /// Import a JSON question bank into the library
    Import {
        /// Path to the bank file
        file: PathBuf,

        /// Display name (default: file name without ".json")
        #[arg(long)]
        name: Option<String>,
    },

    /// List the library
    List,

    /// Delete an exam or folder, or one part of a folder
    Delete {
        /// Id of the entry to delete
        id: String,

        /// Folder containing the part to delete
        #[arg(long)]
        folder: Option<String>,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Remove every entry from the library
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Check a question bank for problems without importing it
    Validate {
        /// Path to the bank file
        file: PathBuf,
    },

    /// Take an exam interactively
    Quiz {
        /// Exam id (a root exam or a folder part)
        id: String,
    },

    /// Grade a file of answers against an exam
    Grade {
        /// Exam id (a root exam or a folder part)
        id: String,

        /// JSON object mapping question id to an answer or list of answers
        #[arg(long)]
        answers: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "chalkboard=info".parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let opts = commands::GlobalOpts {
        config: cli.config,
        data_dir: cli.data_dir,
    };

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Import { file, name } => commands::import::execute(&opts, file, name),
        Commands::List => commands::list::execute(&opts),
        Commands::Delete { id, folder, yes } => commands::delete::execute(&opts, id, folder, yes),
        Commands::Clear { yes } => commands::delete::clear(&opts, yes),
        Commands::Validate { file } => commands::validate::execute(file),
        Commands::Quiz { id } => commands::quiz::execute(&opts, id),
        Commands::Grade {
            id,
            answers,
            format,
        } => commands::grade::execute(&opts, id, answers, format),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod key;
mod serve;
mod studies;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use interview_insights::config::{load_settings_with_options, LoadOptions};
use interview_insights::models::PromptMode;

#[derive(Parser)]
#[command(name = "insights")]
#[command(about = "Turn user-interview snippets into a summary and key themes")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the stored API key (overrides config file)
    #[arg(long, global = true, env = "INSIGHTS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Use this API key for this run instead of the stored one
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Where the snippet and prompt options come from.
#[derive(clap::Args, Debug)]
struct SnippetArgs {
    /// Study ID (see `insights studies list`)
    study_id: String,
    /// Prompt mode (defaults to the configured default_mode)
    #[arg(short, long, value_enum)]
    mode: Option<PromptMode>,
    /// Research objective to steer the analysis
    #[arg(short, long)]
    objective: Option<String>,
    /// Snippet text (reads stdin when neither --snippet nor --file is given)
    #[arg(short, long, conflicts_with = "file")]
    snippet: Option<String>,
    /// Read the snippet from a file
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the study catalog
    Studies {
        #[command(subcommand)]
        command: StudyCommands,
    },

    /// Manage the stored API key
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },

    /// Generate a summary and themes for an interview snippet
    Analyze {
        #[command(flatten)]
        args: SnippetArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the messages that would be sent, without calling the API
    Prompt {
        #[command(flatten)]
        args: SnippetArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the web interface
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default from config, else 127.0.0.1:3030)
        bind: Option<String>,
    },
}

#[derive(Subcommand)]
enum StudyCommands {
    /// List all studies
    List,
    /// Show one study
    Show {
        /// Study ID
        id: String,
    },
}

#[derive(Subcommand)]
enum KeyCommands {
    /// Validate an API key and store it (reads stdin when omitted)
    Set {
        /// API key (sk-...)
        key: Option<String>,
    },
    /// Show whether a key is configured
    Status,
    /// Remove the stored key
    Clear,
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        data_dir: cli.data_dir,
    };
    let settings = load_settings_with_options(options).await?;
    let api_key = cli.api_key.as_deref();

    match cli.command {
        Commands::Studies { command } => match command {
            StudyCommands::List => studies::cmd_studies_list(),
            StudyCommands::Show { id } => studies::cmd_studies_show(&id),
        },
        Commands::Key { command } => match command {
            KeyCommands::Set { key } => key::cmd_key_set(&settings, key).await,
            KeyCommands::Status => key::cmd_key_status(&settings, api_key),
            KeyCommands::Clear => key::cmd_key_clear(&settings),
        },
        Commands::Analyze { args, json } => {
            analyze::cmd_analyze(&settings, api_key, args, json).await
        }
        Commands::Prompt { args, json } => analyze::cmd_prompt(&settings, args, json),
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            serve::cmd_serve(&settings, api_key, &bind).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "insights", "analyze", "1", "--mode", "researcher", "--snippet", "hello", "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze { args, json } => {
                assert_eq!(args.study_id, "1");
                assert_eq!(args.mode, Some(PromptMode::Researcher));
                assert_eq!(args.snippet.as_deref(), Some("hello"));
                assert!(json);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_snippet_and_file_conflict() {
        let result = Cli::try_parse_from([
            "insights", "prompt", "1", "--snippet", "x", "--file", "y.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let result = Cli::try_parse_from(["insights", "analyze", "1", "--mode", "loud"]);
        assert!(result.is_err());
    }
}

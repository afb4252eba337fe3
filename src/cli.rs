//! CLI module
//!
//! This module provides the command-line interface for recovery-mode: the
//! interactive shell plus a few one-shot commands that print a screen or
//! work on the saved notes.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::EnvFilter;

use crate::{
    capabilities::Capabilities,
    config::{default_data_dir, Config, DEFAULT_LOG_LEVEL},
    models::{AppState, Core, Snapshot, View},
    shell,
    store::NoteStore,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding the notes file
    #[arg(long, global = true, env = "RECOVERY_MODE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Start the rest timer with sound off
    #[arg(long, global = true)]
    mute: bool,

    /// Local command that records one utterance and prints its transcript
    #[arg(long, global = true, env = "RECOVERY_MODE_DICTATION_COMMAND")]
    dictation_command: Option<String>,

    /// Log filter, e.g. warn or recovery_mode=debug
    #[arg(long, global = true, env = "RECOVERY_MODE_LOG", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive screens (the default)
    Run,

    /// Work with saved notes
    Notes {
        #[command(subcommand)]
        command: NotesCommands,
    },

    /// Print a random fact
    Fact,

    /// Print the fuel screen
    Fuel,

    /// Print the pacing screen
    Pacing,

    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum NotesCommands {
    /// List notes, newest first
    List,

    /// Add a note
    Add {
        /// Note text
        text: String,
    },

    /// Remove a note by id
    Remove {
        /// Note id as shown by `notes list`
        id: i64,
    },
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            data_dir: self.data_dir.clone().unwrap_or_else(default_data_dir),
            sound_enabled: !self.mute,
            dictation_command: self.dictation_command.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

/// Run the CLI application
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.config();

    init_tracing(&config.log_level);
    tracing::debug!("Data directory: {}", config.data_dir.display());

    match &cli.command {
        None | Some(Commands::Run) => {
            let core = build_core(&config);
            shell::run(core).await?;
            Ok(())
        }

        Some(Commands::Notes { command }) => {
            let core = build_core(&config);
            core.navigate(View::Notes);

            match command {
                NotesCommands::List => {}
                NotesCommands::Add { text } => match core.add_note(text)? {
                    Some(note) => println!("Added note {}", note.id()),
                    None => println!("Nothing to add"),
                },
                NotesCommands::Remove { id } => {
                    if core.remove_note(*id)? {
                        println!("Removed note {}", id);
                    } else {
                        println!("No note with id {}", id);
                    }
                }
            }

            if let Snapshot::Notes { notes, .. } = core.snapshot() {
                if notes.is_empty() {
                    println!("No notes yet.");
                }
                for note in notes {
                    println!("{}\t{}", note.id(), note.text());
                }
            }
            Ok(())
        }

        Some(Commands::Fact) => {
            let core = build_core(&config);
            core.navigate(View::Facts);
            core.next_fact();
            print!("{}", shell::render_body(&core.snapshot()));
            Ok(())
        }

        Some(Commands::Fuel) => {
            print!("{}", shell::render_body(&Snapshot::Fuel));
            Ok(())
        }

        Some(Commands::Pacing) => {
            print!("{}", shell::render_body(&Snapshot::Pacing));
            Ok(())
        }

        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, bin_name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Wires the core to the notes file and the host capabilities
pub fn build_core(config: &Config) -> Core {
    let store: Arc<dyn NoteStore> = Arc::new(config.note_store());
    let state = AppState::new(store).with_sound(config.sound_enabled);
    let capabilities = Capabilities::detect(config.dictation_command.as_deref());

    Core::new(state, capabilities)
}

// Logs go to stderr so they never mix into the screen on stdout
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

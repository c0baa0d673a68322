use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::qr::QrSize;

#[derive(Parser)]
#[command(name = "pitchdeck")]
#[command(author, version, about)]
#[command(long_about = "Present a pitch deck with live demo links.\n\n\
    Slides come from a YAML deck file, or the built-in deck when none is given.\n\
    Demo buttons resolve against PITCHDECK_API_BASE_URL / PITCHDECK_ORIGIN.\n\n\
    Examples:\n  \
    pitchdeck                        Present the built-in deck (fullscreen)\n  \
    pitchdeck deck.yaml --windowed   Present a deck in a window\n  \
    pitchdeck deck.yaml --watch      Reload the deck when the file changes\n  \
    pitchdeck links                  List resolved demo links\n  \
    pitchdeck qr --size lg           Print the QR code image URL")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Deck file to present (YAML)
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// Reload the deck when the file changes
    #[arg(long, global = false)]
    pub watch: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every demo link with its resolved URL
    Links {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a single demo link key
    Resolve {
        /// Link key (e.g. CHAT_DEMO)
        key: String,

        /// URL to use when the key is unknown
        #[arg(long)]
        fallback: Option<String>,
    },

    /// Print the QR code image URL
    Qr {
        /// Data to encode (defaults to the configured QR URL)
        #[arg(long)]
        url: Option<String>,

        /// Image size
        #[arg(long, value_enum)]
        size: Option<QrSize>,
    },

    /// Substitute the API base URL into static HTML demo pages
    PrepareHtml {
        /// HTML files to rewrite in place
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Export slides as PNG images
    Export {
        /// Deck file to export (defaults to the built-in deck)
        file: Option<PathBuf>,

        /// Output directory for PNG files
        #[arg(short, long, default_value = "export")]
        output_dir: PathBuf,

        /// Export width in pixels
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Export height in pixels
        #[arg(long, default_value = "1080")]
        height: u32,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, links.api_base_url, qr.size)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Links { json }) => crate::commands::links::run(json),
            Some(Commands::Resolve { key, fallback }) => {
                crate::commands::resolve::run(&key, fallback.as_deref())
            }
            Some(Commands::Qr { url, size }) => crate::commands::qr::run(url, size),
            Some(Commands::PrepareHtml { files }) => crate::commands::prepare_html::run(&files),
            Some(Commands::Export {
                file,
                output_dir,
                width,
                height,
            }) => crate::commands::export::run(file, output_dir, width, height),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                crate::commands::print_version();
                Ok(())
            }
            None => {
                if let Some(file) = &self.file {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                }
                crate::app::run(crate::app::PresentOptions {
                    file: self.file,
                    windowed: self.windowed,
                    start_slide: self.slide,
                    watch: self.watch,
                })
            }
        }
    }
}

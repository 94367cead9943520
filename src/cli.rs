//! Command-line interface for genpkg

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "genpkg")]
#[command(about = "Generate packages from templates and upgrade them in place")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the templates root directory
    #[arg(long, global = true)]
    pub templates: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a new package from a template generator
    New {
        /// Generator name
        generator: String,

        /// Path where the package should be created. Defaults to
        /// packages/<package-name>.
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Answers as a JSON object, bypassing interactive prompts
        #[arg(long)]
        answers: Option<String>,

        /// Don't emit any output
        #[arg(short, long)]
        silent: bool,
    },

    /// Upgrade an existing package with an updated template
    Upgrade {
        /// Path to the existing package
        package_path: PathBuf,

        /// Don't emit any output
        #[arg(short, long)]
        silent: bool,
    },

    /// List available generators
    List,
}

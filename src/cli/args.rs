//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::config::OutputFormat;

/// Inspect menu trees stored as hierarchical documents
#[derive(Parser, Debug)]
#[command(name = "menutree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Output format (default from config)
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Accept menu node names without the configured suffix
    #[arg(long, global = true)]
    pub lenient: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the renderable menu tree
    Show {
        /// Menu document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        document: PathBuf,
    },

    /// Print the renderer options of one node
    Options {
        /// Menu document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        document: PathBuf,
        /// Node path, e.g. /main-item/about-item (default: root)
        #[arg(short, long, default_value = "/")]
        path: String,
    },

    /// List the renderable children of one node
    Children {
        /// Menu document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        document: PathBuf,
        /// Node path (default: root)
        #[arg(short, long, default_value = "/")]
        path: String,
    },

    /// Report nodes with corrupt attributes, missing labels or bad names
    Check {
        /// Menu document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        document: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented template
    Template,
    /// Show config file locations
    Path,
}

//! Command-line interface argument parsing
//!
//! Defines all CLI commands and their arguments using Clap.

use crate::config::SERVER_URL_ENV;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// GLB Transfer - upload and download GLB models from a GLB file server
#[derive(Parser, Debug)]
#[command(name = "glb-transfer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Upload, download and list GLB models on a GLB file server")]
#[command(long_about = concat!(
    "GLB Transfer (v", env!("CARGO_PKG_VERSION"), ")\n",
    "Moves binary GLB models to and from a GLB file server over HTTP.\n\n",
    "Models travel base64-encoded inside JSON. Press Ctrl-C to cancel a transfer;\n",
    "a cancelled download never leaves a partial file behind."
))]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// GLB file server URL (overrides the config file)
    #[arg(long, global = true, env = SERVER_URL_ENV)]
    pub server_url: Option<String>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a GLB file
    ///
    /// Examples:
    ///   glb-transfer upload models/chair.glb
    ///   glb-transfer upload models/chair.glb --description "office chair"
    #[command(visible_alias = "push")]
    #[command(display_order = 1)]
    Upload {
        /// Path of the GLB file to upload
        path: PathBuf,

        /// Description stored alongside the file
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Download a GLB file by id
    ///
    /// Example:
    ///   glb-transfer download 1 downloaded.glb
    #[command(visible_alias = "pull")]
    #[command(display_order = 2)]
    Download {
        /// Server-side file id
        id: u64,

        /// Where to save the file (replaced if it exists)
        output: PathBuf,
    },

    /// Download a GLB file by its stored name
    ///
    /// Example:
    ///   glb-transfer download-by-name chair.glb ./chair.glb
    #[command(display_order = 3)]
    DownloadByName {
        /// Name the file was uploaded as
        name: String,

        /// Where to save the file (replaced if it exists)
        output: PathBuf,
    },

    /// List files stored on the server
    #[command(visible_alias = "ls")]
    #[command(display_order = 4)]
    List,

    /// Check that the server is up
    #[command(display_order = 5)]
    Health {
        /// Ask for the detailed report (database and cache status)
        #[arg(long)]
        detailed: bool,
    },

    /// Show metadata for a stored file
    #[command(display_order = 6)]
    Info {
        /// Server-side file id
        id: u64,
    },

    /// Delete a stored file
    #[command(visible_alias = "rm")]
    #[command(display_order = 7)]
    Delete {
        /// Server-side file id
        id: u64,
    },

    /// Write the effective configuration to the config file
    #[command(display_order = 8)]
    Init,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }
}

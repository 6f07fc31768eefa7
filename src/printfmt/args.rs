use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "printfmt", version)]
#[command(about = "Render stored documents as printable HTML and CSS", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory holding records, config and permissions
    #[arg(long, global = true, env = "PRINTFMT_HOME")]
    pub home: Option<PathBuf>,

    /// Act as this user
    #[arg(short, long, global = true, env = "PRINTFMT_USER", default_value = "Guest")]
    pub user: String,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a document
    #[command(alias = "p")]
    Print {
        /// Document type (e.g. "Sales Invoice")
        #[arg(long)]
        doctype: Option<String>,

        /// Document name (e.g. "SINV-0001")
        #[arg(long)]
        name: Option<String>,

        /// Print format name (defaults to the standard layout)
        #[arg(short, long)]
        format: Option<String>,

        /// Stylesheet name (defaults to the configured print style)
        #[arg(short, long)]
        style: Option<String>,

        /// Emit the full response as JSON
        #[arg(long)]
        json: bool,

        /// Write the stylesheet to this file instead of discarding it
        #[arg(long)]
        css_out: Option<PathBuf>,
    },

    /// Show the template a print format resolves to
    Resolve {
        /// Document type the format is used with
        doctype: String,

        /// Print format name
        format: String,
    },

    /// Render a stylesheet
    Style {
        /// Style name (defaults to the configured print style)
        name: Option<String>,
    },

    /// Manage print format records
    #[command(subcommand)]
    Format(FormatCommands),
}

#[derive(Subcommand, Debug)]
pub enum FormatCommands {
    /// List print formats
    #[command(alias = "ls")]
    List,

    /// Create or update a print format from a JSON file
    Save {
        /// Path to the record JSON
        file: PathBuf,
    },

    /// Delete a print format
    #[command(alias = "rm")]
    Delete {
        /// Print format name
        name: String,
    },
}

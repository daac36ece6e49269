//! CLI commands and argument parsing

use crate::types::{ApiScope, FileKind, Method};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// LearnHub command-line client
#[derive(Parser, Debug)]
#[command(name = "learnhub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Server root, overriding all three base URLs (e.g. https://learn.example.com)
    #[arg(short, long, global = true)]
    pub server: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send an arbitrary request and print the JSON response
    Request {
        /// HTTP method
        #[arg(short, long, default_value = "GET", value_parser = parse_method)]
        method: Method,

        /// Path relative to the scope's base URL
        path: String,

        /// API scope: general, user or admin
        #[arg(long, default_value = "general", value_parser = parse_scope)]
        scope: ApiScope,

        /// Inline JSON body
        #[arg(long)]
        data: Option<String>,
    },

    /// List the instructor's courses
    Courses,

    /// Upload a thumbnail or lesson video through a presigned URL
    Upload {
        /// File kind: thumbnail or video
        #[arg(long, value_parser = parse_kind)]
        kind: FileKind,

        /// File to upload
        #[arg(short, long)]
        file: PathBuf,

        /// Module index (lesson videos)
        #[arg(long)]
        module: Option<usize>,

        /// Lesson index within the module (lesson videos)
        #[arg(long)]
        lesson: Option<usize>,
    },

    /// Show a payment invoice
    Invoice {
        /// Payment id
        payment_id: String,
    },

    /// Refresh the session now
    Refresh,
}

fn parse_method(s: &str) -> Result<Method, String> {
    serde_json::from_value(serde_json::Value::String(s.to_ascii_uppercase()))
        .map_err(|_| format!("unsupported method: {s}"))
}

fn parse_scope(s: &str) -> Result<ApiScope, String> {
    s.parse()
}

fn parse_kind(s: &str) -> Result<FileKind, String> {
    s.parse()
}

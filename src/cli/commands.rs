use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `Vidlytics` - AI analysis of YouTube Studio CSV exports.
#[derive(Parser, Debug)]
#[command(name = "vidlytics")]
#[command(version)]
#[command(about = "Analyze YouTube Studio CSV exports with Gemini.", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of ~/.vidlytics/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze CSV exports and print the report
    Analyze {
        /// CSV files to analyze (non-CSV and duplicate names are skipped)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Model to use
        #[arg(long)]
        model: Option<String>,

        /// Temperature (0.0 - 2.0)
        #[arg(short, long)]
        temperature: Option<f64>,

        /// Also write the normalized result as JSON
        #[arg(long, value_name = "PATH")]
        json: Option<PathBuf>,

        /// Open a follow-up chat about the result
        #[arg(long)]
        chat: bool,
    },

    /// Print the assembled analysis prompt without calling the model
    Prompt {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the response schema sent with every analysis request
    Schema,
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "uo-mod-ocr", version, about = "Ultima Online tooltip OCR analyzer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract modifiers and estimate the item name from OCR text
    Analyze {
        #[arg(help = "Text file with the OCR output, or - for stdin")]
        input: String,
        #[arg(long, help = "Analysis config JSON (default: config.json lookup)")]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        no_domain_filter: bool,
        #[arg(long, default_value_t = false, help = "Start from the permissive preset")]
        permissive: bool,
        #[arg(long, default_value_t = false, help = "Include rejections and confidence details")]
        explain: bool,
        #[arg(long, help = "Append the analyzed item to this CSV file")]
        csv: Option<PathBuf>,
    },
    /// Check that every pattern in a config file compiles
    ValidateConfig {
        path: PathBuf,
    },
    /// Print a config preset as JSON
    DefaultConfig {
        #[arg(long, default_value_t = false)]
        permissive: bool,
    },
}

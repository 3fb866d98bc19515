//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Completion provider preset
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProviderChoice {
    /// OpenAI chat completions (gpt-3.5-turbo)
    Openai,
    /// DeepSeek chat completions (deepseek-chat)
    Deepseek,
}

impl ProviderChoice {
    pub fn as_preset(self) -> &'static str {
        match self {
            Self::Openai => "openai",
            Self::Deepseek => "deepseek",
        }
    }
}

/// CLI arguments for neetchat
#[derive(Parser, Debug)]
#[command(name = "neetchat")]
#[command(author, version, about = "NEET preparation chatbot with a locked-by-default gate")]
#[command(long_about = r#"
Neetchat answers one question at a time through an OpenAI-compatible
chat completions endpoint.

The chat starts locked. Unlock it by either:
1. Supplying an API key (--api-key, config, or environment), or
2. Verifying an email address interactively (/email, then the 4-digit code)

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./neetchat.toml     Project-level config
3. ~/.config/neetchat/config.toml   Global config

Example:
  neetchat "What is the powerhouse of the cell?"
  neetchat --provider deepseek --api-key sk-...
  neetchat -vv
"#)]
pub struct Cli {
    /// One-shot question (omit to start the interactive chat)
    pub question: Option<String>,

    /// API key for the completion endpoint
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Completion provider preset
    #[arg(short, long, value_enum, value_name = "PROVIDER")]
    pub provider: Option<ProviderChoice>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the typing indicator
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

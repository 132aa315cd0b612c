use crate::format::MemoryFormat;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pseudo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Teaching pseudocode interpreter", long_about = None)]
pub struct Args {
    /// Program to run; read from stdin when omitted
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Value handed to the next INPUT statement (repeatable)
    #[arg(short = 'i', long = "input", value_name = "VALUE")]
    pub input: Vec<String>,

    /// File with one INPUT value per line
    #[arg(long = "input-file", value_name = "PATH", conflicts_with = "input")]
    pub input_file: Option<PathBuf>,

    /// Print the final memory snapshot
    #[arg(
        long = "memory",
        value_name = "FORMAT",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "table"
    )]
    pub memory: Option<MemoryFormat>,

    /// Single-line JSON for --memory=json
    #[arg(long = "compact")]
    pub compact: bool,

    /// Print memory after every statement
    #[arg(long = "trace")]
    pub trace: bool,

    /// Print the scanned tokens and exit
    #[arg(long = "tokens", conflicts_with_all = ["ast", "check"])]
    pub tokens: bool,

    /// Print the parsed program tree and exit
    #[arg(long = "ast", conflicts_with = "check")]
    pub ast: bool,

    /// Parse only
    #[arg(long = "check")]
    pub check: bool,

    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print shell completions
    Complete {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "Invalid color choice: {}. Must be 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Args::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, &bin_name, &mut io::stdout());
}

use crate::cli::{Args, ColorChoice};
use crate::format::MemoryFormat;

/// Normalized command-line settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub color_enabled: bool,
    pub verbose: bool,
    pub trace: bool,
    pub memory: Option<MemoryFormat>,
    pub compact: bool,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let color_enabled = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => atty::is(atty::Stream::Stderr) && atty::is(atty::Stream::Stdout),
        };

        AppConfig {
            color_enabled,
            verbose: args.verbose || args.trace,
            trace: args.trace,
            memory: args.memory,
            compact: args.compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_trace_implies_verbose() {
        let args = Args::parse_from(["pseudo", "--trace", "--color", "never", "p.pseudo"]);
        let config = AppConfig::from_args(&args);
        assert!(config.trace);
        assert!(config.verbose);
        assert!(!config.color_enabled);
    }

    #[test]
    fn test_color_always() {
        let args = Args::parse_from(["pseudo", "--color", "always", "p.pseudo"]);
        assert!(AppConfig::from_args(&args).color_enabled);
    }
}

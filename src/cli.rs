use std::path::PathBuf;

use clap::Parser;

/// CPU usage key with a party parrot that dances faster under load.
///
/// Without flags, opens a terminal preview of a key grid.
#[derive(Debug, Parser)]
#[command(name = "cpu-partyparrot", version, about)]
pub struct Cli {
    /// Read settings from this rc file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append logs to this file (preview mode)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Number of keys to show at startup (overrides `initial_keys`)
    #[arg(long, value_name = "N")]
    pub keys: Option<usize>,

    /// Run without a UI, logging titles to stderr
    #[arg(long)]
    pub headless: bool,

    /// Stop after this many seconds (headless mode; 0 runs until Ctrl-C)
    #[arg(long, value_name = "SECS", default_value_t = 0)]
    pub duration_secs: u64,

    /// Write the effective settings to the rc file and exit
    #[arg(long)]
    pub write_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_headless_flags() {
        let cli = Cli::parse_from(["cpu-partyparrot", "--headless", "--keys", "2", "--duration-secs", "5"]);
        assert!(cli.headless);
        assert_eq!(cli.keys, Some(2));
        assert_eq!(cli.duration_secs, 5);
        assert!(cli.config.is_none());
    }
}

//! Command line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::constants::ENV_CONFIG_PATH;

#[derive(Debug, Parser)]
#[command(name = "inkdashd", version, about = "Dashboard aggregator and e-ink render daemon")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = ENV_CONFIG_PATH, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The subcommand to run; `run` when none was given.
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run {
            capture: None,
            output: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Refresh loop until ctrl-c
    Run {
        /// Capture PNG to re-render after every published snapshot
        #[arg(long, requires = "output", value_name = "PNG")]
        capture: Option<PathBuf>,

        /// Where the panel PNG for `--capture` is written
        #[arg(long, requires = "capture", value_name = "PNG")]
        output: Option<PathBuf>,
    },
    /// One aggregation cycle, JSON on stdout
    Snapshot,
    /// Run the image pipeline on a file
    Process { input: PathBuf, output: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsStr;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("inkdashd").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_run() {
        let cli = parse(&["--config", "a.toml"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(
            cli.command_or_default(),
            Command::Run {
                capture: None,
                output: None,
            }
        );
    }

    #[test]
    fn test_config_flag_anywhere() {
        let cli = parse(&["snapshot", "--config", "/etc/inkdash.toml"]).unwrap();
        assert_eq!(cli.command, Some(Command::Snapshot));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/inkdash.toml")));
    }

    #[test]
    fn test_config_reads_env() {
        let cmd = Cli::command();
        let config = cmd
            .get_arguments()
            .find(|arg| arg.get_id() == "config")
            .unwrap();
        assert_eq!(config.get_env(), Some(OsStr::new(ENV_CONFIG_PATH)));
    }

    #[test]
    fn test_process_paths() {
        let cli = parse(&["process", "in.png", "out.png"]).unwrap();
        assert_eq!(
            cli.command_or_default(),
            Command::Process {
                input: PathBuf::from("in.png"),
                output: PathBuf::from("out.png"),
            }
        );
    }

    #[test]
    fn test_run_with_capture() {
        let cli = parse(&["run", "--capture", "dash.png", "--output", "panel.png"]).unwrap();
        assert_eq!(
            cli.command_or_default(),
            Command::Run {
                capture: Some(PathBuf::from("dash.png")),
                output: Some(PathBuf::from("panel.png")),
            }
        );
    }

    #[test]
    fn test_usage_errors() {
        for args in [
            vec!["--config"],
            vec!["process", "in.png"],
            vec!["render"],
            vec!["--verbose"],
            vec!["run", "extra"],
            vec!["run", "--capture", "dash.png"],
            vec!["run", "--output", "panel.png"],
        ] {
            assert!(parse(&args).is_err(), "{:?} should be rejected", args);
        }
    }
}

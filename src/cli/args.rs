use clap::Parser;
use std::env;

use crate::cli::command::Command;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Register field occurrences of specimens and serve them over REST",
    long_about = "Stores a full occurrence (classification, place, observation, specimen, \
                  preparation and identification) in one SQLite transaction, either from a \
                  REST submission or from a JSON file on the command line.",
    subcommand_required = false,
    arg_required_else_help = false
)]
pub struct Cli {
    #[arg(
        long,
        default_value_t = false,
        help = "Reset all persisted state (delete the SQLite database) before starting"
    )]
    pub reset: bool,

    #[arg(
        long,
        env = "SPECIMEN_DATA_DIR",
        default_value = ".specimen/",
        value_name = "DIR",
        help = "Directory to store persistent data"
    )]
    pub data_dir: String,

    #[arg(
        long = "log-file",
        env = "SPECIMEN_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[arg(
        long = "api-listen",
        env = "SPECIMEN_API_LISTEN",
        value_name = "ADDR",
        default_value = "127.0.0.1:8080",
        help = "REST API listen address (host:port)"
    )]
    pub api_listen: std::net::SocketAddr,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    dotenvy::from_filename(&dotenv_path).ok();

    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn defaults_run_the_daemon() {
        let cli = Cli::try_parse_from(["specimen-registry"]).unwrap();
        assert!(!cli.reset);
        assert!(cli.cmd.is_none());
        assert_eq!(cli.api_listen.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn register_takes_a_payload_file() {
        let cli = Cli::try_parse_from([
            "specimen-registry",
            "--data-dir",
            "/tmp/reg",
            "register",
            "--file",
            "occurrence.json",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, "/tmp/reg");
        match cli.cmd {
            Some(Command::Register { file }) => assert_eq!(file, PathBuf::from("occurrence.json")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_requires_a_numeric_id() {
        let cli = Cli::try_parse_from(["specimen-registry", "show", "--id", "12"]).unwrap();
        assert!(matches!(cli.cmd, Some(Command::Show { id: 12 })));

        assert!(Cli::try_parse_from(["specimen-registry", "show", "--id", "twelve"]).is_err());
    }

    #[test]
    fn bad_listen_address_is_rejected() {
        assert!(Cli::try_parse_from(["specimen-registry", "--api-listen", "localhost"]).is_err());
    }
}

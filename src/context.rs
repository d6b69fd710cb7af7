use std::net::SocketAddr;
use std::path::PathBuf;

const DB_FILE_NAME: &str = "specimen.sqlite";

pub struct Context {
    pub data_dir: PathBuf,
    pub reset: bool,
    pub log_file: Option<PathBuf>,
    pub api_listen: SocketAddr,
}

impl Context {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        Self {
            data_dir: PathBuf::from(&cli.data_dir),
            reset: cli.reset,
            log_file: cli.log_file.as_ref().map(PathBuf::from),
            api_listen: cli.api_listen,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn database_lives_in_data_dir() {
        let cli = crate::cli::Cli::try_parse_from([
            "specimen-registry",
            "--data-dir",
            "/var/lib/specimen",
            "--log-file",
            "/var/log/specimen.log",
            "--reset",
        ])
        .unwrap();
        let ctx = Context::from_cli(&cli);
        assert!(ctx.reset);
        assert_eq!(ctx.db_path(), PathBuf::from("/var/lib/specimen/specimen.sqlite"));
        assert_eq!(ctx.log_file, Some(PathBuf::from("/var/log/specimen.log")));
    }
}

use clap::Subcommand;
use std::path::PathBuf;

use crate::storage::RecordId;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "Register a full occurrence from a JSON file",
        long_about = "Reads a full-occurrence submission (the same body the REST endpoint accepts) \
                      and stores all of its records in one transaction. Prints the created ids."
    )]
    Register {
        #[arg(long, value_name = "PATH", help = "Path to the JSON submission")]
        file: PathBuf,
    },
    #[command(
        about = "Print a stored occurrence with its linked records",
        long_about = "Loads an occurrence and everything linked to it and prints it as JSON."
    )]
    Show {
        #[arg(long, value_name = "ID", help = "Occurrence id")]
        id: RecordId,
    },
}

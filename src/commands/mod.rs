use std::io::Write;

use crate::cli::Command;
use crate::storage::Storage;

pub mod register;
pub mod show;

impl Command {
    pub fn run<S: Storage>(&self, storage: &S) -> anyhow::Result<()> {
        let stdout = std::io::stdout();
        self.run_to(storage, &mut stdout.lock())
    }

    pub fn run_to<S: Storage, W: Write>(&self, storage: &S, out: &mut W) -> anyhow::Result<()> {
        match self {
            Command::Register { file } => register::run(storage, file, out),
            Command::Show { id } => show::run(storage, *id, out),
        }
    }
}

use anyhow::{Context, Result};

use crate::{context, storage};

pub fn init_data_dir(ctx: &context::Context) -> Result<()> {
    std::fs::create_dir_all(&ctx.data_dir)?;
    Ok(())
}

pub fn init_storage(ctx: &context::Context) -> Result<storage::SqliteStorage> {
    let sqlite = storage::SqliteStorage::new(ctx.db_path());
    if ctx.reset {
        sqlite.reset_all().context("resetting storage")?;
    }
    sqlite.init().context("initializing storage")?;
    Ok(sqlite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn ctx_in(dir: &std::path::Path, reset: bool) -> context::Context {
        context::Context {
            data_dir: dir.join("nested/data"),
            reset,
            log_file: None,
            api_listen: "127.0.0.1:0".parse().unwrap(),
        }
    }

    #[test]
    fn init_creates_data_dir_and_database() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx_in(dir.path(), false);

        init_data_dir(&ctx).unwrap();
        let storage = init_storage(&ctx).unwrap();

        assert!(ctx.data_dir.is_dir());
        assert_eq!(PathBuf::from(&storage.path), ctx.db_path());
        assert!(ctx.db_path().exists());
    }

    #[test]
    fn reset_discards_previous_database() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx_in(dir.path(), false);
        init_data_dir(&ctx).unwrap();
        init_storage(&ctx).unwrap();
        std::fs::write(ctx.db_path(), b"not a database").unwrap();

        init_storage(&ctx_in(dir.path(), true)).unwrap();

        assert_ne!(std::fs::read(ctx.db_path()).unwrap(), b"not a database");
    }
}

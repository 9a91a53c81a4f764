use anyhow::{Context, Result as AnyhowResult};
use std::path::PathBuf;

/// Name of the per-user data directory under `$HOME`
pub const APP_DIR_NAME: &str = ".ragstore";

/// Database file name inside the data directory
pub const DB_FILE_NAME: &str = "ragstore.db";

/// Get the ragstore data directory (~/.ragstore)
pub fn get_config_dir() -> AnyhowResult<PathBuf> {
    let home_dir = dirs::home_dir().context("Could not find home directory")?;
    Ok(home_dir.join(APP_DIR_NAME))
}

/// Get the default database path in the user's home directory
pub fn get_default_db_path() -> AnyhowResult<PathBuf> {
    Ok(get_config_dir()?.join(DB_FILE_NAME))
}

use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".dojo_admin";
const HOME_ENV: &str = "DOJO_ADMIN_HOME";
const CONFIG_FILE: &str = "config.json";
const CATALOG_FILE: &str = "catalog.json";
const CLASSES_FILE: &str = "classes.json";
const MEMBERSHIPS_FILE: &str = "memberships.json";
const TRANSACTIONS_FILE: &str = "transactions.json";
const REFERENCE_FILE: &str = "reference.json";

/// Resolves every on-disk location used by the application relative to a base
/// directory (`~/.dojo_admin` unless `DOJO_ADMIN_HOME` is set).
pub struct PathResolver;

impl PathResolver {
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }

    pub fn catalog_file_in(base: &Path) -> PathBuf {
        base.join(CATALOG_FILE)
    }

    pub fn classes_file_in(base: &Path) -> PathBuf {
        base.join(CLASSES_FILE)
    }

    pub fn memberships_file_in(base: &Path) -> PathBuf {
        base.join(MEMBERSHIPS_FILE)
    }

    pub fn transactions_file_in(base: &Path) -> PathBuf {
        base.join(TRANSACTIONS_FILE)
    }

    pub fn reference_file_in(base: &Path) -> PathBuf {
        base.join(REFERENCE_FILE)
    }
}

/// Creates `path` (and parents) when missing.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Writes `data` next to `path` and renames it into place.
pub fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.tmp"),
        None => "tmp".to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

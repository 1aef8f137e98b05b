use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::ProjectDirs;

use crate::models::OsisCode;

/// Environment variable that points at the verse database.
pub const DB_ENV: &str = "KOINE_READER_DB";
/// Environment variable that overrides the interactive log file.
pub const LOG_ENV: &str = "KOINE_READER_LOG";
/// SQLite file name looked up inside the application data directory.
const DB_FILE_NAME: &str = "bible.db";
const LOG_FILE_NAME: &str = "koine-reader.log";

/// Runtime settings after merging command-line flags, environment and
/// platform defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    pub start_book: OsisCode,
    pub start_chapter: u32,
}

impl Settings {
    /// Flags win over the environment, which wins over the data directory.
    pub fn resolve(
        db_flag: Option<PathBuf>,
        log_flag: Option<PathBuf>,
        start_book: Option<OsisCode>,
        start_chapter: Option<u32>,
    ) -> Result<Self> {
        let db_path = resolve_db_path(db_flag)?;
        let log_path = match pick(log_flag, env::var_os(LOG_ENV).map(PathBuf::from)) {
            Some(path) => path,
            None => data_dir()?.join(LOG_FILE_NAME),
        };

        Ok(Self {
            db_path,
            log_path,
            start_book: start_book.unwrap_or(OsisCode::Jhn),
            start_chapter: start_chapter.unwrap_or(1).max(1),
        })
    }
}

/// Database location alone, for the print commands that never log to a file.
pub fn resolve_db_path(db_flag: Option<PathBuf>) -> Result<PathBuf> {
    match pick(db_flag, env::var_os(DB_ENV).map(PathBuf::from)) {
        Some(path) => Ok(path),
        None => Ok(data_dir()?.join(DB_FILE_NAME)),
    }
}

/// An empty value counts as unset, so `--db ""` does not hide the environment.
fn pick(flag: Option<PathBuf>, env_value: Option<PathBuf>) -> Option<PathBuf> {
    let non_empty = |path: &PathBuf| !path.as_os_str().is_empty();
    flag.filter(non_empty).or(env_value.filter(non_empty))
}

/// Resolve the per-user data directory for the reader.
fn data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "koine-reader")
        .ok_or_else(|| anyhow!("could not locate a data directory; pass --db"))?;
    Ok(dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_overrides_environment() {
        let picked = pick(
            Some(PathBuf::from("flag.db")),
            Some(PathBuf::from("env.db")),
        );
        assert_eq!(picked, Some(PathBuf::from("flag.db")));
    }

    #[test]
    fn empty_values_fall_through() {
        assert_eq!(pick(None, Some(PathBuf::new())), None);
        assert_eq!(pick(Some(PathBuf::new()), None), None);
        assert_eq!(
            pick(Some(PathBuf::new()), Some(PathBuf::from("env.db"))),
            Some(PathBuf::from("env.db"))
        );
        assert_eq!(
            pick(None, Some(PathBuf::from("env.db"))),
            Some(PathBuf::from("env.db"))
        );
    }

    #[test]
    fn explicit_paths_skip_the_data_directory() {
        let settings = Settings::resolve(
            Some(PathBuf::from("/tmp/bible.db")),
            Some(PathBuf::from("/tmp/reader.log")),
            Some(OsisCode::Mrk),
            Some(0),
        )
        .unwrap();
        assert_eq!(settings.db_path, PathBuf::from("/tmp/bible.db"));
        assert_eq!(settings.log_path, PathBuf::from("/tmp/reader.log"));
        assert_eq!(settings.start_book, OsisCode::Mrk);
        assert_eq!(settings.start_chapter, 1);
    }

    #[test]
    fn explicit_db_flag_is_used_as_is() {
        let path = resolve_db_path(Some(PathBuf::from("/tmp/other.db"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/other.db"));
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{ensure_tally_home, tally_home};

const CATEGORIES_FILE: &str = "categories.txt";
const LEDGER_FILE: &str = "ledger.csv";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub session: SessionSection,
}

/// Unset paths fall back to files inside the tally home directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathsSection {
    pub categories: Option<PathBuf>,
    pub ledger: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub clear_screen: bool,
    pub color: bool,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            clear_screen: true,
            color: true,
        }
    }
}

/// Files a command operates on, after config and flags are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPaths {
    pub categories: PathBuf,
    pub ledger: PathBuf,
}

impl Config {
    /// Defaults with every path spelled out, as written by `config init`.
    pub fn explicit_defaults(home: &Path) -> Self {
        Self {
            paths: PathsSection {
                categories: Some(home.join(CATEGORIES_FILE)),
                ledger: Some(home.join(LEDGER_FILE)),
            },
            session: SessionSection::default(),
        }
    }

    /// Command-line flags win over the config file, which wins over defaults.
    pub fn resolve_paths(
        &self,
        home: &Path,
        categories: Option<PathBuf>,
        ledger: Option<PathBuf>,
    ) -> ResolvedPaths {
        ResolvedPaths {
            categories: categories
                .or_else(|| self.paths.categories.clone())
                .unwrap_or_else(|| home.join(CATEGORIES_FILE)),
            ledger: ledger
                .or_else(|| self.paths.ledger.clone())
                .unwrap_or_else(|| home.join(LEDGER_FILE)),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(tally_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    read_config(&config_path()?)
}

pub fn read_config(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let home = ensure_tally_home()?;
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&p, &Config::explicit_defaults(&home))?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_default() {
        let dir = TempDir::new().unwrap();
        let cfg = read_config(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(cfg.session.clear_screen);
    }

    #[test]
    fn test_partial_config() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[session]\ncolor = false\n").unwrap();

        let cfg = read_config(&p).unwrap();
        assert!(!cfg.session.color);
        assert!(cfg.session.clear_screen);
        assert_eq!(cfg.paths, PathsSection::default());
    }

    #[test]
    fn test_save_and_read_back() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("config.toml");
        let cfg = Config::explicit_defaults(Path::new("/data/tally"));
        save_config(&p, &cfg).unwrap();
        assert_eq!(read_config(&p).unwrap(), cfg);
    }

    #[test]
    fn test_resolve_paths_precedence() {
        let home = Path::new("/home/me/.tally");
        let mut cfg = Config::default();

        let r = cfg.resolve_paths(home, None, None);
        assert_eq!(r.categories, home.join("categories.txt"));
        assert_eq!(r.ledger, home.join("ledger.csv"));

        cfg.paths.ledger = Some(PathBuf::from("/srv/ledger.csv"));
        let r = cfg.resolve_paths(home, None, None);
        assert_eq!(r.ledger, PathBuf::from("/srv/ledger.csv"));

        let r = cfg.resolve_paths(home, Some("cats.txt".into()), Some("l.csv".into()));
        assert_eq!(r.categories, PathBuf::from("cats.txt"));
        assert_eq!(r.ledger, PathBuf::from("l.csv"));
    }

    #[test]
    fn test_bad_toml_names_file() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[session\n").unwrap();
        let err = read_config(&p).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }
}

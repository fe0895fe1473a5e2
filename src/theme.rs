//! Dark/light theme flag
//!
//! One process-wide flag. It is initialised from the stored preference, or
//! from the terminal's background when nothing is stored, and persisted
//! every time it changes.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::Config;

static DARK: AtomicBool = AtomicBool::new(false);

const THEME_FILE: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// Where the theme preference is stored
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(THEME_FILE),
        }
    }

    /// Store next to the config file
    pub fn default_location() -> Result<Self> {
        Ok(Self::in_dir(&Config::config_dir()?))
    }

    /// Stored preference; unreadable or unknown values count as unset
    pub fn load(&self) -> Option<ThemeMode> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|s| ThemeMode::parse(&s))
    }

    pub fn save(&self, mode: ThemeMode) -> Result<()> {
        std::fs::write(&self.path, mode.as_str())
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

/// Terminal preference from `COLORFGBG` ("fg;bg")
///
/// Background colors 0-6 and 8 are dark; anything else, or no hint, is light.
pub fn preference_from_colorfgbg(value: Option<&str>) -> ThemeMode {
    let background = value
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());
    match background {
        Some(0..=6) | Some(8) => ThemeMode::Dark,
        _ => ThemeMode::Light,
    }
}

pub fn system_preference() -> ThemeMode {
    preference_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

/// Initialise the flag from the store, falling back to the system preference
pub fn init(store: &ThemeStore) -> ThemeMode {
    let mode = store.load().unwrap_or_else(system_preference);
    set_current(mode);
    tracing::debug!("Theme initialised: {}", mode.as_str());
    mode
}

pub fn current() -> ThemeMode {
    if DARK.load(Ordering::Relaxed) {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}

fn set_current(mode: ThemeMode) {
    DARK.store(mode == ThemeMode::Dark, Ordering::Relaxed);
}

/// Set the flag and persist it
pub fn set(store: &ThemeStore, mode: ThemeMode) -> Result<ThemeMode> {
    set_current(mode);
    store.save(mode)?;
    Ok(mode)
}

/// Flip the flag and persist the new value
pub fn toggle(store: &ThemeStore) -> Result<ThemeMode> {
    set(store, current().toggled())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_and_display() {
        assert_eq!(ThemeMode::parse("dark\n"), Some(ThemeMode::Dark));
        assert_eq!(ThemeMode::parse("light"), Some(ThemeMode::Light));
        assert_eq!(ThemeMode::parse("solarized"), None);
        assert_eq!(ThemeMode::Dark.as_str(), "dark");
    }

    #[test]
    fn test_colorfgbg_preference() {
        assert_eq!(preference_from_colorfgbg(Some("15;0")), ThemeMode::Dark);
        assert_eq!(preference_from_colorfgbg(Some("15;default;8")), ThemeMode::Dark);
        assert_eq!(preference_from_colorfgbg(Some("0;15")), ThemeMode::Light);
        assert_eq!(preference_from_colorfgbg(Some("garbage")), ThemeMode::Light);
        assert_eq!(preference_from_colorfgbg(None), ThemeMode::Light);
    }

    #[test]
    fn test_store_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = ThemeStore::in_dir(tmp.path());
        assert_eq!(store.load(), None);

        store.save(ThemeMode::Dark).unwrap();
        assert_eq!(store.load(), Some(ThemeMode::Dark));
    }

    #[test]
    fn test_init_and_toggle_persist() {
        let tmp = TempDir::new().unwrap();
        let store = ThemeStore::in_dir(tmp.path());
        store.save(ThemeMode::Light).unwrap();

        assert_eq!(init(&store), ThemeMode::Light);
        assert_eq!(current(), ThemeMode::Light);

        assert_eq!(toggle(&store).unwrap(), ThemeMode::Dark);
        assert_eq!(current(), ThemeMode::Dark);
        assert_eq!(store.load(), Some(ThemeMode::Dark));

        assert_eq!(toggle(&store).unwrap(), ThemeMode::Light);
        assert_eq!(store.load(), Some(ThemeMode::Light));
    }
}

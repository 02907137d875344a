use std::fs;
use std::path::PathBuf;

use log::debug;

use crate::model::Theme;

const THEME_FILE: &str = "theme.txt";

/// Persists the theme preference across sessions.
///
/// One key-value pair under the user config directory. Persistence failures
/// are silently ignored; the in-memory value stays authoritative for the
/// current session.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    dir: Option<PathBuf>,
}

impl ThemeStore {
    /// Store rooted at the user config directory (`<config>/termscan`)
    pub fn new() -> Self {
        Self {
            dir: dirs::config_dir().map(|dir| dir.join("termscan")),
        }
    }

    /// Store rooted at an explicit directory, or nowhere when `None`
    pub fn at(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Initial theme: persisted value if present, else the system
    /// dark-mode preference, defaulting to light.
    pub fn initial(&self, system_dark: bool) -> Theme {
        if let Some(saved) = self.load() {
            return saved;
        }
        if system_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Persist the theme. Write errors are swallowed.
    pub fn set(&self, theme: Theme) {
        let Some(dir) = &self.dir else {
            return;
        };

        if !dir.exists() && fs::create_dir_all(dir).is_err() {
            return;
        }

        fs::write(dir.join(THEME_FILE), theme.as_str()).ok();
        debug!("Saved theme preference: {}", theme);
    }

    fn load(&self) -> Option<Theme> {
        let dir = self.dir.as_ref()?;
        let content = fs::read_to_string(dir.join(THEME_FILE)).ok()?;
        content.parse().ok()
    }
}

impl Default for ThemeStore {
    fn default() -> Self {
        Self::new()
    }
}

//! Light/dark theme preference, persisted across sessions.
//!
//! The persisted preference always wins. Without one, the OS color scheme is
//! followed, including later changes to it, until the user toggles.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Storage key holding `"light"` or `"dark"`.
pub const THEME_KEY: &str = "cropcare-theme";

#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid preferences file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to write preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no config directory available")]
    NoConfigDir,
}

/// Key/value persistence for small UI preferences.
pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Non-persistent store, used when no config directory exists.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// TOML-backed store, one flat table of strings.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/cropcare/preferences.toml`.
    pub fn default_location() -> Result<Self, PreferenceError> {
        let dir = dirs::config_dir().ok_or(PreferenceError::NoConfigDir)?;
        Ok(Self::new(dir.join("cropcare").join("preferences.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = std::fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&text)?)
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string(&values)?)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }
}

/// Current theme plus the store it is persisted to.
pub struct ThemeService {
    mode: ThemeMode,
    store: Box<dyn PreferenceStore>,
}

impl ThemeService {
    /// Resolve the startup theme. Nothing is written here.
    pub fn load(store: Box<dyn PreferenceStore>, system_prefers_dark: bool) -> Self {
        let stored = stored_mode(store.as_ref());
        let mode = stored.unwrap_or(ThemeMode::from_system(system_prefers_dark));
        log::debug!(
            "theme {} ({})",
            mode.as_str(),
            if stored.is_some() { "saved" } else { "system" }
        );
        Self { mode, store }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn is_dark(&self) -> bool {
        self.mode == ThemeMode::Dark
    }

    /// Flip the theme and persist the choice.
    ///
    /// The in-memory mode flips even if persisting fails; the error is
    /// returned so the caller can tell the user.
    pub fn toggle(&mut self) -> Result<ThemeMode, PreferenceError> {
        self.mode = self.mode.flipped();
        self.store.set(THEME_KEY, self.mode.as_str())?;
        Ok(self.mode)
    }

    /// Follow an OS color-scheme change unless the user picked a theme.
    /// Returns whether the mode changed.
    pub fn on_system_change(&mut self, prefers_dark: bool) -> bool {
        if self.has_explicit_preference() {
            return false;
        }
        let next = ThemeMode::from_system(prefers_dark);
        let changed = next != self.mode;
        self.mode = next;
        changed
    }

    pub fn has_explicit_preference(&self) -> bool {
        stored_mode(self.store.as_ref()).is_some()
    }

    /// Label of the toggle control: names the mode it switches to.
    pub fn toggle_label(&self) -> &'static str {
        match self.mode {
            ThemeMode::Dark => "Light Mode",
            ThemeMode::Light => "Dark Mode",
        }
    }

    pub fn toggle_icon(&self) -> &'static str {
        match self.mode {
            ThemeMode::Dark => "sun",
            ThemeMode::Light => "moon",
        }
    }

    pub fn toggle_title(&self) -> &'static str {
        match self.mode {
            ThemeMode::Dark => "Switch to Light Mode",
            ThemeMode::Light => "Switch to Dark Mode",
        }
    }
}

impl std::fmt::Debug for ThemeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeService")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

fn stored_mode(store: &dyn PreferenceStore) -> Option<ThemeMode> {
    match store.get(THEME_KEY) {
        Ok(value) => value.as_deref().and_then(ThemeMode::parse),
        Err(e) => {
            log::warn!("could not read theme preference: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(value: Option<&str>) -> Box<dyn PreferenceStore> {
        let mut store = MemoryStore::default();
        if let Some(v) = value {
            store.set(THEME_KEY, v).unwrap();
        }
        Box::new(store)
    }

    #[test]
    fn persisted_preference_wins_over_system() {
        let theme = ThemeService::load(store_with(Some("light")), true);
        assert_eq!(theme.mode(), ThemeMode::Light);
    }

    #[test]
    fn falls_back_to_system_preference() {
        assert_eq!(ThemeService::load(store_with(None), true).mode(), ThemeMode::Dark);
        assert_eq!(ThemeService::load(store_with(None), false).mode(), ThemeMode::Light);
    }

    #[test]
    fn garbage_preference_is_ignored() {
        let theme = ThemeService::load(store_with(Some("purple")), true);
        assert_eq!(theme.mode(), ThemeMode::Dark);
        assert!(!theme.has_explicit_preference());
    }

    #[test]
    fn toggle_twice_restores_original() {
        let mut theme = ThemeService::load(store_with(Some("dark")), false);
        assert_eq!(theme.toggle().unwrap(), ThemeMode::Light);
        assert_eq!(theme.toggle().unwrap(), ThemeMode::Dark);
        assert_eq!(theme.store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn system_changes_followed_until_toggled() {
        let mut theme = ThemeService::load(store_with(None), false);
        assert!(theme.on_system_change(true));
        assert!(theme.is_dark());

        theme.toggle().unwrap();
        assert_eq!(theme.mode(), ThemeMode::Light);
        assert!(!theme.on_system_change(true));
        assert_eq!(theme.mode(), ThemeMode::Light);
    }

    #[test]
    fn toggle_labels_name_the_other_mode() {
        let mut theme = ThemeService::load(store_with(Some("light")), false);
        assert_eq!(theme.toggle_label(), "Dark Mode");
        assert_eq!(theme.toggle_icon(), "moon");
        theme.toggle().unwrap();
        assert_eq!(theme.toggle_label(), "Light Mode");
        assert_eq!(theme.toggle_title(), "Switch to Light Mode");
    }

    #[test]
    fn file_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.toml");
        let mut store = FileStore::new(&path);
        assert_eq!(store.get(THEME_KEY).unwrap(), None);

        store.set(THEME_KEY, "dark").unwrap();
        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        let theme = ThemeService::load(Box::new(reopened), false);
        assert!(theme.is_dark());
    }
}

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::theme::{ThemeMode, ThemeStore};

const DEFAULT_THEME: &str = "light";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            backend_url: None,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("ai-assistant");
        path.push("settings.toml");
        Some(path)
    }

    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Self {
        match Self::read_from_path(path) {
            Ok(settings) => settings.unwrap_or_default(),
            Err(error) => {
                warn!("{error:#}");
                Self::default()
            }
        }
    }

    /// Like [`Settings::load_from_path`], but tells a missing file (`Ok(None)`)
    /// apart from one that cannot be read or parsed.
    fn read_from_path(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings config '{}'", path.display()))?;
        let mut settings = toml::from_str::<Self>(&contents)
            .with_context(|| format!("failed to parse settings config '{}'", path.display()))?;
        settings.validate();
        Ok(Some(settings))
    }

    pub fn save_to_path(&self, path: &Path) -> anyhow::Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow!("invalid settings config path"))?;
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory '{}'", parent.display()))?;

        let mut validated = self.clone();
        validated.validate();
        let contents =
            toml::to_string_pretty(&validated).context("failed to serialize settings to TOML")?;

        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow!("invalid settings config file name"))?
            .to_string_lossy()
            .to_string();
        let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

        fs::write(&tmp_path, contents).with_context(|| {
            format!(
                "failed to write temporary settings file '{}'",
                tmp_path.display()
            )
        })?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "failed to atomically rename settings file '{}' to '{}'",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }

    pub fn theme_mode(&self) -> ThemeMode {
        ThemeMode::from_str(&self.theme).unwrap_or_default()
    }

    fn validate(&mut self) {
        self.theme = match ThemeMode::from_str(&self.theme) {
            Ok(mode) => mode.as_str().to_string(),
            Err(()) => {
                warn!(
                    "invalid theme '{}' in settings config; falling back to {}",
                    self.theme, DEFAULT_THEME
                );
                DEFAULT_THEME.to_string()
            }
        };

        self.backend_url = self
            .backend_url
            .take()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
    }
}

/// [`ThemeStore`] backed by the `theme` key of a settings file.
///
/// Saving rewrites the whole file so other keys such as `backend_url` survive.
#[derive(Debug, Clone)]
pub struct SettingsThemeStore {
    path: PathBuf,
}

impl SettingsThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Option<Self> {
        Settings::config_path().map(Self::new)
    }
}

impl ThemeStore for SettingsThemeStore {
    fn load(&self) -> Option<ThemeMode> {
        match Settings::read_from_path(&self.path) {
            Ok(settings) => settings.map(|settings| settings.theme_mode()),
            Err(error) => {
                warn!("{error:#}");
                None
            }
        }
    }

    /// Leaves a file it cannot parse untouched rather than replacing it with
    /// defaults.
    fn save(&self, mode: ThemeMode) -> anyhow::Result<()> {
        let mut settings = Settings::read_from_path(&self.path)?.unwrap_or_default();
        settings.theme = mode.as_str().to_string();
        settings.save_to_path(&self.path)
    }
}

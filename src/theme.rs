use std::str::FromStr;
use std::sync::{Arc, Mutex};

use tracing::warn;
use tuirealm::ratatui::style::Color;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Label of the header button, which names the state a toggle leads to.
    pub const fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "Switch to Dark Mode",
            Self::Dark => "Switch to Light Mode",
        }
    }
}

impl FromStr for ThemeMode {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub primary: Color,
    pub secondary: Color,
    pub button_background: Color,
    pub button_text: Color,
}

const LIGHT_PALETTE: Palette = Palette {
    background: Color::Rgb(0xff, 0xff, 0xff),
    text: Color::Rgb(0x00, 0x00, 0x00),
    primary: Color::Rgb(0x00, 0x7b, 0xff),
    secondary: Color::Rgb(0x6c, 0x75, 0x7d),
    button_background: Color::Rgb(0x00, 0x7b, 0xff),
    button_text: Color::Rgb(0xff, 0xff, 0xff),
};

const DARK_PALETTE: Palette = Palette {
    background: Color::Rgb(0x12, 0x12, 0x12),
    text: Color::Rgb(0xff, 0xff, 0xff),
    primary: Color::Rgb(0x1e, 0x90, 0xff),
    secondary: Color::Rgb(0x88, 0x88, 0x88),
    button_background: Color::Rgb(0x1e, 0x90, 0xff),
    button_text: Color::Rgb(0xff, 0xff, 0xff),
};

impl Palette {
    pub const fn for_mode(mode: ThemeMode) -> &'static Palette {
        match mode {
            ThemeMode::Light => &LIGHT_PALETTE,
            ThemeMode::Dark => &DARK_PALETTE,
        }
    }
}

/// Durable home of the theme preference.
pub trait ThemeStore: Send {
    /// Returns the persisted mode, or `None` when nothing usable is stored.
    fn load(&self) -> Option<ThemeMode>;

    fn save(&self, mode: ThemeMode) -> anyhow::Result<()>;
}

/// Store that keeps the preference in memory only.
///
/// Clones share the same slot, which lets a test observe what a context wrote.
#[derive(Debug, Clone, Default)]
pub struct EphemeralThemeStore {
    slot: Arc<Mutex<Option<ThemeMode>>>,
}

impl EphemeralThemeStore {
    pub fn with_mode(mode: ThemeMode) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(mode))),
        }
    }
}

impl ThemeStore for EphemeralThemeStore {
    fn load(&self) -> Option<ThemeMode> {
        match self.slot.lock() {
            Ok(slot) => *slot,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn save(&self, mode: ThemeMode) -> anyhow::Result<()> {
        match self.slot.lock() {
            Ok(mut slot) => *slot = Some(mode),
            Err(poisoned) => *poisoned.into_inner() = Some(mode),
        }
        Ok(())
    }
}

/// The one owner of the light/dark flag.
///
/// Everything that draws receives the palette from here. `toggle` is the only
/// mutator and persists before returning.
pub struct ThemeContext {
    mode: ThemeMode,
    store: Box<dyn ThemeStore>,
}

impl ThemeContext {
    pub fn load(store: Box<dyn ThemeStore>) -> Self {
        let mode = store.load().unwrap_or_default();
        Self { mode, store }
    }

    /// Starts in `mode` regardless of what the store holds. Nothing is written
    /// until the first toggle.
    pub fn with_override(store: Box<dyn ThemeStore>, mode: ThemeMode) -> Self {
        Self { mode, store }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn is_dark(&self) -> bool {
        self.mode.is_dark()
    }

    pub fn palette(&self) -> &'static Palette {
        Palette::for_mode(self.mode)
    }

    pub fn toggle(&mut self) -> ThemeMode {
        self.mode = self.mode.toggled();
        if let Err(err) = self.store.save(self.mode) {
            warn!(error = %err, mode = self.mode.as_str(), "failed to persist theme preference");
        }
        self.mode
    }
}

impl std::fmt::Debug for ThemeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeContext")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::infrastructure::error::AppError;

pub const MIN_OPACITY: u8 = 30;
pub const MAX_OPACITY: u8 = 100;

pub const FONT_SIZES: [u32; 16] = [8, 10, 11, 12, 14, 16, 18, 20, 22, 24, 26, 32, 48, 64, 72, 96];
pub const TAB_SIZES: [u32; 7] = [4, 6, 8, 10, 12, 14, 16];

/// Editor colour palette, in the order shown by the settings dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EditorColor {
    Bisque,
    #[default]
    Black,
    Blue,
    Coral,
    Gray,
    Green,
    Lime,
    Pink,
    Purple,
    Red,
    Silver,
    SkyBlue,
    White,
    Yellow,
}

impl EditorColor {
    pub const ALL: [EditorColor; 14] = [
        EditorColor::Bisque,
        EditorColor::Black,
        EditorColor::Blue,
        EditorColor::Coral,
        EditorColor::Gray,
        EditorColor::Green,
        EditorColor::Lime,
        EditorColor::Pink,
        EditorColor::Purple,
        EditorColor::Red,
        EditorColor::Silver,
        EditorColor::SkyBlue,
        EditorColor::White,
        EditorColor::Yellow,
    ];

    pub fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            EditorColor::Bisque => (255, 228, 196),
            EditorColor::Black => (0, 0, 0),
            EditorColor::Blue => (0, 0, 255),
            EditorColor::Coral => (255, 127, 80),
            EditorColor::Gray => (128, 128, 128),
            EditorColor::Green => (0, 128, 0),
            EditorColor::Lime => (0, 255, 0),
            EditorColor::Pink => (255, 192, 203),
            EditorColor::Purple => (128, 0, 128),
            EditorColor::Red => (255, 0, 0),
            EditorColor::Silver => (192, 192, 192),
            EditorColor::SkyBlue => (135, 206, 235),
            EditorColor::White => (255, 255, 255),
            EditorColor::Yellow => (255, 255, 0),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            EditorColor::Bisque => "bisque",
            EditorColor::Black => "black",
            EditorColor::Blue => "blue",
            EditorColor::Coral => "coral",
            EditorColor::Gray => "gray",
            EditorColor::Green => "green",
            EditorColor::Lime => "lime",
            EditorColor::Pink => "pink",
            EditorColor::Purple => "purple",
            EditorColor::Red => "red",
            EditorColor::Silver => "silver",
            EditorColor::SkyBlue => "sky blue",
            EditorColor::White => "white",
            EditorColor::Yellow => "yellow",
        }
    }

    /// Perceived brightness below the midpoint (used for the title bar theme).
    pub fn is_dark(self) -> bool {
        let (r, g, b) = self.to_rgb();
        let luma = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
        luma < 128_000
    }
}

/// Monospace families offered by the editor. Missing fonts fall back to Courier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EditorFont {
    CascadiaMono,
    #[default]
    Consolas,
    CourierNew,
    LucidaConsole,
    MsGothic,
    NSimSun,
}

impl EditorFont {
    pub const ALL: [EditorFont; 6] = [
        EditorFont::CascadiaMono,
        EditorFont::Consolas,
        EditorFont::CourierNew,
        EditorFont::LucidaConsole,
        EditorFont::MsGothic,
        EditorFont::NSimSun,
    ];

    /// The family name as the OS font list reports it
    pub fn family_name(self) -> &'static str {
        match self {
            EditorFont::CascadiaMono => "Cascadia Mono",
            EditorFont::Consolas => "Consolas",
            EditorFont::CourierNew => "Courier New",
            EditorFont::LucidaConsole => "Lucida Console",
            EditorFont::MsGothic => "MS Gothic",
            EditorFont::NSimSun => "NSimSun",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default, deserialize_with = "lenient")]
    pub background: EditorColor,

    #[serde(default = "default_foreground", deserialize_with = "lenient_foreground")]
    pub foreground: EditorColor,

    #[serde(default, deserialize_with = "lenient")]
    pub font: EditorFont,

    #[serde(default, deserialize_with = "lenient")]
    pub bold: bool,

    #[serde(default = "default_font_size", deserialize_with = "lenient_font_size")]
    pub font_size: u32,

    #[serde(default = "default_tab_size", deserialize_with = "lenient_tab_size")]
    pub tab_size: u32,

    /// Window opacity in percent
    #[serde(default = "default_opacity", deserialize_with = "lenient_opacity")]
    pub opacity: u8,

    #[serde(default = "default_word_wrap", deserialize_with = "lenient_word_wrap")]
    pub word_wrap: bool,

    #[serde(default, deserialize_with = "lenient")]
    pub maximized: bool,

    /// Pin state given to newly opened windows
    #[serde(default, deserialize_with = "lenient")]
    pub always_on_top: bool,

    #[serde(default, deserialize_with = "lenient")]
    pub last_save_directory: Option<PathBuf>,
}

fn default_foreground() -> EditorColor {
    EditorColor::White
}

fn default_font_size() -> u32 {
    20
}

fn default_tab_size() -> u32 {
    4
}

fn default_opacity() -> u8 {
    MAX_OPACITY
}

fn default_word_wrap() -> bool {
    true
}

/// Deserialize a field, falling back to `fallback` instead of failing the
/// whole file when the stored value is unknown or of the wrong type (e.g. a
/// renamed colour).
fn lenient_or<'de, D, T>(deserializer: D, fallback: fn() -> T) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: for<'a> Deserialize<'a>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_else(|_| fallback()))
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: for<'a> Deserialize<'a> + Default,
{
    lenient_or(deserializer, T::default)
}

fn lenient_foreground<'de, D: Deserializer<'de>>(deserializer: D) -> Result<EditorColor, D::Error> {
    lenient_or(deserializer, default_foreground)
}

fn lenient_font_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_or(deserializer, default_font_size)
}

fn lenient_tab_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_or(deserializer, default_tab_size)
}

fn lenient_word_wrap<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    lenient_or(deserializer, default_word_wrap)
}

/// Out-of-range numbers are clamped rather than dropped.
fn lenient_opacity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let percent = value
        .as_f64()
        .map(|p| p.round().clamp(MIN_OPACITY as f64, MAX_OPACITY as f64) as u8)
        .unwrap_or_else(default_opacity);
    Ok(percent)
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            background: EditorColor::default(),
            foreground: default_foreground(),
            font: EditorFont::default(),
            bold: false,
            font_size: default_font_size(),
            tab_size: default_tab_size(),
            opacity: default_opacity(),
            word_wrap: default_word_wrap(),
            maximized: false,
            always_on_top: false,
            last_save_directory: None,
        }
    }
}

impl EditorSettings {
    /// Bring every numeric field back into its allowed set.
    pub fn sanitize(&mut self) {
        self.opacity = self.opacity.clamp(MIN_OPACITY, MAX_OPACITY);
        if !FONT_SIZES.contains(&self.font_size) {
            self.font_size = default_font_size();
        }
        if !TAB_SIZES.contains(&self.tab_size) {
            self.tab_size = default_tab_size();
        }
    }

    /// The remembered Save As directory, if it still exists.
    pub fn save_directory(&self) -> Option<&Path> {
        self.last_save_directory
            .as_deref()
            .filter(|dir| dir.is_dir())
    }

    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(mut settings) => {
                    settings.sanitize();
                    settings
                }
                Err(e) => {
                    tracing::warn!("Failed to parse settings: {}. Using defaults.", e);
                    let default = Self::default();
                    if let Err(e) = default.save_to(path) {
                        tracing::debug!("Could not write default settings: {}", e);
                    }
                    default
                }
            },
            Err(_) => {
                // File doesn't exist, use defaults and write them for next time
                let default = Self::default();
                if let Err(e) = default.save_to(path) {
                    tracing::debug!("Could not write default settings: {}", e);
                }
                default
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("shard");
        path.push("settings.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = EditorSettings::default();
        assert_eq!(settings.background, EditorColor::Black);
        assert_eq!(settings.foreground, EditorColor::White);
        assert_eq!(settings.font, EditorFont::Consolas);
        assert_eq!(settings.font_size, 20);
        assert_eq!(settings.tab_size, 4);
        assert_eq!(settings.opacity, 100);
        assert!(settings.word_wrap);
        assert!(!settings.bold);
        assert!(!settings.always_on_top);
        assert!(settings.last_save_directory.is_none());
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{"opacity": 60}"#;
        let settings: EditorSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.opacity, 60);
        assert_eq!(settings.font_size, 20);
        assert_eq!(settings.foreground, EditorColor::White);
    }

    #[test]
    fn test_unknown_color_falls_back_per_field() {
        let json = r#"{"background": "Mauve", "foreground": "Teal", "font": "Comic", "font_size": 14}"#;
        let settings: EditorSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.background, EditorColor::Black);
        assert_eq!(settings.foreground, EditorColor::White);
        assert_eq!(settings.font, EditorFont::Consolas);
        assert_eq!(settings.font_size, 14);
    }

    #[test]
    fn test_sanitize_clamps_opacity() {
        let mut settings = EditorSettings {
            opacity: 5,
            ..Default::default()
        };
        settings.sanitize();
        assert_eq!(settings.opacity, MIN_OPACITY);

        settings.opacity = 250;
        settings.sanitize();
        assert_eq!(settings.opacity, MAX_OPACITY);
    }

    #[test]
    fn test_sanitize_resets_unlisted_sizes() {
        let mut settings = EditorSettings {
            font_size: 13,
            tab_size: 5,
            ..Default::default()
        };
        settings.sanitize();
        assert_eq!(settings.font_size, 20);
        assert_eq!(settings.tab_size, 4);

        let mut settings = EditorSettings {
            font_size: 72,
            tab_size: 8,
            ..Default::default()
        };
        settings.sanitize();
        assert_eq!(settings.font_size, 72);
        assert_eq!(settings.tab_size, 8);
    }

    #[test]
    fn test_opacity_persists_across_restart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shard").join("settings.json");

        let mut settings = EditorSettings::default();
        settings.opacity = MIN_OPACITY;
        settings.always_on_top = true;
        settings.save_to(&path).unwrap();

        let loaded = EditorSettings::load_from(&path);
        assert_eq!(loaded.opacity, MIN_OPACITY);
        assert!(loaded.always_on_top);
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let loaded = EditorSettings::load_from(&path);
        assert_eq!(loaded, EditorSettings::default());
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "black\twhite\tConsolas").unwrap();

        assert_eq!(EditorSettings::load_from(&path), EditorSettings::default());

        let rewritten: EditorSettings = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(rewritten, EditorSettings::default());
    }

    #[test]
    fn test_out_of_range_values_keep_the_rest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"background":"Blue","font_size":48,"opacity":300,"tab_size":-2,"word_wrap":"yes","bold":true}"#,
        )
        .unwrap();

        let loaded = EditorSettings::load_from(&path);
        assert_eq!(loaded.background, EditorColor::Blue);
        assert_eq!(loaded.font_size, 48);
        assert_eq!(loaded.opacity, MAX_OPACITY);
        assert_eq!(loaded.tab_size, 4);
        assert!(loaded.word_wrap);
        assert!(loaded.bold);
    }

    #[test]
    fn test_low_opacity_is_clamped() {
        let settings: EditorSettings = serde_json::from_str(r#"{"opacity": 0}"#).unwrap();
        assert_eq!(settings.opacity, MIN_OPACITY);
    }

    #[test]
    fn test_save_directory_must_exist() {
        let dir = TempDir::new().unwrap();
        let mut settings = EditorSettings {
            last_save_directory: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(settings.save_directory(), Some(dir.path()));

        settings.last_save_directory = Some(dir.path().join("removed"));
        assert!(settings.save_directory().is_none());
    }

    #[test]
    fn test_color_darkness() {
        assert!(EditorColor::Black.is_dark());
        assert!(EditorColor::Purple.is_dark());
        assert!(!EditorColor::White.is_dark());
        assert!(!EditorColor::Yellow.is_dark());
    }

    #[test]
    fn test_palettes_are_sorted_for_display() {
        let names: Vec<&str> = EditorColor::ALL.iter().map(|c| c.display_name()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        let fonts: Vec<&str> = EditorFont::ALL.iter().map(|f| f.family_name()).collect();
        let mut sorted = fonts.clone();
        sorted.sort();
        assert_eq!(fonts, sorted);
    }
}

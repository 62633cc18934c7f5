use serde::{Deserialize, Serialize};

/// Essential studio settings. `Default` is the factory state that
/// "restore defaults" goes back to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudioSettings {
    pub backup_frequency_days: u32,
    pub face_id_enabled: bool,
    pub double_confirm_enabled: bool,
    pub critical_alerts_enabled: bool,
    pub sound_alerts_enabled: bool,
    pub dark_mode: bool,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            backup_frequency_days: 1,
            face_id_enabled: true,
            double_confirm_enabled: true,
            critical_alerts_enabled: true,
            sound_alerts_enabled: false,
            dark_mode: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

/// Branding controls; every change triggers an autosave.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppearanceSettings {
    pub mode: ThemeMode,
    pub primary_color: String,
    pub font: String,
    pub border_radius: u32,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            mode: ThemeMode::Dark,
            primary_color: "#9b87f5".to_string(),
            font: "SF Pro Display".to_string(),
            border_radius: 12,
        }
    }
}

/// A change to the appearance controls.
#[derive(Debug, Clone, PartialEq)]
pub enum AppearanceChange {
    ToggleMode,
    PrimaryColor(String),
    Font(String),
    BorderRadius(u32),
}

impl AppearanceSettings {
    pub fn apply(&mut self, change: AppearanceChange) {
        match change {
            AppearanceChange::ToggleMode => {
                self.mode = match self.mode {
                    ThemeMode::Dark => ThemeMode::Light,
                    ThemeMode::Light => ThemeMode::Dark,
                }
            }
            AppearanceChange::PrimaryColor(color) => self.primary_color = color,
            AppearanceChange::Font(font) => self.font = font,
            AppearanceChange::BorderRadius(radius) => self.border_radius = radius,
        }
    }
}

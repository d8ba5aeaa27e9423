//! Player settings and preferences
//!
//! Process-wide and kept across runs. The result screen silences feedback
//! while it is shown through [`Settings::suppress`].

use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Play sound effects
    pub enable_sfx: bool,
    /// Trigger haptic feedback
    pub enable_haptics: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_sfx: true,
            enable_haptics: true,
        }
    }
}

impl Settings {
    pub fn set_enable_sfx(&mut self, enabled: bool) {
        self.enable_sfx = enabled;
    }

    pub fn set_enable_haptics(&mut self, enabled: bool) {
        self.enable_haptics = enabled;
    }

    pub fn toggle_sfx(&mut self) {
        self.enable_sfx = !self.enable_sfx;
    }

    pub fn toggle_haptics(&mut self) {
        self.enable_haptics = !self.enable_haptics;
    }

    /// Force both toggles off until the returned guard is dropped.
    ///
    /// The previous values come back on drop, including during unwinding.
    pub fn suppress(&mut self) -> SuppressedSettings<'_> {
        let saved = *self;
        self.enable_sfx = false;
        self.enable_haptics = false;
        log::debug!("Settings suppressed (saved {saved:?})");
        SuppressedSettings {
            settings: self,
            saved,
        }
    }
}

/// Scoped override returned by [`Settings::suppress`]
#[derive(Debug)]
pub struct SuppressedSettings<'a> {
    settings: &'a mut Settings,
    saved: Settings,
}

impl Deref for SuppressedSettings<'_> {
    type Target = Settings;

    fn deref(&self) -> &Settings {
        self.settings
    }
}

impl Drop for SuppressedSettings<'_> {
    fn drop(&mut self) {
        *self.settings = self.saved;
        log::debug!("Settings restored to {:?}", self.saved);
    }
}

//! # ratechat-settings
//!
//! Configuration for the ratechat relay, loaded from three layers (in
//! priority order):
//! 1. **Compiled defaults**: [`RelaySettings::default()`]
//! 2. **Settings file**: `~/.ratechat/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `RATECHAT_*` overrides (highest priority)
//!
//! The binary applies CLI flags on top of the loaded value. There is no
//! process-global settings instance: the loaded [`RelaySettings`] is passed
//! explicitly to whatever needs it.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

//! Configuration handling for the TUI

use crate::state::{FormViewOptions, ValidationErrorVisibility, Visibility};
use anyhow::Result;
use chrono::Locale;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// Dataset to open when none is given on the command line
    pub dataset_path: Option<PathBuf>,
    /// Locale for date formatting, e.g. `de_DE`
    pub locale: Option<String>,
    /// Write logs here instead of stderr
    pub log_file: Option<PathBuf>,
    pub close_button: Option<Visibility>,
    pub editing_buttons: Option<Visibility>,
    pub navigation_disabled: Option<bool>,
    pub validation_errors: Option<ValidationErrorVisibility>,
}

impl TuiConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "featureform", "featureform-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: TuiConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Configured locale, falling back to `en_US` when unset or unknown
    pub fn locale(&self) -> Locale {
        let Some(name) = self.locale.as_deref() else {
            return Locale::en_US;
        };
        Locale::try_from(name).unwrap_or_else(|_| {
            warn!("Unknown locale {name:?}, using en_US");
            Locale::en_US
        })
    }

    /// Container options with every configured value applied
    pub fn to_options(&self) -> FormViewOptions {
        let defaults = FormViewOptions::default();
        defaults
            .with_close_button(self.close_button.unwrap_or(defaults.close_button))
            .with_editing_buttons(self.editing_buttons.unwrap_or(defaults.editing_buttons))
            .with_navigation_disabled(self.navigation_disabled.unwrap_or(false))
            .with_validation_errors(self.validation_errors.unwrap_or_default())
            .with_locale(self.locale())
    }
}

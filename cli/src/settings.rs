use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chordsweep_core::{GameParams, PresetName};
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Settings read from the optional TOML file, overridden by command line flags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub api_url: String,
    pub preset: PresetName,
    /// Used when `preset` is `custom`.
    pub custom: Option<GameParams>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            preset: PresetName::default(),
            custom: None,
        }
    }
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings = Self::from_toml(&text)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        log::debug!("loaded settings: {:?}", settings);
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        if let Some(custom) = settings.custom {
            custom.validate().context("invalid custom game parameters")?;
        }
        Ok(settings)
    }

    pub fn game_params(&self) -> GameParams {
        match (self.preset.params(), self.custom) {
            (Some(params), _) => params,
            (None, Some(custom)) => custom,
            (None, None) => {
                log::warn!("custom preset selected without parameters, using default");
                GameParams::default()
            }
        }
    }
}

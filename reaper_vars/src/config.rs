use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MIN_VARIABLES: u16 = 1;
pub const MAX_VARIABLES: u16 = 256;

pub const ENV_NUM_TRACKS: &str = "REAPER_VARS_NUM_TRACKS";
pub const ENV_NUM_FX: &str = "REAPER_VARS_NUM_FX";

/// How many tracks, and fx slots per track, the catalog covers.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cardinality {
    tracks: u16,
    fx_per_track: u16,
}

impl Cardinality {
    pub fn new(tracks: u16, fx_per_track: u16) -> Result<Self, ConfigError> {
        check_range("numTrackVariables", tracks.into(), MIN_VARIABLES.into(), MAX_VARIABLES.into())?;
        check_range("numFXVariables", fx_per_track.into(), MIN_VARIABLES.into(), MAX_VARIABLES.into())?;
        Ok(Self {
            tracks,
            fx_per_track,
        })
    }

    pub fn tracks(&self) -> usize {
        self.tracks.into()
    }

    pub fn fx_per_track(&self) -> usize {
        self.fx_per_track.into()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleConfig {
    pub host: String,
    pub port: u32,
    pub feedback_port: u32,
    pub refresh_on_init: bool,
    pub num_track_variables: u16,
    #[serde(rename = "numFXVariables")]
    pub num_fx_variables: u16,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            feedback_port: 9000,
            refresh_on_init: true,
            num_track_variables: 10,
            num_fx_variables: 2,
        }
    }
}

impl ModuleConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Applies `REAPER_VARS_NUM_TRACKS` / `REAPER_VARS_NUM_FX` when `lookup`
    /// has them. Pass `|v| std::env::var(v).ok()` for the process environment.
    pub fn apply_overrides_from(
        &mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = parse_u16(ENV_NUM_TRACKS, lookup(ENV_NUM_TRACKS))? {
            self.num_track_variables = v;
        }
        if let Some(v) = parse_u16(ENV_NUM_FX, lookup(ENV_NUM_FX))? {
            self.num_fx_variables = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<Cardinality, ConfigError> {
        check_range("port", self.port.into(), 1, 65535)?;
        check_range("feedbackPort", self.feedback_port.into(), 1, 65535)?;
        Cardinality::new(self.num_track_variables, self.num_fx_variables)
    }
}

fn parse_u16(var: &'static str, raw: Option<String>) -> Result<Option<u16>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u16>()
        .map(Some)
        .map_err(|_| ConfigError::BadEnv { var, value: raw })
}

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

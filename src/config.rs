// config.rs — command line, config file and viewer tuning

use crate::view::{ProjectionMode, ZoomBounds};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_LANG: &str = "en";
pub const LANG_ENV: &str = "PANORAMA_LANG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tuning knobs of the viewer. Every field has a default, so a config file
/// only needs the keys it wants to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Degrees of rotation per logical pixel of drag.
    pub sensitivity: f32,
    /// Degrees per arrow key press.
    pub key_step: f32,
    pub zoom_in_factor: f32,
    pub zoom_out_factor: f32,
    /// Presentation height at zoom scale 1.0, logical pixels.
    pub base_height: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub projection: ProjectionMode,
    /// Larger images are downscaled to fit this many pixels per side.
    pub max_image_side: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.5,
            key_step: 5.0,
            zoom_in_factor: 1.1,
            zoom_out_factor: 0.9,
            base_height: 500.0,
            min_height: 300.0,
            max_height: 800.0,
            projection: ProjectionMode::default(),
            max_image_side: 8192,
        }
    }
}

impl ViewerConfig {
    pub fn zoom_bounds(&self) -> ZoomBounds {
        ZoomBounds::from_heights(self.base_height, self.min_height, self.max_height)
    }

    pub fn from_json(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: ViewerConfig =
            serde_json::from_str(text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("sensitivity", self.sensitivity),
            ("key_step", self.key_step),
            ("zoom_in_factor", self.zoom_in_factor),
            ("zoom_out_factor", self.zoom_out_factor),
            ("base_height", self.base_height),
            ("min_height", self.min_height),
            ("max_height", self.max_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.min_height > self.max_height {
            return Err(ConfigError::Invalid(format!(
                "min_height {} exceeds max_height {}",
                self.min_height, self.max_height
            )));
        }
        if !(self.min_height..=self.max_height).contains(&self.base_height) {
            return Err(ConfigError::Invalid(format!(
                "base_height {} outside [{}, {}]",
                self.base_height, self.min_height, self.max_height
            )));
        }
        if self.max_image_side == 0 {
            return Err(ConfigError::Invalid("max_image_side must be non-zero".into()));
        }
        Ok(())
    }
}

/// Paradise Eden Villa 360° virtual tour viewer.
#[derive(Debug, Parser)]
#[command(name = "tour360", version)]
pub struct Cli {
    /// Panorama to open: a local path, file:// or http(s):// URL.
    pub image: Option<String>,

    /// UI language code (en, zh-Hans). Falls back to $PANORAMA_LANG.
    #[arg(long)]
    pub lang: Option<String>,

    /// JSON file overriding viewer settings.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Projection mode, overrides the config file.
    #[arg(long, value_parser = parse_projection)]
    pub projection: Option<ProjectionMode>,
}

fn parse_projection(s: &str) -> Result<ProjectionMode, String> {
    match s {
        "composed" => Ok(ProjectionMode::Composed),
        "offset-only" => Ok(ProjectionMode::OffsetOnly),
        other => Err(format!("unknown projection '{other}' (composed, offset-only)")),
    }
}

impl Cli {
    /// Language from `--lang`, then the environment, then the default.
    pub fn resolve_lang(&self) -> String {
        resolve_lang(self.lang.as_deref(), std::env::var(LANG_ENV).ok().as_deref())
    }

    pub fn viewer_config(&self) -> Result<ViewerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)?,
            None => ViewerConfig::default(),
        };
        if let Some(projection) = self.projection {
            config.projection = projection;
        }
        Ok(config)
    }
}

fn resolve_lang(cli: Option<&str>, env: Option<&str>) -> String {
    cli.or(env.filter(|v| !v.trim().is_empty()))
        .unwrap_or(DEFAULT_LANG)
        .to_string()
}

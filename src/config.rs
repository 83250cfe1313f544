use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::freetype::{LineCap, LineJoin};
use crate::pixmap::{Color, Format};
use crate::raster::{RenderSettings, StrokeSettings};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub stroke: StrokeConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RenderConfig {
    pub size_px: Option<u32>,
    /// `RRGGBB` or `RRGGBBAA`.
    pub color: Option<String>,
    pub gamma: Option<f32>,
    pub format: Option<String>,
    pub mono: Option<bool>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StrokeConfig {
    pub width: Option<f32>,
    pub cap: Option<LineCap>,
    pub join: Option<LineJoin>,
    pub miter_limit: Option<f32>,
    pub inside: Option<bool>,
}

impl Config {
    pub fn load() -> Self {
        let config_path = match config_file_path() {
            Some(path) => path,
            None => return Config::default(),
        };

        if !config_path.exists() {
            return Config::default();
        }

        let content = match fs::read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Failed to read config file: {}", e);
                return Config::default();
            }
        };

        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to parse config file: {}", e);
                Config::default()
            }
        }
    }

    /// Render settings with unset or invalid values replaced by defaults.
    pub fn render_settings(&self) -> RenderSettings {
        let defaults = RenderSettings::default();
        let render = &self.render;

        let color = match render.color.as_deref().map(|hex| (hex, Color::from_hex(hex))) {
            Some((_, Some(color))) => color,
            Some((hex, None)) => {
                log::warn!("Ignoring invalid color in config: {}", hex);
                defaults.color
            }
            None => defaults.color,
        };

        let format = match render.format.as_deref().map(str::parse::<Format>) {
            Some(Ok(format)) => format,
            Some(Err(e)) => {
                log::warn!("Ignoring config value: {}", e);
                defaults.format
            }
            None => defaults.format,
        };

        RenderSettings {
            size_px: render.size_px.unwrap_or(defaults.size_px),
            color,
            gamma: render.gamma.unwrap_or(defaults.gamma),
            format,
            mono: render.mono.unwrap_or(defaults.mono),
        }
    }

    /// Stroke settings, `None` unless a width is configured.
    pub fn stroke_settings(&self) -> Option<StrokeSettings> {
        let defaults = StrokeSettings::default();
        let stroke = &self.stroke;
        stroke.width.map(|width| StrokeSettings {
            width,
            cap: stroke.cap.unwrap_or(defaults.cap),
            join: stroke.join.unwrap_or(defaults.join),
            miter_limit: stroke.miter_limit.unwrap_or(defaults.miter_limit),
            inside: stroke.inside.unwrap_or(defaults.inside),
        })
    }
}

fn config_file_path() -> Option<PathBuf> {
    let config_dir = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)?;
    Some(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.render.size_px, None);
        assert_eq!(config.render_settings(), RenderSettings::default());
        assert!(config.stroke_settings().is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [render]
            size_px = 24
            color = "ff8000"
            gamma = 1.0
            format = "alpha"
            mono = true

            [stroke]
            width = 2.0
            cap = "square"
            join = "miter-fixed"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        let render = config.render_settings();
        assert_eq!(render.size_px, 24);
        assert_eq!(render.color.rgba8888(), 0xff80_00ff);
        assert_eq!(render.gamma, 1.0);
        assert_eq!(render.format, Format::Alpha);
        assert!(render.mono);

        let stroke = config.stroke_settings().unwrap();
        assert_eq!(stroke.width, 2.0);
        assert_eq!(stroke.cap, LineCap::Square);
        assert_eq!(stroke.join, LineJoin::MiterFixed);
        assert!(!stroke.inside);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
            [render]
            size_px = 20
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        let render = config.render_settings();
        assert_eq!(render.size_px, 20);
        assert_eq!(render.color, Color::WHITE);
        assert!(config.stroke_settings().is_none());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let toml = r#"
            [render]
            color = "not a color"
            format = "cmyk"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        let render = config.render_settings();
        assert_eq!(render.color, Color::WHITE);
        assert_eq!(render.format, Format::Rgba8888);
    }

    #[test]
    fn test_unknown_cap_is_rejected() {
        let toml = r#"
            [stroke]
            cap = "pointy"
        "#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::DemoError;
use crate::shapes::Rect;
use crate::types::Color;

/// Everything the demo and its terminal host can be tuned with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Identifier of the surface in the hosting document.
    pub canvas: String,
    /// Amount a chosen bar advances per tick.
    pub size_increment: u32,
    /// Time between ticks.
    pub rate_ms: u64,
    /// Number of bars.
    pub number: usize,
    pub barrier: BarrierSpec,
    pub bar: BarSpec,
    pub phase_one: PhaseOneConfig,
    pub phase_two: PhaseTwoConfig,
    /// Fixed seed for bar selection; random when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub view: ViewConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrierSpec {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarSpec {
    /// Distance of the first bar from the top-left corner.
    pub offset: i32,
    pub width: i32,
    pub height: i32,
    /// Gap between neighbouring bars.
    pub separation: i32,
    pub empty_color: Color,
    pub full_color: Color,
    pub stroke_color: Color,
    pub wait_color: Color,
    pub stroke_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseOneConfig {
    pub has_barrier: bool,
    pub max_fill: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseTwoConfig {
    pub has_barrier: bool,
    pub max_fill: u32,
    /// Pause between the end of phase one and the start of phase two.
    pub pause_ms: u64,
}

/// Terminal presentation of the pixel canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Canvas pixels per terminal column.
    pub cell_width: u32,
    /// Canvas pixels per terminal row.
    pub cell_height: u32,
    /// How long the final frame stays on screen.
    pub hold_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            canvas: "demo".into(),
            size_increment: 10,
            rate_ms: 100,
            number: 5,
            barrier: BarrierSpec::default(),
            bar: BarSpec::default(),
            phase_one: PhaseOneConfig::default(),
            phase_two: PhaseTwoConfig::default(),
            seed: None,
            view: ViewConfig::default(),
        }
    }
}

impl Default for BarrierSpec {
    fn default() -> Self {
        BarrierSpec {
            x: 1,
            y: 210,
            width: 240,
            height: 2,
            color: Color::BLACK,
        }
    }
}

impl Default for BarSpec {
    fn default() -> Self {
        BarSpec {
            offset: 10,
            width: 20,
            height: 300,
            separation: 30,
            empty_color: Color::GREY,
            full_color: Color::GREEN,
            stroke_color: Color::BLACK,
            wait_color: Color::RED,
            stroke_width: 2,
        }
    }
}

impl Default for PhaseOneConfig {
    fn default() -> Self {
        PhaseOneConfig {
            has_barrier: true,
            max_fill: 200,
        }
    }
}

impl Default for PhaseTwoConfig {
    fn default() -> Self {
        PhaseTwoConfig {
            has_barrier: false,
            max_fill: 300,
            pause_ms: 200,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            cell_width: 2,
            cell_height: 10,
            hold_ms: 1500,
        }
    }
}

impl BarrierSpec {
    pub fn to_rect(&self) -> Rect {
        Rect::filled(self.x, self.y, self.width, self.height, self.color.clone())
    }
}

impl DemoConfig {
    /// Load from `path` if given, otherwise from the per-user config file.
    ///
    /// An explicit path must exist and parse. The per-user file is optional;
    /// if it is present but invalid, defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            return serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse {}", path.display()));
        }

        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => Ok(config),
                Err(e) => {
                    tracing::warn!(path = %config_path.display(), "invalid demo config ({e}), using defaults");
                    Ok(Self::default())
                }
            },
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("barrier-bars");
        path.push("config.json");
        path
    }

    /// Reject values under which a phase could never finish.
    pub fn validate(&self) -> Result<(), DemoError> {
        let invalid = |msg: &str| Err(DemoError::InvalidConfig(msg.into()));
        if self.number == 0 {
            return invalid("number of bars must be at least 1");
        }
        if self.size_increment == 0 {
            return invalid("size_increment must be positive");
        }
        if self.rate_ms == 0 {
            return invalid("rate_ms must be positive");
        }
        if self.phase_one.max_fill == 0 || self.phase_two.max_fill == 0 {
            return invalid("phase capacities must be positive");
        }
        if self.phase_two.max_fill < self.phase_one.max_fill {
            return invalid("phase_two.max_fill must not be below phase_one.max_fill");
        }
        if self.view.cell_width == 0 || self.view.cell_height == 0 {
            return invalid("view cell size must be positive");
        }
        Ok(())
    }

    pub fn rate(&self) -> Duration {
        Duration::from_millis(self.rate_ms)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.phase_two.pause_ms)
    }

    /// Pixel size of a canvas that fits every bar, the barrier and a margin
    /// of `offset` on the far sides.
    pub fn canvas_size(&self) -> (u32, u32) {
        let b = &self.bar;
        let n = self.number as i32;
        let bars_w = b.offset * 2 + (b.width + b.separation) * n - b.separation;
        let bars_h = b.offset * 2 + b.height;
        let barrier_w = self.barrier.x + self.barrier.width;
        let barrier_h = self.barrier.y + self.barrier.height;
        let stroke = b.stroke_width as i32;
        let w = bars_w.max(barrier_w) + stroke;
        let h = bars_h.max(barrier_h) + stroke;
        (w.max(1) as u32, h.max(1) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let json = r#"{ "number": 3, "phase_two": { "max_fill": 250 }, "bar": { "full_color": "blue" } }"#;
        let config: DemoConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.number, 3);
        assert_eq!(config.phase_two.max_fill, 250);
        assert_eq!(config.phase_two.pause_ms, 200);
        assert!(!config.phase_two.has_barrier);
        assert_eq!(config.bar.full_color, Color::Named(crate::types::NamedColor::Blue));
        assert_eq!(config.bar.empty_color, Color::GREY);
        assert_eq!(config.canvas, "demo");
    }

    #[test]
    fn rgb_colors_deserialize() {
        let json = r#"{ "barrier": { "color": { "r": 1, "g": 2, "b": 3 } } }"#;
        let config: DemoConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.barrier.color, Color::Rgb { r: 1, g: 2, b: 3 });
    }

    #[test]
    fn barrier_position_comes_from_the_barrier_section() {
        // `bar.barrier_at` is no longer a setting; old files still load.
        let json = r#"{ "bar": { "barrier_at": 50 }, "barrier": { "y": 120 } }"#;
        let config: DemoConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.barrier.to_rect().y, 120);
        assert_eq!(config.bar, BarSpec::default());

        let defaults = serde_json::to_value(DemoConfig::default()).unwrap();
        assert!(defaults["bar"].get("barrier_at").is_none());
    }

    #[test]
    fn validate_rejects_non_terminating_settings() {
        assert!(DemoConfig::default().validate().is_ok());

        let zero_increment = DemoConfig {
            size_increment: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_increment.validate(),
            Err(DemoError::InvalidConfig(_))
        ));

        let no_bars = DemoConfig {
            number: 0,
            ..Default::default()
        };
        assert!(no_bars.validate().is_err());
    }

    #[test]
    fn validate_rejects_phase_two_below_phase_one() {
        let shrinking = DemoConfig {
            phase_two: PhaseTwoConfig {
                max_fill: 100,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = shrinking.validate().unwrap_err();
        assert!(matches!(err, DemoError::InvalidConfig(_)));
        assert!(err.to_string().contains("phase_two.max_fill"));

        let level = DemoConfig {
            phase_two: PhaseTwoConfig {
                max_fill: 200,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(level.validate().is_ok());
    }

    #[test]
    fn default_canvas_fits_bars_and_barrier() {
        let (w, h) = DemoConfig::default().canvas_size();
        // 5 bars: 10 + 5 * 50 - 30 + 10 = 240, barrier reaches 241.
        assert_eq!(w, 243);
        assert_eq!(h, 322);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = DemoConfig::load(Some(Path::new("/nonexistent/barrier-bars.json"))).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read"));
    }
}

//! Application configuration.
//!
//! All tunables live in one immutable [`Config`] built at startup and passed
//! into the components that need it; there is no ambient global state. A JSON
//! file can override any subset of the defaults via `--config PATH`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Viewport and zoom behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Fewest tiles that may span the short screen dimension (max zoom).
    pub min_tiles_on_screen: u16,
    /// Most tiles that may span the short screen dimension (min zoom).
    pub max_tiles_on_screen: u16,
    /// Tiles across the short dimension at startup and after a view reset.
    pub initial_tiles_on_screen: u16,
    /// Note labels are hidden when the zoom drops to this many pixels per
    /// tile or fewer.
    pub note_visibility_zoom_threshold: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_tiles_on_screen: 3,
            max_tiles_on_screen: 18,
            initial_tiles_on_screen: 5,
            note_visibility_zoom_threshold: 3.0,
        }
    }
}

impl ViewConfig {
    /// Ceiling on tiles enumerated per frame. A frame asking for more than
    /// this is skipped: it means the pan/zoom state is corrupted, and
    /// enumerating an unbounded tile set would hang the draw loop.
    ///
    /// The base is `(max_tiles + 5)^2` across the short dimension, scaled by
    /// the viewport aspect ratio (terminal windows are wide) with headroom
    /// for the denser hexagonal packing.
    pub fn render_tile_ceiling(&self, width: u16, height: u16) -> i64 {
        let short = f64::from(width.min(height).max(1));
        let long = f64::from(width.max(height).max(1));
        let side = f64::from(self.max_tiles_on_screen) + 5.0;
        (side * side * (long / short) * 2.0) as i64
    }
}

/// Pointer interaction tunables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Squared pixel distance between press and release below which the
    /// gesture counts as a click rather than a drag.
    pub click_vs_drag_threshold_sq: i64,
    /// Zoom multiplier per scroll-wheel notch.
    pub zoom_factor: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            click_vs_drag_threshold_sq: 25,
            zoom_factor: 1.1,
        }
    }
}

/// Music theory constants and the lattice-to-pitch map.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    /// Note at lattice coordinate (0, 0), e.g. `"C4"`. Parsed once at
    /// startup; an unparseable name is a fatal configuration error.
    pub origin_note: String,
    /// Whether note names default to sharp spellings.
    pub use_sharps: bool,
    /// Semitones per step along the q axis (default: major third).
    pub pitch_incr_q: i32,
    /// Semitones per step along the r axis (default: perfect fifth).
    pub pitch_incr_r: i32,
    /// Lowest octave a sounding note may land in.
    pub min_octave: i32,
    /// Highest octave a sounding note may land in.
    pub max_octave: i32,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            origin_note: "C4".to_string(),
            use_sharps: true,
            pitch_incr_q: 4,
            pitch_incr_r: 7,
            min_octave: 2,
            max_octave: 6,
        }
    }
}

/// Game-of-Life simulation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LifeConfig {
    /// Milliseconds between generations while the simulation runs.
    pub tick_interval_ms: u64,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2000,
        }
    }
}

/// MIDI output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MidiConfig {
    /// Velocity for note-on messages (0-127).
    pub velocity: u8,
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self { velocity: 100 }
    }
}

/// The complete application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub view: ViewConfig,
    pub interaction: InteractionConfig,
    pub music: MusicConfig,
    pub life: LifeConfig,
    pub midi: MidiConfig,
}

impl Config {
    /// Loads a configuration from a JSON file, filling missing fields with
    /// defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.music.origin_note, "C4");
        assert_eq!(config.music.pitch_incr_q, 4);
        assert_eq!(config.music.pitch_incr_r, 7);
        assert_eq!(config.view.initial_tiles_on_screen, 5);
        assert_eq!(config.interaction.click_vs_drag_threshold_sq, 25);
    }

    #[test]
    fn test_partial_json_overlay() {
        let config: Config =
            serde_json::from_str(r#"{"music": {"origin_note": "A3"}, "life": {"tick_interval_ms": 500}}"#)
                .unwrap();
        assert_eq!(config.music.origin_note, "A3");
        assert_eq!(config.life.tick_interval_ms, 500);
        // Untouched sections keep their defaults.
        assert_eq!(config.music.pitch_incr_r, 7);
        assert_eq!(config.midi.velocity, 100);
    }

    #[test]
    fn test_render_tile_ceiling() {
        let view = ViewConfig::default();
        // Square viewport: (18 + 5)^2 with the hex headroom factor.
        assert_eq!(view.render_tile_ceiling(100, 100), 23 * 23 * 2);
        // A wide viewport legitimately shows proportionally more tiles.
        assert!(view.render_tile_ceiling(240, 60) > view.render_tile_ceiling(100, 100));
    }
}

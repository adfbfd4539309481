//! Application configuration.
//!
//! The configuration is loaded from a JSON file
//! (`$XDG_CONFIG_HOME/snapgrab/config.json` unless `--config <path>` is
//! given).  Every section is optional and falls back to its compiled-in
//! defaults, so a minimal `{}` file is valid.
//!
//! # Example
//!
//! ```json
//! {
//!   "move": {
//!     "activate": "<super> BTN_LEFT",
//!     "enable_snap": true,
//!     "snap_threshold": 2,
//!     "snap_off_threshold": 20
//!   },
//!   "resize": { "activate": "<super> BTN_RIGHT" },
//!   "preview": { "duration_ms": 200 }
//! }
//! ```
//!
//! The file can be re-read at runtime; the new values take effect from the
//! next event on (see [`Dispatcher::set_config`](crate::signals::Dispatcher::set_config)).

use crate::event::{Binding, Button, Modifiers};
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Interactive move and snapping.
    #[serde(default, rename = "move")]
    pub move_: MoveConfig,

    /// Interactive resize.
    #[serde(default)]
    pub resize: ResizeConfig,

    /// Snap preview overlay animation.
    #[serde(default)]
    pub preview: PreviewConfig,

    /// Mirror views on secondary outputs.
    #[serde(default)]
    pub mirror: MirrorConfig,

    /// Output topology of the headless backend.
    #[serde(default)]
    pub headless: HeadlessConfig,
}

/// Settings for interactive move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveConfig {
    /// Button binding that starts a move.
    pub activate: Binding,
    /// Modifiers that turn a touch down into a move.
    pub touch_activate: Binding,
    /// Detect snap slots and show the preview while dragging.
    pub enable_snap: bool,
    /// Allow dragging a tiled or fullscreen view out of its slot.
    pub enable_snap_off: bool,
    /// Width of the edge band that triggers a snap slot (pixels).
    pub snap_threshold: i32,
    /// Distance a tiled view must be dragged before it un-tiles (pixels).
    pub snap_off_threshold: i32,
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self {
            activate: Binding::new(Modifiers::SUPER, Some(Button::Left)),
            touch_activate: Binding::new(Modifiers::SUPER | Modifiers::SHIFT, None),
            enable_snap: true,
            enable_snap_off: true,
            snap_threshold: 2,
            snap_off_threshold: 20,
        }
    }
}

/// Settings for interactive resize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    pub activate: Binding,
    pub touch_activate: Binding,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            activate: Binding::new(Modifiers::SUPER, Some(Button::Right)),
            touch_activate: Binding::new(Modifiers::SUPER | Modifiers::SHIFT | Modifiers::CTRL, None),
        }
    }
}

/// Snap preview timing.  Durations are in milliseconds; `0` disables the
/// animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Duration of every geometry/opacity transition of the overlay.
    pub duration_ms: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { duration_ms: 200 }
    }
}

/// Mirror view timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Duration of the closing fade (ms).
    pub fade_out_ms: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self { fade_out_ms: 150 }
    }
}

/// One output of the headless backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlessOutput {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Space reserved at the top for a panel (pixels).
    #[serde(default)]
    pub reserved_top: i32,
}

impl HeadlessOutput {
    pub fn geometry(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Output topology of the headless backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
    pub outputs: Vec<HeadlessOutput>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            outputs: vec![HeadlessOutput {
                name: "HEADLESS-1".into(),
                x: 0,
                y: 0,
                width: 1920,
                height: 1080,
                reserved_top: 0,
            }],
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "move": {
                "activate": "<alt> BTN_LEFT",
                "touch_activate": "<super>",
                "enable_snap": false,
                "enable_snap_off": false,
                "snap_threshold": 10,
                "snap_off_threshold": 50
            },
            "resize": { "activate": "<alt> BTN_RIGHT" },
            "preview": { "duration_ms": 120 },
            "mirror": { "fade_out_ms": 0 },
            "headless": {
                "outputs": [
                    { "name": "DP-1", "x": 0, "y": 0, "width": 2560, "height": 1440, "reserved_top": 32 },
                    { "name": "HDMI-A-1", "x": 2560, "y": 0, "width": 1920, "height": 1080 }
                ]
            }
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.move_.activate, Binding::new(Modifiers::ALT, Some(Button::Left)));
        assert_eq!(cfg.move_.touch_activate, Binding::new(Modifiers::SUPER, None));
        assert!(!cfg.move_.enable_snap);
        assert!(!cfg.move_.enable_snap_off);
        assert_eq!(cfg.move_.snap_threshold, 10);
        assert_eq!(cfg.move_.snap_off_threshold, 50);
        assert_eq!(cfg.resize.activate, Binding::new(Modifiers::ALT, Some(Button::Right)));
        assert_eq!(cfg.preview.duration_ms, 120);
        assert_eq!(cfg.mirror.fade_out_ms, 0);
        assert_eq!(cfg.headless.outputs.len(), 2);
        assert_eq!(cfg.headless.outputs[0].reserved_top, 32);
        assert_eq!(cfg.headless.outputs[1].reserved_top, 0);
        assert_eq!(cfg.headless.outputs[1].geometry(), Rect::new(2560, 0, 1920, 1080));
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.move_.snap_threshold, 2);
        assert!(cfg.move_.enable_snap);
        assert_eq!(cfg.headless.outputs.len(), 1);
    }

    #[test]
    fn deserialize_partial_move() {
        let cfg: Config = serde_json::from_str(r#"{ "move": { "snap_threshold": 8 } }"#).unwrap();
        assert_eq!(cfg.move_.snap_threshold, 8);
        let defaults = MoveConfig::default();
        assert_eq!(cfg.move_.activate, defaults.activate);
        assert_eq!(cfg.move_.snap_off_threshold, defaults.snap_off_threshold);
    }

    #[test]
    fn invalid_binding_is_an_error() {
        let res: Result<Config, _> =
            serde_json::from_str(r#"{ "move": { "activate": "<meta> BTN_LEFT" } }"#);
        assert!(res.is_err());
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "move": {}, "future_section": { "key": 42 } }"#;
        let _cfg: Config = serde_json::from_str(json).unwrap();
    }

    #[test]
    fn load_missing_file_fails() {
        let path = std::env::temp_dir().join("snapgrab-does-not-exist.json");
        assert!(Config::load(&path).is_err());
    }
}

//! Input events and bindings.
//!
//! [`InputEvent`] is the vocabulary every event source speaks: raw pointer
//! and touch input, frame ticks, client requests, and (for the headless
//! backend) scripted view lifecycle changes.  Bindings are written the way
//! users write them in the config file: `"<super> <shift> BTN_LEFT"`.

use crate::config::HeadlessOutput;
use crate::geometry::{Edges, OutputId, ViewId};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Keyboard modifiers held during a button or touch press.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Modifiers: u32 {
        const SHIFT = 1;
        const CTRL = 2;
        const ALT = 4;
        const SUPER = 8;
    }
}

/// A pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Button {
    Left,
    Right,
    Middle,
    /// Any other button, by its evdev code.
    Code(u32),
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Button::Left => write!(f, "BTN_LEFT"),
            Button::Right => write!(f, "BTN_RIGHT"),
            Button::Middle => write!(f, "BTN_MIDDLE"),
            Button::Code(code) => write!(f, "BTN_{}", code),
        }
    }
}

impl FromStr for Button {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_uppercase();
        match name.as_str() {
            "BTN_LEFT" => Ok(Button::Left),
            "BTN_RIGHT" => Ok(Button::Right),
            "BTN_MIDDLE" => Ok(Button::Middle),
            other => other
                .strip_prefix("BTN_")
                .and_then(|code| code.parse().ok())
                .map(Button::Code)
                .ok_or_else(|| format!("invalid button: {:?}", s)),
        }
    }
}

impl TryFrom<String> for Button {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Button> for String {
    fn from(b: Button) -> String {
        b.to_string()
    }
}

/// An activation binding: modifiers plus an optional button.
///
/// Button bindings (`"<super> BTN_LEFT"`) start a grab on button press;
/// touch bindings carry no button (`"<super> <shift>"`) and start a grab on
/// touch down while the modifiers are held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Binding {
    pub modifiers: Modifiers,
    pub button: Option<Button>,
}

impl Binding {
    pub const fn new(modifiers: Modifiers, button: Option<Button>) -> Self {
        Self { modifiers, button }
    }

    /// Whether pressing `button` with exactly `modifiers` held triggers
    /// this binding.
    pub fn matches_button(&self, button: Button, modifiers: Modifiers) -> bool {
        self.button == Some(button) && self.modifiers == modifiers
    }

    /// Whether a touch down with exactly `modifiers` held triggers this
    /// binding.  Bindings without modifiers never match touch, so plain
    /// taps keep working.
    pub fn matches_touch(&self, modifiers: Modifiers) -> bool {
        self.button.is_none() && !self.modifiers.is_empty() && self.modifiers == modifiers
    }
}

fn parse_modifier(name: &str) -> Option<Modifiers> {
    match name.to_ascii_lowercase().as_str() {
        "shift" => Some(Modifiers::SHIFT),
        "ctrl" | "control" => Some(Modifiers::CTRL),
        "alt" => Some(Modifiers::ALT),
        "super" | "logo" => Some(Modifiers::SUPER),
        _ => None,
    }
}

impl FromStr for Binding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifiers = Modifiers::empty();
        let mut button = None;
        for token in s.split_whitespace() {
            if let Some(name) = token.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
                modifiers |= parse_modifier(name)
                    .ok_or_else(|| format!("unknown modifier <{}> in {:?}", name, s))?;
            } else if button.is_none() {
                button = Some(token.parse::<Button>()?);
            } else {
                return Err(format!("more than one button in binding {:?}", s));
            }
        }
        if modifiers.is_empty() && button.is_none() {
            return Err(format!("empty binding: {:?}", s));
        }
        Ok(Binding { modifiers, button })
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        for (flag, name) in [
            (Modifiers::SUPER, "<super>"),
            (Modifiers::CTRL, "<ctrl>"),
            (Modifiers::ALT, "<alt>"),
            (Modifiers::SHIFT, "<shift>"),
        ] {
            if self.modifiers.contains(flag) {
                parts.push(name.to_string());
            }
        }
        if let Some(b) = self.button {
            parts.push(b.to_string());
        }
        write!(f, "{}", parts.join(" "))
    }
}

impl TryFrom<String> for Binding {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Binding> for String {
    fn from(b: Binding) -> String {
        b.to_string()
    }
}

/// Everything the dispatcher reacts to.
///
/// Events are processed strictly in the order they are delivered.
///
/// # Wire format
///
/// One JSON value per line:
///
/// ```json
/// {"Button":{"button":"BTN_LEFT","pressed":true,"modifiers":"SUPER"}}
/// {"Motion":{"x":640,"y":400}}
/// {"Frame":{"elapsed_ms":16}}
/// {"RemoveOutput":{"output":1}}
/// {"ResizeRequest":{"view":{"index":0,"generation":0},"edges":"LEFT | TOP"}}
/// "ReloadConfig"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// A pointer button changed state.
    Button {
        button: Button,
        pressed: bool,
        #[serde(default)]
        modifiers: Modifiers,
    },

    /// The pointer moved to a global position.
    Motion { x: i32, y: i32 },

    TouchDown {
        id: i32,
        x: i32,
        y: i32,
        #[serde(default)]
        modifiers: Modifiers,
    },

    TouchMotion { id: i32, x: i32, y: i32 },

    TouchUp { id: i32 },

    /// A frame was presented; drives preview and mirror animations.
    Frame { elapsed_ms: u64 },

    /// A client asked to be moved interactively.
    MoveRequest { view: ViewId },

    /// A client asked to be resized interactively along `edges`.  An empty
    /// mask lets the grab position pick the edges.
    ResizeRequest {
        view: ViewId,
        #[serde(default)]
        edges: Edges,
    },

    /// Headless only: create and map a toplevel view.
    MapView {
        output: OutputId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    /// Headless only: the client unmapped a view.
    UnmapView { view: ViewId },

    /// Headless only: a view was destroyed.
    DestroyView { view: ViewId },

    /// Headless only: an output was plugged in.
    AddOutput(HeadlessOutput),

    /// Headless only: an output was unplugged.  Its views move to the
    /// first remaining output.
    RemoveOutput { output: OutputId },

    /// Re-read the configuration file.
    ReloadConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_button_binding() {
        let b: Binding = "<super> BTN_LEFT".parse().unwrap();
        assert_eq!(b.modifiers, Modifiers::SUPER);
        assert_eq!(b.button, Some(Button::Left));
        assert!(b.matches_button(Button::Left, Modifiers::SUPER));
        assert!(!b.matches_button(Button::Left, Modifiers::SUPER | Modifiers::SHIFT));
        assert!(!b.matches_button(Button::Right, Modifiers::SUPER));
    }

    #[test]
    fn parse_touch_binding() {
        let b: Binding = "<super> <shift>".parse().unwrap();
        assert_eq!(b.button, None);
        assert!(b.matches_touch(Modifiers::SUPER | Modifiers::SHIFT));
        assert!(!b.matches_touch(Modifiers::SUPER));
    }

    #[test]
    fn parse_numeric_button() {
        assert_eq!("BTN_275".parse::<Button>(), Ok(Button::Code(275)));
        assert_eq!("btn_right".parse::<Button>(), Ok(Button::Right));
        assert!("BUTTON".parse::<Button>().is_err());
    }

    #[test]
    fn reject_bad_bindings() {
        assert!("<hyper> BTN_LEFT".parse::<Binding>().is_err());
        assert!("BTN_LEFT BTN_RIGHT".parse::<Binding>().is_err());
        assert!("".parse::<Binding>().is_err());
    }

    #[test]
    fn binding_display_round_trips() {
        let b: Binding = "<shift> <alt> BTN_MIDDLE".parse().unwrap();
        assert_eq!(b.to_string(), "<alt> <shift> BTN_MIDDLE");
        assert_eq!(b.to_string().parse::<Binding>().unwrap(), b);
    }

    #[test]
    fn deserialize_events() {
        let e: InputEvent =
            serde_json::from_str(r#"{"Button":{"button":"BTN_LEFT","pressed":true,"modifiers":"SUPER"}}"#)
                .unwrap();
        assert_eq!(
            e,
            InputEvent::Button {
                button: Button::Left,
                pressed: true,
                modifiers: Modifiers::SUPER,
            }
        );

        let e: InputEvent = serde_json::from_str(r#"{"Motion":{"x":5,"y":-3}}"#).unwrap();
        assert_eq!(e, InputEvent::Motion { x: 5, y: -3 });

        let e: InputEvent = serde_json::from_str(r#""ReloadConfig""#).unwrap();
        assert_eq!(e, InputEvent::ReloadConfig);
    }

    #[test]
    fn resize_request_edges_default_to_empty() {
        let e: InputEvent =
            serde_json::from_str(r#"{"ResizeRequest":{"view":{"index":3,"generation":1}}}"#).unwrap();
        assert_eq!(
            e,
            InputEvent::ResizeRequest {
                view: ViewId { index: 3, generation: 1 },
                edges: Edges::empty(),
            }
        );
    }

    #[test]
    fn button_without_modifiers() {
        let e: InputEvent =
            serde_json::from_str(r#"{"Button":{"button":"BTN_LEFT","pressed":false}}"#).unwrap();
        assert_eq!(
            e,
            InputEvent::Button {
                button: Button::Left,
                pressed: false,
                modifiers: Modifiers::empty(),
            }
        );
    }
}

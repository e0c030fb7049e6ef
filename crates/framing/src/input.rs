//! Translation from host UI events to [`ControlInput`].

use foundation::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::controller::ControlInput;

/// Raw event as delivered by the embedding UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerCancel,
    KeyDown { key: String },
    KeyUp { key: String },
    /// Window lost focus; held keys and buttons are gone.
    Blur,
    Resize { width: f64, height: f64 },
}

#[derive(Debug, Clone)]
pub struct InputAdapter {
    modifier_key: String,
}

impl InputAdapter {
    pub fn new(modifier_key: impl Into<String>) -> Self {
        Self {
            modifier_key: modifier_key.into(),
        }
    }

    fn is_modifier(&self, key: &str) -> bool {
        key.eq_ignore_ascii_case(&self.modifier_key)
    }

    pub fn translate(&self, event: &HostEvent) -> Vec<ControlInput> {
        match event {
            HostEvent::PointerDown { x, y } => vec![ControlInput::PointerDown {
                pos: Vec2::new(*x, *y),
            }],
            HostEvent::PointerMove { x, y } => vec![ControlInput::PointerMove {
                pos: Vec2::new(*x, *y),
            }],
            HostEvent::PointerUp => vec![ControlInput::PointerUp],
            HostEvent::PointerCancel => vec![ControlInput::PointerCancel],
            HostEvent::KeyDown { key } if self.is_modifier(key) => vec![ControlInput::ModifierDown],
            HostEvent::KeyUp { key } if self.is_modifier(key) => vec![ControlInput::ModifierUp],
            HostEvent::KeyDown { .. } | HostEvent::KeyUp { .. } => Vec::new(),
            HostEvent::Blur => vec![ControlInput::ModifierUp, ControlInput::PointerCancel],
            HostEvent::Resize { width, height } => vec![ControlInput::Resize {
                width: *width,
                height: *height,
            }],
        }
    }
}

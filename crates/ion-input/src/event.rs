use serde::{Deserialize, Serialize};

/// A physical key, identified the way most windowing layers report it: a
/// platform-independent logical key rather than a raw scancode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    Q,
    E,
    R,
    F,
    Space,
    LeftShift,
    LeftControl,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamepadAxis {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
    LeftTrigger,
    RightTrigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamepadButton {
    South,
    East,
    North,
    West,
    LeftBumper,
    RightBumper,
    Start,
}

/// Identifies a physical input independent of what it produces — the thing
/// a [`crate::binding::BindingConfig`] maps to an [`crate::action::Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceInput {
    Key(KeyCode),
    Axis(GamepadAxis),
    Button(GamepadButton),
}

/// A raw event as captured by the HAL, before dead-zone/scale resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceEvent {
    Key { key: KeyCode, pressed: bool },
    Axis { axis: GamepadAxis, value: f32 },
    Button { button: GamepadButton, pressed: bool },
}

impl DeviceEvent {
    pub fn device_input(&self) -> DeviceInput {
        match self {
            DeviceEvent::Key { key, .. } => DeviceInput::Key(*key),
            DeviceEvent::Axis { axis, .. } => DeviceInput::Axis(*axis),
            DeviceEvent::Button { button, .. } => DeviceInput::Button(*button),
        }
    }
}

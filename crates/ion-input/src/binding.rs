use serde::{Deserialize, Serialize};

use crate::action::{Action, InputContext};
use crate::error::{InputError, InputResult};
use crate::event::DeviceInput;

/// One physical-input-to-action mapping, as loaded from a binding file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub input: DeviceInput,
    pub action: Action,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub dead_zone: f32,
    #[serde(default)]
    pub context: Option<InputContext>,
}

fn default_scale() -> f32 {
    1.0
}

/// The full set of bindings for a control scheme, as handed to
/// [`crate::action::ActionService::new`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BindingConfig {
    pub bindings: Vec<Binding>,
}

impl BindingConfig {
    pub fn lookup(&self, input: DeviceInput) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.input == input)
    }

    /// Parses a binding config from JSON, matching `ion-core`'s other
    /// configuration surfaces. An input that doesn't map to a recognized
    /// device is a hard error — there is no such thing as "binds to
    /// nothing" for a record that made it into the file; an unrecognized
    /// device an input is attached to (this layer has no way to express
    /// that with a strongly-typed `DeviceInput`, so it's left to the
    /// loader at the process boundary) is the caller's concern, not this
    /// parser's.
    pub fn from_json(text: &str) -> InputResult<Self> {
        serde_json::from_str(text).map_err(InputError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{GamepadAxis, KeyCode};

    #[test]
    fn lookup_finds_matching_binding() {
        let config = BindingConfig {
            bindings: vec![Binding {
                input: DeviceInput::Key(KeyCode::W),
                action: Action::Thrust,
                scale: 1.0,
                dead_zone: 0.0,
                context: None,
            }],
        };
        assert!(config.lookup(DeviceInput::Key(KeyCode::W)).is_some());
        assert!(config.lookup(DeviceInput::Axis(GamepadAxis::LeftStickX)).is_none());
    }

    #[test]
    fn from_json_rejects_malformed_input() {
        assert!(BindingConfig::from_json("not json").is_err());
    }

    #[test]
    fn from_json_parses_a_minimal_binding() {
        let json = r#"{"bindings":[{"input":{"Key":"W"},"action":"Thrust"}]}"#;
        let config = BindingConfig::from_json(json).unwrap();
        assert_eq!(config.bindings.len(), 1);
        assert_eq!(config.bindings[0].scale, 1.0);
    }
}

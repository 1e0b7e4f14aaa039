use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::binding::BindingConfig;
use crate::event::{DeviceEvent, DeviceInput};

/// Named, device-independent control inputs the rest of the engine consumes.
/// Analog actions carry a `[-1.0, 1.0]` (or `[0.0, 1.0]` for triggers) value;
/// digital actions are pressed/released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Thrust,
    Strafe,
    Vertical,
    Pitch,
    Yaw,
    Roll,
    Boost,
    Fire,
    CameraToggle,
    PauseMenu,
}

impl Action {
    pub fn is_analog(&self) -> bool {
        matches!(
            self,
            Action::Thrust | Action::Strafe | Action::Vertical | Action::Pitch | Action::Yaw | Action::Roll
        )
    }
}

/// Which set of bindings is currently live. Pushing a context onto the
/// stack (e.g. entering a pause menu) suspends bindings scoped to contexts
/// below it without discarding their analog/digital state, so resuming
/// flight doesn't require re-deriving velocities from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputContext {
    Flight,
    Menu,
    ScriptedFlightOverride,
}

/// Rescales `raw` past the dead zone edge rather than just gating it: a
/// binding at `dead_zone + epsilon` reports close to `0.0`, not close to
/// `dead_zone`, and the full range beyond the dead zone still reaches
/// `[-1.0, 1.0]`.
fn apply_dead_zone(raw: f32, dead_zone: f32) -> f32 {
    if raw.abs() < dead_zone {
        0.0
    } else {
        ((raw - raw.signum() * dead_zone) / (1.0 - dead_zone)).clamp(-1.0, 1.0)
    }
}

/// Resolves raw [`DeviceEvent`]s into [`Action`] values: applies dead-zone
/// and scale per binding, sums contributions from every binding mapped to
/// the same action, clamps the total to `[-1.0, 1.0]`, and gates bindings by
/// the active [`InputContext`].
pub struct ActionService {
    bindings: BindingConfig,
    /// Per-(action, input) resolved analog contribution, summed at query
    /// time so two bindings mapped to the same action (e.g. a gamepad axis
    /// and a keyboard key) add rather than clobber each other.
    analog_contributions: HashMap<(Action, DeviceInput), f32>,
    /// Per-(action, input) digital level, OR'd together per action.
    digital_level: HashMap<(Action, DeviceInput), bool>,
    /// Combined digital level as of the end of the previous `process_events`
    /// call, used to detect the 0-to-nonzero transition.
    digital_combined_prev: HashMap<Action, bool>,
    /// Rising-edge result for the most recent `process_events` call only.
    digital_edge: HashMap<Action, bool>,
    context_stack: Vec<InputContext>,
}

impl ActionService {
    pub fn new(bindings: BindingConfig) -> Self {
        Self {
            bindings,
            analog_contributions: HashMap::new(),
            digital_level: HashMap::new(),
            digital_combined_prev: HashMap::new(),
            digital_edge: HashMap::new(),
            context_stack: vec![InputContext::Flight],
        }
    }

    pub fn push_context(&mut self, context: InputContext) {
        self.context_stack.push(context);
    }

    /// Pops the top context, if more than the base `Flight` context remains
    /// on the stack. Popping the last context is a no-op — there is always
    /// an active context.
    pub fn pop_context(&mut self) {
        if self.context_stack.len() > 1 {
            self.context_stack.pop();
        }
    }

    pub fn active_context(&self) -> InputContext {
        *self.context_stack.last().expect("context stack is never empty")
    }

    /// Processes one tick's worth of raw events, updating analog/digital
    /// action state. Events bound to an input with no binding, or a binding
    /// scoped to a context other than the active one, are ignored. Digital
    /// rising-edge state is reset at the start of every call, so
    /// [`Self::is_action_pressed`] only reports `true` on the tick a
    /// binding actually transitions.
    pub fn process_events(&mut self, events: &[DeviceEvent]) {
        let active = self.active_context();
        self.digital_edge.clear();
        let mut touched_digital_actions = Vec::new();

        for event in events {
            let input = event.device_input();
            let Some(binding) = self.bindings.lookup(input) else {
                continue;
            };
            if let Some(context) = binding.context {
                if context != active {
                    continue;
                }
            }
            match event {
                DeviceEvent::Axis { value, .. } => {
                    let contribution = apply_dead_zone(*value, binding.dead_zone) * binding.scale;
                    self.analog_contributions.insert((binding.action, input), contribution);
                }
                DeviceEvent::Key { pressed, .. } | DeviceEvent::Button { pressed, .. } => {
                    if binding.action.is_analog() {
                        let contribution = if *pressed { binding.scale } else { 0.0 };
                        self.analog_contributions.insert((binding.action, input), contribution);
                    } else {
                        self.digital_level.insert((binding.action, input), *pressed);
                        touched_digital_actions.push(binding.action);
                    }
                }
            }
        }

        for action in touched_digital_actions {
            let combined = self
                .digital_level
                .iter()
                .any(|((a, _), pressed)| *a == action && *pressed);
            let prev = *self.digital_combined_prev.get(&action).unwrap_or(&false);
            self.digital_edge.insert(action, combined && !prev);
            self.digital_combined_prev.insert(action, combined);
        }
    }

    /// Sum of every binding's contribution to `action`, clamped to
    /// `[-1.0, 1.0]`.
    pub fn get_action_value(&self, action: Action) -> f32 {
        let total: f32 = self
            .analog_contributions
            .iter()
            .filter(|((a, _), _)| *a == action)
            .map(|(_, value)| *value)
            .sum();
        total.clamp(-1.0, 1.0)
    }

    /// `true` only on the tick a digital binding transitions from released
    /// (across every binding mapped to `action`) to pressed.
    pub fn is_action_pressed(&self, action: Action) -> bool {
        *self.digital_edge.get(&action).unwrap_or(&false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Binding;
    use crate::event::{GamepadAxis, KeyCode};

    fn analog_service() -> ActionService {
        let bindings = BindingConfig {
            bindings: vec![Binding {
                input: DeviceInput::Axis(GamepadAxis::LeftStickX),
                action: Action::Strafe,
                scale: 1.0,
                dead_zone: 0.1,
                context: None,
            }],
        };
        ActionService::new(bindings)
    }

    #[test]
    fn dead_zone_suppresses_small_axis_values() {
        let mut service = analog_service();
        service.process_events(&[DeviceEvent::Axis {
            axis: GamepadAxis::LeftStickX,
            value: 0.05,
        }]);
        assert_eq!(service.get_action_value(Action::Strafe), 0.0);
    }

    #[test]
    fn axis_value_rescales_past_the_dead_zone_edge() {
        let mut service = analog_service();
        service.process_events(&[DeviceEvent::Axis {
            axis: GamepadAxis::LeftStickX,
            value: 0.9,
        }]);
        // (0.9 - 0.1) / (1.0 - 0.1) = 0.8888...
        assert!((service.get_action_value(Action::Strafe) - 0.88889).abs() < 1e-4);
    }

    #[test]
    fn axis_just_past_dead_zone_reports_near_zero_not_near_dead_zone() {
        let mut service = analog_service();
        service.process_events(&[DeviceEvent::Axis {
            axis: GamepadAxis::LeftStickX,
            value: 0.1001,
        }]);
        assert!(service.get_action_value(Action::Strafe) < 0.01);
    }

    #[test]
    fn full_scale_axis_still_reaches_the_clamp() {
        let mut service = analog_service();
        service.process_events(&[DeviceEvent::Axis {
            axis: GamepadAxis::LeftStickX,
            value: 1.0,
        }]);
        assert!((service.get_action_value(Action::Strafe) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn multiple_bindings_to_one_action_sum_then_clamp() {
        let bindings = BindingConfig {
            bindings: vec![
                Binding {
                    input: DeviceInput::Axis(GamepadAxis::LeftStickY),
                    action: Action::Thrust,
                    scale: 1.0,
                    dead_zone: 0.1,
                    context: None,
                },
                Binding {
                    input: DeviceInput::Key(KeyCode::W),
                    action: Action::Thrust,
                    scale: 1.0,
                    dead_zone: 0.0,
                    context: None,
                },
            ],
        };
        let mut service = ActionService::new(bindings);
        service.process_events(&[
            DeviceEvent::Axis {
                axis: GamepadAxis::LeftStickY,
                value: 0.10,
            },
            DeviceEvent::Key {
                key: KeyCode::W,
                pressed: true,
            },
        ]);
        // axis at exactly the dead zone contributes ~0; keyboard contributes 1.0.
        assert!((service.get_action_value(Action::Thrust) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn summed_contributions_clamp_at_the_total() {
        let bindings = BindingConfig {
            bindings: vec![
                Binding {
                    input: DeviceInput::Key(KeyCode::W),
                    action: Action::Thrust,
                    scale: 1.0,
                    dead_zone: 0.0,
                    context: None,
                },
                Binding {
                    input: DeviceInput::Axis(GamepadAxis::LeftStickY),
                    action: Action::Thrust,
                    scale: 1.0,
                    dead_zone: 0.0,
                    context: None,
                },
            ],
        };
        let mut service = ActionService::new(bindings);
        service.process_events(&[
            DeviceEvent::Key {
                key: KeyCode::W,
                pressed: true,
            },
            DeviceEvent::Axis {
                axis: GamepadAxis::LeftStickY,
                value: 1.0,
            },
        ]);
        assert_eq!(service.get_action_value(Action::Thrust), 1.0);
    }

    #[test]
    fn unbound_input_is_ignored() {
        let mut service = analog_service();
        service.process_events(&[DeviceEvent::Key {
            key: KeyCode::Escape,
            pressed: true,
        }]);
        assert!(!service.is_action_pressed(Action::PauseMenu));
    }

    #[test]
    fn is_action_pressed_reports_only_the_rising_edge() {
        let bindings = BindingConfig {
            bindings: vec![Binding {
                input: DeviceInput::Key(KeyCode::Escape),
                action: Action::PauseMenu,
                scale: 1.0,
                dead_zone: 0.0,
                context: None,
            }],
        };
        let mut service = ActionService::new(bindings);

        service.process_events(&[DeviceEvent::Key {
            key: KeyCode::Escape,
            pressed: true,
        }]);
        assert!(service.is_action_pressed(Action::PauseMenu));

        // Held across a second tick with no new events: no longer a rising edge.
        service.process_events(&[]);
        assert!(!service.is_action_pressed(Action::PauseMenu));

        // Re-asserting "pressed" without an intervening release is not a new edge.
        service.process_events(&[DeviceEvent::Key {
            key: KeyCode::Escape,
            pressed: true,
        }]);
        assert!(!service.is_action_pressed(Action::PauseMenu));

        service.process_events(&[DeviceEvent::Key {
            key: KeyCode::Escape,
            pressed: false,
        }]);
        assert!(!service.is_action_pressed(Action::PauseMenu));

        service.process_events(&[DeviceEvent::Key {
            key: KeyCode::Escape,
            pressed: true,
        }]);
        assert!(service.is_action_pressed(Action::PauseMenu));
    }

    #[test]
    fn context_gated_binding_only_applies_when_active() {
        let bindings = BindingConfig {
            bindings: vec![Binding {
                input: DeviceInput::Key(KeyCode::Escape),
                action: Action::PauseMenu,
                scale: 1.0,
                dead_zone: 0.0,
                context: Some(InputContext::Menu),
            }],
        };
        let mut service = ActionService::new(bindings);
        service.process_events(&[DeviceEvent::Key {
            key: KeyCode::Escape,
            pressed: true,
        }]);
        assert!(!service.is_action_pressed(Action::PauseMenu));

        service.push_context(InputContext::Menu);
        service.process_events(&[DeviceEvent::Key {
            key: KeyCode::Escape,
            pressed: true,
        }]);
        assert!(service.is_action_pressed(Action::PauseMenu));
    }

    #[test]
    fn pop_context_never_empties_the_stack() {
        let mut service = analog_service();
        service.pop_context();
        assert_eq!(service.active_context(), InputContext::Flight);
    }
}

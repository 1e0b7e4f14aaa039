//! Device event capture (HAL) and action resolution (dead-zone/scale,
//! context stack) for the input pipeline.

pub mod action;
pub mod binding;
pub mod error;
pub mod event;
pub mod hal;
pub mod ring_buffer;

pub use action::{Action, ActionService, InputContext};
pub use binding::{Binding, BindingConfig};
pub use error::{InputError, InputResult};
pub use event::{DeviceEvent, DeviceInput, GamepadAxis, GamepadButton, KeyCode};
pub use hal::{Hal, HalProducer, HalStats, DEFAULT_HAL_CAPACITY};
pub use ring_buffer::RingBuffer;

//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and board-specific implementations. The text display trait lives in
//! `carpet-display` and is re-exported here for convenience.

pub mod actuator;
pub mod motion;
pub mod sensor;
pub mod transport;

pub use actuator::{ActuatorError, BuzzerOutput, LedOutput, Rgb};
pub use carpet_display::{DisplayError, TextDisplay};
pub use motion::MotionInput;
pub use sensor::{EnvironmentSensor, PressureBus, SensorError};
pub use transport::{Transport, TransportError};

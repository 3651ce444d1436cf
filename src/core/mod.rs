//=========================================================================
// Core Subsystems
//=========================================================================
//
// All bridge logic lives here, independent of any host toolkit:
//
// - `message`   — toolkit-neutral window message model
// - `callbacks` — the stable callback contract + key-state encoding
// - `dispatch`  — message classification and callback invocation
// - `context`   — current-rendering-context tracking
// - `device`    — joystick poll bridge
// - `audio`     — audio pull bridge
//
// The host bindings in `crate::platform` implement the traits declared
// here (a `MessageSink` is fed by the window adapter; driver traits
// back `device` and `audio`). Core never names a concrete toolkit type.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod audio;
pub mod callbacks;
pub mod context;
pub mod device;
pub mod dispatch;
pub mod message;

//=== Public API ==========================================================

pub use audio::{AudioBackend, AudioOutput, AudioSpec, AudioStream, FillFn};
pub use callbacks::{KeyState, WindowCallbacks, BUTTON_PRIMARY, BUTTON_SECONDARY, BUTTON_TERTIARY};
pub use context::{ContextError, ContextRegistry, RenderContext};
pub use device::{DeviceEnumerator, DeviceSession, JoystickDevice, PollError};
pub use dispatch::{DispatchControl, MessageSink, WindowDispatcher};
pub use message::{Field, Message, MessageKind};

//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use mullion::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Message model and dispatch
pub use crate::core::dispatch::{DispatchControl, MessageSink, WindowDispatcher};
pub use crate::core::message::{Message, MessageKind};

// Callback contract
pub use crate::core::callbacks::{KeyState, WindowCallbacks};

// Rendering context tracking
pub use crate::core::context::{ContextError, ContextRegistry, RenderContext};

// Device poll bridge
pub use crate::core::device::{DeviceEnumerator, DeviceSession, JoystickDevice, PollError};

// Audio pull bridge
pub use crate::core::audio::{AudioBackend, AudioOutput, AudioSpec, AudioStream};

// Host bindings
pub use crate::platform::{HostShell, PlatformError, WindowHandle};

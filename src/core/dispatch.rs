//=========================================================================
// Window Message Dispatcher
//=========================================================================
//
// The event-dispatch layer: intercepts every message the host's message
// loop delivers to a window, classifies it, extracts and normalizes the
// typed fields it carries, and invokes the matching callback entry
// points.
//
// Architecture:
// ```text
//  Host message loop (UI thread)
//          ↓ one Message per delivery, in order
//     MessageSink::dispatch
//          ↓
//  WindowDispatcher ── classify by MessageKind
//          ├─ decode fields (best-effort, Option per field)
//          ├─ invoke WindowCallbacks methods
//          └─ return Forward | Consume
// ```
//
// Forwarding policy: every message continues to the host's default
// handling except a close request, which the `close` callback fully
// owns. The host binding interprets `Consume` as "skip default
// handling".
//
// Runs exclusively on the host's UI thread; dispatch calls never
// overlap for a given window, so the dispatcher holds no locks.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::callbacks::{KeyState, WindowCallbacks};
use super::message::{Message, MessageKind};

//=== DispatchControl =====================================================

/// Tells the host binding what to do after callback invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchControl {
    /// Continue to the host's default handling for this message.
    Forward,

    /// Suppress default handling; the callbacks own this message.
    Consume,
}

//=== MessageSink =========================================================

/// Receiver of the host's message stream.
///
/// The host windowing binding calls `dispatch` for every inbound
/// message, in delivery order, on the UI thread. Implementing this
/// trait rather than a concrete native base class keeps the dispatch
/// logic independent of any particular toolkit.
pub trait MessageSink {
    /// Processes one message and reports the forwarding decision.
    fn dispatch(&mut self, message: &Message) -> DispatchControl;
}

//=== WindowDispatcher ====================================================

/// Per-window dispatcher normalizing host messages into callbacks.
///
/// Owns the consumer-supplied [`WindowCallbacks`] value for its window
/// and threads every invocation through it. Decoding is best-effort:
/// a message missing a field a callback needs simply skips that
/// callback; dispatch itself never fails.
pub struct WindowDispatcher<C: WindowCallbacks> {
    callbacks: C,
}

impl<C: WindowCallbacks> WindowDispatcher<C> {
    /// Wraps the consumer's callback value.
    pub fn new(callbacks: C) -> Self {
        Self { callbacks }
    }

    /// Shared borrow of the callback value.
    pub fn callbacks(&self) -> &C {
        &self.callbacks
    }

    /// Exclusive borrow of the callback value.
    pub fn callbacks_mut(&mut self) -> &mut C {
        &mut self.callbacks
    }

    /// Unwraps back into the callback value.
    pub fn into_callbacks(self) -> C {
        self.callbacks
    }

    //--- Internal Helpers -------------------------------------------------

    /// Shared tail of the mouse-button and mouse-move cases: button
    /// messages carry the cursor position too, so both report it here.
    ///
    /// Coordinates must be strictly positive to fire the callback.
    /// Zero and negative positions (hosts with out-of-window tracking
    /// report these) are dropped, not clamped. Longstanding behavior
    /// the external runtime has come to rely on; do not "fix" without
    /// revisiting every consumer.
    fn report_cursor(&mut self, message: &Message) {
        if let Some((x, y)) = message.find_point("where") {
            if x > 0.0 && y > 0.0 {
                self.callbacks.mouse(x as u16, y as u16);
            }
        }
    }
}

impl<C: WindowCallbacks> MessageSink for WindowDispatcher<C> {
    fn dispatch(&mut self, message: &Message) -> DispatchControl {
        trace!(target: "dispatch", "Message: {:?}", message.what());

        match message.what() {
            //--- Lifecycle -----------------------------------------------
            //
            // The close callback owns shutdown. Default handling would
            // tear the native window down before the runtime decides,
            // so it is suppressed; the runtime destroys the window
            // explicitly when it is ready.
            //
            MessageKind::QuitRequested => {
                self.callbacks.close();
                return DispatchControl::Consume;
            }

            //--- Focus ---------------------------------------------------
            MessageKind::Activated => {
                if let Some(active) = message.find_bool("active") {
                    if active {
                        self.callbacks.focused();
                    } else {
                        self.callbacks.unfocused();
                    }
                }
            }

            //--- Minimize ------------------------------------------------
            MessageKind::Minimized => {
                if let Some(minimize) = message.find_bool("minimize") {
                    if minimize {
                        self.callbacks.hidden();
                    } else {
                        self.callbacks.visible();
                    }
                }
            }

            //--- Resize --------------------------------------------------
            MessageKind::Resized => {
                if let Some(width) = message.find_i32("width") {
                    if let Some(height) = message.find_i32("height") {
                        self.callbacks.size(width as u16, height as u16);
                    }
                }
            }

            //--- Key Down ------------------------------------------------
            //
            // A key-down carries two independently decodable facets: the
            // key code and the produced text. Each fires its own
            // callback; either, both, or neither may be present.
            // Repeat detection is presence-based: a repeat field on the
            // message means auto-repeat, whatever its value.
            //
            MessageKind::KeyDown | MessageKind::UnmappedKeyDown => {
                if let Some(key) = message.find_i32("key") {
                    let state = if message.find_i32("repeat").is_some() {
                        KeyState::Repeated
                    } else {
                        KeyState::Pressed
                    };
                    self.callbacks.key(key, state);
                }
                if let Some(bytes) = message.find_str("bytes") {
                    self.callbacks.chars(bytes);
                }
            }

            //--- Key Up --------------------------------------------------
            MessageKind::KeyUp | MessageKind::UnmappedKeyUp => {
                if let Some(key) = message.find_i32("key") {
                    self.callbacks.key(key, KeyState::Released);
                }
            }

            //--- Mouse Buttons -------------------------------------------
            //
            // Button messages fall through to the cursor report on
            // purpose: the host stamps the cursor position onto them,
            // and consumers expect a position update alongside the
            // mask change.
            //
            MessageKind::MouseDown | MessageKind::MouseUp => {
                if let Some(buttons) = message.find_i32("buttons") {
                    self.callbacks.buttons(buttons as u8);
                }
                self.report_cursor(message);
            }

            //--- Mouse Movement ------------------------------------------
            MessageKind::MouseMoved => {
                self.report_cursor(message);
            }

            //--- Scroll --------------------------------------------------
            //
            // Missing deltas default to zero rather than skipping the
            // callback; a one-axis wheel still reports.
            //
            MessageKind::WheelChanged => {
                let delta_y = message.find_f32("wheel_delta_y").unwrap_or(0.0);
                let delta_x = message.find_f32("wheel_delta_x").unwrap_or(0.0);
                self.callbacks.scroll(delta_y, delta_x);
            }

            //--- Everything Else -----------------------------------------
            MessageKind::Other(_) => {}
        }

        DispatchControl::Forward
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

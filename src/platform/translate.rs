//=========================================================================
// Event Translator
//=========================================================================
//
// Converts Winit window events into toolkit-neutral `Message`s for the
// dispatcher.
//
// Architecture:
//   Winit WindowEvent → EventTranslator → Message → MessageSink
//
// Stateful tracking: Winit reports mouse buttons as per-button
// transitions and cursor position only on move, while the message
// contract wants a full button bitmask and a cursor position stamped
// onto every button message. The translator caches both and applies
// them to subsequent events.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

//=== Internal Dependencies ===============================================

use crate::core::callbacks::{BUTTON_PRIMARY, BUTTON_SECONDARY, BUTTON_TERTIARY};
use crate::core::message::{Message, MessageKind};

//=== Key Code Mapping ====================================================

/// Maps a Winit physical key to the contract's i32 key code.
///
/// Letters and digits keep their ASCII values (so `KeyA` is 65); the
/// remaining mapped keys use their traditional control codes or a small
/// private range for the arrows. Unmapped keys return `None` and travel
/// as unmapped-key messages, which may still carry text.
fn key_code(key: PhysicalKey) -> Option<i32> {
    use WinitKeyCode::*;

    let code = match key {
        PhysicalKey::Code(code) => code,
        _ => return None,
    };

    Some(match code {
        //--- Digits ------------------------------------------------------
        Digit0 => 48, Digit1 => 49, Digit2 => 50, Digit3 => 51, Digit4 => 52,
        Digit5 => 53, Digit6 => 54, Digit7 => 55, Digit8 => 56, Digit9 => 57,

        //--- Letters (ASCII uppercase) ------------------------------------
        KeyA => 65, KeyB => 66, KeyC => 67, KeyD => 68, KeyE => 69,
        KeyF => 70, KeyG => 71, KeyH => 72, KeyI => 73, KeyJ => 74,
        KeyK => 75, KeyL => 76, KeyM => 77, KeyN => 78, KeyO => 79,
        KeyP => 80, KeyQ => 81, KeyR => 82, KeyS => 83, KeyT => 84,
        KeyU => 85, KeyV => 86, KeyW => 87, KeyX => 88, KeyY => 89,
        KeyZ => 90,

        //--- Specials -----------------------------------------------------
        Backspace => 8,
        Tab => 9,
        Enter => 13,
        Escape => 27,
        Space => 32,
        Delete => 127,

        //--- Arrows -------------------------------------------------------
        ArrowUp => 0x101,
        ArrowDown => 0x102,
        ArrowLeft => 0x103,
        ArrowRight => 0x104,

        //--- Unmapped -----------------------------------------------------
        _ => return None,
    })
}

//=== EventTranslator =====================================================

/// Builds contract messages from Winit events, tracking button mask and
/// cursor position across events.
pub(crate) struct EventTranslator {
    button_mask: u8,
    cursor: (f32, f32),
}

impl EventTranslator {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            button_mask: 0,
            cursor: (0.0, 0.0),
        }
    }

    #[cfg(test)]
    pub(crate) fn button_mask(&self) -> u8 {
        self.button_mask
    }

    //--- Lifecycle & Geometry ---------------------------------------------

    pub(crate) fn close_requested(&self) -> Message {
        Message::new(MessageKind::QuitRequested)
    }

    pub(crate) fn focus_changed(&self, active: bool) -> Message {
        Message::new(MessageKind::Activated).with_bool("active", active)
    }

    pub(crate) fn minimize_changed(&self, minimized: bool) -> Message {
        Message::new(MessageKind::Minimized).with_bool("minimize", minimized)
    }

    pub(crate) fn resized(&self, width: u32, height: u32) -> Message {
        Message::new(MessageKind::Resized)
            .with_i32("width", width as i32)
            .with_i32("height", height as i32)
    }

    //--- Keyboard ---------------------------------------------------------

    /// Translates one keyboard transition.
    ///
    /// A key Winit cannot map to a code becomes an unmapped-key message
    /// without a `key` field; the produced text (press only) rides
    /// along either way, so text entry works on exotic layouts.
    pub(crate) fn key_event(
        &self,
        physical_key: PhysicalKey,
        state: ElementState,
        repeat: bool,
        text: Option<&str>,
    ) -> Message {
        let code = key_code(physical_key);

        let kind = match (state, code.is_some()) {
            (ElementState::Pressed, true) => MessageKind::KeyDown,
            (ElementState::Pressed, false) => MessageKind::UnmappedKeyDown,
            (ElementState::Released, true) => MessageKind::KeyUp,
            (ElementState::Released, false) => MessageKind::UnmappedKeyUp,
        };

        let mut message = Message::new(kind);
        if let Some(code) = code {
            message = message.with_i32("key", code);
        }
        if state == ElementState::Pressed {
            if repeat {
                message = message.with_i32("repeat", 1);
            }
            if let Some(text) = text {
                message = message.with_str("bytes", text);
            }
        }
        message
    }

    //--- Mouse ------------------------------------------------------------

    /// Translates a button transition, updating the tracked mask.
    ///
    /// The last known cursor position is stamped onto the message so
    /// the dispatcher's shared button/move handling can report it.
    pub(crate) fn mouse_button(&mut self, button: WinitMouseButton, state: ElementState) -> Message {
        let bit = match button {
            WinitMouseButton::Left => BUTTON_PRIMARY,
            WinitMouseButton::Right => BUTTON_SECONDARY,
            WinitMouseButton::Middle => BUTTON_TERTIARY,
            // Side/thumb buttons have no bit in the contract mask.
            _ => 0,
        };

        let kind = match state {
            ElementState::Pressed => {
                self.button_mask |= bit;
                MessageKind::MouseDown
            }
            ElementState::Released => {
                self.button_mask &= !bit;
                MessageKind::MouseUp
            }
        };

        Message::new(kind)
            .with_i32("buttons", i32::from(self.button_mask))
            .with_point("where", self.cursor.0, self.cursor.1)
    }

    /// Translates a cursor move, updating the tracked position.
    pub(crate) fn cursor_moved(&mut self, x: f32, y: f32) -> Message {
        self.cursor = (x, y);
        Message::new(MessageKind::MouseMoved).with_point("where", x, y)
    }

    /// Translates a wheel movement. Line deltas pass through as-is;
    /// pixel deltas are forwarded in pixels.
    pub(crate) fn wheel(&self, delta: &MouseScrollDelta) -> Message {
        let (delta_x, delta_y) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (*x, *y),
            MouseScrollDelta::PixelDelta(position) => (position.x as f32, position.y as f32),
        };

        Message::new(MessageKind::WheelChanged)
            .with_f32("wheel_delta_y", delta_y)
            .with_f32("wheel_delta_x", delta_x)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

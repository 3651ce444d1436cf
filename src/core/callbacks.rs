//=========================================================================
// Window Callback Contract
//=========================================================================
//
// The stable, toolkit-agnostic callback surface the dispatcher invokes.
//
// The external runtime supplies one value implementing `WindowCallbacks`
// per window at creation time; it plays the role of the opaque caller
// context, threaded as the receiver through every invocation. The core
// never inspects it beyond calling these methods.
//
// All callbacks run synchronously on the host's UI thread, in message
// delivery order. A slow callback stalls the host's message loop.
//
//=========================================================================

//=== KeyState ============================================================

/// Normalized key transition, part of the callback contract.
///
/// The wire values are fixed: 0 = initial press, 1 = auto-repeated
/// press, 2 = release. Hosts report repeats in different ways; the
/// dispatcher folds them all into exactly these three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeyState {
    Pressed = 0,
    Repeated = 1,
    Released = 2,
}

impl KeyState {
    /// The contract's u8 encoding.
    pub fn code(self) -> u8 {
        self as u8
    }
}

//=== Button Mask Bits ====================================================

/// Primary (left) button bit in the `buttons` callback mask.
pub const BUTTON_PRIMARY: u8 = 0b001;

/// Secondary (right) button bit.
pub const BUTTON_SECONDARY: u8 = 0b010;

/// Tertiary (middle) button bit.
pub const BUTTON_TERTIARY: u8 = 0b100;

//=== WindowCallbacks =====================================================

/// Callback entry points invoked by the [`WindowDispatcher`].
///
/// Every method has a no-op default so consumers implement only the
/// events they care about. Argument widths are part of the contract and
/// must not be widened or narrowed by implementations.
///
/// # Shutdown ownership
///
/// [`close`](Self::close) fully owns window shutdown: the dispatcher
/// suppresses the host's default close handling, and nothing is torn
/// down unless this callback asks the host binding to destroy the
/// window.
///
/// [`WindowDispatcher`]: crate::core::dispatch::WindowDispatcher
pub trait WindowCallbacks {
    /// User or OS requested the window to close. Sole owner of shutdown.
    fn close(&mut self) {}

    /// Window gained focus.
    fn focused(&mut self) {}

    /// Window lost focus.
    fn unfocused(&mut self) {}

    /// Window was restored from minimized state.
    fn visible(&mut self) {}

    /// Window was minimized.
    fn hidden(&mut self) {}

    /// Window content area resized.
    fn size(&mut self, width: u16, height: u16) {
        let _ = (width, height);
    }

    /// Decoded text produced by a key press (UTF-8, may be multi-byte).
    fn chars(&mut self, text: &str) {
        let _ = text;
    }

    /// Key transition. `code` is the host key code; see [`KeyState`]
    /// for the state encoding.
    fn key(&mut self, code: i32, state: KeyState) {
        let _ = (code, state);
    }

    /// Mouse button mask changed. Bit layout: [`BUTTON_PRIMARY`],
    /// [`BUTTON_SECONDARY`], [`BUTTON_TERTIARY`].
    fn buttons(&mut self, mask: u8) {
        let _ = mask;
    }

    /// Cursor moved inside the window content area.
    fn mouse(&mut self, x: u16, y: u16) {
        let _ = (x, y);
    }

    /// Scroll wheel moved. Vertical delta first, matching the contract.
    fn scroll(&mut self, delta_y: f32, delta_x: f32) {
        let _ = (delta_y, delta_x);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

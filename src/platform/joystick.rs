//=========================================================================
// Joystick Driver (gilrs)
//=========================================================================
//
// gilrs-backed implementation of the device bridge traits.
//
// Mirroring the host driver model the bridge was built around, every
// enumerator and every opened device owns its own `Gilrs` instance;
// handles never share driver state. gilrs is event-pumped, so `refresh`
// drains its event queue to bring the cached gamepad state up to date,
// then the `read_*` methods sample that cache.
//
// Capability discovery happens once at open: the canonical axis/button
// lists are filtered down to what the gamepad actually reports, and
// those filtered lists define the counts and the read order for the
// rest of the session.
//
//=========================================================================

//=== External Dependencies ===============================================

use gilrs::{Axis, Button, GamepadId, Gilrs};
use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::device::{DeviceEnumerator, DeviceSession, JoystickDevice};

//=== Capability Tables ===================================================

/// Canonical axis order. A device's axis list (and therefore its axis
/// count and poll buffer layout) is this table filtered to what the
/// gamepad reports.
const AXES: [Axis; 6] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::LeftZ,
    Axis::RightStickX,
    Axis::RightStickY,
    Axis::RightZ,
];

/// Canonical button order, bit i of the poll mask = entry i here
/// (after filtering).
const BUTTONS: [Button; 15] = [
    Button::South,
    Button::East,
    Button::North,
    Button::West,
    Button::LeftTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::Mode,
    Button::LeftThumb,
    Button::RightThumb,
    Button::C,
    Button::Z,
];

//=== Value Conversion ====================================================

/// Scales a normalized axis value into the contract's i16 range.
fn axis_to_i16(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16
}

/// Folds the four D-pad directions into one hat value: 0 = centered,
/// then 1..8 clockwise from north.
fn hat_direction(up: bool, right: bool, down: bool, left: bool) -> u8 {
    match (up, right, down, left) {
        (true, false, false, false) => 1,
        (true, true, false, false) => 2,
        (false, true, false, false) => 3,
        (false, true, true, false) => 4,
        (false, false, true, false) => 5,
        (false, false, true, true) => 6,
        (false, false, false, true) => 7,
        (true, false, false, true) => 8,
        // Centered, or a contradictory combination the driver should
        // never report.
        _ => 0,
    }
}

//=== GilrsEnumerator =====================================================

/// Device iteration handle over the connected gamepad set.
pub struct GilrsEnumerator {
    gilrs: Gilrs,
}

impl GilrsEnumerator {
    /// Opens a driver instance for enumeration. `None` when the gilrs
    /// context cannot be created on this host.
    pub fn new() -> Option<Self> {
        let gilrs = Gilrs::new().ok()?;
        Some(Self { gilrs })
    }
}

impl DeviceEnumerator for GilrsEnumerator {
    fn device_count(&mut self) -> usize {
        self.gilrs.gamepads().count()
    }

    fn device_name(&mut self, index: usize, out: &mut String) -> bool {
        match self.gilrs.gamepads().nth(index) {
            Some((_, gamepad)) => {
                out.clear();
                out.push_str(gamepad.name());
                true
            }
            None => false,
        }
    }
}

//=== GilrsJoystick =======================================================

/// One opened gamepad with its capability lists latched.
pub struct GilrsJoystick {
    gilrs: Gilrs,
    id: GamepadId,
    axes: Vec<Axis>,
    buttons: Vec<Button>,
    has_hat: bool,
}

/// Opens the named device and wraps it in a [`DeviceSession`].
///
/// Returns `None` when no connected gamepad carries that name or the
/// driver context cannot be created (device absent or busy).
pub fn open(name: &str) -> Option<DeviceSession<GilrsJoystick>> {
    let gilrs = Gilrs::new().ok()?;
    let id = gilrs
        .gamepads()
        .find(|(_, gamepad)| gamepad.name() == name)
        .map(|(id, _)| id)?;

    let gamepad = gilrs.gamepad(id);
    let axes: Vec<Axis> = AXES
        .iter()
        .copied()
        .filter(|axis| gamepad.axis_code(*axis).is_some())
        .collect();
    let buttons: Vec<Button> = BUTTONS
        .iter()
        .copied()
        .filter(|button| gamepad.button_code(*button).is_some())
        .collect();
    let has_hat = gamepad.button_code(Button::DPadUp).is_some()
        || gamepad.axis_code(Axis::DPadX).is_some();

    debug!(target: "device", "Opened gamepad '{}'", name);
    Some(DeviceSession::new(GilrsJoystick {
        gilrs,
        id,
        axes,
        buttons,
        has_hat,
    }))
}

impl JoystickDevice for GilrsJoystick {
    fn axis_count(&self) -> usize {
        self.axes.len()
    }

    fn hat_count(&self) -> usize {
        usize::from(self.has_hat)
    }

    fn button_count(&self) -> usize {
        self.buttons.len()
    }

    fn refresh(&mut self) -> bool {
        // Pump the driver queue; gilrs updates its cached state as a
        // side effect of event consumption.
        while self.gilrs.next_event().is_some() {}
        self.gilrs.gamepad(self.id).is_connected()
    }

    fn read_axes(&mut self, out: &mut [i16]) -> bool {
        if out.len() != self.axes.len() {
            return false;
        }
        let gamepad = self.gilrs.gamepad(self.id);
        for (slot, axis) in out.iter_mut().zip(&self.axes) {
            *slot = axis_to_i16(gamepad.value(*axis));
        }
        true
    }

    fn read_hats(&mut self, out: &mut [u8]) -> bool {
        if out.len() != usize::from(self.has_hat) {
            return false;
        }
        if let Some(slot) = out.first_mut() {
            let gamepad = self.gilrs.gamepad(self.id);
            *slot = hat_direction(
                gamepad.is_pressed(Button::DPadUp),
                gamepad.is_pressed(Button::DPadRight),
                gamepad.is_pressed(Button::DPadDown),
                gamepad.is_pressed(Button::DPadLeft),
            );
        }
        true
    }

    fn read_buttons(&mut self) -> u32 {
        let gamepad = self.gilrs.gamepad(self.id);
        let mut mask = 0u32;
        for (bit, button) in self.buttons.iter().enumerate() {
            if gamepad.is_pressed(*button) {
                mask |= 1 << bit;
            }
        }
        mask
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

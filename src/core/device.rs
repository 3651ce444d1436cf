//=========================================================================
// Device Poll Bridge
//=========================================================================
//
// Polling-based joystick/gamepad bridge.
//
// The host driver is abstracted behind two traits: `DeviceEnumerator`
// (count + name-at-index, mirroring the host's iterator object) and
// `JoystickDevice` (one opened device). `DeviceSession` adds the logic:
// it latches the axis/hat/button counts once at open time, and `poll`
// performs the ordered refresh→axes→hats→buttons sub-reads with
// all-or-nothing failure semantics.
//
// Polling is blocking and synchronous with no timeout; it returns once
// the host driver responds. There is no cancellation for an in-flight
// poll.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== DeviceEnumerator ====================================================

/// Host-side enumeration of attached joystick devices.
///
/// Mirrors the host's iteration handle: a device count fixed at the
/// moment of the call, plus name lookup by index into a caller-owned
/// buffer.
pub trait DeviceEnumerator {
    /// Number of devices currently attached.
    fn device_count(&mut self) -> usize;

    /// Writes the human-readable name at `index` into `out`.
    ///
    /// Returns `false` (leaving `out` untouched) when `index` is out of
    /// range.
    fn device_name(&mut self, index: usize, out: &mut String) -> bool;
}

//=== JoystickDevice ======================================================

/// One opened joystick device, as the host driver exposes it.
///
/// The three counts must be stable for the device's lifetime; the
/// bridge latches them at open anyway and never asks again. The
/// `read_*` methods report the state captured by the last `refresh`.
pub trait JoystickDevice {
    fn axis_count(&self) -> usize;
    fn hat_count(&self) -> usize;
    fn button_count(&self) -> usize;

    /// Blocks until the driver has captured a fresh state snapshot.
    /// Returns `false` on driver failure (device unplugged, bus error).
    fn refresh(&mut self) -> bool;

    /// Copies the latest axis values into `out`. `false` on failure.
    fn read_axes(&mut self, out: &mut [i16]) -> bool;

    /// Copies the latest hat values into `out`. `false` on failure.
    fn read_hats(&mut self, out: &mut [u8]) -> bool;

    /// Latest button state as a bitmask. Cannot fail.
    fn read_buttons(&mut self) -> u32;
}

//=== PollError ===========================================================

/// Which sub-read aborted a poll.
///
/// Any failure aborts the whole poll; the button mask is only written
/// when every earlier sub-read succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollError {
    /// The state refresh itself failed.
    Refresh,

    /// Axis values could not be read.
    Axes,

    /// Hat values could not be read.
    Hats,
}

impl std::fmt::Display for PollError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Refresh => write!(f, "Device state refresh failed"),
            Self::Axes => write!(f, "Axis read failed"),
            Self::Hats => write!(f, "Hat read failed"),
        }
    }
}

impl std::error::Error for PollError {}

//=== DeviceSession =======================================================

/// An opened device with its counts latched.
///
/// The counts reported by the session never change after open, whatever
/// the underlying driver later claims; callers size their poll buffers
/// from these once and reuse them.
pub struct DeviceSession<D: JoystickDevice> {
    device: D,
    axes: usize,
    hats: usize,
    buttons: usize,
}

impl<D: JoystickDevice> DeviceSession<D> {
    //--- Construction -----------------------------------------------------

    /// Wraps a freshly opened device, latching its counts.
    pub fn new(device: D) -> Self {
        let session = Self {
            axes: device.axis_count(),
            hats: device.hat_count(),
            buttons: device.button_count(),
            device,
        };
        debug!(
            target: "device",
            "Device opened: {} axes, {} hats, {} buttons",
            session.axes, session.hats, session.buttons
        );
        session
    }

    //--- Latched Counts ---------------------------------------------------

    pub fn axis_count(&self) -> usize {
        self.axes
    }

    pub fn hat_count(&self) -> usize {
        self.hats
    }

    pub fn button_count(&self) -> usize {
        self.buttons
    }

    //--- Polling ----------------------------------------------------------

    /// One blocking refresh of the device state into caller buffers.
    ///
    /// `axes` and `hats` must be sized exactly to the latched counts.
    /// Sub-reads run in fixed order: refresh, axes, hats; the first
    /// failure aborts the poll and `buttons` is left unwritten. The
    /// button mask is read last and unconditionally once the first two
    /// sub-reads succeed.
    ///
    /// # Errors
    ///
    /// [`PollError`] naming the sub-read that failed.
    pub fn poll(
        &mut self,
        axes: &mut [i16],
        hats: &mut [u8],
        buttons: &mut u32,
    ) -> Result<(), PollError> {
        debug_assert_eq!(axes.len(), self.axes, "Axis buffer must match latched count");
        debug_assert_eq!(hats.len(), self.hats, "Hat buffer must match latched count");

        if !self.device.refresh() {
            return Err(PollError::Refresh);
        }
        if !self.device.read_axes(axes) {
            return Err(PollError::Axes);
        }
        if !self.device.read_hats(hats) {
            return Err(PollError::Hats);
        }

        *buttons = self.device.read_buttons();
        Ok(())
    }

    //--- Teardown ---------------------------------------------------------

    /// Releases the device back to the host driver.
    pub fn close(self) -> D {
        debug!(target: "device", "Device closed");
        self.device
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Scripted Test Double ---------------------------------------------

    struct ScriptedDevice {
        axes: usize,
        hats: usize,
        buttons: usize,
        refresh_ok: bool,
        axes_ok: bool,
        hats_ok: bool,
        button_mask: u32,
        refreshes: usize,
    }

    impl ScriptedDevice {
        fn healthy() -> Self {
            Self {
                axes: 2,
                hats: 1,
                buttons: 8,
                refresh_ok: true,
                axes_ok: true,
                hats_ok: true,
                button_mask: 0b1010,
                refreshes: 0,
            }
        }
    }

    impl JoystickDevice for ScriptedDevice {
        fn axis_count(&self) -> usize {
            self.axes
        }
        fn hat_count(&self) -> usize {
            self.hats
        }
        fn button_count(&self) -> usize {
            self.buttons
        }
        fn refresh(&mut self) -> bool {
            self.refreshes += 1;
            self.refresh_ok
        }
        fn read_axes(&mut self, out: &mut [i16]) -> bool {
            if self.axes_ok {
                out.fill(7);
            }
            self.axes_ok
        }
        fn read_hats(&mut self, out: &mut [u8]) -> bool {
            if self.hats_ok {
                out.fill(3);
            }
            self.hats_ok
        }
        fn read_buttons(&mut self) -> u32 {
            self.button_mask
        }
    }

    //=====================================================================
    // Counts
    //=====================================================================

    #[test]
    fn counts_are_latched_at_open() {
        let session = DeviceSession::new(ScriptedDevice::healthy());

        assert_eq!(session.axis_count(), 2);
        assert_eq!(session.hat_count(), 1);
        assert_eq!(session.button_count(), 8);
    }

    #[test]
    fn counts_survive_driver_changing_its_mind() {
        let mut session = DeviceSession::new(ScriptedDevice::healthy());

        // Driver misbehaves after open; latched counts must not move.
        session.device.axes = 99;
        session.device.buttons = 0;

        assert_eq!(session.axis_count(), 2, "Counts are fixed for the session lifetime");
        assert_eq!(session.button_count(), 8);
    }

    //=====================================================================
    // Polling
    //=====================================================================

    #[test]
    fn successful_poll_fills_all_buffers() {
        let mut session = DeviceSession::new(ScriptedDevice::healthy());
        let mut axes = [0i16; 2];
        let mut hats = [0u8; 1];
        let mut buttons = 0u32;

        session
            .poll(&mut axes, &mut hats, &mut buttons)
            .expect("Healthy device polls cleanly");

        assert_eq!(axes, [7, 7]);
        assert_eq!(hats, [3]);
        assert_eq!(buttons, 0b1010);
    }

    #[test]
    fn refresh_failure_aborts_without_writing_buttons() {
        let mut device = ScriptedDevice::healthy();
        device.refresh_ok = false;
        let mut session = DeviceSession::new(device);

        let mut axes = [0i16; 2];
        let mut hats = [0u8; 1];
        let mut buttons = 0xffff_ffffu32;

        assert_eq!(
            session.poll(&mut axes, &mut hats, &mut buttons),
            Err(PollError::Refresh)
        );
        assert_eq!(buttons, 0xffff_ffff, "Button buffer untouched on early failure");
    }

    #[test]
    fn axis_failure_aborts_before_hats() {
        let mut device = ScriptedDevice::healthy();
        device.axes_ok = false;
        let mut session = DeviceSession::new(device);

        let mut axes = [0i16; 2];
        let mut hats = [0u8; 1];
        let mut buttons = 0u32;

        assert_eq!(
            session.poll(&mut axes, &mut hats, &mut buttons),
            Err(PollError::Axes)
        );
        assert_eq!(hats, [0], "Hat read must not run after an axis failure");
    }

    #[test]
    fn hat_failure_aborts_before_buttons() {
        let mut device = ScriptedDevice::healthy();
        device.hats_ok = false;
        let mut session = DeviceSession::new(device);

        let mut axes = [0i16; 2];
        let mut hats = [0u8; 1];
        let mut buttons = 7u32;

        assert_eq!(
            session.poll(&mut axes, &mut hats, &mut buttons),
            Err(PollError::Hats)
        );
        assert_eq!(buttons, 7, "Button buffer untouched when hats fail");
    }

    #[test]
    fn each_poll_refreshes_once() {
        let mut session = DeviceSession::new(ScriptedDevice::healthy());
        let mut axes = [0i16; 2];
        let mut hats = [0u8; 1];
        let mut buttons = 0u32;

        for _ in 0..3 {
            session.poll(&mut axes, &mut hats, &mut buttons).unwrap();
        }

        assert_eq!(session.device.refreshes, 3);
    }

    #[test]
    fn close_returns_the_device() {
        let session = DeviceSession::new(ScriptedDevice::healthy());
        let device = session.close();
        assert_eq!(device.button_mask, 0b1010);
    }

    //=====================================================================
    // Enumeration
    //=====================================================================

    struct ScriptedEnumerator {
        names: Vec<&'static str>,
    }

    impl DeviceEnumerator for ScriptedEnumerator {
        fn device_count(&mut self) -> usize {
            self.names.len()
        }

        fn device_name(&mut self, index: usize, out: &mut String) -> bool {
            match self.names.get(index) {
                Some(name) => {
                    out.clear();
                    out.push_str(name);
                    true
                }
                None => false,
            }
        }
    }

    #[test]
    fn enumerator_names_devices_by_index() {
        let mut roster = ScriptedEnumerator {
            names: vec!["pad-a", "pad-b"],
        };
        let mut name = String::new();

        assert_eq!(roster.device_count(), 2);
        assert!(roster.device_name(1, &mut name));
        assert_eq!(name, "pad-b");
    }

    #[test]
    fn enumerator_leaves_buffer_untouched_past_the_end() {
        let mut roster = ScriptedEnumerator { names: vec![] };
        let mut name = String::from("unchanged");

        assert!(!roster.device_name(0, &mut name));
        assert_eq!(name, "unchanged", "Out-of-range lookup must not write");
    }
}

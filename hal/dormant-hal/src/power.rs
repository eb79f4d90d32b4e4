//! Power control and wake status abstractions

/// Raw wake status captured at start-up
///
/// These bits are cleared by reconfiguring the wake sources, so a snapshot
/// must be taken before anything else touches the RTC or power controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WakeFlags {
    /// Execution resumed from standby (as opposed to reset or power-on)
    pub standby: bool,
    /// The wake-up pin was asserted
    pub wakeup_pin: bool,
    /// The periodic RTC wake-up timer expired
    pub rtc_wakeup: bool,
    /// RTC alarm channel A matched
    pub alarm_a: bool,
    /// RTC alarm channel B matched
    pub alarm_b: bool,
    /// The tamper input was asserted
    pub tamper: bool,
    /// The backup domain kept its contents (calendar still initialised)
    pub backup_retained: bool,
}

/// Whether a USB/debug interface is attached
///
/// Deep power states stop the clocks the interface needs, so every wait
/// and the final standby entry take this into account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebugLink {
    /// Host connected; stay in run/sleep modes only
    Attached,
    /// No host; stop and standby modes allowed
    Detached,
}

impl DebugLink {
    /// Classify from a VBUS-style sense line
    pub fn from_sense(present: bool) -> Self {
        if present {
            DebugLink::Attached
        } else {
            DebugLink::Detached
        }
    }

    /// Check if the interface is attached
    pub fn is_attached(self) -> bool {
        self == DebugLink::Attached
    }
}

/// Power controller
pub trait PowerControl {
    /// Snapshot of the wake status bits
    fn wake_flags(&self) -> WakeFlags;

    /// Current state of the debug/USB link
    fn debug_link(&self) -> DebugLink;

    /// Power down the USB peripheral to save current
    fn suspend_usb(&mut self);

    /// Enter standby
    ///
    /// On hardware this never returns: the next wake event restarts the
    /// program from reset. Test doubles record the call and return.
    fn enter_standby(&mut self);
}

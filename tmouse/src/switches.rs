//! Mechanical switch aggregation.
//!
//! Every logical input is a [`SwitchContact`]: a normally-open and a
//! normally-closed line sampled together. A valid reading has exactly one of
//! the two lines active; anything else is treated as a sensing fault.

use embassy_time::Instant;
use embedded_hal::digital::InputPin;
use heapless::Vec;

use crate::config::SwitchConfig;
use crate::debounce::{ContactDebouncer, ContactState, DebounceState, Reading};
use crate::error::Error;

/// Mouse buttons, in HID button order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
}

/// Bits of the button mask that are real HID buttons. Scroll contacts sit
/// above them and never reach the host as buttons.
pub const HID_BUTTONS: u8 = ContactRole::Button(MouseButton::Left).mask()
    | ContactRole::Button(MouseButton::Right).mask()
    | ContactRole::Button(MouseButton::Middle).mask()
    | ContactRole::Button(MouseButton::Back).mask()
    | ContactRole::Button(MouseButton::Forward).mask();

/// What a contact does when it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ContactRole {
    Button(MouseButton),
    ScrollUp,
    ScrollDown,
}

impl ContactRole {
    /// Bit of this contact in the report's button mask.
    pub const fn mask(self) -> u8 {
        match self {
            ContactRole::Button(MouseButton::Left) => 1 << 0,
            ContactRole::Button(MouseButton::Right) => 1 << 1,
            ContactRole::Button(MouseButton::Middle) => 1 << 2,
            ContactRole::Button(MouseButton::Back) => 1 << 3,
            ContactRole::Button(MouseButton::Forward) => 1 << 4,
            ContactRole::ScrollUp => 1 << 5,
            ContactRole::ScrollDown => 1 << 6,
        }
    }

    /// Scroll ticks added by one accepted press.
    pub const fn scroll_ticks(self) -> i32 {
        match self {
            ContactRole::ScrollUp => 1,
            ContactRole::ScrollDown => -1,
            ContactRole::Button(_) => 0,
        }
    }
}

/// The two sense lines of one switch.
pub struct ContactPins<In: InputPin> {
    pub no: In,
    pub nc: In,
}

impl<In: InputPin> ContactPins<In> {
    pub fn new(no: In, nc: In) -> Self {
        Self { no, nc }
    }
}

/// One debounced switch.
pub struct SwitchContact<In: InputPin> {
    pins: ContactPins<In>,
    role: ContactRole,
    debouncer: ContactDebouncer,
}

impl<In: InputPin> SwitchContact<In> {
    pub fn new(pins: ContactPins<In>, role: ContactRole, config: &SwitchConfig) -> Self {
        Self {
            pins,
            role,
            debouncer: ContactDebouncer::new(config.debounce_hold),
        }
    }

    pub fn role(&self) -> ContactRole {
        self.role
    }

    pub fn state(&self) -> ContactState {
        self.debouncer.state()
    }

    pub fn pressed(&self) -> bool {
        self.debouncer.pressed()
    }

    pub fn last_transition(&self) -> Option<Instant> {
        self.debouncer.last_transition()
    }

    fn sample(&mut self, low_active: bool) -> Reading {
        let no = line_active(&mut self.pins.no, low_active);
        let nc = line_active(&mut self.pins.nc, low_active);
        match (no, nc) {
            (Some(no), Some(nc)) => Reading::from_lines(no, nc),
            _ => Reading::Contradictory,
        }
    }
}

fn line_active<In: InputPin>(pin: &mut In, low_active: bool) -> Option<bool> {
    let level = if low_active { pin.is_low() } else { pin.is_high() };
    level.ok()
}

/// A debounced change of one contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchEvent {
    /// Index of the contact in the aggregator
    pub contact: u8,
    pub role: ContactRole,
    pub pressed: bool,
}

/// Samples and debounces a fixed set of contacts.
pub struct SwitchAggregator<In: InputPin, const N: usize> {
    contacts: [SwitchContact<In>; N],
    low_active: bool,
    scroll: i32,
    faults: u32,
}

impl<In: InputPin, const N: usize> SwitchAggregator<In, N> {
    pub fn new(contacts: [(ContactPins<In>, ContactRole); N], config: &SwitchConfig) -> Self {
        Self {
            contacts: contacts.map(|(pins, role)| SwitchContact::new(pins, role, config)),
            low_active: config.low_active,
            scroll: 0,
            faults: 0,
        }
    }

    /// Sample every contact once and return the transitions accepted at `now`.
    pub fn scan(&mut self, now: Instant) -> Vec<SwitchEvent, N> {
        let mut events = Vec::new();

        for (idx, contact) in self.contacts.iter_mut().enumerate() {
            let reading = contact.sample(self.low_active);
            match contact.debouncer.update(reading, now) {
                DebounceState::Debounced => {
                    let pressed = contact.pressed();
                    if pressed {
                        self.scroll = self.scroll.saturating_add(contact.role.scroll_ticks());
                    }
                    debug!("Contact {} ({:?}) pressed: {}", idx, contact.role, pressed);
                    // At most one event per contact per scan
                    let _ = events.push(SwitchEvent {
                        contact: idx as u8,
                        role: contact.role,
                        pressed,
                    });
                }
                DebounceState::Faulted => {
                    self.faults = self.faults.wrapping_add(1);
                    error!("Contact {}: NO/NC lines disagree, transition discarded", idx);
                }
                DebounceState::InProgress | DebounceState::Ignored => {}
            }
        }

        events
    }

    /// Debounced button mask, scroll contacts included.
    pub fn buttons(&self) -> u8 {
        self.contacts
            .iter()
            .filter(|c| c.pressed())
            .fold(0, |mask, c| mask | c.role.mask())
    }

    /// Scroll ticks accumulated since the last call, resetting the counter.
    pub fn take_scroll(&mut self) -> i16 {
        let ticks = self.scroll.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        self.scroll = 0;
        ticks
    }

    /// Number of fault episodes seen so far.
    pub fn fault_count(&self) -> u32 {
        self.faults
    }

    /// First contact currently in a fault state, if any.
    pub fn check(&self) -> Result<(), Error> {
        match self
            .contacts
            .iter()
            .position(|c| matches!(c.state(), ContactState::Fault { .. }))
        {
            Some(contact) => Err(Error::SwitchFault { contact: contact as u8 }),
            None => Ok(()),
        }
    }

    pub fn contacts(&self) -> &[SwitchContact<In>; N] {
        &self.contacts
    }
}

/// The two auxiliary configuration-select lines.
///
/// They are read once at startup and combined into an index into a
/// caller-owned table, see [`crate::config::MouseConfig::select_preset`].
pub struct ConfigSelect<In: InputPin> {
    lines: [In; 2],
    low_active: bool,
}

impl<In: InputPin> ConfigSelect<In> {
    pub fn new(line0: In, line1: In, low_active: bool) -> Self {
        Self {
            lines: [line0, line1],
            low_active,
        }
    }

    /// 2-bit index, line 0 is the low bit. Unreadable lines count as inactive.
    pub fn read(&mut self) -> u8 {
        let mut index = 0;
        for (bit, line) in self.lines.iter_mut().enumerate() {
            match line_active(line, self.low_active) {
                Some(true) => index |= 1 << bit,
                Some(false) => {}
                None => warn!("Config select line {} unreadable, treating as inactive", bit),
            }
        }
        index
    }

    pub fn release(self) -> [In; 2] {
        self.lines
    }
}

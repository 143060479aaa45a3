use embassy_time::Instant;

pub mod contact_debouncer;

pub use contact_debouncer::ContactDebouncer;

/// One sample of a NO/NC contact pair, already decoded from line levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    Pressed,
    Released,
    /// Both lines active, both inactive, or a line could not be read
    Contradictory,
}

impl Reading {
    /// Decode the activity of the normally-open and normally-closed lines.
    pub fn from_lines(no_active: bool, nc_active: bool) -> Self {
        match (no_active, nc_active) {
            (true, false) => Reading::Pressed,
            (false, true) => Reading::Released,
            _ => Reading::Contradictory,
        }
    }
}

/// Logical state of one contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactState {
    Open,
    Closed,
    /// A differing reading is being held. `pressed` is the logical state,
    /// which doesn't change until the hold completes.
    Bouncing { pressed: bool, since: Instant },
    /// Lines disagree. `pressed` is the logical state kept through the fault.
    Fault { pressed: bool },
}

impl ContactState {
    pub fn stable(pressed: bool) -> Self {
        if pressed { ContactState::Closed } else { ContactState::Open }
    }

    /// Debounced logical state.
    pub fn pressed(&self) -> bool {
        match *self {
            ContactState::Open => false,
            ContactState::Closed => true,
            ContactState::Bouncing { pressed, .. } | ContactState::Fault { pressed } => pressed,
        }
    }
}

/// Debounce state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceState {
    /// The logical state just changed
    Debounced,
    InProgress,
    Ignored,
    /// A new fault episode started
    Faulted,
}

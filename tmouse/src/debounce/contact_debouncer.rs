use embassy_time::{Duration, Instant};

use super::{ContactState, DebounceState, Reading};

/// Hold-time debouncer for a single NO/NC contact.
///
/// A reading that differs from the logical state has to be seen without
/// interruption for `hold` before the logical state follows it.
#[derive(Debug, Clone, Copy)]
pub struct ContactDebouncer {
    state: ContactState,
    hold: Duration,
    last_transition: Option<Instant>,
}

impl ContactDebouncer {
    pub fn new(hold: Duration) -> Self {
        Self {
            state: ContactState::Open,
            hold,
            last_transition: None,
        }
    }

    pub fn state(&self) -> ContactState {
        self.state
    }

    pub fn pressed(&self) -> bool {
        self.state.pressed()
    }

    /// When the logical state last changed.
    pub fn last_transition(&self) -> Option<Instant> {
        self.last_transition
    }

    pub fn update(&mut self, reading: Reading, now: Instant) -> DebounceState {
        let pressed = self.state.pressed();

        let sampled = match reading {
            Reading::Pressed => true,
            Reading::Released => false,
            Reading::Contradictory => {
                // Pending transition is dropped, the logical state is kept
                return match self.state {
                    ContactState::Fault { .. } => DebounceState::Ignored,
                    _ => {
                        self.state = ContactState::Fault { pressed };
                        DebounceState::Faulted
                    }
                };
            }
        };

        // Physical state matches the logical state, nothing to debounce
        if sampled == pressed {
            self.state = ContactState::stable(pressed);
            return DebounceState::Ignored;
        }

        let since = match self.state {
            ContactState::Bouncing { since, .. } => since,
            _ => {
                self.state = ContactState::Bouncing { pressed, since: now };
                now
            }
        };

        if now.saturating_duration_since(since) >= self.hold {
            self.state = ContactState::stable(sampled);
            self.last_transition = Some(now);
            DebounceState::Debounced
        } else {
            DebounceState::InProgress
        }
    }
}

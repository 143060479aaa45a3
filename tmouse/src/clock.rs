use embassy_time::Instant;

/// Monotonic time source for debouncing and cycle pacing.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The embassy-time driver clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

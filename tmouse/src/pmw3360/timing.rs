//! SPI timing guards for the PMW3360.
//!
//! The sensor needs a minimum quiet time between two transactions, and the
//! amount depends on what the previous and the next transaction are. Waiting
//! the worst case every time would slow the motion path down, so the guard
//! remembers the last access and charges only the gap that sequence needs.

use embedded_hal::delay::DelayNs;

// SPI timing constants (from PMW3360 datasheet), in microseconds
/// NCS falling edge to first SCLK edge
pub const T_NCS_SCLK_US: u32 = 15;
/// Last SCLK edge to NCS rising edge, write transactions
pub const T_SCLK_NCS_WR_US: u32 = 35;
/// Write to write
pub const T_SWW_US: u32 = 180;
/// Write to read
pub const T_SWR_US: u32 = 160;
/// Read to write
pub const T_SRW_US: u32 = 20;
/// Read to read
pub const T_SRR_US: u32 = 20;
/// Address to data, single register read
pub const T_SRAD_US: u32 = 160;
/// Address to data, motion burst
pub const T_SRAD_MOTBR_US: u32 = 35;
/// Byte to byte separation during the SROM download burst
pub const T_BRSEP_US: u32 = 15;

/// Direction of a completed bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    Read,
    Write,
}

/// Quiet time the bus owes between `prev` and `next`.
pub const fn inter_transaction_us(prev: Access, next: Access) -> u32 {
    match (prev, next) {
        (Access::Write, Access::Write) => T_SWW_US,
        (Access::Write, Access::Read) => T_SWR_US,
        (Access::Read, Access::Write) => T_SRW_US,
        (Access::Read, Access::Read) => T_SRR_US,
    }
}

/// Guarded delay: an injectable [`DelayNs`] plus the memory of the last
/// access, so every transaction starts with exactly the gap it owes.
pub struct BusTiming<D: DelayNs> {
    delay: D,
    last: Option<Access>,
}

impl<D: DelayNs> BusTiming<D> {
    pub fn new(delay: D) -> Self {
        Self { delay, last: None }
    }

    /// Wait the gap owed by the previous transaction before starting `next`.
    pub fn guard(&mut self, next: Access) {
        if let Some(prev) = self.last.take() {
            self.delay.delay_us(inter_transaction_us(prev, next));
        }
    }

    /// Record that a transaction of kind `access` just released the bus.
    pub fn complete(&mut self, access: Access) {
        self.last = Some(access);
    }

    /// Busy-wait a fixed protocol delay inside a transaction.
    pub fn wait_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    /// Busy-wait a settle period between transactions. A settle at least as
    /// long as the largest gap already pays whatever the last access owed.
    pub fn settle_us(&mut self, us: u32) {
        self.delay.delay_us(us);
        if us >= T_SWW_US {
            self.last = None;
        }
    }

    pub fn last(&self) -> Option<Access> {
        self.last
    }

    /// Give back the wrapped delay.
    pub fn release(self) -> D {
        self.delay
    }
}

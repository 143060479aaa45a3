//! Register-level bus transactions.
//!
//! [`RegisterBus`] is the capability the rest of the sensor code is written
//! against. [`SpiRegisterBus`] implements it on top of the blocking
//! `embedded-hal` SPI bus, a chip-select pin and a busy-wait delay.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::register::Register;
use super::timing::{Access, BusTiming, T_BRSEP_US, T_NCS_SCLK_US, T_SCLK_NCS_WR_US, T_SRAD_MOTBR_US, T_SRAD_US};
use crate::error::Error;

const SPI_WRITE: u8 = 0x80; // BIT(7)
const SPI_ADDR_MASK: u8 = 0x7f;

/// Register access to the motion sensor.
///
/// Every method is one complete transaction: it blocks for the timing the
/// sensor needs and never leaves the bus half way through a frame.
pub trait RegisterBus {
    /// Read one register.
    fn read_register(&mut self, register: Register) -> Result<u8, Error>;

    /// Write one register. Read-only registers are rejected without a bus
    /// transaction.
    fn write_register(&mut self, register: Register, value: u8) -> Result<(), Error>;

    /// Stream `data` to `register` in a single continuous transaction, with
    /// the SROM byte separation after each byte.
    fn burst_write(&mut self, register: Register, data: &[u8]) -> Result<(), Error>;

    /// Stream `buf.len()` bytes from `register` in a single continuous
    /// transaction, using the short motion-burst address-to-data delay.
    fn burst_read(&mut self, register: Register, buf: &mut [u8]) -> Result<(), Error>;

    /// Busy-wait a protocol settle period outside any transaction.
    fn settle_us(&mut self, us: u32);
}

/// PMW3360 bus engine using embedded-hal SPI traits.
pub struct SpiRegisterBus<SPI, CS, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    spi: SPI,
    cs: CS,
    timing: BusTiming<D>,
    /// Set while chip-select is asserted. Stays set if releasing it failed,
    /// until the next transaction manages to release it.
    open: bool,
}

impl<SPI, CS, D> SpiRegisterBus<SPI, CS, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    /// Create the bus engine. Chip-select is driven high (idle) right away.
    pub fn new(spi: SPI, mut cs: CS, delay: D) -> Self {
        let open = cs.set_high().is_err();
        Self {
            spi,
            cs,
            timing: BusTiming::new(delay),
            open,
        }
    }

    /// Give back the wrapped peripherals.
    pub fn release(self) -> (SPI, CS, D) {
        (self.spi, self.cs, self.timing.release())
    }

    /// Run `frame` inside one chip-select window.
    ///
    /// The gap owed by the previous transaction is paid first, chip-select is
    /// released even when the frame fails, and the access is recorded so the
    /// next transaction pays the right gap.
    fn transaction<R>(
        &mut self,
        access: Access,
        frame: impl FnOnce(&mut SPI, &mut BusTiming<D>) -> Result<R, SPI::Error>,
    ) -> Result<R, Error> {
        if self.open {
            if self.cs.set_high().is_err() {
                error!("PMW3360: transaction started while chip-select is still asserted");
                return Err(Error::BusTimingViolation);
            }
            // Nothing is known about the aborted frame, owe the longest gap
            warn!("PMW3360: chip-select released late");
            self.open = false;
            self.timing.complete(Access::Write);
        }

        self.timing.guard(access);

        self.cs.set_low().map_err(|_| Error::ChipSelect)?;
        self.open = true;
        self.timing.wait_us(T_NCS_SCLK_US);

        let result = frame(&mut self.spi, &mut self.timing).and_then(|r| self.spi.flush().map(|_| r));

        if self.cs.set_high().is_err() {
            error!("PMW3360: failed to release chip-select");
            return Err(Error::ChipSelect);
        }
        self.open = false;
        self.timing.complete(access);

        result.map_err(Error::spi)
    }
}

impl<SPI, CS, D> RegisterBus for SpiRegisterBus<SPI, CS, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    fn read_register(&mut self, register: Register) -> Result<u8, Error> {
        let value = self.transaction(Access::Read, |spi, timing| {
            // Send address with read bit (bit 7 = 0)
            spi.write(&[register.addr() & SPI_ADDR_MASK])?;
            spi.flush()?;
            timing.wait_us(T_SRAD_US);

            let mut value = [0u8];
            spi.read(&mut value)?;
            Ok(value[0])
        })?;

        trace!("PMW3360: read {:?} = {:#x}", register, value);
        Ok(value)
    }

    fn write_register(&mut self, register: Register, value: u8) -> Result<(), Error> {
        if !register.is_writable() {
            warn!("PMW3360: refusing to write read-only register {:?}", register);
            return Err(Error::ReadOnlyRegister(register));
        }

        self.transaction(Access::Write, |spi, timing| {
            // Send address with write bit (bit 7 = 1)
            spi.write(&[register.addr() | SPI_WRITE, value])?;
            spi.flush()?;
            timing.wait_us(T_SCLK_NCS_WR_US);
            Ok(())
        })?;

        trace!("PMW3360: write {:?} <- {:#x}", register, value);
        Ok(())
    }

    fn burst_write(&mut self, register: Register, data: &[u8]) -> Result<(), Error> {
        if !register.is_writable() {
            return Err(Error::ReadOnlyRegister(register));
        }

        self.transaction(Access::Write, |spi, timing| {
            spi.write(&[register.addr() | SPI_WRITE])?;
            spi.flush()?;
            timing.wait_us(T_BRSEP_US);

            for &byte in data {
                spi.write(&[byte])?;
                spi.flush()?;
                timing.wait_us(T_BRSEP_US);
            }
            Ok(())
        })?;

        debug!("PMW3360: burst wrote {} bytes to {:?}", data.len(), register);
        Ok(())
    }

    fn burst_read(&mut self, register: Register, buf: &mut [u8]) -> Result<(), Error> {
        self.transaction(Access::Read, |spi, timing| {
            spi.write(&[register.addr() & SPI_ADDR_MASK])?;
            spi.flush()?;
            timing.wait_us(T_SRAD_MOTBR_US);

            spi.read(buf)
        })
    }

    fn settle_us(&mut self, us: u32) {
        self.timing.settle_us(us);
    }
}

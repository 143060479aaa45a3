//! Crate-wide error type.
//!
//! All variants carry only `Copy` data so the type works without `alloc` and
//! can be logged through `defmt` on target.

use crate::pmw3360::register::Register;
use crate::pmw3360::session::SessionState;

/// Errors produced by the sensor session, the bus engine and the switch
/// aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A transaction was started while the previous one never released
    /// chip-select. The protocol state of the sensor can't be trusted.
    BusTimingViolation,
    /// SPI transfer error reported by the HAL
    Spi(embedded_hal::spi::ErrorKind),
    /// Chip-select pin could not be driven
    ChipSelect,
    /// Attempted write to a register the sensor only allows reading
    ReadOnlyRegister(Register),
    /// Product ID or its inverse did not match after the firmware upload
    SignatureMismatch { product_id: u8, inverse: u8 },
    /// SROM image rejected
    FirmwareUploadFailure(FirmwareFault),
    /// Sensor operation attempted outside `SessionState::Ready`
    NotReady(SessionState),
    /// Contradictory NO/NC reading on the contact with this index
    SwitchFault { contact: u8 },
}

/// Why a firmware upload was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FirmwareFault {
    /// The image contains no bytes
    EmptyImage,
    /// The SROM ID read back after the download differs from the image's own ID
    SromIdMismatch { expected: u8, actual: u8 },
}

impl From<FirmwareFault> for Error {
    fn from(fault: FirmwareFault) -> Self {
        Error::FirmwareUploadFailure(fault)
    }
}

impl Error {
    /// Wrap a HAL SPI error, keeping only its portable kind.
    pub(crate) fn spi<E: embedded_hal::spi::Error>(e: E) -> Self {
        Error::Spi(e.kind())
    }
}

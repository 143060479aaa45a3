//! SROM firmware download.

use super::bus::RegisterBus;
use super::register::Register;
use crate::error::{Error, FirmwareFault};

/// SROM_Enable value that initialises the download logic
const SROM_ENABLE_INIT: u8 = 0x1d;
/// SROM_Enable value that starts the download
const SROM_ENABLE_START: u8 = 0x18;
/// Settle between the two SROM_Enable writes
const SROM_INIT_SETTLE_US: u32 = 10_000;
/// Settle after the last image byte before the SROM ID can be read
const SROM_EXIT_SETTLE_US: u32 = 200;

/// Download `image` into the sensor's SROM and check that it was accepted.
///
/// The second byte of every PMW3360 SROM image is the image's own ID, which
/// the sensor reports through `SROM_ID` once it runs the new firmware. The
/// downloaded ID is returned.
pub fn load_firmware<B: RegisterBus>(bus: &mut B, image: &[u8]) -> Result<u8, Error> {
    if image.is_empty() {
        error!("PMW3360: refusing to upload an empty SROM image");
        return Err(FirmwareFault::EmptyImage.into());
    }

    let expected = image.get(1).copied();
    match expected {
        Some(id) => info!("PMW3360: Uploading SROM firmware with SROM-Id {:#04x}", id),
        None => warn!("PMW3360: SROM image has no ID byte, skipping ID check"),
    }

    // Disable REST mode
    bus.write_register(Register::Config2, 0x00)?;

    bus.write_register(Register::SromEnable, SROM_ENABLE_INIT)?;
    bus.settle_us(SROM_INIT_SETTLE_US);
    bus.write_register(Register::SromEnable, SROM_ENABLE_START)?;

    bus.burst_write(Register::SromLoadBurst, image)?;
    bus.settle_us(SROM_EXIT_SETTLE_US);

    let actual = bus.read_register(Register::SromId)?;
    if let Some(expected) = expected {
        if actual != expected {
            error!(
                "PMW3360: SROM Firmware upload failed, expected SROM-Id {:#04x}, but got {:#04x} from the sensor",
                expected, actual
            );
            return Err(FirmwareFault::SromIdMismatch { expected, actual }.into());
        }
    }
    info!("PMW3360: Upload successful, new SROM-Id: {:#04x}", actual);

    bus.write_register(Register::Config2, 0x00)?;

    Ok(actual)
}

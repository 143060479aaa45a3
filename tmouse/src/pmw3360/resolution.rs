//! CPI resolution encoding.

use super::bus::RegisterBus;
use super::register::Register;
use crate::error::Error;

// Resolution constants
pub const RES_STEP: u16 = 100;
pub const RES_MIN: u16 = 100;
pub const RES_MAX: u16 = 12000;

/// A CPI request after clamping, together with its Config1 encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResolutionSetting {
    /// Effective resolution, a multiple of 100 in `RES_MIN..=RES_MAX`
    pub cpi: u16,
    /// Value written to Config1
    pub register_value: u8,
}

impl ResolutionSetting {
    /// Clamp `cpi` to the sensor range and round it to the nearest step.
    pub fn from_cpi(cpi: u16) -> Self {
        let clamped = cpi.clamp(RES_MIN, RES_MAX);
        let steps = ((clamped + RES_STEP / 2) / RES_STEP).clamp(RES_MIN / RES_STEP, RES_MAX / RES_STEP);
        Self {
            cpi: steps * RES_STEP,
            register_value: (steps - 1) as u8,
        }
    }

    /// Decode a Config1 value read back from the sensor.
    pub fn from_register(value: u8) -> Self {
        let steps = (value as u16 + 1).min(RES_MAX / RES_STEP);
        Self {
            cpi: steps * RES_STEP,
            register_value: (steps - 1) as u8,
        }
    }
}

pub(crate) fn write_resolution<B: RegisterBus>(bus: &mut B, cpi: u16) -> Result<ResolutionSetting, Error> {
    let setting = ResolutionSetting::from_cpi(cpi);
    if setting.cpi != cpi {
        debug!("PMW3360: Requested {} CPI, using {} CPI", cpi, setting.cpi);
    }

    bus.write_register(Register::Config1, setting.register_value)?;

    debug!("PMW3360: Resolution set to {} CPI", setting.cpi);

    Ok(setting)
}

pub(crate) fn read_resolution<B: RegisterBus>(bus: &mut B) -> Result<ResolutionSetting, Error> {
    let value = bus.read_register(Register::Config1)?;
    Ok(ResolutionSetting::from_register(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_steps() {
        assert_eq!(
            ResolutionSetting::from_cpi(1600),
            ResolutionSetting {
                cpi: 1600,
                register_value: 15
            }
        );
        assert_eq!(ResolutionSetting::from_cpi(100).register_value, 0);
        assert_eq!(ResolutionSetting::from_cpi(12000).register_value, 119);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(ResolutionSetting::from_cpi(0).cpi, 100);
        assert_eq!(ResolutionSetting::from_cpi(50).register_value, 0);
        assert_eq!(ResolutionSetting::from_cpi(20000).cpi, 12000);
        assert_eq!(ResolutionSetting::from_cpi(u16::MAX).register_value, 119);
    }

    #[test]
    fn test_rounds_to_nearest_step() {
        assert_eq!(ResolutionSetting::from_cpi(849).cpi, 800);
        assert_eq!(ResolutionSetting::from_cpi(850).cpi, 900);
        assert_eq!(ResolutionSetting::from_cpi(11990).cpi, 12000);
    }

    #[test]
    fn test_register_decode() {
        assert_eq!(ResolutionSetting::from_register(15).cpi, 1600);
        assert_eq!(ResolutionSetting::from_register(0).cpi, 100);
        // Out of range values saturate at the top step
        assert_eq!(ResolutionSetting::from_register(0xff).cpi, 12000);
    }
}

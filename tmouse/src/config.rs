//! Static configuration for the whole device.

use embassy_time::Duration;

pub use crate::pmw3360::SensorConfig;

/// Default debounce hold for every contact
pub const DEFAULT_DEBOUNCE_HOLD_MS: u64 = 5;
/// Default report period, 1000 Hz
pub const DEFAULT_POLL_INTERVAL_US: u64 = 1000;

/// Top level configuration
#[derive(Clone, Debug)]
pub struct MouseConfig {
    pub sensor: SensorConfig,
    pub switches: SwitchConfig,
    pub report: ReportConfig,
    pub poll: PollConfig,
    /// Resolutions chosen by the two configuration-select lines
    pub cpi_presets: [u16; 4],
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            sensor: SensorConfig::default(),
            switches: SwitchConfig::default(),
            report: ReportConfig::default(),
            poll: PollConfig::default(),
            cpi_presets: [400, 800, 1600, 3200],
        }
    }
}

impl MouseConfig {
    /// Use the preset picked by the selector lines as the sensor resolution.
    /// Indices past the table are wrapped into it.
    pub fn select_preset(&mut self, index: u8) {
        let cpi = self.cpi_presets[index as usize % self.cpi_presets.len()];
        info!("Selected CPI preset {}: {} CPI", index, cpi);
        self.sensor.res_cpi = cpi;
    }
}

/// Switch sampling configuration
#[derive(Clone, Copy, Debug)]
pub struct SwitchConfig {
    /// How long a changed reading has to be stable before it is accepted
    pub debounce_hold: Duration,
    /// Lines read low when active
    pub low_active: bool,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            debounce_hold: Duration::from_millis(DEFAULT_DEBOUNCE_HOLD_MS),
            low_active: true,
        }
    }
}

/// Orientation transform applied to sensor motion
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportConfig {
    /// Invert X axis
    pub invert_x: bool,
    /// Invert Y axis
    pub invert_y: bool,
    /// Swap X and Y axes
    pub swap_xy: bool,
}

/// Poll loop configuration
#[derive(Clone, Copy, Debug)]
pub struct PollConfig {
    /// Period between two reports
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_micros(DEFAULT_POLL_INTERVAL_US),
        }
    }
}

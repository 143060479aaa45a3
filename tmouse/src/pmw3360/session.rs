//! PMW3360 lifecycle.
//!
//! A [`SensorSession`] owns the register bus and walks the sensor through
//! power-up reset, firmware download and identity check. Motion and
//! resolution calls are only accepted once the session is
//! [`SessionState::Ready`].

use super::bus::RegisterBus;
use super::burst::{self, MotionPacket};
use super::register::Register;
use super::resolution::{self, ResolutionSetting};
use super::{FW_SIG_INV_PID, FW_SIG_PID, POWER_UP_RESET_VAL, RESET_DELAY_US, SHUTDOWN_VAL};
use crate::error::Error;

/// Config2 bit that lets the sensor drop into rest modes
const CONFIG2_REST_EN: u8 = 0x20;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    Uninitialized,
    Resetting,
    FirmwareLoading,
    Verifying,
    Ready,
    /// The last `begin()` failed. Only a new `begin()` leaves this state.
    Faulted,
}

/// Sensor settings applied at the end of every successful `begin()`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    /// CPI resolution (100-12000, step 100)
    pub res_cpi: u16,
    /// rot_trans_angle (-127 to 127)
    pub rot_trans_angle: i8,
    /// liftoff distance
    pub liftoff_dist: u8,
    /// Allow the sensor to enter its rest modes
    pub rest_mode: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            res_cpi: 1600,
            rot_trans_angle: 0,
            liftoff_dist: 0x02,
            rest_mode: false,
        }
    }
}

/// One PMW3360 behind a [`RegisterBus`].
pub struct SensorSession<B: RegisterBus> {
    bus: B,
    config: SensorConfig,
    state: SessionState,
    in_burst: bool,
    srom_id: Option<u8>,
    revision_id: Option<u8>,
}

impl<B: RegisterBus> SensorSession<B> {
    pub fn new(bus: B, config: SensorConfig) -> Self {
        Self {
            bus,
            config,
            state: SessionState::Uninitialized,
            in_burst: false,
            srom_id: None,
            revision_id: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// SROM ID reported after the last successful download.
    pub fn srom_id(&self) -> Option<u8> {
        self.srom_id
    }

    /// Revision ID read during the last successful `begin()`.
    pub fn revision_id(&self) -> Option<u8> {
        self.revision_id
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Borrow the underlying bus.
    pub fn bus(&mut self) -> &mut B {
        // Raw access leaves burst mode
        self.in_burst = false;
        &mut self.bus
    }

    /// Tear the session down and give the bus back.
    pub fn release(self) -> B {
        self.bus
    }

    /// Reset the sensor, download `image` and verify the sensor identity.
    ///
    /// On success the session is `Ready`. On any error it is `Faulted` and
    /// the error is returned. Nothing is retried.
    pub fn begin(&mut self, image: &[u8]) -> Result<(), Error> {
        self.in_burst = false;
        self.srom_id = None;
        self.revision_id = None;

        match self.bring_up(image) {
            Ok(()) => {
                self.state = SessionState::Ready;
                info!("PMW3360 initialized successfully");
                Ok(())
            }
            Err(e) => {
                error!("PMW3360: initialization failed in {:?}: {:?}", self.state, e);
                self.state = SessionState::Faulted;
                Err(e)
            }
        }
    }

    fn bring_up(&mut self, image: &[u8]) -> Result<(), Error> {
        self.state = SessionState::Resetting;
        self.bus.write_register(Register::PowerUpReset, POWER_UP_RESET_VAL)?;
        self.bus.settle_us(RESET_DELAY_US);

        // Read motion registers to clear them
        self.bus.read_register(Register::Motion)?;
        self.bus.read_register(Register::DeltaXL)?;
        self.bus.read_register(Register::DeltaXH)?;
        self.bus.read_register(Register::DeltaYL)?;
        self.bus.read_register(Register::DeltaYH)?;

        self.state = SessionState::FirmwareLoading;
        self.srom_id = Some(super::srom::load_firmware(&mut self.bus, image)?);

        self.state = SessionState::Verifying;
        self.check_fw_signature()?;
        let revision_id = self.bus.read_register(Register::RevisionId)?;
        info!("PMW3360 detected, revision ID: {:#04x}", revision_id);
        self.revision_id = Some(revision_id);

        self.configure()
    }

    /// Self check firmware signature of the sensor
    fn check_fw_signature(&mut self) -> Result<(), Error> {
        let product_id = self.bus.read_register(Register::ProductId)?;
        let inverse = self.bus.read_register(Register::InverseProductId)?;

        if product_id == FW_SIG_PID && inverse == FW_SIG_INV_PID {
            Ok(())
        } else {
            error!(
                "Firmware signature check failed, expected: {}, {} got: {}, {}",
                FW_SIG_PID, FW_SIG_INV_PID, product_id, inverse
            );
            Err(Error::SignatureMismatch { product_id, inverse })
        }
    }

    fn configure(&mut self) -> Result<(), Error> {
        resolution::write_resolution(&mut self.bus, self.config.res_cpi)?;

        let config2 = if self.config.rest_mode { CONFIG2_REST_EN } else { 0x00 };
        self.bus.write_register(Register::Config2, config2)?;

        self.bus.write_register(Register::AngleTune, self.config.rot_trans_angle as u8)?;
        debug!("PMW3360: Rotational transform angle set to {}", self.config.rot_trans_angle);

        self.bus.write_register(Register::LiftConfig, self.config.liftoff_dist)?;
        debug!("PMW3360: Liftoff distance set to {}", self.config.liftoff_dist);

        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), Error> {
        match self.state {
            SessionState::Ready => Ok(()),
            state => Err(Error::NotReady(state)),
        }
    }

    /// Read one motion burst.
    pub fn read_burst(&mut self) -> Result<MotionPacket, Error> {
        self.ensure_ready()?;
        burst::read_burst(&mut self.bus, &mut self.in_burst)
    }

    /// Set sensor resolution, clamped to 100-12000 CPI in steps of 100.
    pub fn set_resolution(&mut self, cpi: u16) -> Result<ResolutionSetting, Error> {
        self.ensure_ready()?;
        self.in_burst = false;
        let setting = resolution::write_resolution(&mut self.bus, cpi)?;
        self.config.res_cpi = setting.cpi;
        Ok(setting)
    }

    /// Resolution currently programmed into the sensor, in CPI.
    pub fn read_resolution(&mut self) -> Result<u16, Error> {
        self.ensure_ready()?;
        self.in_burst = false;
        Ok(resolution::read_resolution(&mut self.bus)?.cpi)
    }

    /// Put the sensor into shutdown. A new `begin()` is needed afterwards.
    pub fn shutdown(&mut self) -> Result<(), Error> {
        self.in_burst = false;
        let result = self.bus.write_register(Register::Shutdown, SHUTDOWN_VAL);
        self.state = SessionState::Uninitialized;
        self.srom_id = None;
        self.revision_id = None;
        info!("PMW3360: shut down");
        result
    }
}

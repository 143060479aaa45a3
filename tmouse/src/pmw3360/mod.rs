//! PMW3360 optical motion sensor.
//!
//! Layered bottom up: [`register`] and [`timing`] describe the wire protocol,
//! [`bus`] runs single transactions, [`srom`], [`burst`] and [`resolution`]
//! build the sensor procedures on top of it and [`session`] ties them into a
//! lifecycle.

pub mod burst;
pub mod bus;
pub mod register;
pub mod resolution;
pub mod session;
pub mod srom;
pub mod timing;

pub use burst::MotionPacket;
pub use bus::{RegisterBus, SpiRegisterBus};
pub use register::Register;
pub use resolution::ResolutionSetting;
pub use session::{SensorConfig, SensorSession, SessionState};

// Sensor constants
pub const PRODUCT_ID_PMW3360: u8 = 0x42;
pub const POWER_UP_RESET_VAL: u8 = 0x5a;
pub const SHUTDOWN_VAL: u8 = 0xb6;
/// Settle after power-up reset
pub const RESET_DELAY_US: u32 = 50_000;

// Firmware signature
pub const FW_SIG_PID: u8 = PRODUCT_ID_PMW3360;
pub const FW_SIG_INV_PID: u8 = 0xbd;

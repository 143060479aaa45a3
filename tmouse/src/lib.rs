#![doc = include_str!("../../README.md")]
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod clock;
pub mod config;
pub mod debounce;
pub mod error;
pub mod pmw3360;
pub mod poll;
pub mod report;
pub mod switches;

pub use clock::{Clock, SystemClock};
pub use config::{MouseConfig, PollConfig, ReportConfig, SwitchConfig};
pub use error::{Error, FirmwareFault};
pub use pmw3360::{MotionPacket, RegisterBus, SensorConfig, SensorSession, SessionState, SpiRegisterBus};
pub use poll::{CycleStats, CycleTiming, PollLoop};
pub use report::{InputReport, ReportComposer, ReportTransport};
pub use switches::{ConfigSelect, ContactPins, ContactRole, HID_BUTTONS, MouseButton, SwitchAggregator, SwitchEvent};

//! PMW3360 register map.
//!
//! The table is part of the wire contract: addresses are fixed by the sensor
//! and are not configurable.

/// How the sensor allows a register to be accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

/// Every register address the PMW3360 exposes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    ProductId = 0x00,
    RevisionId = 0x01,
    Motion = 0x02,
    DeltaXL = 0x03,
    DeltaXH = 0x04,
    DeltaYL = 0x05,
    DeltaYH = 0x06,
    Squal = 0x07,
    RawDataSum = 0x08,
    MaximumRawData = 0x09,
    MinimumRawData = 0x0a,
    ShutterLower = 0x0b,
    ShutterUpper = 0x0c,
    Control = 0x0d,
    Config1 = 0x0f,
    Config2 = 0x10,
    AngleTune = 0x11,
    FrameCapture = 0x12,
    SromEnable = 0x13,
    RunDownshift = 0x14,
    Rest1RateLower = 0x15,
    Rest1RateUpper = 0x16,
    Rest1Downshift = 0x17,
    Rest2RateLower = 0x18,
    Rest2RateUpper = 0x19,
    Rest2Downshift = 0x1a,
    Rest3RateLower = 0x1b,
    Rest3RateUpper = 0x1c,
    Observation = 0x24,
    DataOutLower = 0x25,
    DataOutUpper = 0x26,
    RawDataDump = 0x29,
    SromId = 0x2a,
    MinSqRun = 0x2b,
    RawDataThreshold = 0x2c,
    Config5 = 0x2f,
    PowerUpReset = 0x3a,
    Shutdown = 0x3b,
    InverseProductId = 0x3f,
    LiftCutoffTune3 = 0x41,
    AngleSnap = 0x42,
    LiftCutoffTune1 = 0x4a,
    MotionBurst = 0x50,
    LiftCutoffTuneTimeout = 0x58,
    LiftCutoffTuneMinLength = 0x5a,
    SromLoadBurst = 0x62,
    LiftConfig = 0x63,
    RawDataBurst = 0x64,
    LiftCutoffTune2 = 0x65,
}

impl Register {
    /// The full map in address order.
    pub const ALL: [Register; 49] = [
        Register::ProductId,
        Register::RevisionId,
        Register::Motion,
        Register::DeltaXL,
        Register::DeltaXH,
        Register::DeltaYL,
        Register::DeltaYH,
        Register::Squal,
        Register::RawDataSum,
        Register::MaximumRawData,
        Register::MinimumRawData,
        Register::ShutterLower,
        Register::ShutterUpper,
        Register::Control,
        Register::Config1,
        Register::Config2,
        Register::AngleTune,
        Register::FrameCapture,
        Register::SromEnable,
        Register::RunDownshift,
        Register::Rest1RateLower,
        Register::Rest1RateUpper,
        Register::Rest1Downshift,
        Register::Rest2RateLower,
        Register::Rest2RateUpper,
        Register::Rest2Downshift,
        Register::Rest3RateLower,
        Register::Rest3RateUpper,
        Register::Observation,
        Register::DataOutLower,
        Register::DataOutUpper,
        Register::RawDataDump,
        Register::SromId,
        Register::MinSqRun,
        Register::RawDataThreshold,
        Register::Config5,
        Register::PowerUpReset,
        Register::Shutdown,
        Register::InverseProductId,
        Register::LiftCutoffTune3,
        Register::AngleSnap,
        Register::LiftCutoffTune1,
        Register::MotionBurst,
        Register::LiftCutoffTuneTimeout,
        Register::LiftCutoffTuneMinLength,
        Register::SromLoadBurst,
        Register::LiftConfig,
        Register::RawDataBurst,
        Register::LiftCutoffTune2,
    ];

    /// 7-bit register address.
    pub const fn addr(self) -> u8 {
        self as u8
    }

    pub const fn access(self) -> Access {
        match self {
            Register::ProductId
            | Register::RevisionId
            | Register::DeltaXL
            | Register::DeltaXH
            | Register::DeltaYL
            | Register::DeltaYH
            | Register::Squal
            | Register::RawDataSum
            | Register::MaximumRawData
            | Register::MinimumRawData
            | Register::ShutterLower
            | Register::ShutterUpper
            | Register::DataOutLower
            | Register::DataOutUpper
            | Register::SromId
            | Register::InverseProductId
            | Register::RawDataBurst => Access::ReadOnly,
            Register::SromEnable | Register::PowerUpReset | Register::Shutdown | Register::SromLoadBurst => {
                Access::WriteOnly
            }
            _ => Access::ReadWrite,
        }
    }

    pub const fn is_writable(self) -> bool {
        !matches!(self.access(), Access::ReadOnly)
    }

    pub const fn is_readable(self) -> bool {
        !matches!(self.access(), Access::WriteOnly)
    }
}

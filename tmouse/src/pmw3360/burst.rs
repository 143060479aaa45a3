//! Motion burst reads.
//!
//! The sensor exposes every motion register in a single continuous read of
//! `Motion_Burst`. Reading it in one transaction keeps the deltas consistent
//! with each other, which separate register reads can't guarantee.

use super::bus::RegisterBus;
use super::register::Register;
use crate::error::Error;

/// Bytes read per burst
pub const BURST_DATA_LEN: usize = 12;

// Burst data offsets
const BURST_MOTION: usize = 0;
const BURST_OBSERVATION: usize = 1;
const BURST_DELTA_X_L: usize = 2;
const BURST_DELTA_X_H: usize = 3;
const BURST_DELTA_Y_L: usize = 4;
const BURST_DELTA_Y_H: usize = 5;
const BURST_SQUAL: usize = 6;
const BURST_RAW_DATA_SUM: usize = 7;
const BURST_MAX_RAW_DATA: usize = 8;
const BURST_MIN_RAW_DATA: usize = 9;
const BURST_SHUTTER_UPPER: usize = 10;
const BURST_SHUTTER_LOWER: usize = 11;

// Motion register bits
pub const MOTION_STATUS_MOTION: u8 = 0x80;
pub const MOTION_STATUS_LIFTED: u8 = 0x08;
/// Reserved bits, always zero in a well formed burst
const MOTION_STATUS_RESERVED: u8 = 0b111;

/// Everything one burst read returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionPacket {
    /// Raw Motion register
    pub status: u8,
    pub observation: u8,
    /// Raw X delta, valid only together with the motion flag
    pub dx: i16,
    /// Raw Y delta, valid only together with the motion flag
    pub dy: i16,
    /// Surface quality
    pub squal: u8,
    pub raw_data_sum: u8,
    pub max_raw_data: u8,
    pub min_raw_data: u8,
    pub shutter: u16,
}

impl MotionPacket {
    /// Decode the burst bytes in wire order.
    pub fn parse(data: &[u8; BURST_DATA_LEN]) -> Self {
        Self {
            status: data[BURST_MOTION],
            observation: data[BURST_OBSERVATION],
            dx: i16::from_le_bytes([data[BURST_DELTA_X_L], data[BURST_DELTA_X_H]]),
            dy: i16::from_le_bytes([data[BURST_DELTA_Y_L], data[BURST_DELTA_Y_H]]),
            squal: data[BURST_SQUAL],
            raw_data_sum: data[BURST_RAW_DATA_SUM],
            max_raw_data: data[BURST_MAX_RAW_DATA],
            min_raw_data: data[BURST_MIN_RAW_DATA],
            shutter: u16::from_be_bytes([data[BURST_SHUTTER_UPPER], data[BURST_SHUTTER_LOWER]]),
        }
    }

    pub fn has_motion(&self) -> bool {
        self.status & MOTION_STATUS_MOTION != 0
    }

    pub fn is_lifted(&self) -> bool {
        self.status & MOTION_STATUS_LIFTED != 0
    }

    /// Deltas that count towards a report. Zero unless the motion flag is set,
    /// the sensor is on the surface and the stream is in sync.
    pub fn motion(&self) -> (i16, i16) {
        if self.has_motion() && !self.is_lifted() && !self.is_desynced() {
            (self.dx, self.dy)
        } else {
            (0, 0)
        }
    }

    /// Reserved status bits are set: the burst stream lost sync.
    pub(crate) fn is_desynced(&self) -> bool {
        self.status & MOTION_STATUS_RESERVED != 0
    }
}

/// Read one motion burst. `in_burst` tracks whether burst mode is armed and is
/// cleared when the burst has to be re-armed on the next read.
pub(crate) fn read_burst<B: RegisterBus>(bus: &mut B, in_burst: &mut bool) -> Result<MotionPacket, Error> {
    if !*in_burst {
        bus.write_register(Register::MotionBurst, 0x00)?;
        *in_burst = true;
    }

    let mut burst_data = [0u8; BURST_DATA_LEN];
    if let Err(e) = bus.burst_read(Register::MotionBurst, &mut burst_data) {
        *in_burst = false;
        return Err(e);
    }

    trace!("PMW3360: Burst raw data {:?}", burst_data);

    let packet = MotionPacket::parse(&burst_data);
    // Recover on the next read, sometimes burst mode works weird
    if packet.is_desynced() {
        debug!("PMW3360: Burst panic recovery");
        *in_burst = false;
    }

    Ok(packet)
}

#![allow(dead_code)]

use std::cell::Cell;
use std::convert::Infallible;

use embassy_time::{Duration, Instant};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};
use tmouse::pmw3360::register::Register;
use tmouse::{Clock, ContactPins, Error, InputReport, ReportTransport};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// A small but well formed SROM image, its ID byte is 0x04.
pub const TEST_IMAGE: [u8; 8] = [0x01, 0x04, 0x8e, 0x96, 0x6e, 0x77, 0x3e, 0xfe];

/// Register-level model of a PMW3360.
///
/// Motion is set from the test and cleared by every burst read. The SROM ID
/// becomes visible once an image was streamed to SROM_Load_Burst.
pub struct SimSensor {
    pub regs: [u8; 128],
    pub motion: bool,
    pub lifted: bool,
    pub dx: i16,
    pub dy: i16,
    /// Report this SROM ID after a download instead of the image's own
    pub srom_id_override: Option<u8>,
    /// Every bus call fails with this error
    pub fail: Option<Error>,
    pub burst_armed: bool,
    /// The next burst returns a desynchronised stream
    pub desync_next: bool,
    pub burst_arms: u32,
    pub burst_reads: u32,
    pub writes: Vec<(Register, u8)>,
    pub srom_uploads: Vec<Vec<u8>>,
    pub settled_us: u64,
    pub shut_down: bool,
}

impl SimSensor {
    pub fn new() -> Self {
        let mut sensor = Self {
            regs: [0; 128],
            motion: false,
            lifted: false,
            dx: 0,
            dy: 0,
            srom_id_override: None,
            fail: None,
            burst_armed: false,
            desync_next: false,
            burst_arms: 0,
            burst_reads: 0,
            writes: Vec::new(),
            srom_uploads: Vec::new(),
            settled_us: 0,
            shut_down: false,
        };
        sensor.power_on_defaults();
        sensor
    }

    fn power_on_defaults(&mut self) {
        self.regs = [0; 128];
        self.set(Register::ProductId, 0x42);
        self.set(Register::RevisionId, 0x01);
        self.set(Register::InverseProductId, 0xbd);
        self.set(Register::Config1, 0x31);
        self.set(Register::Squal, 0x30);
        self.motion = false;
        self.lifted = false;
        self.dx = 0;
        self.dy = 0;
        self.burst_armed = false;
    }

    pub fn set(&mut self, register: Register, value: u8) {
        self.regs[register.addr() as usize] = value;
    }

    pub fn get(&self, register: Register) -> u8 {
        self.regs[register.addr() as usize]
    }

    /// Pending motion, with the motion flag set.
    pub fn move_by(&mut self, dx: i16, dy: i16) {
        self.motion = true;
        self.dx = dx;
        self.dy = dy;
    }

    /// Delta registers hold data but the motion flag is clear.
    pub fn stale_deltas(&mut self, dx: i16, dy: i16) {
        self.motion = false;
        self.dx = dx;
        self.dy = dy;
    }

    fn status(&self) -> u8 {
        let mut status = 0x20;
        if self.motion {
            status |= 0x80;
        }
        if self.lifted {
            status |= 0x08;
        }
        status
    }

    fn value(&self, register: Register) -> u8 {
        let [dxl, dxh] = self.dx.to_le_bytes();
        let [dyl, dyh] = self.dy.to_le_bytes();
        match register {
            Register::Motion => self.status(),
            Register::DeltaXL => dxl,
            Register::DeltaXH => dxh,
            Register::DeltaYL => dyl,
            Register::DeltaYH => dyh,
            r if !r.is_readable() => 0,
            r => self.get(r),
        }
    }

    fn check(&self) -> Result<(), Error> {
        match self.fail {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl tmouse::RegisterBus for SimSensor {
    fn read_register(&mut self, register: Register) -> Result<u8, Error> {
        self.check()?;
        if register != Register::MotionBurst {
            self.burst_armed = false;
        }
        Ok(self.value(register))
    }

    fn write_register(&mut self, register: Register, value: u8) -> Result<(), Error> {
        self.check()?;
        if !register.is_writable() {
            return Err(Error::ReadOnlyRegister(register));
        }
        self.writes.push((register, value));
        self.burst_armed = false;

        match register {
            Register::PowerUpReset if value == 0x5a => self.power_on_defaults(),
            Register::Shutdown if value == 0xb6 => self.shut_down = true,
            Register::MotionBurst => {
                self.burst_armed = true;
                self.burst_arms += 1;
            }
            r if r.is_readable() => self.set(r, value),
            _ => {}
        }
        Ok(())
    }

    fn burst_write(&mut self, register: Register, data: &[u8]) -> Result<(), Error> {
        self.check()?;
        if register == Register::SromLoadBurst {
            self.srom_uploads.push(data.to_vec());
            let id = self.srom_id_override.or(data.get(1).copied()).unwrap_or(0);
            self.set(Register::SromId, id);
        }
        Ok(())
    }

    fn burst_read(&mut self, register: Register, buf: &mut [u8]) -> Result<(), Error> {
        self.check()?;
        assert_eq!(register, Register::MotionBurst);
        // An unarmed burst returns a desynchronised stream
        let status = if self.burst_armed && !self.desync_next {
            self.status()
        } else {
            0x07
        };
        self.desync_next = false;
        let [dxl, dxh] = self.dx.to_le_bytes();
        let [dyl, dyh] = self.dy.to_le_bytes();
        let data = [
            status,
            self.get(Register::Observation),
            dxl,
            dxh,
            dyl,
            dyh,
            self.get(Register::Squal),
            self.get(Register::RawDataSum),
            self.get(Register::MaximumRawData),
            self.get(Register::MinimumRawData),
            self.get(Register::ShutterUpper),
            self.get(Register::ShutterLower),
        ];
        let n = buf.len().min(data.len());
        buf[..n].copy_from_slice(&data[..n]);

        self.burst_reads += 1;
        self.motion = false;
        self.dx = 0;
        self.dy = 0;
        Ok(())
    }

    fn settle_us(&mut self, us: u32) {
        self.settled_us += us as u64;
    }
}

/// Manually advanced time, usable both as the clock and as the busy-wait
/// delay of the poll loop.
#[derive(Default)]
pub struct SimTime {
    ns: Cell<u64>,
}

impl SimTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        self.ns.set(self.ns.get() + duration.as_micros() * 1000);
    }

    pub fn now_us(&self) -> u64 {
        self.ns.get() / 1000
    }
}

impl Clock for SimTime {
    fn now(&self) -> Instant {
        Instant::from_micros(self.now_us())
    }
}

impl DelayNs for &SimTime {
    fn delay_ns(&mut self, ns: u32) {
        self.ns.set(self.ns.get() + ns as u64);
    }
}

/// Records every delay the bus engine asks for, in microseconds.
#[derive(Default)]
pub struct RecordingDelay {
    pub waits_us: Vec<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits_us.push(ns / 1000);
    }
}

/// Input line whose level is a shared cell.
#[derive(Clone, Copy)]
pub struct TestPin<'a> {
    high: &'a Cell<bool>,
}

impl ErrorType for TestPin<'_> {
    type Error = Infallible;
}

impl InputPin for TestPin<'_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high.get())
    }
}

/// NO/NC line pair of one low-active switch.
pub struct SwitchLines {
    pub no: Cell<bool>,
    pub nc: Cell<bool>,
}

impl SwitchLines {
    pub fn released() -> Self {
        Self {
            no: Cell::new(true),
            nc: Cell::new(false),
        }
    }

    pub fn set_pressed(&self, pressed: bool) {
        self.no.set(!pressed);
        self.nc.set(pressed);
    }

    /// Both lines active at once
    pub fn short(&self) {
        self.no.set(false);
        self.nc.set(false);
    }

    pub fn pins(&self) -> ContactPins<TestPin<'_>> {
        ContactPins::new(TestPin { high: &self.no }, TestPin { high: &self.nc })
    }
}

/// Collects reports. Each submit can cost simulated time.
pub struct RecordingTransport<'a> {
    pub reports: Vec<InputReport>,
    time: &'a SimTime,
    pub cost: Cell<Duration>,
}

impl<'a> RecordingTransport<'a> {
    pub fn new(time: &'a SimTime) -> Self {
        Self {
            reports: Vec::new(),
            time,
            cost: Cell::new(Duration::from_micros(0)),
        }
    }
}

impl ReportTransport for RecordingTransport<'_> {
    fn submit(&mut self, report: InputReport) {
        self.time.advance(self.cost.get());
        self.reports.push(report);
    }
}

//! Fixed-rate poll loop.
//!
//! Each cycle reads one motion burst, scans the switches and publishes one
//! report, in that order, then busy-waits until the cycle deadline.

use embassy_time::{Duration, Instant};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::clock::Clock;
use crate::config::PollConfig;
use crate::error::Error;
use crate::pmw3360::{RegisterBus, SensorSession};
use crate::report::{ReportComposer, ReportTransport};
use crate::switches::SwitchAggregator;

/// How a cycle finished relative to its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleTiming {
    /// Work finished with `slack` to spare, which was then waited out
    OnTime { slack: Duration },
    /// Work finished after the deadline. The report was still published.
    Late { overrun: Duration },
}

/// Counters kept across cycles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleStats {
    pub cycles: u32,
    pub late_cycles: u32,
    /// Burst reads that failed and were reported as zero motion
    pub sensor_errors: u32,
    /// Switch fault episodes
    pub switch_faults: u32,
}

/// Owns every component and drives them at a fixed period.
pub struct PollLoop<B, In, const N: usize, T, C, D>
where
    B: RegisterBus,
    In: InputPin,
    T: ReportTransport,
    C: Clock,
    D: DelayNs,
{
    session: SensorSession<B>,
    switches: SwitchAggregator<In, N>,
    composer: ReportComposer<T>,
    clock: C,
    delay: D,
    period: Duration,
    deadline: Option<Instant>,
    stats: CycleStats,
}

impl<B, In, const N: usize, T, C, D> PollLoop<B, In, N, T, C, D>
where
    B: RegisterBus,
    In: InputPin,
    T: ReportTransport,
    C: Clock,
    D: DelayNs,
{
    pub fn new(
        session: SensorSession<B>,
        switches: SwitchAggregator<In, N>,
        composer: ReportComposer<T>,
        clock: C,
        delay: D,
        config: &PollConfig,
    ) -> Self {
        Self {
            session,
            switches,
            composer,
            clock,
            delay,
            period: config.interval,
            deadline: None,
            stats: CycleStats::default(),
        }
    }

    /// Bring the sensor up. Errors are returned as is, retrying is up to the
    /// caller.
    pub fn start(&mut self, image: &[u8]) -> Result<(), Error> {
        info!("Starting poll loop, period {} us", self.period.as_micros());
        self.deadline = None;
        self.session.begin(image)
    }

    /// Run one cycle.
    pub fn poll_once(&mut self) -> CycleTiming {
        let start = self.clock.now();
        let deadline = *self.deadline.get_or_insert(start + self.period);

        let motion = match self.session.read_burst() {
            Ok(packet) => Some(packet),
            Err(e) => {
                warn!("Burst read failed: {:?}", e);
                self.stats.sensor_errors = self.stats.sensor_errors.wrapping_add(1);
                None
            }
        };

        let faults = self.switches.fault_count();
        self.switches.scan(self.clock.now());
        let new_faults = self.switches.fault_count().wrapping_sub(faults);
        self.stats.switch_faults = self.stats.switch_faults.wrapping_add(new_faults);

        self.composer.publish(motion.as_ref(), &mut self.switches);
        self.stats.cycles = self.stats.cycles.wrapping_add(1);

        let now = self.clock.now();
        if now <= deadline {
            let slack = deadline - now;
            self.delay.delay_us(slack.as_micros().min(u32::MAX as u64) as u32);
            self.deadline = Some(deadline + self.period);
            CycleTiming::OnTime { slack }
        } else {
            let overrun = now - deadline;
            warn!("Poll cycle {} late by {} us", self.stats.cycles, overrun.as_micros());
            self.stats.late_cycles = self.stats.late_cycles.wrapping_add(1);
            self.deadline = Some(now + self.period);
            CycleTiming::Late { overrun }
        }
    }

    /// Poll forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.poll_once();
        }
    }

    pub fn stats(&self) -> CycleStats {
        self.stats
    }

    pub fn session(&mut self) -> &mut SensorSession<B> {
        &mut self.session
    }

    pub fn switches(&self) -> &SwitchAggregator<In, N> {
        &self.switches
    }

    pub fn composer(&mut self) -> &mut ReportComposer<T> {
        &mut self.composer
    }
}

//! Report composition.

use embedded_hal::digital::InputPin;
use usbd_hid::descriptor::MouseReport;

use crate::config::ReportConfig;
use crate::pmw3360::MotionPacket;
use crate::switches::{HID_BUTTONS, SwitchAggregator};

/// One poll cycle worth of input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputReport {
    /// Debounced button mask, scroll contacts included
    pub buttons: u8,
    pub dx: i16,
    pub dy: i16,
    /// Scroll ticks since the previous report
    pub wheel: i16,
}

impl InputReport {
    /// Boot protocol mouse report. Values outside the i8 range are clamped and
    /// the scroll contact bits are dropped from the button mask.
    pub fn to_mouse_report(&self) -> MouseReport {
        MouseReport {
            buttons: self.buttons & HID_BUTTONS,
            x: self.dx.clamp(i8::MIN as i16, i8::MAX as i16) as i8,
            y: self.dy.clamp(i8::MIN as i16, i8::MAX as i16) as i8,
            wheel: self.wheel.clamp(i8::MIN as i16, i8::MAX as i16) as i8,
            pan: 0,
        }
    }
}

/// Whatever carries reports to the host.
pub trait ReportTransport {
    /// Take ownership of one report. Called exactly once per poll cycle.
    fn submit(&mut self, report: InputReport);
}

impl<T: ReportTransport + ?Sized> ReportTransport for &mut T {
    fn submit(&mut self, report: InputReport) {
        (**self).submit(report)
    }
}

/// Merges motion and switch state into one [`InputReport`] per cycle.
pub struct ReportComposer<T: ReportTransport> {
    transport: T,
    config: ReportConfig,
}

impl<T: ReportTransport> ReportComposer<T> {
    pub fn new(transport: T, config: ReportConfig) -> Self {
        Self { transport, config }
    }

    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Build this cycle's report and hand it to the transport.
    ///
    /// `motion` is `None` when the burst read failed. The scroll accumulator
    /// of `switches` is drained.
    pub fn publish<In: InputPin, const N: usize>(
        &mut self,
        motion: Option<&MotionPacket>,
        switches: &mut SwitchAggregator<In, N>,
    ) -> InputReport {
        let (dx, dy) = motion.map(|m| self.orient(m.motion())).unwrap_or_default();

        let report = InputReport {
            buttons: switches.buttons(),
            dx,
            dy,
            wheel: switches.take_scroll(),
        };

        trace!(
            "Report: buttons {:#04x}, x: {}, y: {}, wheel: {}",
            report.buttons, report.dx, report.dy, report.wheel
        );
        self.transport.submit(report);
        report
    }

    fn orient(&self, (mut dx, mut dy): (i16, i16)) -> (i16, i16) {
        if self.config.invert_x {
            dx = dx.saturating_neg();
        }
        if self.config.invert_y {
            dy = dy.saturating_neg();
        }
        if self.config.swap_xy {
            (dx, dy) = (dy, dx);
        }
        (dx, dy)
    }
}

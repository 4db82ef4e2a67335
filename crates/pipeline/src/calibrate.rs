//! Raw score -> "percent match" calibration.
//!
//! A logistic centered near the middle of the usable raw range squashes
//! scores so that merely-good matches land in the 50s-80s and only
//! near-duplicate feature sets approach the ceiling.

use crate::config::CalibrationParams;

#[derive(Debug, Clone)]
pub struct Calibrator {
    params: CalibrationParams,
}

impl Calibrator {
    pub fn new(params: CalibrationParams) -> Self {
        Self { params }
    }

    /// `clamp(floor + logistic(raw) * span, 0, ceiling)`, rounded to one decimal.
    ///
    /// Monotonic non-decreasing in `raw`.
    pub fn calibrate(&self, raw: f64) -> f64 {
        let logistic = 1.0 / (1.0 + (-(raw - self.params.center) / self.params.scale).exp());
        let percent = (self.params.floor + logistic * self.params.span).clamp(0.0, self.params.ceiling);
        round_to_tenth(percent)
    }
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new(CalibrationParams::default())
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

//! Current-bar volume divided by its trailing SMA. Strategies use this to gate breakout signals
//! on genuine volume expansion rather than noise.
use ta::indicators::SimpleMovingAverage;
use ta::Next;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct VolumeRatio {
    avg: SimpleMovingAverage,
}

impl VolumeRatio {
    pub fn new(period: usize) -> Result<Self> {
        let avg = SimpleMovingAverage::new(period).map_err(|_| Error::InvalidParameter {
            name: "period".to_string(),
            expected: "> 0".to_string(),
            found: period.to_string(),
        })?;
        Ok(Self { avg })
    }

    #[must_use]
    pub fn default_period() -> Self { Self::new(20).expect("20 is always valid") }

    /// Ratio is `NaN` propagated when the trailing average is zero (e.g. an illiquid warmup
    /// period), never a divide-by-zero panic.
    pub fn next(&mut self, volume: f64) -> f64 {
        let mean = self.avg.next(volume);
        if mean == 0.0 {
            f64::NAN
        } else {
            volume / mean
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_spike_reports_ratio_above_one() {
        let mut vr = VolumeRatio::default_period();
        for _ in 0..20 {
            vr.next(100.0);
        }
        assert!(vr.next(500.0) > 1.0);
    }

    #[test]
    fn zero_average_propagates_nan() {
        let mut vr = VolumeRatio::default_period();
        let ratio = vr.next(0.0);
        assert!(ratio.is_nan());
    }
}

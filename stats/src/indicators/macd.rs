//! MACD (moving average convergence/divergence): fast EMA minus slow EMA, plus an EMA of that
//! difference as the signal line. Default periods are the standard 12/26/9.
use ta::indicators::MovingAverageConvergenceDivergence as TaMacd;
use ta::Next;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone)]
pub struct Macd {
    inner: TaMacd,
}

impl Macd {
    pub fn new(fast: u32, slow: u32, signal: u32) -> Result<Self> {
        let inner = TaMacd::new(fast as usize, slow as usize, signal as usize).map_err(|_| Error::InvalidParameter {
            name: "fast/slow/signal".to_string(),
            expected: "fast < slow, all > 0".to_string(),
            found: format!("{fast}/{slow}/{signal}"),
        })?;
        Ok(Self { inner })
    }

    #[must_use]
    pub fn default_periods() -> Self { Self::new(12, 26, 9).expect("12/26/9 is always valid") }
}

impl Next<f64> for Macd {
    type Output = MacdOutput;

    fn next(&mut self, input: f64) -> Self::Output {
        let out = self.inner.next(input);
        MacdOutput {
            macd: out.macd,
            signal: out.signal,
            histogram: out.histogram,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_series_converges_to_zero_histogram() {
        let mut macd = Macd::default_periods();
        let mut last = MacdOutput { macd: 0.0, signal: 0.0, histogram: 0.0 };
        for _ in 0..200 {
            last = macd.next(100.0);
        }
        assert!(last.histogram.abs() < 1e-6);
    }

    #[test]
    fn rejects_fast_not_less_than_slow() {
        assert!(Macd::new(26, 12, 9).is_err());
    }
}

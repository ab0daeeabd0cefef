//! Relative Strength Index, Wilder-smoothed over `period` bars (default 14).
use ta::indicators::RelativeStrengthIndex as TaRsi;
use ta::Next;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Rsi {
    inner: TaRsi,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self> {
        let inner = TaRsi::new(period).map_err(|_| Error::InvalidParameter {
            name: "period".to_string(),
            expected: "> 0".to_string(),
            found: period.to_string(),
        })?;
        Ok(Self { inner })
    }

    #[must_use]
    pub fn default_period() -> Self { Self::new(14).expect("14 is always valid") }
}

impl Next<f64> for Rsi {
    type Output = f64;

    fn next(&mut self, input: f64) -> Self::Output { self.inner.next(input) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_rise_pushes_rsi_toward_100() {
        let mut rsi = Rsi::default_period();
        let mut last = 0.0;
        for i in 0..50 {
            last = rsi.next(100.0 + i as f64);
        }
        assert!(last > 90.0);
    }
}

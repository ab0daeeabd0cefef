//! Bollinger Bands: an SMA envelope `k` standard deviations wide, plus the bandwidth and
//! %B derivatives strategies actually consume.
use ta::indicators::BollingerBands as TaBollinger;
use ta::Next;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerOutput {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    /// `(upper - lower) / middle`, a volatility-normalised band width.
    pub bandwidth_pct: f64,
    /// Where `close` sits within the bands: 0.0 at the lower band, 1.0 at the upper.
    pub percent_b: f64,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    inner: TaBollinger,
}

impl Bollinger {
    pub fn new(period: usize, k: f64) -> Result<Self> {
        let inner = TaBollinger::new(period, k).map_err(|_| Error::InvalidParameter {
            name: "period/k".to_string(),
            expected: "period > 0, k > 0".to_string(),
            found: format!("{period}/{k}"),
        })?;
        Ok(Self { inner })
    }

    #[must_use]
    pub fn default_params() -> Self { Self::new(20, 2.0).expect("20/2.0 is always valid") }

    pub fn next(&mut self, close: f64) -> BollingerOutput {
        let out = self.inner.next(close);
        let bandwidth_pct = if out.average == 0.0 { f64::NAN } else { (out.upper - out.lower) / out.average };
        let band_range = out.upper - out.lower;
        let percent_b = if band_range == 0.0 { f64::NAN } else { (close - out.lower) / band_range };
        BollingerOutput {
            upper: out.upper,
            middle: out.average,
            lower: out.lower,
            bandwidth_pct,
            percent_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_price_collapses_bands_to_the_price() {
        let mut bb = Bollinger::default_params();
        let mut out = bb.next(100.0);
        for _ in 0..30 {
            out = bb.next(100.0);
        }
        assert!((out.middle - 100.0).abs() < 1e-9);
        assert!(out.bandwidth_pct.abs() < 1e-9);
    }

    #[test]
    fn percent_b_is_nan_when_bands_collapse() {
        let mut bb = Bollinger::default_params();
        let mut out = bb.next(100.0);
        for _ in 0..30 {
            out = bb.next(100.0);
        }
        assert!(out.percent_b.is_nan());
    }
}

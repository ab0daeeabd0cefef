//! KDJ, the stochastic-oscillator variant popular on Chinese exchanges: %K and %D are the usual
//! slow stochastic lines, %J extrapolates past them (`3K - 2D`) to lead turning points.
use std::collections::VecDeque;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KdjOutput {
    pub k: f64,
    pub d: f64,
    pub j: f64,
}

#[derive(Debug, Clone)]
pub struct Kdj {
    period: usize,
    window: VecDeque<(f64, f64)>,
    prev_k: f64,
    prev_d: f64,
    warm: bool,
}

impl Kdj {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(Error::InvalidParameter {
                name: "period".to_string(),
                expected: "> 0".to_string(),
                found: "0".to_string(),
            });
        }
        Ok(Self {
            period,
            window: VecDeque::with_capacity(period),
            prev_k: 50.0,
            prev_d: 50.0,
            warm: false,
        })
    }

    #[must_use]
    pub fn default_period() -> Self { Self::new(9).expect("9 is always valid") }

    pub fn next(&mut self, high: f64, low: f64, close: f64) -> KdjOutput {
        if self.window.len() == self.period {
            self.window.pop_front();
        }
        self.window.push_back((high, low));

        if self.window.len() < self.period {
            return KdjOutput { k: f64::NAN, d: f64::NAN, j: f64::NAN };
        }

        let highest = self.window.iter().map(|(h, _)| *h).fold(f64::MIN, f64::max);
        let lowest = self.window.iter().map(|(_, l)| *l).fold(f64::MAX, f64::min);
        let range = highest - lowest;
        let rsv = if range == 0.0 { 50.0 } else { (close - lowest) / range * 100.0 };

        let (k0, d0) = if self.warm { (self.prev_k, self.prev_d) } else { (50.0, 50.0) };
        let k = (2.0 / 3.0) * k0 + (1.0 / 3.0) * rsv;
        let d = (2.0 / 3.0) * d0 + (1.0 / 3.0) * k;
        let j = 3.0 * k - 2.0 * d;

        self.prev_k = k;
        self.prev_d = d;
        self.warm = true;

        KdjOutput { k, d, j }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_at_window_high_pushes_k_toward_100() {
        let mut kdj = Kdj::default_period();
        let mut out = KdjOutput { k: f64::NAN, d: f64::NAN, j: f64::NAN };
        for i in 0..30 {
            let price = 100.0 + i as f64;
            out = kdj.next(price, price - 1.0, price);
        }
        assert!(out.k > 80.0);
    }

    #[test]
    fn flat_range_yields_neutral_rsv() {
        let mut kdj = Kdj::default_period();
        let mut out = KdjOutput { k: f64::NAN, d: f64::NAN, j: f64::NAN };
        for _ in 0..12 {
            out = kdj.next(100.0, 100.0, 100.0);
        }
        assert!((out.k - 50.0).abs() < 1.0);
    }
}

//! Average Directional Index with its +DI/-DI components, hand-rolled in the Wilder-smoothing
//! idiom `ta`'s own indicators use internally (see [`super::atr::Atr`]) since the crate ships no
//! ADX of its own.
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdxOutput {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
}

#[derive(Debug, Clone)]
pub struct Adx {
    period: f64,
    prev: Option<(f64, f64, f64)>,
    smoothed_tr: f64,
    smoothed_plus_dm: f64,
    smoothed_minus_dm: f64,
    smoothed_dx: Option<f64>,
    count: u32,
}

impl Adx {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(Error::InvalidParameter {
                name: "period".to_string(),
                expected: "> 0".to_string(),
                found: "0".to_string(),
            });
        }
        Ok(Self {
            period: period as f64,
            prev: None,
            smoothed_tr: 0.0,
            smoothed_plus_dm: 0.0,
            smoothed_minus_dm: 0.0,
            smoothed_dx: None,
            count: 0,
        })
    }

    #[must_use]
    pub fn default_period() -> Self { Self::new(14).expect("14 is always valid") }

    /// Feeds one `(high, low, close)` bar. Output is `NaN` until `period` bars of warmup have
    /// accumulated, matching the rest of this crate's NaN-padding convention.
    pub fn next(&mut self, high: f64, low: f64, close: f64) -> AdxOutput {
        let Some((prev_high, prev_low, prev_close)) = self.prev else {
            self.prev = Some((high, low, close));
            return AdxOutput { adx: f64::NAN, plus_di: f64::NAN, minus_di: f64::NAN };
        };
        self.prev = Some((high, low, close));

        let up_move = high - prev_high;
        let down_move = prev_low - low;
        let plus_dm = if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 };
        let minus_dm = if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 };
        let tr = (high - low).max((high - prev_close).abs()).max((low - prev_close).abs());

        self.count += 1;
        if self.count == 1 {
            self.smoothed_tr = tr;
            self.smoothed_plus_dm = plus_dm;
            self.smoothed_minus_dm = minus_dm;
        } else {
            self.smoothed_tr -= self.smoothed_tr / self.period;
            self.smoothed_tr += tr;
            self.smoothed_plus_dm -= self.smoothed_plus_dm / self.period;
            self.smoothed_plus_dm += plus_dm;
            self.smoothed_minus_dm -= self.smoothed_minus_dm / self.period;
            self.smoothed_minus_dm += minus_dm;
        }

        if (self.count as f64) < self.period || self.smoothed_tr == 0.0 {
            return AdxOutput { adx: f64::NAN, plus_di: f64::NAN, minus_di: f64::NAN };
        }

        let plus_di = 100.0 * self.smoothed_plus_dm / self.smoothed_tr;
        let minus_di = 100.0 * self.smoothed_minus_dm / self.smoothed_tr;
        let di_sum = plus_di + minus_di;
        let dx = if di_sum == 0.0 { 0.0 } else { 100.0 * (plus_di - minus_di).abs() / di_sum };

        let adx = match self.smoothed_dx {
            None => dx,
            Some(prev_adx) => ((prev_adx * (self.period - 1.0)) + dx) / self.period,
        };
        self.smoothed_dx = Some(adx);

        AdxOutput { adx, plus_di, minus_di }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sustained_uptrend_pushes_plus_di_above_minus_di() {
        let mut adx = Adx::default_period();
        let mut out = AdxOutput { adx: f64::NAN, plus_di: f64::NAN, minus_di: f64::NAN };
        let mut price = 100.0;
        for _ in 0..40 {
            out = adx.next(price + 2.0, price - 1.0, price + 1.0);
            price += 2.0;
        }
        assert!(out.plus_di > out.minus_di);
        assert!(out.adx.is_finite());
    }

    #[test]
    fn first_bar_is_nan() {
        let mut adx = Adx::default_period();
        let out = adx.next(101.0, 99.0, 100.0);
        assert!(out.adx.is_nan());
    }
}

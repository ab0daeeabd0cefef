//! Average True Range: Wilder-smoothed true range, the volatility measure the risk manager
//! uses to size stop-losses wider than a fixed percentage would allow in choppy markets.
use ta::indicators::AverageTrueRange as TaAtr;
use ta::{High, Low, Next};

use crate::error::{Error, Result};

pub struct Bar {
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl ta::Close for Bar {
    fn close(&self) -> f64 { self.close }
}

impl High for Bar {
    fn high(&self) -> f64 { self.high }
}

impl Low for Bar {
    fn low(&self) -> f64 { self.low }
}

#[derive(Debug, Clone)]
pub struct Atr {
    inner: TaAtr,
}

impl Atr {
    pub fn new(period: usize) -> Result<Self> {
        let inner = TaAtr::new(period).map_err(|_| Error::InvalidParameter {
            name: "period".to_string(),
            expected: "> 0".to_string(),
            found: period.to_string(),
        })?;
        Ok(Self { inner })
    }

    #[must_use]
    pub fn default_period() -> Self { Self::new(14).expect("14 is always valid") }

    pub fn next(&mut self, high: f64, low: f64, close: f64) -> f64 { self.inner.next(&Bar { high, low, close }) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wider_ranges_increase_atr() {
        let mut atr = Atr::default_period();
        for _ in 0..20 {
            atr.next(101.0, 99.0, 100.0);
        }
        let narrow = atr.next(101.0, 99.0, 100.0);
        let wide = atr.next(110.0, 90.0, 100.0);
        assert!(wide > narrow);
    }
}

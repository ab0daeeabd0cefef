//! Cumulative trading performance, updated atomically at position-close time (spec §3).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub wins: u64,
    pub losses: u64,
    pub consecutive_wins: u32,
    pub consecutive_losses: u32,
    pub total_pnl: f64,
    pub daily_pnl: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub volatility_realised: f64,
}

impl RiskMetrics {
    #[must_use]
    pub fn total_trades(&self) -> u64 { self.wins + self.losses }

    #[must_use]
    pub fn win_rate(&self) -> f64 {
        let total = self.total_trades();
        if total == 0 {
            0.0
        } else {
            self.wins as f64 / total as f64
        }
    }

    /// Records a closed trade's realised pnl, updating win/loss streaks and running averages.
    /// `total_trades` increments by exactly one and `wins + losses` stays consistent (spec §8).
    pub fn record_close(&mut self, pnl: f64) {
        self.total_pnl += pnl;
        self.daily_pnl += pnl;
        if pnl >= 0.0 {
            self.wins += 1;
            self.consecutive_wins += 1;
            self.consecutive_losses = 0;
            self.avg_win = (self.avg_win * (self.wins - 1) as f64 + pnl) / self.wins as f64;
        } else {
            self.losses += 1;
            self.consecutive_losses += 1;
            self.consecutive_wins = 0;
            self.avg_loss = (self.avg_loss * (self.losses - 1) as f64 + pnl.abs()) / self.losses as f64;
        }
    }

    pub fn reset_daily(&mut self) { self.daily_pnl = 0.0; }

    /// Kelly fraction from the rolling win-rate and win/loss magnitude, clipped to `[0.1, 0.6]`
    /// per the risk-manager sizing rule in spec §4.5.
    #[must_use]
    pub fn kelly_fraction(&self) -> f64 {
        if self.avg_loss <= 0.0 || self.total_trades() < 10 {
            return 0.1;
        }
        let win_rate = self.win_rate();
        let payoff_ratio = self.avg_win / self.avg_loss;
        let kelly = win_rate - (1.0 - win_rate) / payoff_ratio;
        kelly.clamp(0.1, 0.6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_then_loss_keeps_totals_consistent() {
        let mut m = RiskMetrics::default();
        m.record_close(10.0);
        m.record_close(-5.0);
        assert_eq!(m.total_trades(), 2);
        assert_eq!(m.wins + m.losses, m.total_trades());
        assert_eq!(m.consecutive_losses, 1);
        assert_eq!(m.consecutive_wins, 0);
    }

    #[test]
    fn kelly_fraction_is_clamped() {
        let mut m = RiskMetrics::default();
        for _ in 0..20 {
            m.record_close(100.0);
        }
        assert!(m.kelly_fraction() <= 0.6);
    }
}

//! Position sizing: `size = base_ratio × balance × leverage / price`, adjusted by Kelly,
//! volatility, signal-strength, and loss-streak multipliers (spec §4.5).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SizingSettings {
    pub base_ratio: f64,
    pub min_order_usdt: f64,
    pub max_order_usdt: f64,
    pub use_kelly: bool,
    pub high_volatility_threshold: f64,
    pub high_volatility_factor: f64,
    pub llm_multiplier_bounds: (f64, f64),
}

impl Default for SizingSettings {
    fn default() -> Self {
        Self {
            base_ratio: 0.1,
            min_order_usdt: 10.0,
            max_order_usdt: 5_000.0,
            use_kelly: true,
            high_volatility_threshold: 0.03,
            high_volatility_factor: 0.6,
            llm_multiplier_bounds: (0.3, 2.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SizingInputs {
    pub balance: f64,
    pub leverage: f64,
    pub price: f64,
    pub kelly_fraction: f64,
    pub realised_volatility: f64,
    /// Signal strength already passed the ensemble's `min_strength` gate; `signal_min_strength`
    /// is that floor, used to anchor the 0.5×–1.0× linear ramp.
    pub signal_strength: f64,
    pub signal_min_strength: f64,
    pub consecutive_losses: u32,
    pub llm_position_multiplier: Option<f64>,
}

/// Loss-streak throttle from spec §4.5: 2 losses → 0.75×, 3 → 0.5×, 4 → 0.25×, ≥5 → kill-switch.
#[must_use]
fn streak_multiplier(consecutive_losses: u32) -> f64 {
    match consecutive_losses {
        0 | 1 => 1.0,
        2 => 0.75,
        3 => 0.5,
        4 => 0.25,
        _ => 0.0,
    }
}

/// Returns the final order notional in USDT, already clamped to `[min_order_usdt,
/// max_order_usdt]`. Returns `0.0` when the loss-streak kill-switch is engaged.
#[must_use]
pub fn position_size_usdt(inputs: &SizingInputs, settings: &SizingSettings) -> f64 {
    let streak = streak_multiplier(inputs.consecutive_losses);
    if streak == 0.0 {
        return 0.0;
    }

    let base = settings.base_ratio * inputs.balance * inputs.leverage;
    let kelly = if settings.use_kelly { inputs.kelly_fraction } else { 1.0 };

    let vol_factor = if inputs.realised_volatility > settings.high_volatility_threshold {
        settings.high_volatility_factor
    } else {
        1.0
    };

    let strength_range = (1.0 - inputs.signal_min_strength).max(1e-9);
    let strength_factor = (0.5 + 0.5 * (inputs.signal_strength - inputs.signal_min_strength).max(0.0) / strength_range).clamp(0.5, 1.0);

    let llm_factor = inputs
        .llm_position_multiplier
        .map_or(1.0, |m| m.clamp(settings.llm_multiplier_bounds.0, settings.llm_multiplier_bounds.1));

    let notional = base * kelly * vol_factor * strength_factor * streak * llm_factor;
    notional.clamp(settings.min_order_usdt, settings.max_order_usdt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> SizingInputs {
        SizingInputs {
            balance: 10_000.0,
            leverage: 5.0,
            price: 100.0,
            kelly_fraction: 0.3,
            realised_volatility: 0.01,
            signal_strength: 0.9,
            signal_min_strength: 0.8,
            consecutive_losses: 0,
            llm_position_multiplier: None,
        }
    }

    #[test]
    fn kill_switch_zeroes_size_at_five_losses() {
        let mut i = inputs();
        i.consecutive_losses = 5;
        assert_eq!(position_size_usdt(&i, &SizingSettings::default()), 0.0);
    }

    #[test]
    fn size_is_clamped_to_max_order() {
        let mut i = inputs();
        i.balance = 10_000_000.0;
        assert_eq!(position_size_usdt(&i, &SizingSettings::default()), SizingSettings::default().max_order_usdt);
    }

    #[test]
    fn high_volatility_reduces_size() {
        let mut calm = inputs();
        calm.realised_volatility = 0.005;
        let mut volatile = inputs();
        volatile.realised_volatility = 0.05;
        assert!(position_size_usdt(&volatile, &SizingSettings::default()) < position_size_usdt(&calm, &SizingSettings::default()));
    }
}

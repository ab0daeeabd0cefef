//! Control-loop state machine (spec §4.7). Transitions are driven once per tick by
//! [`crate::control_loop::run_tick`]; this module only knows the states and why each jump happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum BotState {
    Starting,
    Flat,
    Opening,
    InPosition,
    Closing,
    Paused,
    Stopping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum PauseReason {
    CircuitBreaker,
    GatewayBackoff,
}

impl BotState {
    /// Any state except `Stopping` can be preempted into `Paused`; the reverse transition is the
    /// caller's job once the breaker clears or the backoff window elapses.
    #[must_use]
    pub fn can_pause(self) -> bool { self != Self::Stopping }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopping_cannot_be_paused() {
        assert!(!BotState::Stopping.can_pause());
    }

    #[test]
    fn flat_can_be_paused() {
        assert!(BotState::Flat.can_pause());
    }
}

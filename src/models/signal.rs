use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    std::collections::VecDeque,
};

use crate::config::SIGNAL_HISTORY_MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for SignalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Hold => write!(f, "HOLD"),
        }
    }
}

/// One generated recommendation. Held in memory only; nothing survives a
/// restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub pair: String,
    pub action: SignalAction,
    pub price: f64,
    /// 0..=100
    pub confidence: i32,
    pub rationale: String,
    pub model: String,
}

/// Bounded signal feed: newest first, silently dropping the oldest past
/// `SIGNAL_HISTORY_MAX` entries.
#[derive(Debug, Default)]
pub struct SignalHistory {
    entries: VecDeque<Signal>,
}

impl SignalHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, signal: Signal) {
        self.entries.push_front(signal);
        self.entries.truncate(SIGNAL_HISTORY_MAX);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signal> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Signal> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(n: usize) -> Signal {
        Signal {
            id: n.to_string(),
            timestamp: Utc::now(),
            pair: "BTC/USDT".to_string(),
            action: SignalAction::Buy,
            price: 45_000.0,
            confidence: 80,
            rationale: "test".to_string(),
            model: "LSTM-v2.1".to_string(),
        }
    }

    #[test]
    fn history_is_capped_and_newest_first() {
        let mut history = SignalHistory::new();
        for n in 0..25 {
            history.push(signal(n));
        }
        assert_eq!(history.len(), SIGNAL_HISTORY_MAX);
        assert_eq!(history.latest().unwrap().id, "24");
        // Oldest surviving entry is 25 - cap
        let last = history.iter().last().unwrap();
        assert_eq!(last.id, (25 - SIGNAL_HISTORY_MAX).to_string());
    }
}

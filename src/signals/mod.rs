//! "AI" signal generator: keyword lookup against a canned template table,
//! perturbed with uniform jitter. No learning, no persistence; the model
//! names are set dressing.

use {chrono::Utc, rand::Rng, uuid::Uuid};

use crate::models::{Signal, SignalAction, SignalHistory};

struct Template {
    keyword: &'static str,
    action: SignalAction,
    rationale: &'static str,
    confidence: i32,
}

/// Fixed iteration order. Matching scans the whole table; when several
/// keywords appear in the input, the LAST table entry that matches wins.
const TEMPLATES: &[Template] = &[
    Template {
        keyword: "rsi",
        action: SignalAction::Hold,
        rationale: "RSI sits in the neutral band; stand aside and wait for a better entry",
        confidence: 75,
    },
    Template {
        keyword: "macd",
        action: SignalAction::Buy,
        rationale: "MACD golden cross forming, momentum turning positive; accumulate on dips",
        confidence: 82,
    },
    Template {
        keyword: "trend",
        action: SignalAction::Buy,
        rationale: "Uptrend confirmed on the technicals; price cleared a key resistance level",
        confidence: 88,
    },
    Template {
        keyword: "quantum",
        action: SignalAction::Sell,
        rationale: "Quantum randomness probe flags abnormal volatility; take partial profits",
        confidence: 70,
    },
];

const DEFAULT_TEMPLATE: Template = Template {
    keyword: "",
    action: SignalAction::Buy,
    rationale: "LSTM network projects upside within 24h; scale in gradually",
    confidence: 79,
};

const MODELS: &[&str] = &["LSTM-v2.1", "DeepSeek-Trading", "Zhipu-Quant", "Quantum-AI"];

/// Fallback base prices for when no live quote is available yet.
const FALLBACK_PRICES: &[(&str, f64)] = &[
    ("BTC/USDT", 45_000.0),
    ("ETH/USDT", 2_200.0),
    ("BNB/USDT", 310.0),
];
const FALLBACK_PRICE_OTHER: f64 = 0.5;

fn match_template(input: &str) -> &'static Template {
    let lowered = input.to_lowercase();
    let mut best = &DEFAULT_TEMPLATE;
    for template in TEMPLATES {
        if lowered.contains(template.keyword) {
            best = template;
        }
    }
    best
}

fn fallback_price(pair: &str) -> f64 {
    FALLBACK_PRICES
        .iter()
        .find(|(p, _)| *p == pair)
        .map(|(_, price)| *price)
        .unwrap_or(FALLBACK_PRICE_OTHER)
}

#[derive(Default)]
pub struct SignalEngine {
    history: SignalHistory,
}

impl SignalEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produces one signal from the free-text strategy input and prepends
    /// it to the bounded history.
    pub fn generate(&mut self, input: &str, pair: &str, live_price: Option<f64>) {
        let template = match_template(input);
        let mut rng = rand::thread_rng();

        let base_price = live_price.unwrap_or_else(|| fallback_price(pair));
        // Uniform jitter: +/-2.5% on price, +/-5 points on confidence.
        let price = base_price * (1.0 + (rng.r#gen::<f64>() - 0.5) * 0.05);
        let confidence = (template.confidence + rng.gen_range(-5..=5)).clamp(0, 100);

        self.history.push(Signal {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            pair: pair.to_string(),
            action: template.action,
            price,
            confidence,
            rationale: template.rationale.to_string(),
            model: MODELS[rng.gen_range(0..MODELS.len())].to_string(),
        });
    }

    pub fn history(&self) -> &SignalHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SIGNAL_HISTORY_MAX;

    #[test]
    fn no_keyword_falls_back_to_default() {
        let template = match_template("what should I do with my cats");
        assert_eq!(template.rationale, DEFAULT_TEMPLATE.rationale);
    }

    #[test]
    fn single_keyword_selects_its_template() {
        let template = match_template("check the MACD for me");
        assert_eq!(template.keyword, "macd");
        assert_eq!(template.action, SignalAction::Buy);
    }

    #[test]
    fn with_two_keywords_the_later_table_entry_wins() {
        // "rsi" precedes "quantum" in the table; the scan keeps the last hit.
        let template = match_template("rsi and quantum divergence");
        assert_eq!(template.keyword, "quantum");
        assert_eq!(template.action, SignalAction::Sell);
    }

    #[test]
    fn history_is_bounded_and_newest_first() {
        let mut engine = SignalEngine::new();
        for n in 0..30 {
            let input = if n % 2 == 0 { "trend" } else { "rsi" };
            engine.generate(input, "BTC/USDT", Some(45_000.0));
        }
        assert_eq!(engine.history().len(), SIGNAL_HISTORY_MAX);
        // n = 29 was the last, an "rsi" hold.
        assert_eq!(engine.history().latest().unwrap().action, SignalAction::Hold);
    }

    #[test]
    fn jitter_stays_inside_the_documented_bands() {
        let mut engine = SignalEngine::new();
        for _ in 0..100 {
            engine.generate("trend", "BTC/USDT", Some(45_000.0));
            let signal = engine.history().latest().unwrap();
            assert!(signal.price >= 45_000.0 * 0.975 && signal.price <= 45_000.0 * 1.025);
            assert!(signal.confidence >= 83 && signal.confidence <= 93);
            assert!(MODELS.contains(&signal.model.as_str()));
        }
    }

    #[test]
    fn unknown_pair_uses_the_generic_fallback_price() {
        let mut engine = SignalEngine::new();
        engine.generate("hello", "DOT/USDT", None);
        let signal = engine.history().latest().unwrap();
        assert!(signal.price > 0.0 && signal.price < 1.0);
    }
}

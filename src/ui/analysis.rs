//! AI analysis card. Like the portfolio card this is static set dressing:
//! the "prediction", indicator readings and sentiment never change.

use eframe::egui::{Color32, ProgressBar, RichText, Ui};

use crate::ui::{UI_CONFIG, format_price};

struct IndicatorReading {
    name: &'static str,
    value: f64,
    verdict: &'static str,
    description: &'static str,
}

const INDICATORS: &[IndicatorReading] = &[
    IndicatorReading {
        name: "RSI",
        value: 42.3,
        verdict: "NEUTRAL",
        description: "RSI in the neutral band, no overbought/oversold reading",
    },
    IndicatorReading {
        name: "MACD",
        value: 156.78,
        verdict: "BULLISH",
        description: "MACD golden cross forming, bullish signal",
    },
    IndicatorReading {
        name: "MA",
        value: 45_234.56,
        verdict: "BULLISH",
        description: "Price broke above the 20-day moving average",
    },
];

const LSTM_PREDICTION: &str = "BULLISH";
const LSTM_CONFIDENCE: f64 = 78.5;
const LSTM_NEXT_PRICE: f64 = 46_890.50;
const LSTM_TIMEFRAME: &str = "24h";

const SENTIMENT_SCORE: f64 = 0.65;
const SENTIMENT_LEVEL: &str = "POSITIVE";
const SENTIMENT_FACTORS: &[&str] = &[
    "Technicals constructive",
    "Volume increasing",
    "Key resistance level cleared",
];

fn verdict_color(verdict: &str) -> Color32 {
    match verdict {
        "BULLISH" | "POSITIVE" => UI_CONFIG.colors.up,
        "BEARISH" | "NEGATIVE" => UI_CONFIG.colors.down,
        _ => UI_CONFIG.colors.warning,
    }
}

pub fn render_analysis_card(ui: &mut Ui) {
    ui.heading("AI Analysis");
    ui.separator();

    ui.horizontal(|ui| {
        ui.label(RichText::new("LSTM price prediction").strong());
        ui.with_layout(
            eframe::egui::Layout::right_to_left(eframe::egui::Align::Center),
            |ui| {
                ui.colored_label(verdict_color(LSTM_PREDICTION), LSTM_PREDICTION);
            },
        );
    });
    ui.horizontal(|ui| {
        ui.monospace(format!("${}", format_price(LSTM_NEXT_PRICE)));
        ui.label(
            RichText::new(format!("{:.1}% conf. / {}", LSTM_CONFIDENCE, LSTM_TIMEFRAME))
                .small()
                .color(UI_CONFIG.colors.subdued),
        );
    });
    ui.add_space(6.0);

    for reading in INDICATORS {
        ui.horizontal(|ui| {
            ui.monospace(format!("{:<5}", reading.name));
            ui.label(
                RichText::new(reading.description)
                    .small()
                    .color(UI_CONFIG.colors.subdued),
            );
            ui.with_layout(
                eframe::egui::Layout::right_to_left(eframe::egui::Align::Center),
                |ui| {
                    ui.colored_label(verdict_color(reading.verdict), reading.verdict);
                    ui.monospace(format!("{:.2}", reading.value));
                },
            );
        });
    }
    ui.add_space(6.0);

    ui.horizontal(|ui| {
        ui.label("Market sentiment");
        ui.with_layout(
            eframe::egui::Layout::right_to_left(eframe::egui::Align::Center),
            |ui| {
                ui.colored_label(verdict_color(SENTIMENT_LEVEL), SENTIMENT_LEVEL);
                ui.monospace(format!("{:.1}%", SENTIMENT_SCORE * 100.0));
            },
        );
    });
    ui.add(
        ProgressBar::new(SENTIMENT_SCORE as f32)
            .fill(UI_CONFIG.colors.up)
            .desired_height(6.0),
    );
    for factor in SENTIMENT_FACTORS {
        ui.label(
            RichText::new(format!("✔ {}", factor))
                .small()
                .color(UI_CONFIG.colors.subdued),
        );
    }
}

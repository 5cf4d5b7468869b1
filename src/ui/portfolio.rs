//! Portfolio overview card. Static placeholder data: there is no account,
//! no orders, nothing persisted.

use eframe::egui::{RichText, Ui};

use crate::ui::{UI_CONFIG, format_percentage, format_price};

struct Position {
    asset: &'static str,
    amount: f64,
    value: f64,
    allocation: f64,
}

const POSITIONS: &[Position] = &[
    Position {
        asset: "BTC",
        amount: 1.2345,
        value: 56_432.10,
        allocation: 44.9,
    },
    Position {
        asset: "ETH",
        amount: 15.678,
        value: 35_012.45,
        allocation: 27.9,
    },
    Position {
        asset: "BNB",
        amount: 89.123,
        value: 27_845.67,
        allocation: 22.2,
    },
    Position {
        asset: "ADA",
        amount: 12_345.67,
        value: 5_678.90,
        allocation: 4.5,
    },
];

const TOTAL_VALUE: f64 = 125_678.90;
const DAILY_CHANGE: f64 = 3_456.78;
const DAILY_CHANGE_PCT: f64 = 2.83;

pub fn render_portfolio(ui: &mut Ui) {
    ui.heading("Portfolio Overview");
    ui.separator();

    ui.label(RichText::new("Total value").small().color(UI_CONFIG.colors.subdued));
    ui.label(RichText::new(format!("${}", format_price(TOTAL_VALUE))).strong().size(20.0));
    ui.colored_label(
        UI_CONFIG.colors.up,
        format!(
            "+${} ({})",
            format_price(DAILY_CHANGE),
            format_percentage(DAILY_CHANGE_PCT)
        ),
    );
    ui.add_space(6.0);

    for position in POSITIONS {
        ui.horizontal(|ui| {
            ui.monospace(format!("{:<4}", position.asset));
            ui.label(
                RichText::new(format!("{:.4}  ·  {:.1}%", position.amount, position.allocation))
                    .small()
                    .color(UI_CONFIG.colors.subdued),
            );
            ui.with_layout(
                eframe::egui::Layout::right_to_left(eframe::egui::Align::Center),
                |ui| {
                    ui.monospace(format!("${}", format_price(position.value)));
                },
            );
        });
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        metric(ui, "Sharpe", "1.67", UI_CONFIG.colors.up);
        metric(ui, "Max DD", "-8.45%", UI_CONFIG.colors.down);
        metric(ui, "Volatility", "12.34%", UI_CONFIG.colors.warning);
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str, color: eframe::egui::Color32) {
    ui.vertical(|ui| {
        ui.label(RichText::new(label).small().color(UI_CONFIG.colors.subdued));
        ui.colored_label(color, value);
    });
}

//! Market data side panel: live quotes per tracked pair, selection, and
//! the stream health indicator.

use eframe::egui::{RichText, Ui};

use crate::{
    data::{ConnectionStatus, QuoteEntry},
    ui::{UI_CONFIG, format_percentage, format_price, format_volume},
    utils::format_clock_time,
};

fn status_label(status: ConnectionStatus) -> (&'static str, eframe::egui::Color32) {
    match status {
        ConnectionStatus::Connected => ("● Live", UI_CONFIG.colors.status_connected),
        ConnectionStatus::Connecting => ("● Connecting", UI_CONFIG.colors.status_connecting),
        ConnectionStatus::Disconnected => ("● Offline", UI_CONFIG.colors.subdued),
        ConnectionStatus::Unavailable => ("● Unavailable", UI_CONFIG.colors.status_unavailable),
    }
}

/// Returns the pair the user clicked, if any.
pub fn render_market_panel(
    ui: &mut Ui,
    entries: &[QuoteEntry],
    loading: bool,
    error: Option<&str>,
    status: ConnectionStatus,
    selected_pair: &str,
) -> Option<String> {
    let mut clicked = None;

    ui.horizontal(|ui| {
        ui.heading("Market Data");
        ui.with_layout(
            eframe::egui::Layout::right_to_left(eframe::egui::Align::Center),
            |ui| {
                let (text, color) = status_label(status);
                ui.colored_label(color, text);
            },
        );
    });
    ui.separator();

    if let Some(error) = error {
        ui.colored_label(UI_CONFIG.colors.warning, error);
    }
    if loading && entries.is_empty() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading market data…");
        });
        return None;
    }

    for entry in entries {
        let quote = &entry.quote;
        let is_selected = quote.symbol == selected_pair;
        let pct_color = if quote.is_up() {
            UI_CONFIG.colors.up
        } else {
            UI_CONFIG.colors.down
        };

        let response = ui.selectable_label(
            is_selected,
            RichText::new(format!(
                "{}  {}  {}",
                quote.symbol,
                format_price(quote.price),
                format_percentage(quote.change_percent_24h)
            ))
            .monospace(),
        );
        if response.clicked() {
            clicked = Some(quote.symbol.clone());
        }

        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!(
                    "Vol {}   H {}   L {}",
                    format_volume(quote.volume_24h),
                    format_price(quote.high_24h),
                    format_price(quote.low_24h)
                ))
                .small()
                .color(UI_CONFIG.colors.subdued),
            );
            ui.with_layout(
                eframe::egui::Layout::right_to_left(eframe::egui::Align::Center),
                |ui| {
                    ui.label(
                        RichText::new(format_clock_time(quote.last_update_ms))
                            .small()
                            .color(pct_color),
                    );
                },
            );
        });
        ui.add_space(4.0);
    }

    clicked
}

//! Signal feed: the bounded history of generated recommendations, newest
//! first.

use {
    eframe::egui::{Color32, RichText, Ui},
    egui_extras::{Column, TableBuilder},
};

use crate::{
    models::{SignalAction, SignalHistory},
    ui::{UI_CONFIG, format_price},
};

fn action_color(action: SignalAction) -> Color32 {
    match action {
        SignalAction::Buy => UI_CONFIG.colors.up,
        SignalAction::Sell => UI_CONFIG.colors.down,
        SignalAction::Hold => UI_CONFIG.colors.warning,
    }
}

pub fn render_signal_feed(ui: &mut Ui, history: &SignalHistory) {
    ui.heading("AI Trading Signals");
    ui.separator();

    if history.is_empty() {
        ui.label(
            RichText::new("No signals yet. Describe a strategy below and hit Send.")
                .color(UI_CONFIG.colors.subdued),
        );
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(18.0, |mut header| {
            for title in ["Time", "Pair", "Action", "Price", "Conf.", "Model", "Rationale"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for signal in history.iter() {
                body.row(20.0, |mut row| {
                    row.col(|ui| {
                        ui.monospace(signal.timestamp.format("%H:%M:%S").to_string());
                    });
                    row.col(|ui| {
                        ui.label(&signal.pair);
                    });
                    row.col(|ui| {
                        ui.colored_label(action_color(signal.action), signal.action.to_string());
                    });
                    row.col(|ui| {
                        ui.monospace(format_price(signal.price));
                    });
                    row.col(|ui| {
                        ui.monospace(format!("{}%", signal.confidence));
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(&signal.model).color(UI_CONFIG.colors.accent));
                    });
                    row.col(|ui| {
                        ui.label(
                            RichText::new(&signal.rationale)
                                .small()
                                .color(UI_CONFIG.colors.subdued),
                        );
                    });
                });
            }
        });
}

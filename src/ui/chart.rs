//! Candlestick chart for the selected pair. History loads on a background
//! thread and lands through a channel; a stale response for a pair the user
//! has already navigated away from is dropped on arrival.

use {
    eframe::egui::{RichText, Stroke, Ui},
    egui_plot::{Axis, AxisHints, HLine, Line, LineStyle, Plot, PlotPoints, Polygon},
    std::{
        sync::mpsc::{self, Receiver},
        thread,
    },
    tokio::runtime::Runtime,
};

use crate::{
    config::{CHART_CANDLE_LIMIT, CHART_INTERVALS, DEFAULT_CHART_INTERVAL},
    data::SnapshotClient,
    models::Candle,
    ui::{UI_CONFIG, format_price},
    utils::format_axis_time,
};

type FetchResult = (String, &'static str, Result<Vec<Candle>, String>);

pub struct ChartState {
    pair: String,
    interval: &'static str,
    candles: Vec<Candle>,
    loading: bool,
    error: Option<String>,
    rx: Option<Receiver<FetchResult>>,
}

impl Default for ChartState {
    fn default() -> Self {
        Self {
            pair: String::new(),
            interval: DEFAULT_CHART_INTERVAL,
            candles: Vec::new(),
            loading: false,
            error: None,
            rx: None,
        }
    }
}

impl ChartState {
    /// Kicks off a history load for the current pair/interval.
    fn request(&mut self, client: &SnapshotClient) {
        let (tx, rx) = mpsc::channel();
        self.rx = Some(rx);
        self.loading = true;
        self.error = None;

        let client = client.clone();
        let pair = self.pair.clone();
        let interval = self.interval;
        thread::spawn(move || {
            let rt = Runtime::new().expect("Failed to create runtime");
            let result = rt
                .block_on(client.fetch_candles(&pair, interval, CHART_CANDLE_LIMIT))
                .map_err(|e| format!("{:#}", e));
            let _ = tx.send((pair, interval, result));
        });
    }

    fn poll(&mut self) {
        let Some(rx) = &self.rx else { return };
        while let Ok((pair, interval, result)) = rx.try_recv() {
            // Stale guard: the user may have switched away mid-flight.
            if pair != self.pair || interval != self.interval {
                continue;
            }
            self.loading = false;
            match result {
                Ok(candles) => {
                    self.candles = candles;
                    self.error = None;
                }
                Err(e) => {
                    log::error!("Candle fetch failed for {}: {}", pair, e);
                    self.candles.clear();
                    self.error = Some("Chart data unavailable".to_string());
                }
            }
        }
    }

    pub fn render(&mut self, ui: &mut Ui, client: &SnapshotClient, pair: &str) {
        if self.pair != pair {
            self.pair = pair.to_string();
            self.candles.clear();
            self.request(client);
        }
        self.poll();

        ui.horizontal(|ui| {
            ui.heading(&self.pair);
            ui.separator();
            for interval in CHART_INTERVALS {
                let selected = self.interval == *interval;
                if ui.selectable_label(selected, *interval).clicked() && !selected {
                    self.interval = interval;
                    self.request(client);
                }
            }
            if self.loading {
                ui.spinner();
            }
        });

        if let Some(error) = &self.error {
            ui.colored_label(UI_CONFIG.colors.warning, error);
            return;
        }
        if self.candles.is_empty() {
            ui.label(RichText::new("Waiting for chart data…").color(UI_CONFIG.colors.subdued));
            return;
        }

        let timestamps: Vec<i64> = self.candles.iter().map(|c| c.open_time_ms).collect();
        let time_axis = AxisHints::new(Axis::X).formatter(move |mark, _range| {
            let idx = mark.value.round();
            if idx < 0.0 || idx as usize >= timestamps.len() {
                return String::new();
            }
            format_axis_time(timestamps[idx as usize])
        });

        let last_close = self.candles.last().map(|c| c.close);
        let candles = self.candles.clone();

        Plot::new("price_chart")
            .height(420.0)
            .custom_x_axes(vec![time_axis])
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (i, candle) in candles.iter().enumerate() {
                    draw_candle(plot_ui, i as f64, candle);
                }
                if let Some(close) = last_close {
                    let color = candles
                        .last()
                        .map(|c| {
                            if c.is_bullish() {
                                UI_CONFIG.colors.up
                            } else {
                                UI_CONFIG.colors.down
                            }
                        })
                        .unwrap_or(UI_CONFIG.colors.neutral);
                    plot_ui.hline(
                        HLine::new(format_price(close), close)
                            .color(color)
                            .width(1.0)
                            .style(LineStyle::Dashed { length: 6.0 }),
                    );
                }
            });
    }
}

fn draw_candle(plot_ui: &mut egui_plot::PlotUi, x: f64, candle: &Candle) {
    let color = if candle.is_bullish() {
        UI_CONFIG.colors.candle_bullish
    } else {
        UI_CONFIG.colors.candle_bearish
    };

    // Wick
    if candle.high > candle.low {
        plot_ui.line(
            Line::new("", PlotPoints::new(vec![[x, candle.low], [x, candle.high]]))
                .color(color)
                .width(UI_CONFIG.candle_wick_width),
        );
    }

    // Body. A doji still gets a sliver of height so it stays visible.
    let body_top_raw = candle.open.max(candle.close);
    let body_bot = candle.open.min(candle.close);
    let body_top = if (body_top_raw - body_bot).abs() < f64::EPSILON {
        body_bot * 1.0001
    } else {
        body_top_raw
    };

    let half_w = UI_CONFIG.candle_width / 2.0;
    let pts = vec![
        [x - half_w, body_bot],
        [x + half_w, body_bot],
        [x + half_w, body_top],
        [x - half_w, body_top],
    ];
    plot_ui.polygon(
        Polygon::new("", PlotPoints::new(pts))
            .fill_color(color)
            .stroke(Stroke::NONE),
    );
}

use {
    eframe::egui::{
        Align, CentralPanel, ComboBox, Context, Key, Layout, RichText, ScrollArea, SidePanel,
        TextEdit, TopBottomPanel,
    },
    serde::{Deserialize, Serialize},
    std::{sync::Arc, time::Duration},
};

use crate::{
    Cli,
    config::{SNAPSHOT_REFRESH, StreamSettings},
    data::{MarketFeed, PriceStream, SnapshotClient},
    signals::SignalEngine,
    ui::{
        ChartState, QuantumPanel, Theme, TickerStrip, UI_CONFIG, render_analysis_card,
        render_market_panel, render_portfolio, render_signal_feed,
    },
};

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct App {
    // UI chrome persists across sessions; market state never does.
    theme: Theme,
    selected_pair: String,
    #[serde(skip)]
    strategy_input: String,
    #[serde(skip)]
    client: SnapshotClient,
    #[serde(skip)]
    stream: Arc<PriceStream>,
    #[serde(skip)]
    feed: Option<MarketFeed>,
    #[serde(skip)]
    signal_engine: SignalEngine,
    #[serde(skip)]
    chart: ChartState,
    #[serde(skip)]
    ticker: TickerStrip,
    #[serde(skip)]
    quantum: QuantumPanel,
}

impl Default for App {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            selected_pair: "BTC/USDT".to_string(),
            strategy_input: String::new(),
            client: SnapshotClient::new(),
            stream: Arc::new(PriceStream::new(StreamSettings::default())),
            feed: None,
            signal_engine: SignalEngine::new(),
            chart: ChartState::default(),
            ticker: TickerStrip::default(),
            quantum: QuantumPanel::default(),
        }
    }
}

impl App {
    pub(crate) fn new(cc: &eframe::CreationContext<'_>, args: Cli) -> Self {
        let mut app: App = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Self::default()
        };

        let pairs = args.tracked_pairs();
        if !pairs.contains(&app.selected_pair) {
            if let Some(first) = pairs.first() {
                app.selected_pair = first.clone();
            }
        }

        app.feed = Some(MarketFeed::new(
            app.client.clone(),
            Arc::clone(&app.stream),
            pairs,
            SNAPSHOT_REFRESH,
        ));
        app.theme.apply(&cc.egui_ctx);
        app
    }

    fn send_strategy(&mut self, live_price: Option<f64>) {
        let input = self.strategy_input.trim().to_string();
        if input.is_empty() {
            return;
        }
        self.signal_engine
            .generate(&input, &self.selected_pair, live_price);
        self.strategy_input.clear();
    }
}

impl eframe::App for App {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.theme.apply(ctx);

        // One read of the shared state per frame.
        let entries = self
            .feed
            .as_ref()
            .map(|f| f.entries())
            .unwrap_or_default();
        let loading = self.feed.as_ref().is_some_and(|f| f.is_loading());
        let error = self.feed.as_ref().and_then(|f| f.error());
        let pairs: Vec<String> = self
            .feed
            .as_ref()
            .map(|f| f.pairs().to_vec())
            .unwrap_or_default();
        let status = self.stream.status();
        let live_price = entries
            .iter()
            .find(|e| e.quote.symbol == self.selected_pair)
            .map(|e| e.quote.price);

        TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("⚡ QuantumTrade Pro").strong().size(18.0));
                ui.label(
                    RichText::new("AI-Powered Trading Platform")
                        .small()
                        .color(UI_CONFIG.colors.subdued),
                );
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button(self.theme.toggle_icon()).clicked() {
                        self.theme.toggle();
                    }
                });
            });
        });

        TopBottomPanel::top("ticker")
            .exact_height(UI_CONFIG.ticker.height)
            .show(ctx, |ui| {
                if let Some(pair) = self.ticker.render(ui, &entries) {
                    self.selected_pair = pair;
                }
            });

        TopBottomPanel::bottom("strategy_input").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ComboBox::from_id_salt("pair_select")
                    .selected_text(&self.selected_pair)
                    .show_ui(ui, |ui| {
                        for pair in &pairs {
                            ui.selectable_value(&mut self.selected_pair, pair.clone(), pair);
                        }
                    });

                let edit = ui.add_sized(
                    [ui.available_width() - 70.0, 24.0],
                    TextEdit::singleline(&mut self.strategy_input)
                        .hint_text("Describe a strategy (e.g. BTC trend, RSI, quantum signal)…"),
                );
                let enter_sent =
                    edit.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
                if ui.button("Send").clicked() || enter_sent {
                    self.send_strategy(live_price);
                }
            });
            ui.add_space(4.0);
        });

        TopBottomPanel::bottom("signal_feed")
            .exact_height(UI_CONFIG.signal_feed_height)
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    render_signal_feed(ui, self.signal_engine.history());
                });
            });

        SidePanel::right("market_side")
            .exact_width(UI_CONFIG.side_panel_width)
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    if let Some(pair) = render_market_panel(
                        ui,
                        &entries,
                        loading,
                        error.as_deref(),
                        status,
                        &self.selected_pair,
                    ) {
                        self.selected_pair = pair;
                    }
                    ui.add_space(12.0);
                    render_analysis_card(ui);
                    ui.add_space(12.0);
                    self.quantum.render(ui);
                    ui.add_space(12.0);
                    render_portfolio(ui);
                });
            });

        CentralPanel::default().show(ctx, |ui| {
            let selected = self.selected_pair.clone();
            self.chart.render(ui, &self.client, &selected);
        });

        // Live data keeps flowing while the user is idle.
        ctx.request_repaint_after(Duration::from_millis(500));
    }
}

mod analysis;
mod chart;
mod config;
mod format;
mod market_panel;
mod portfolio;
mod quantum_panel;
mod signal_panel;
mod theme;
mod ticker;

pub use analysis::render_analysis_card;
pub use chart::ChartState;
pub use config::UI_CONFIG;
pub use format::{format_percentage, format_price, format_volume};
pub use market_panel::render_market_panel;
pub use portfolio::render_portfolio;
pub use quantum_panel::QuantumPanel;
pub use signal_panel::render_signal_feed;
pub use theme::Theme;
pub use ticker::TickerStrip;

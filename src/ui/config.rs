//! UI palette and layout configuration

use eframe::egui::Color32;

pub struct UiColors {
    pub up: Color32,
    pub down: Color32,
    pub neutral: Color32,
    pub accent: Color32,
    pub warning: Color32,
    pub subdued: Color32,
    pub candle_bullish: Color32,
    pub candle_bearish: Color32,
    pub status_connected: Color32,
    pub status_connecting: Color32,
    pub status_unavailable: Color32,
    pub quantum_qrng: Color32,
    pub quantum_entanglement: Color32,
    pub quantum_coherence: Color32,
}

pub struct TickerSettings {
    pub height: f32,
    pub font_size: f32,
    pub item_spacing: f32,
    pub speed_pixels_per_sec: f32,
    pub background_color: Color32,
}

pub struct UiConfig {
    pub colors: UiColors,
    pub ticker: TickerSettings,
    pub side_panel_width: f32,
    pub signal_feed_height: f32,
    pub candle_width: f64,
    pub candle_wick_width: f32,
}

pub const UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        up: Color32::from_rgb(34, 197, 94),
        down: Color32::from_rgb(239, 68, 68),
        neutral: Color32::from_rgb(229, 231, 235),
        accent: Color32::from_rgb(59, 130, 246),
        warning: Color32::from_rgb(234, 179, 8),
        subdued: Color32::from_rgb(148, 163, 184),
        candle_bullish: Color32::from_rgb(34, 197, 94),
        candle_bearish: Color32::from_rgb(239, 68, 68),
        status_connected: Color32::from_rgb(34, 197, 94),
        status_connecting: Color32::from_rgb(234, 179, 8),
        status_unavailable: Color32::from_rgb(239, 68, 68),
        quantum_qrng: Color32::from_rgb(168, 85, 247),
        quantum_entanglement: Color32::from_rgb(59, 130, 246),
        quantum_coherence: Color32::from_rgb(34, 197, 94),
    },
    ticker: TickerSettings {
        height: 28.0,
        font_size: 13.0,
        item_spacing: 48.0,
        speed_pixels_per_sec: 40.0,
        background_color: Color32::from_rgb(15, 23, 42),
    },
    side_panel_width: 340.0,
    signal_feed_height: 220.0,
    candle_width: 0.7,
    candle_wick_width: 1.0,
};

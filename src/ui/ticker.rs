//! Scrolling marquee strip across the top of the dashboard. Hover pauses,
//! drag scrubs, click selects the pair.

use eframe::egui::{FontId, Pos2, Rect, Sense, Ui, Vec2};

use crate::{
    data::QuoteEntry,
    ui::{UI_CONFIG, format_percentage, format_price},
};

pub struct TickerStrip {
    // Horizontal offset (pixels)
    offset: f32,
    is_hovered: bool,
    is_dragging: bool,
}

impl Default for TickerStrip {
    fn default() -> Self {
        Self {
            offset: 0.0,
            is_hovered: false,
            is_dragging: false,
        }
    }
}

fn format_item(entry: &QuoteEntry) -> String {
    format!(
        "{} {} ({})",
        entry.quote.symbol,
        format_price(entry.quote.price),
        format_percentage(entry.quote.change_percent_24h)
    )
}

impl TickerStrip {
    pub fn render(&mut self, ui: &mut Ui, entries: &[QuoteEntry]) -> Option<String> {
        let rect = ui.available_rect_before_wrap();
        let height = UI_CONFIG.ticker.height;
        let panel_rect = Rect::from_min_size(rect.min, Vec2::new(rect.width(), height));
        let response = ui.allocate_rect(panel_rect, Sense::click_and_drag());
        ui.painter()
            .rect_filled(panel_rect, 0.0, UI_CONFIG.ticker.background_color);

        self.is_hovered = response.hovered();
        self.is_dragging = response.dragged();

        if self.is_dragging {
            self.offset += response.drag_delta().x;
        } else if !self.is_hovered {
            // Clamp dt so a lag spike doesn't teleport the strip.
            let dt = ui.input(|i| i.stable_dt).min(0.05);
            self.offset -= UI_CONFIG.ticker.speed_pixels_per_sec * dt;
        }

        let painter = ui.painter().with_clip_rect(panel_rect);
        let font_id = FontId::monospace(UI_CONFIG.ticker.font_size);

        // Pass 1: total width, needed for the wrap-around.
        let mut total_width = 0.0;
        for entry in entries {
            let galley = painter.layout_no_wrap(
                format_item(entry),
                font_id.clone(),
                UI_CONFIG.colors.neutral,
            );
            total_width += galley.size().x + UI_CONFIG.ticker.item_spacing;
        }
        if total_width < 1.0 {
            return None;
        }

        // Keep the offset negative-flowing inside one strip length.
        self.offset %= total_width;
        if self.offset > 0.0 {
            self.offset -= total_width;
        }

        let screen_width = panel_rect.width();
        let start_pos = panel_rect.min;
        let loops_needed = (screen_width / total_width).ceil() as i32 + 2;
        let mut clicked_pair = None;

        // Pass 2: draw every visible copy.
        for loop_idx in 0..loops_needed {
            let mut loop_x = self.offset + (loop_idx as f32 * total_width);

            for entry in entries {
                let pct = entry.quote.change_percent_24h;
                let text_color = if pct > f64::EPSILON {
                    UI_CONFIG.colors.up
                } else if pct < -f64::EPSILON {
                    UI_CONFIG.colors.down
                } else {
                    UI_CONFIG.colors.neutral
                };

                let galley = painter.layout_no_wrap(format_item(entry), font_id.clone(), text_color);
                let w = galley.size().x;
                let h = galley.size().y;

                if loop_x + w > 0.0 && loop_x < screen_width {
                    let x_snapped = (start_pos.x + loop_x).round();
                    let y_snapped = (start_pos.y + (height - h) / 2.0).round();
                    let pos = Pos2::new(x_snapped, y_snapped);
                    painter.galley(pos, galley, text_color);

                    if response.clicked() {
                        if let Some(pointer) = response.interact_pointer_pos() {
                            let item_rect = Rect::from_min_size(pos, Vec2::new(w, height));
                            if item_rect.contains(pointer) {
                                clicked_pair = Some(entry.quote.symbol.clone());
                            }
                        }
                    }
                }

                loop_x += w + UI_CONFIG.ticker.item_spacing;
            }
        }

        // Keep animating while we scroll.
        if !self.is_hovered && !self.is_dragging {
            ui.ctx().request_repaint();
        }

        clicked_pair
    }
}

use {
    eframe::egui::{Color32, Context, Visuals},
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        };
    }

    pub fn toggle_icon(&self) -> &'static str {
        match self {
            Self::Dark => "☀",
            Self::Light => "🌙",
        }
    }

    /// Sets up custom visuals for the entire application.
    pub fn apply(&self, ctx: &Context) {
        let mut visuals = match self {
            Self::Dark => Visuals::dark(),
            Self::Light => Visuals::light(),
        };

        match self {
            Self::Dark => {
                visuals.window_fill = Color32::from_rgb(17, 24, 39);
                visuals.panel_fill = Color32::from_rgb(31, 41, 55);
            }
            Self::Light => {
                visuals.window_fill = Color32::from_rgb(249, 250, 251);
                visuals.panel_fill = Color32::WHITE;
            }
        }

        ctx.set_visuals(visuals);
    }
}

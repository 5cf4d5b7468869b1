//! "Quantum indicators": pure random gauges re-rolled on a timer. The
//! quantum branding is cosmetic; there is no computation behind it.

use {
    eframe::egui::{Color32, ProgressBar, RichText, Ui},
    rand::Rng,
    std::time::Instant,
};

use crate::{config::QUANTUM_REFRESH, ui::UI_CONFIG};

struct QuantumReadout {
    qrng: f64,
    entanglement: f64,
    coherence: f64,
    optimization: f64,
}

impl QuantumReadout {
    fn roll() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            qrng: rng.r#gen(),
            entanglement: rng.r#gen::<f64>() * 0.8 + 0.1,
            coherence: rng.r#gen::<f64>() * 0.9 + 0.05,
            optimization: rng.r#gen::<f64>() * 100.0,
        }
    }
}

pub struct QuantumPanel {
    readout: QuantumReadout,
    last_roll: Instant,
}

impl Default for QuantumPanel {
    fn default() -> Self {
        Self {
            readout: QuantumReadout::roll(),
            last_roll: Instant::now(),
        }
    }
}

impl QuantumPanel {
    pub fn render(&mut self, ui: &mut Ui) {
        if self.last_roll.elapsed() >= QUANTUM_REFRESH {
            self.readout = QuantumReadout::roll();
            self.last_roll = Instant::now();
        }

        ui.horizontal(|ui| {
            ui.heading("Quantum Indicators");
            ui.label(
                RichText::new("experimental")
                    .small()
                    .color(UI_CONFIG.colors.quantum_qrng),
            );
        });
        ui.separator();

        gauge(
            ui,
            "Quantum RNG",
            format!("{:.6}", self.readout.qrng),
            self.readout.qrng as f32,
            UI_CONFIG.colors.quantum_qrng,
        );
        gauge(
            ui,
            "Entanglement",
            format!("{:.1}%", self.readout.entanglement * 100.0),
            self.readout.entanglement as f32,
            UI_CONFIG.colors.quantum_entanglement,
        );
        gauge(
            ui,
            "Coherence",
            format!("{:.1}%", self.readout.coherence * 100.0),
            self.readout.coherence as f32,
            UI_CONFIG.colors.quantum_coherence,
        );

        ui.add_space(4.0);
        ui.label(
            RichText::new(format!(
                "Portfolio optimization: {:.1}% efficiency (quantum annealing, simulated)",
                self.readout.optimization
            ))
            .small()
            .color(UI_CONFIG.colors.subdued),
        );
    }
}

fn gauge(ui: &mut Ui, label: &str, value_text: String, fraction: f32, color: Color32) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.with_layout(
            eframe::egui::Layout::right_to_left(eframe::egui::Align::Center),
            |ui| {
                ui.monospace(value_text);
            },
        );
    });
    ui.add(ProgressBar::new(fraction).fill(color).desired_height(6.0));
    ui.add_space(4.0);
}

// Metronome UI
//
// The update loop doubles as the scheduling tick: egui repaints on the
// display cadence, and the controller drains its look-ahead window once per
// frame. Beat highlights are applied only when the audio clock reaches the
// corresponding click, keeping sight and sound in step.

use eframe::egui;

use crate::audio::parameters::AtomicF32;
use crate::controller::MetronomeController;
use crate::sequencer::meter::{MAX_BPM, MIN_BPM};
use crate::settings::{ENTRY_MAX_DIGITS, QuickPickRow};

/// An open quick-pick numeric entry
struct QuickPickEntry {
    row: QuickPickRow,
    index: usize,
    text: String,
    error: Option<String>,
}

pub struct MetronomeApp {
    controller: MetronomeController,
    volume_atomic: AtomicF32,
    volume_ui: f32,
    active_beat: Option<u32>,
    entry: Option<QuickPickEntry>,
}

impl MetronomeApp {
    pub fn new(controller: MetronomeController, volume_atomic: AtomicF32) -> Self {
        let volume_ui = volume_atomic.get();
        Self {
            controller,
            volume_atomic,
            volume_ui,
            active_beat: None,
            entry: None,
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        // Keys go to the entry window while it is open
        if self.entry.is_some() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.controller.toggle_playback();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowUp)) {
            self.controller.nudge_tempo(1);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowDown)) {
            self.controller.nudge_tempo(-1);
        }
    }

    fn draw_transport(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            let label = if self.controller.is_running() {
                "⏸ Stop"
            } else {
                "▶ Play"
            };
            let button = egui::Button::new(egui::RichText::new(label).size(22.0))
                .min_size(egui::vec2(160.0, 44.0));
            if ui.add(button).clicked() {
                self.controller.toggle_playback();
            }
        });
    }

    fn draw_tempo(&mut self, ui: &mut egui::Ui) {
        let tempo = self.controller.settings().tempo;

        ui.vertical_centered(|ui| {
            // Drag-to-spin: relative drag on the readout, one BPM per step
            let mut bpm = tempo.bpm();
            let drag = egui::DragValue::new(&mut bpm)
                .range(MIN_BPM..=MAX_BPM)
                .speed(0.2);
            let response = ui.add_sized([120.0, 48.0], drag);
            if response.changed() {
                self.controller.set_tempo(bpm);
            }

            ui.label(egui::RichText::new(tempo.marking()).italics().size(16.0));
        });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.add_space(ui.available_width() / 2.0 - 40.0);
            if ui.button("−").clicked() {
                self.controller.nudge_tempo(-1);
            }
            ui.add_space(24.0);
            if ui.button("+").clicked() {
                self.controller.nudge_tempo(1);
            }
        });
    }

    fn draw_beat_dots(&mut self, ui: &mut egui::Ui) {
        let beats_per_bar = self.controller.settings().meter.beats_per_bar();
        let accent_enabled = self.controller.settings().accent_enabled;

        ui.vertical_centered(|ui| {
            ui.horizontal(|ui| {
                ui.add_space(ui.available_width() / 2.0 - beats_per_bar as f32 * 11.0);
                for beat in 0..beats_per_bar as u32 {
                    let lit = self.active_beat == Some(beat);
                    let color = if lit {
                        egui::Color32::from_rgb(110, 190, 255)
                    } else if beat == 0 && accent_enabled {
                        egui::Color32::from_rgb(150, 120, 60)
                    } else {
                        egui::Color32::from_gray(90)
                    };
                    let glyph = if lit { "●" } else { "○" };
                    ui.colored_label(color, egui::RichText::new(glyph).size(18.0));
                }
            });
        });
    }

    fn draw_meter_controls(&mut self, ui: &mut egui::Ui) {
        let meter = self.controller.settings().meter;

        ui.horizontal(|ui| {
            ui.label("Beats per bar:");
            let mut beats = meter.beats_per_bar();
            egui::ComboBox::from_id_salt("beats_per_bar_selector")
                .selected_text(beats.to_string())
                .show_ui(ui, |ui| {
                    for option in [2u8, 3, 4, 5, 6, 7] {
                        ui.selectable_value(&mut beats, option, option.to_string());
                    }
                });
            if beats != meter.beats_per_bar() {
                self.controller.set_beats_per_bar(beats);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Subdivision:");
            let mut subdivision = meter.subdivision();
            egui::ComboBox::from_id_salt("subdivision_selector")
                .selected_text(subdivision_label(subdivision))
                .show_ui(ui, |ui| {
                    for option in [1u8, 2, 3, 4] {
                        ui.selectable_value(&mut subdivision, option, subdivision_label(option));
                    }
                });
            if subdivision != meter.subdivision() {
                self.controller.set_subdivision(subdivision);
            }
        });

        let mut accent = self.controller.settings().accent_enabled;
        if ui.checkbox(&mut accent, "Accent first beat").changed() {
            self.controller.set_accent_enabled(accent);
        }
    }

    fn draw_quick_pick_row(&mut self, ui: &mut egui::Ui, row: QuickPickRow, tint: egui::Color32) {
        let editing = self.controller.is_editing(row);
        let current_bpm = self.controller.settings().tempo.bpm();
        let values: Vec<u16> = self.controller.settings().quick_picks.row(row).to_vec();

        ui.horizontal(|ui| {
            let edit_label = if editing { "✔" } else { "✏" };
            if ui
                .button(edit_label)
                .on_hover_text("Edit this row")
                .clicked()
            {
                self.controller.toggle_edit_mode(row);
            }

            for (index, value) in values.iter().enumerate() {
                let selected = *value == current_bpm;
                let fill = if selected {
                    tint
                } else if editing {
                    egui::Color32::from_gray(70)
                } else {
                    egui::Color32::from_gray(40)
                };
                let button = egui::Button::new(value.to_string()).fill(fill);
                if ui.add(button).clicked() {
                    if editing {
                        self.entry = Some(QuickPickEntry {
                            row,
                            index,
                            text: value.to_string(),
                            error: None,
                        });
                    } else {
                        self.controller.select_quick_pick(row, index);
                    }
                }
            }
        });
    }

    fn draw_entry_window(&mut self, ctx: &egui::Context) {
        let Some(entry) = &mut self.entry else {
            return;
        };

        let mut submitted = false;
        let mut cancelled = false;

        egui::Window::new("Edit tempo")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let response = ui.text_edit_singleline(&mut entry.text);
                // Digits only, capped at the widest valid tempo
                entry.text.retain(|c| c.is_ascii_digit());
                entry.text.truncate(ENTRY_MAX_DIGITS);
                response.request_focus();

                if let Some(error) = &entry.error {
                    ui.colored_label(egui::Color32::RED, error);
                }

                ui.horizontal(|ui| {
                    if ui.button("OK").clicked()
                        || ui.input(|i| i.key_pressed(egui::Key::Enter))
                    {
                        submitted = true;
                    }
                    if ui.button("Cancel").clicked()
                        || ui.input(|i| i.key_pressed(egui::Key::Escape))
                    {
                        cancelled = true;
                    }
                });
            });

        if cancelled {
            self.entry = None;
            return;
        }
        if submitted {
            let (row, index, text) = (entry.row, entry.index, entry.text.clone());
            match self.controller.commit_quick_pick_edit(row, index, &text) {
                Ok(_) => self.entry = None,
                Err(err) => {
                    if let Some(entry) = &mut self.entry {
                        entry.error = Some(err.to_string());
                    }
                }
            }
        }
    }

    fn draw_volume(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Volume:");
            if ui
                .add(egui::Slider::new(&mut self.volume_ui, 0.0..=1.0))
                .changed()
            {
                self.volume_atomic.set(self.volume_ui);
            }
        });
    }
}

fn subdivision_label(subdivision: u8) -> &'static str {
    match subdivision {
        1 => "Quarter",
        2 => "Eighth",
        3 => "Triplet",
        4 => "Sixteenth",
        _ => "Custom",
    }
}

impl eframe::App for MetronomeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keep repainting: the frame loop is the scheduling cadence
        ctx.request_repaint();

        self.controller.tick();
        if let Some(beat_index) = self.controller.due_visual() {
            let subdivision = self.controller.settings().meter.subdivision() as u32;
            // Only the first subdivision of a beat lights its dot
            self.active_beat = if beat_index % subdivision == 0 {
                Some(beat_index / subdivision)
            } else {
                None
            };
        }
        if !self.controller.is_running() {
            self.active_beat = None;
        }

        self.handle_keys(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Woodblock");
            });
            ui.separator();
            ui.add_space(8.0);

            self.draw_tempo(ui);
            ui.add_space(8.0);
            self.draw_beat_dots(ui);
            ui.add_space(8.0);
            self.draw_transport(ui);

            ui.add_space(12.0);
            ui.separator();
            self.draw_meter_controls(ui);

            ui.add_space(12.0);
            ui.separator();
            ui.label("Quick picks:");
            self.draw_quick_pick_row(ui, QuickPickRow::Top, egui::Color32::from_rgb(70, 110, 180));
            self.draw_quick_pick_row(
                ui,
                QuickPickRow::Bottom,
                egui::Color32::from_rgb(170, 90, 140),
            );

            ui.add_space(12.0);
            ui.separator();
            self.draw_volume(ui);
        });

        self.draw_entry_window(ctx);
    }
}

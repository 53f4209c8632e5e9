use super::state::{FormField, SubmissionStatus};
use super::RegisterScreen;
use crate::i18n::MessageKey;
use eframe::egui::{self, Color32, RichText, Sense, Stroke};

const ACCENT: Color32 = Color32::from_rgb(22, 163, 74);
const ERROR: Color32 = Color32::from_rgb(220, 50, 50);

impl RegisterScreen {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(16.0);
                ui.vertical_centered(|ui| {
                    ui.heading(self.controller.text(MessageKey::Title));
                });
                ui.add_space(16.0);

                self.render_fields(ui);
                ui.add_space(12.0);
                self.render_drop_zone(ui);
                ui.add_space(12.0);
                self.render_actions(ui);
                self.render_status(ui);
            });
        });
    }

    fn render_fields(&mut self, ui: &mut egui::Ui) {
        let fields = [
            (FormField::FirstName, MessageKey::FirstName),
            (FormField::LastName, MessageKey::LastName),
            (FormField::MiddleName, MessageKey::MiddleName),
        ];

        for (field, hint) in fields {
            let hint = self.controller.text(hint);
            let mut value = self.controller.form().field(field).to_string();
            let edit = egui::TextEdit::singleline(&mut value)
                .hint_text(hint)
                .desired_width(f32::INFINITY);
            if ui.add(edit).changed() {
                self.controller.update_field(field, value);
            }
            ui.add_space(6.0);
        }
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui) {
        let frame = egui::Frame::none()
            .stroke(Stroke::new(1.0, Color32::GRAY))
            .rounding(6.0)
            .inner_margin(16.0);

        let response = frame
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| match self.controller.preview() {
                    Some(preview) => {
                        ui.image((preview.texture_id(), preview.size()));
                    }
                    None => {
                        ui.label(RichText::new("⬆").size(28.0).color(Color32::GRAY));
                        ui.label(
                            RichText::new(self.controller.text(MessageKey::ClickToUpload))
                                .color(Color32::GRAY),
                        );
                    }
                });
            })
            .response
            .interact(Sense::click());

        if let Some(file) = self.controller.selected_file() {
            ui.label(
                RichText::new(format!("{} ({})", file.file_name, file.size_label()))
                    .small()
                    .color(ui.visuals().text_color().gamma_multiply(0.7)),
            );
        }

        if response.clicked() {
            self.pick_file();
        }
    }

    fn render_actions(&mut self, ui: &mut egui::Ui) {
        let loading = self.controller.is_loading();
        let half = (ui.available_width() - ui.spacing().item_spacing.x) / 2.0;

        ui.horizontal(|ui| {
            let submit = ui.add_enabled_ui(!loading, |ui| {
                if loading {
                    ui.add_sized([half, 36.0], egui::Spinner::new());
                    ui.label(self.controller.text(MessageKey::Uploading));
                    false
                } else {
                    let button = egui::Button::new(
                        RichText::new(self.controller.text(MessageKey::Upload)).color(Color32::WHITE),
                    )
                    .fill(ACCENT)
                    .min_size(egui::vec2(half, 36.0));
                    ui.add(button).clicked()
                }
            });

            let cancel = egui::Button::new(format!("✖ {}", self.controller.text(MessageKey::Cancel)))
                .min_size(egui::vec2(half, 36.0));
            let cleared = ui.add(cancel).clicked();

            if submit.inner {
                self.start_submit();
            }
            if cleared {
                self.clear();
            }
        });
    }

    fn render_status(&self, ui: &mut egui::Ui) {
        let color = match self.controller.status() {
            SubmissionStatus::Success(_) => ACCENT,
            SubmissionStatus::Error(_) => ERROR,
            SubmissionStatus::Idle | SubmissionStatus::Loading => return,
        };
        if let Some(message) = self.controller.status().message() {
            ui.add_space(8.0);
            ui.colored_label(color, message);
        }
    }
}

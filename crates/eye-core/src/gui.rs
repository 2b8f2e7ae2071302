use rand::Rng;

use crate::canvas::Canvas;
use crate::mood::{Mood, Position};
use crate::renderer::DisplayColors;
use crate::EyeAnimator;

pub fn eye_control_panel<C: Canvas, R: Rng>(
    ctx: &egui::Context,
    eyes: &mut EyeAnimator<C, R>,
    colors: &mut DisplayColors,
) {
    egui::SidePanel::right("eye_controls")
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading("Eye Controls");
            ui.separator();

            let mut mood = eyes.mood();
            egui::ComboBox::from_label("Mood")
                .selected_text(mood.label())
                .show_ui(ui, |ui| {
                    for option in Mood::ALL {
                        ui.selectable_value(&mut mood, option, option.label());
                    }
                });
            if mood != eyes.mood() {
                eyes.set_mood(mood);
            }

            ui.label("Look");
            egui::Grid::new("eye_position_grid").show(ui, |ui| {
                for row in Position::GRID {
                    for position in row {
                        let selected = eyes.position() == position;
                        if ui.selectable_label(selected, position.label()).clicked() {
                            eyes.set_position(position);
                        }
                    }
                    ui.end_row();
                }
            });

            ui.horizontal(|ui| {
                if ui.button("Blink").clicked() {
                    eyes.blink();
                }
                if ui.button("Laugh").clicked() {
                    eyes.trigger_laugh();
                }
                if ui.button("Confused").clicked() {
                    eyes.trigger_confused();
                }
            });

            ui.separator();

            let mut auto_blink = eyes.auto_blink().enabled;
            if ui.checkbox(&mut auto_blink, "Auto Blink").changed() {
                eyes.set_auto_blink(auto_blink, None, None);
            }
            let mut idle = eyes.idle().enabled;
            if ui.checkbox(&mut idle, "Idle Gaze").changed() {
                eyes.set_idle_mode(idle, None, None);
            }
            let mut curious = eyes.is_curious();
            if ui.checkbox(&mut curious, "Curious").changed() {
                eyes.set_curiosity(curious);
            }
            let mut cyclops = eyes.is_cyclops();
            if ui.checkbox(&mut cyclops, "Cyclops").changed() {
                eyes.set_cyclops(cyclops);
            }
            let mut sweat = eyes.is_sweating();
            if ui.checkbox(&mut sweat, "Sweat").changed() {
                eyes.set_sweat(sweat);
            }

            egui::CollapsingHeader::new("Flicker")
                .default_open(false)
                .show(ui, |ui| {
                    let mut enabled = eyes.horizontal_flicker().enabled;
                    let mut amplitude = eyes.horizontal_flicker().amplitude;
                    let toggled = ui.checkbox(&mut enabled, "Horizontal").changed();
                    let moved = ui
                        .add(egui::Slider::new(&mut amplitude, 0..=20).text("Amplitude X"))
                        .changed();
                    if toggled || moved {
                        eyes.set_horizontal_flicker(enabled, Some(amplitude));
                    }

                    let mut enabled = eyes.vertical_flicker().enabled;
                    let mut amplitude = eyes.vertical_flicker().amplitude;
                    let toggled = ui.checkbox(&mut enabled, "Vertical").changed();
                    let moved = ui
                        .add(egui::Slider::new(&mut amplitude, 0..=20).text("Amplitude Y"))
                        .changed();
                    if toggled || moved {
                        eyes.set_vertical_flicker(enabled, Some(amplitude));
                    }
                });

            egui::CollapsingHeader::new("Geometry")
                .default_open(false)
                .show(ui, |ui| {
                    let (left, right) = (eyes.left_eye().clone(), eyes.right_eye().clone());

                    let mut width = [left.width.default, right.width.default];
                    let mut height = [left.height.default, right.height.default];
                    let mut radius = [left.radius.default, right.radius.default];
                    let mut spacing = eyes.spacing().default;

                    if pair_sliders(ui, "Width", &mut width, 1..=64) {
                        eyes.set_eye_width(width[0], width[1]);
                    }
                    if pair_sliders(ui, "Height", &mut height, 1..=64) {
                        eyes.set_eye_height(height[0], height[1]);
                    }
                    if pair_sliders(ui, "Radius", &mut radius, 0..=32) {
                        eyes.set_border_radius(radius[0], radius[1]);
                    }
                    if ui
                        .add(egui::Slider::new(&mut spacing, -20..=40).text("Spacing"))
                        .changed()
                    {
                        eyes.set_spacing(spacing);
                    }
                });

            egui::CollapsingHeader::new("Appearance")
                .default_open(false)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("BG Color");
                        color_edit_rgb(ui, &mut colors.background);
                    });
                    ui.horizontal(|ui| {
                        ui.label("Eye Color");
                        color_edit_rgb(ui, &mut colors.foreground);
                    });
                });

            ui.separator();

            if ui.button("Reset").clicked() {
                *colors = DisplayColors::default();
                eyes.set_mood(Mood::Default);
                eyes.set_position(Position::Center);
            }
        });
}

fn pair_sliders(
    ui: &mut egui::Ui,
    name: &str,
    values: &mut [i32; 2],
    range: std::ops::RangeInclusive<i32>,
) -> bool {
    let left = ui
        .add(egui::Slider::new(&mut values[0], range.clone()).text(format!("{name} L")))
        .changed();
    let right = ui
        .add(egui::Slider::new(&mut values[1], range).text(format!("{name} R")))
        .changed();
    left || right
}

fn color_edit_rgb(ui: &mut egui::Ui, color: &mut [f32; 3]) {
    let mut rgba = egui::Color32::from_rgb(
        (color[0] * 255.0) as u8,
        (color[1] * 255.0) as u8,
        (color[2] * 255.0) as u8,
    );
    if ui.color_edit_button_srgba(&mut rgba).changed() {
        color[0] = rgba.r() as f32 / 255.0;
        color[1] = rgba.g() as f32 / 255.0;
        color[2] = rgba.b() as f32 / 255.0;
    }
}

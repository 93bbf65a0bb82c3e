use eframe::egui::{self, RichText};

use crate::settings::{parse_num_games, ConfigureSettings, Resolution, LOCATIONS, SNACKS};

pub const WINDOW_SIZE: egui::Vec2 = egui::vec2(268.0, 248.0);
pub const GAMES_PLACEHOLDER: &str = "1";

/// Widget state of the configuration screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigureForm {
    pub locations: [bool; 5],
    pub snacks: [bool; 5],
    pub games: String,
    pub resolution: Resolution,
}

impl ConfigureForm {
    /// Restores the widgets from the last submission, or uses defaults.
    pub fn new(previous: Option<&ConfigureSettings>) -> Self {
        let defaults = ConfigureSettings::default();
        let settings = previous.unwrap_or(&defaults);
        // A count of one is left to the placeholder.
        let games = if settings.num_games == 1 { String::new() } else { settings.num_games.to_string() };
        Self {
            locations: settings.locations,
            snacks: settings.snacks,
            games,
            resolution: settings.resolution,
        }
    }

    pub fn submit(&self) -> ConfigureSettings {
        ConfigureSettings {
            locations: self.locations,
            snacks: self.snacks,
            num_games: parse_num_games(&self.games),
            resolution: self.resolution,
        }
    }

    /// Draws the form. Returns true once "Start" is clicked.
    pub fn ui(&mut self, ui: &mut egui::Ui) -> bool {
        let heading = |text: &str| RichText::new(text).size(12.0).underline();

        ui.columns(2, |cols| {
            cols[0].label(heading("Locations to Farm"));
            for (checked, city) in self.locations.iter_mut().zip(LOCATIONS) {
                cols[0].checkbox(checked, city);
            }

            cols[1].label(heading("Pet Snacks to Feed"));
            for (checked, snack) in self.snacks.iter_mut().zip(SNACKS) {
                cols[1].checkbox(checked, snack);
            }
        });

        ui.separator();

        ui.columns(2, |cols| {
            cols[0].label(heading("Amount of Games"));
            cols[0].add(
                egui::TextEdit::singleline(&mut self.games)
                    .hint_text(GAMES_PLACEHOLDER)
                    .desired_width(90.0),
            );

            cols[1].label(heading("Resolution"));
            egui::ComboBox::from_id_source("resolution")
                .selected_text(self.resolution.to_string())
                .width(110.0)
                .show_ui(&mut cols[1], |ui| {
                    for r in Resolution::ALL {
                        ui.selectable_value(&mut self.resolution, r, r.to_string());
                    }
                });
        });

        ui.add_space(8.0);
        let start = egui::Button::new("Start").min_size(egui::vec2(ui.available_width(), 32.0));
        ui.add(start).clicked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_form_defaults() {
        let form = ConfigureForm::new(None);
        assert_eq!(form.locations, [true, false, false, false, false]);
        assert_eq!(form.snacks, [false; 5]);
        assert!(form.games.is_empty());
        assert_eq!(form.resolution, Resolution::R800x600);
        assert_eq!(form.submit(), ConfigureSettings::default());
    }

    #[test]
    fn test_reopen_restores_previous() {
        let mut form = ConfigureForm::new(None);
        form.locations = [false, true, true, false, true];
        form.snacks = [true, false, false, true, false];
        form.games = "4".into();
        form.resolution = Resolution::R1280x800;
        let settings = form.submit();

        let reopened = ConfigureForm::new(Some(&settings));
        assert_eq!(reopened, form);
        assert_eq!(reopened.submit(), settings);
    }

    #[test]
    fn test_single_game_shows_placeholder() {
        let settings = ConfigureSettings { num_games: 1, ..ConfigureSettings::default() };
        assert!(ConfigureForm::new(Some(&settings)).games.is_empty());
    }

    #[test]
    fn test_submit_coerces_games() {
        let mut form = ConfigureForm::new(None);
        form.games = "nope".into();
        assert_eq!(form.submit().num_games, 1);
        form.games = "-3".into();
        assert_eq!(form.submit().num_games, 1);
        form.games = "7".into();
        assert_eq!(form.submit().num_games, 7);
    }
}

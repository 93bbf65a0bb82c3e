mod app;
mod configure;
mod dance;
mod display;
#[cfg(feature = "hooks")]
mod hooks;
mod notice;
mod playing;
mod settings;

#[cfg(test)]
mod tests;

use clap::Parser;
use eframe::egui;
use std::time::Duration;

use crate::{
    dance::{DanceGame, PacedDance},
    settings::Resolution,
};

const DEFAULT_TURN_SECS: f32 = 4.0;

#[derive(Parser, Debug)]
#[command(name = "pet-dance", version, about = "Pet dance helper with progress tracking")]
pub struct Cli {
    /// Pre-fill the amount of games on the configuration screen
    #[arg(long)]
    pub games: Option<u32>,

    /// Pre-select the game client resolution
    #[arg(long, value_enum)]
    pub resolution: Option<Resolution>,

    /// Seconds each paced turn takes
    #[arg(long, default_value_t = DEFAULT_TURN_SECS)]
    pub turn_secs: f32,
}

impl Cli {
    /// Turn length from `--turn-secs`. Values a `Duration` cannot hold fall
    /// back to the default.
    pub fn turn_duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.turn_secs).unwrap_or_else(|e| {
            tracing::warn!(turn_secs = self.turn_secs, %e, "invalid --turn-secs, using the default");
            Duration::from_secs_f32(DEFAULT_TURN_SECS)
        })
    }
}

fn setup_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> eframe::Result<()> {
    setup_tracing();
    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed arguments");

    let turn_duration = cli.turn_duration();
    let app = app::PetDanceApp::new(&cli, move || -> Box<dyn DanceGame> {
        Box::new(PacedDance { turn_duration })
    });
    #[cfg(feature = "hooks")]
    hooks::spawn_quit_listener(app.quit_handle());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(app::TITLE)
            .with_inner_size(configure::WINDOW_SIZE)
            .with_position(display::centered_on_primary(configure::WINDOW_SIZE))
            .with_resizable(false),
        ..Default::default()
    };

    eframe::run_native(
        app::TITLE,
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Box::new(app)
        }),
    )
}

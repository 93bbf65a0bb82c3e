use eframe::egui::{self, RichText};
use std::time::{Duration, Instant};

use crate::{
    dance::TURNS_PER_ROUND,
    settings::{separate, Resolution, ResolutionError},
};

pub const PROGRESS_STEP: u8 = 20;
pub const PROGRESS_MAX: u8 = 100;
pub const FIRST_POLL_DELAY: Duration = Duration::from_millis(1000);
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);
pub const WINDOW_SIZE: egui::Vec2 = egui::vec2(300.0, 130.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase { Idle, Polling, Closed }

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome { Continue, Close }

#[derive(Debug)]
pub struct ProgressState {
    percent: u8,
    finished: bool,
    prev_turn: u32,
    phase: Phase,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self { percent: 0, finished: false, prev_turn: 0, phase: Phase::Idle }
    }
}

impl ProgressState {
    pub fn percent(&self) -> u8 { self.percent }
    pub fn finished(&self) -> bool { self.finished }

    pub fn label(&self) -> String {
        format!("Current Progress: {}%", self.percent)
    }

    fn step(&mut self) {
        if self.percent < PROGRESS_MAX {
            self.percent = (self.percent + PROGRESS_STEP).min(PROGRESS_MAX);
        }
        if self.percent == PROGRESS_MAX {
            self.finished = true;
        }
    }

    /// Counts one unseen turn. The watermark moves a single step per call, so
    /// turns skipped between samples are caught up on later ticks.
    fn sample(&mut self, turn: u32) -> bool {
        if turn <= TURNS_PER_ROUND && turn != self.prev_turn {
            self.prev_turn += 1;
            self.step();
            return true;
        }
        false
    }

    /// One tick of the poller. Cancellation closes at once. A dead worker
    /// closes on the first tick with no unseen turn left, so its last turns
    /// still show. Reaching 100% alone never closes the window.
    pub fn poll(&mut self, worker_alive: bool, cancelled: bool, turn: u32) -> PollOutcome {
        if self.phase == Phase::Closed {
            return PollOutcome::Close;
        }
        if cancelled {
            self.close();
            return PollOutcome::Close;
        }
        let stepped = self.sample(turn);
        if !worker_alive && !stepped {
            self.close();
            return PollOutcome::Close;
        }
        self.phase = Phase::Polling;
        PollOutcome::Continue
    }

    /// Idempotent; later polls are no-ops.
    pub fn close(&mut self) {
        self.phase = Phase::Closed;
    }
}

/// Fixed-cadence tick source: one delayed first tick, then a steady interval.
#[derive(Debug)]
pub struct PollTimer {
    next_due: Instant,
    interval: Duration,
}

impl PollTimer {
    pub fn new(now: Instant) -> Self {
        Self { next_due: now + FIRST_POLL_DELAY, interval: POLL_INTERVAL }
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        if now < self.next_due { return false; }
        self.next_due = now + self.interval;
        true
    }

    pub fn until_next(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}

/// Top-left corner of the progress window for the given game resolution.
pub fn window_position(resolution: Resolution) -> Result<egui::Pos2, ResolutionError> {
    let (width, height) = separate(&resolution.to_string(), 'x')?;
    Ok(egui::pos2(width as f32, (height / 10 * 7) as f32))
}

pub struct PlayingScreen {
    pub progress: ProgressState,
    pub timer: PollTimer,
    pub current_game: u32,
    pub num_games: u32,
}

impl PlayingScreen {
    pub fn new(current_game: u32, num_games: u32, now: Instant) -> Self {
        Self { progress: ProgressState::default(), timer: PollTimer::new(now), current_game, num_games }
    }

    pub fn games_label(&self) -> String {
        format!("Game {} of {}", self.current_game + 1, self.num_games)
    }

    /// Draws the screen. Returns true when the user asked to quit.
    pub fn ui(&self, ui: &mut egui::Ui) -> bool {
        let padx = 16.0;
        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new(self.progress.label()).size(12.0).strong());
                if self.progress.finished() {
                    ui.label(RichText::new("Done").color(egui::Color32::LIGHT_GREEN));
                }
            });
        });
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.add_space(padx);
            let bar = egui::ProgressBar::new(self.progress.percent() as f32 / PROGRESS_MAX as f32)
                .desired_width(WINDOW_SIZE.x - 2.0 * padx);
            ui.add(bar);
        });
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.add_space(padx);
            ui.label(RichText::new(self.games_label()).size(11.0).strong());
            ui.add_space(padx);
            ui.label("(press 'q' to quit)");
        });

        ui.input(|i| i.key_pressed(egui::Key::Q))
    }
}

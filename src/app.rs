use eframe::egui;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};

use crate::{
    configure::{self, ConfigureForm},
    dance::{DanceGame, DanceJob, Round},
    display,
    notice::Notice,
    playing::{self, PlayingScreen, PollOutcome},
    settings::{ConfigureSettings, Resolution},
    Cli,
};

pub const TITLE: &str = "W101 Pet Dance";

type GameFactory = Box<dyn Fn() -> Box<dyn DanceGame>>;

enum Screen {
    Configure(ConfigureForm),
    Playing { screen: PlayingScreen, job: DanceJob },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layout { Configure, Playing(Resolution) }

pub struct PetDanceApp {
    screen: Screen,
    settings: Option<Arc<ConfigureSettings>>,
    new_game: GameFactory,
    quit_requested: Arc<AtomicBool>,
    // Cancelled workers still finishing their current turn.
    stopping: Vec<DanceJob>,
    notice: Option<Notice>,
    applied_layout: Option<Layout>,
}

impl PetDanceApp {
    pub fn new(cli: &Cli, new_game: impl Fn() -> Box<dyn DanceGame> + 'static) -> Self {
        let seeded = (cli.games.is_some() || cli.resolution.is_some()).then(|| {
            let defaults = ConfigureSettings::default();
            Arc::new(ConfigureSettings {
                num_games: cli.games.unwrap_or(defaults.num_games).max(1),
                resolution: cli.resolution.unwrap_or(defaults.resolution),
                ..defaults
            })
        });

        Self {
            screen: Screen::Configure(ConfigureForm::new(seeded.as_deref())),
            settings: seeded,
            new_game: Box::new(new_game),
            quit_requested: Arc::new(AtomicBool::new(false)),
            stopping: Vec::new(),
            notice: None,
            // Marks the initial viewport from NativeOptions as applied.
            applied_layout: Some(Layout::Configure),
        }
    }

    /// Flag a global key hook can raise to cancel the running game.
    #[cfg(feature = "hooks")]
    pub fn quit_handle(&self) -> Arc<AtomicBool> { Arc::clone(&self.quit_requested) }

    pub fn is_configuring(&self) -> bool { matches!(self.screen, Screen::Configure(_)) }

    fn layout(&self) -> Layout {
        match (&self.screen, &self.settings) {
            (Screen::Playing { .. }, Some(settings)) => Layout::Playing(settings.resolution),
            _ => Layout::Configure,
        }
    }

    fn back_to_configure(&mut self) {
        self.screen = Screen::Configure(ConfigureForm::new(self.settings.as_deref()));
    }

    /// Freezes the form and starts the first game.
    pub fn start_batch(&mut self, settings: ConfigureSettings) {
        tracing::info!(?settings, "configuration submitted");
        self.settings = Some(Arc::new(settings));
        self.quit_requested.store(false, Ordering::Relaxed);
        self.start_round(0);
    }

    fn start_round(&mut self, index: u32) {
        let Some(settings) = self.settings.clone() else {
            self.back_to_configure();
            return;
        };
        let round = Round { index, total: settings.num_games, settings };
        let screen = PlayingScreen::new(index, round.total, Instant::now());
        let job = DanceJob::spawn((self.new_game)(), round);
        self.screen = Screen::Playing { screen, job };
    }

    fn reap_stopped(&mut self) {
        let (done, running): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.stopping).into_iter().partition(|job| !job.is_alive());
        self.stopping = running;
        for job in done {
            if let Err(e) = job.join() {
                tracing::warn!(%e, "cancelled worker ended with an error");
            }
        }
    }

    /// Samples the worker once, without waiting for the poll timer.
    pub fn poll_round(&mut self) {
        self.reap_stopped();
        let quit = self.quit_requested.swap(false, Ordering::Relaxed);
        let Screen::Playing { screen, job } = &mut self.screen else { return };
        if quit { job.stop(); }
        let signals = job.signals();
        let outcome = screen.progress.poll(job.is_alive(), signals.is_cancelled(), signals.turn());
        if outcome == PollOutcome::Close {
            self.end_round();
        }
    }

    /// User asked to quit the running game.
    pub fn cancel_round(&mut self) {
        let Screen::Playing { job, .. } = &self.screen else { return };
        tracing::info!("cancel requested");
        job.stop();
        self.end_round();
    }

    fn end_round(&mut self) {
        let placeholder = Screen::Configure(ConfigureForm::new(self.settings.as_deref()));
        let Screen::Playing { mut screen, job } = std::mem::replace(&mut self.screen, placeholder) else {
            return;
        };
        screen.progress.close();

        let cancelled = job.signals().is_cancelled();
        let result = if job.is_alive() {
            self.stopping.push(job);
            Ok(())
        } else {
            job.join()
        };
        let total = screen.num_games;
        let played = screen.current_game + 1;
        tracing::info!(game = played, total, percent = screen.progress.percent(), "game ended");

        if let Err(e) = result {
            self.notice = Some(Notice::error("Pet Dance stopped", format!("Game {played} of {total}: {e}")));
            self.back_to_configure();
        } else if cancelled {
            self.notice = Some(Notice::warning(
                "Pet Dance cancelled",
                format!("Stopped during game {played} of {total}."),
            ));
            self.back_to_configure();
        } else if played < total {
            self.start_round(played);
        } else {
            self.notice = Some(Notice::info("Pet Dance", format!("Finished {total} game(s).")));
            self.back_to_configure();
        }
    }

    fn apply_layout(&mut self, ctx: &egui::Context) {
        let layout = self.layout();
        if self.applied_layout == Some(layout) { return; }
        let (size, pos) = match layout {
            Layout::Configure => (configure::WINDOW_SIZE, display::centered_on_primary(configure::WINDOW_SIZE)),
            Layout::Playing(resolution) => {
                let pos = playing::window_position(resolution).unwrap_or_else(|e| {
                    tracing::warn!(%e, "falling back to a centred progress window");
                    display::centered_on_primary(playing::WINDOW_SIZE)
                });
                (playing::WINDOW_SIZE, pos)
            }
        };
        ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(size));
        ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(pos));
        self.applied_layout = Some(layout);
    }
}

impl eframe::App for PetDanceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_layout(ctx);
        self.reap_stopped();

        let close_requested = ctx.input(|i| i.viewport().close_requested());
        if close_requested && !self.is_configuring() {
            // Closing the progress window only ends the current game.
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.cancel_round();
        }

        if let Some(notice) = &self.notice {
            if notice.show(ctx) { self.notice = None; }
        }

        let now = Instant::now();
        let mut submitted = None;
        let mut quit = false;
        egui::CentralPanel::default().show(ctx, |ui| match &mut self.screen {
            Screen::Configure(form) => {
                if form.ui(ui) { submitted = Some(form.submit()); }
            }
            Screen::Playing { screen, .. } => {
                quit = screen.ui(ui);
            }
        });

        if let Some(settings) = submitted {
            self.notice = None;
            self.start_batch(settings);
        } else if quit {
            self.cancel_round();
        }

        let due = match &mut self.screen {
            Screen::Playing { screen, .. } => screen.timer.tick(now),
            Screen::Configure(_) => false,
        };
        if due { self.poll_round(); }

        if let Screen::Playing { screen, .. } = &self.screen {
            ctx.request_repaint_after(screen.timer.until_next(Instant::now()));
        } else if !self.stopping.is_empty() {
            ctx.request_repaint_after(playing::POLL_INTERVAL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dance::{DanceError, DanceSignals, PacedDance},
        notice::NoticeKind,
    };
    use std::{thread, time::Duration};

    fn cli() -> Cli {
        Cli { games: None, resolution: None, turn_secs: 1.0 }
    }

    fn paced(turn: Duration) -> impl Fn() -> Box<dyn DanceGame> {
        move || -> Box<dyn DanceGame> { Box::new(PacedDance { turn_duration: turn }) }
    }

    /// Sleeps through each turn without looking at the cancel flag.
    struct Stubborn(Duration);

    impl DanceGame for Stubborn {
        fn play_turn(&mut self, _: &Round, _: u32, _: &DanceSignals) -> Result<(), DanceError> {
            thread::sleep(self.0);
            Ok(())
        }
    }

    fn settings(num_games: u32) -> ConfigureSettings {
        ConfigureSettings {
            locations: [true, true, false, false, false],
            snacks: [false, true, false, false, false],
            num_games,
            resolution: Resolution::R1280x800,
        }
    }

    fn current_game(app: &PetDanceApp) -> Option<u32> {
        match &app.screen {
            Screen::Playing { screen, .. } => Some(screen.current_game),
            Screen::Configure(_) => None,
        }
    }

    fn percent(app: &PetDanceApp) -> Option<u8> {
        match &app.screen {
            Screen::Playing { screen, .. } => Some(screen.progress.percent()),
            Screen::Configure(_) => None,
        }
    }

    fn form(app: &PetDanceApp) -> &ConfigureForm {
        match &app.screen {
            Screen::Configure(form) => form,
            Screen::Playing { .. } => panic!("expected the configure screen"),
        }
    }

    #[test]
    fn test_app_defaults() {
        let app = PetDanceApp::new(&cli(), paced(Duration::ZERO));
        assert!(app.is_configuring());
        assert!(app.settings.is_none());
        assert!(app.notice.is_none());
        assert_eq!(form(&app).submit(), ConfigureSettings::default());
    }

    #[test]
    fn test_cli_seeds_form() {
        let cli = Cli { games: Some(3), resolution: Some(Resolution::R1280x800), turn_secs: 1.0 };
        let app = PetDanceApp::new(&cli, paced(Duration::ZERO));
        assert_eq!(form(&app).games, "3");
        assert_eq!(form(&app).resolution, Resolution::R1280x800);
    }

    #[test]
    fn test_batch_plays_every_game_then_restores_form() {
        let mut app = PetDanceApp::new(&cli(), paced(Duration::from_millis(2)));
        app.start_batch(settings(3));
        assert_eq!(current_game(&app), Some(0));

        let mut games = Vec::new();
        let start = Instant::now();
        while !app.is_configuring() && start.elapsed() < Duration::from_secs(10) {
            if let Some(game) = current_game(&app) {
                if games.last() != Some(&game) { games.push(game); }
            }
            app.poll_round();
            thread::sleep(Duration::from_millis(2));
        }

        assert_eq!(games, vec![0, 1, 2]);
        assert_eq!(app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Info));
        assert_eq!(form(&app).submit(), settings(3));
    }

    #[test]
    fn test_progress_reaches_full_before_closing() {
        let mut app = PetDanceApp::new(&cli(), paced(Duration::from_millis(500)));
        app.start_batch(settings(1));

        let mut highest = 0;
        let start = Instant::now();
        while !app.is_configuring() && start.elapsed() < Duration::from_secs(10) {
            thread::sleep(playing::POLL_INTERVAL);
            app.poll_round();
            highest = highest.max(percent(&app).unwrap_or(0));
        }
        assert!(app.is_configuring());
        assert_eq!(highest, 100);
    }

    #[test]
    fn test_cancel_does_not_wait_for_worker() {
        let mut app = PetDanceApp::new(&cli(), || Box::new(Stubborn(Duration::from_secs(2))));
        app.start_batch(settings(2));

        let start = Instant::now();
        app.cancel_round();
        assert!(start.elapsed() < Duration::from_millis(500));
        assert!(app.is_configuring());
        assert_eq!(app.stopping.len(), 1);
        assert_eq!(app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Warning));

        // Cancelling again is a no-op.
        app.cancel_round();
        assert!(app.is_configuring());
    }

    #[test]
    fn test_stopped_worker_is_reaped_later() {
        let mut app = PetDanceApp::new(&cli(), || Box::new(Stubborn(Duration::from_millis(50))));
        app.start_batch(settings(1));
        app.cancel_round();
        assert_eq!(app.stopping.len(), 1);

        thread::sleep(Duration::from_millis(300));
        app.poll_round();
        assert!(app.stopping.is_empty());
    }

    #[test]
    fn test_quit_request_closes_on_next_poll() {
        let mut app = PetDanceApp::new(&cli(), paced(Duration::from_secs(5)));
        app.start_batch(settings(1));
        app.quit_requested.store(true, Ordering::Relaxed);
        app.poll_round();
        assert!(app.is_configuring());
        assert_eq!(app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Warning));
    }

    #[test]
    fn test_new_batch_clears_stale_quit_request() {
        let mut app = PetDanceApp::new(&cli(), paced(Duration::from_secs(5)));
        app.quit_requested.store(true, Ordering::Relaxed);
        app.start_batch(settings(1));
        app.poll_round();
        assert_eq!(current_game(&app), Some(0));
        app.cancel_round();
    }
}

use parking_lot::Mutex;
use rand::Rng;
use std::{
    sync::{
        atomic::{AtomicBool, AtomicU32, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};
use thiserror::Error;

use crate::settings::ConfigureSettings;

pub const TURNS_PER_ROUND: u32 = 5;

#[derive(Debug, Error)]
pub enum DanceError {
    #[error("dance worker panicked")]
    WorkerPanicked,
    #[error("turn {turn} failed: {reason}")]
    Turn { turn: u32, reason: String },
}

/// State shared between one round's worker and the progress screen. Every
/// round gets a fresh instance, so a cancelled worker that is still winding
/// down cannot touch the next round's counter.
#[derive(Debug, Default)]
pub struct DanceSignals {
    turn: AtomicU32,
    q_pressed: AtomicBool,
}

impl DanceSignals {
    pub fn turn(&self) -> u32 { self.turn.load(Ordering::Relaxed) }
    pub fn is_cancelled(&self) -> bool { self.q_pressed.load(Ordering::Relaxed) }
    pub fn cancel(&self) { self.q_pressed.store(true, Ordering::Relaxed); }

    fn advance_turn(&self) -> u32 { self.turn.fetch_add(1, Ordering::Relaxed) + 1 }
}

#[derive(Clone, Debug)]
pub struct Round {
    pub index: u32,
    pub total: u32,
    pub settings: Arc<ConfigureSettings>,
}

/// One turn of in-game action. Implementations should return promptly once
/// `signals.is_cancelled()` turns true.
pub trait DanceGame: Send + 'static {
    fn play_turn(&mut self, round: &Round, turn: u32, signals: &DanceSignals) -> Result<(), DanceError>;
}

impl DanceGame for Box<dyn DanceGame> {
    fn play_turn(&mut self, round: &Round, turn: u32, signals: &DanceSignals) -> Result<(), DanceError> {
        (**self).play_turn(round, turn, signals)
    }
}

pub struct DanceJob {
    signals: Arc<DanceSignals>,
    handle: Option<JoinHandle<()>>,
    outcome: Arc<Mutex<Option<DanceError>>>,
}

impl DanceJob {
    pub fn spawn<G: DanceGame>(mut game: G, round: Round) -> Self {
        let signals = Arc::new(DanceSignals::default());
        let outcome = Arc::new(Mutex::new(None));
        let signals_clone = Arc::clone(&signals);
        let outcome_clone = Arc::clone(&outcome);

        tracing::info!(game = round.index + 1, total = round.total, "starting dance round");

        let handle = thread::spawn(move || {
            for turn in 1..=TURNS_PER_ROUND {
                if signals_clone.is_cancelled() { break; }
                if let Err(e) = game.play_turn(&round, turn, &signals_clone) {
                    tracing::warn!(%e, "dance round aborted");
                    *outcome_clone.lock() = Some(e);
                    return;
                }
                if signals_clone.is_cancelled() { break; }
                let now = signals_clone.advance_turn();
                tracing::debug!(turn = now, "turn complete");
            }
        });

        Self { signals, handle: Some(handle), outcome }
    }

    pub fn is_alive(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn signals(&self) -> &DanceSignals { &self.signals }

    /// Asks the worker to stop after its current turn. Does not wait.
    pub fn stop(&self) { self.signals.cancel(); }

    /// Waits for the worker thread and reports how the round ended.
    pub fn join(mut self) -> Result<(), DanceError> {
        if let Some(handle) = self.handle.take() {
            handle.join().map_err(|_| DanceError::WorkerPanicked)?;
        }
        match self.outcome.lock().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Paces turns without sending any input to the game client.
pub struct PacedDance {
    pub turn_duration: Duration,
}

impl DanceGame for PacedDance {
    fn play_turn(&mut self, round: &Round, turn: u32, signals: &DanceSignals) -> Result<(), DanceError> {
        if turn == 1 {
            let locations = round.settings.selected_locations();
            let snacks = round.settings.selected_snacks();
            tracing::debug!(?locations, ?snacks, "pacing round");
        }

        let base = self.turn_duration.as_millis() as u64;
        let jitter = base / 10;
        let ms = if jitter > 0 { rand::thread_rng().gen_range(base - jitter..=base + jitter) } else { base };

        for _ in 0..ms / 50 {
            if signals.is_cancelled() { return Ok(()); }
            thread::sleep(Duration::from_millis(50));
        }
        if ms % 50 != 0 { thread::sleep(Duration::from_millis(ms % 50)); }
        Ok(())
    }
}

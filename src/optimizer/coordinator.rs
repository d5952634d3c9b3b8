use crate::keymap::Keymap;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Receives search updates. Both hooks run while the coordinator lock is
/// held, so implementations must be quick and must not call back into the
/// coordinator.
pub trait ProgressCallback: Send + Sync {
    /// A worker raised the global best.
    fn on_improvement(&self, snapshot: &SearchSnapshot);

    /// A worker finished a tier of trials.
    fn on_progress(&self, _snapshot: &SearchSnapshot) {}
}

impl ProgressCallback for () {
    fn on_improvement(&self, _snapshot: &SearchSnapshot) {}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSnapshot {
    pub keymap: Option<Keymap>,
    pub fitness: f64,
    /// Generation that produced the current best.
    pub best_generation: u64,
    pub generations: u64,
    pub layouts_evaluated: u64,
    pub elapsed_secs: f64,
    /// Layouts evaluated per second since the search started.
    pub throughput: f64,
}

struct GlobalState {
    generations: u64,
    layouts: u64,
    best_fitness: f64,
    best_keymap: Option<Keymap>,
    best_generation: u64,
}

/// The only state shared between workers. Every read and write of the best
/// keymap and the counters goes through one lock.
pub struct Coordinator<CB> {
    state: Mutex<GlobalState>,
    callback: CB,
    started: Instant,
    stop: AtomicBool,
    max_time: Option<Duration>,
    max_generations: Option<u64>,
}

impl<CB: ProgressCallback> Coordinator<CB> {
    pub fn new(callback: CB) -> Self {
        Self {
            state: Mutex::new(GlobalState {
                generations: 0,
                layouts: 0,
                best_fitness: f64::NEG_INFINITY,
                best_keymap: None,
                best_generation: 0,
            }),
            callback,
            started: Instant::now(),
            stop: AtomicBool::new(false),
            max_time: None,
            max_generations: None,
        }
    }

    pub fn with_limits(mut self, max_time: Option<Duration>, max_generations: Option<u64>) -> Self {
        self.max_time = max_time;
        self.max_generations = max_generations;
        self
    }

    pub fn callback(&self) -> &CB {
        &self.callback
    }

    fn lock(&self) -> MutexGuard<'_, GlobalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot_of(&self, s: &GlobalState) -> SearchSnapshot {
        let elapsed = self.started.elapsed().as_secs_f64();
        SearchSnapshot {
            keymap: s.best_keymap,
            fitness: s.best_fitness,
            best_generation: s.best_generation,
            generations: s.generations,
            layouts_evaluated: s.layouts,
            elapsed_secs: elapsed,
            throughput: if elapsed > 0.0 {
                s.layouts as f64 / elapsed
            } else {
                0.0
            },
        }
    }

    /// Claims the next generation index, or `None` once the generation
    /// budget is spent or a stop was requested.
    pub fn begin_generation(&self) -> Option<u64> {
        if self.should_stop() {
            return None;
        }
        let mut s = self.lock();
        if let Some(max) = self.max_generations {
            if s.generations >= max {
                return None;
            }
        }
        let index = s.generations;
        s.generations += 1;
        Some(index)
    }

    pub fn record_evaluations(&self, count: u64) {
        let mut s = self.lock();
        s.layouts += count;
        let snapshot = self.snapshot_of(&s);
        self.callback.on_progress(&snapshot);
    }

    /// Replaces the global best iff `fitness` is strictly higher.
    /// Returns whether the candidate was accepted.
    pub fn propose(&self, fitness: f64, keymap: &Keymap, generation: u64) -> bool {
        let mut s = self.lock();
        if fitness.is_nan() || fitness <= s.best_fitness {
            return false;
        }
        s.best_fitness = fitness;
        s.best_keymap = Some(*keymap);
        s.best_generation = generation;

        let snapshot = self.snapshot_of(&s);
        self.callback.on_improvement(&snapshot);
        true
    }

    pub fn read_snapshot(&self) -> SearchSnapshot {
        let s = self.lock();
        self.snapshot_of(&s)
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn should_stop(&self) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }
        self.max_time
            .is_some_and(|limit| self.started.elapsed() >= limit)
    }
}

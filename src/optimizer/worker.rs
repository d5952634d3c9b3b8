use super::coordinator::{Coordinator, ProgressCallback};
use super::mutation::{mutate, mutation_count, random_keymap};
use super::runner::OptimizationOptions;
use crate::keymap::Keymap;
use crate::scorer::Scorer;
use fastrand::Rng;

/// Where a worker is in its restart / escalating-climb cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    GenerateRestart,
    Climb { tier: u8 },
}

impl Phase {
    /// The phase that follows a completed climb tier.
    ///
    /// An improvement restarts escalation at tier 0 around the new optimum.
    /// Otherwise the radius widens, and past `max_tier` the generation is
    /// abandoned.
    pub fn after_climb(tier: u8, improved: bool, max_tier: u8) -> Phase {
        if improved {
            Phase::Climb { tier: 0 }
        } else if tier < max_tier {
            Phase::Climb { tier: tier + 1 }
        } else {
            Phase::GenerateRestart
        }
    }
}

/// The best keymap of the generation a worker is currently climbing.
#[derive(Debug, Clone, Copy)]
pub struct Generation {
    pub index: u64,
    pub best: Keymap,
    pub fitness: f64,
}

pub struct Worker<'a, CB> {
    scorer: &'a Scorer,
    coordinator: &'a Coordinator<CB>,
    rng: Rng,
    trials_per_tier: usize,
    max_tier: u8,
    phase: Phase,
    generation: Option<Generation>,
}

impl<'a, CB: ProgressCallback> Worker<'a, CB> {
    pub fn new(
        scorer: &'a Scorer,
        coordinator: &'a Coordinator<CB>,
        rng: Rng,
        options: &OptimizationOptions,
    ) -> Self {
        Self {
            scorer,
            coordinator,
            rng,
            trials_per_tier: options.trials_per_tier,
            max_tier: options.max_tier,
            phase: Phase::GenerateRestart,
            generation: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> Option<&Generation> {
        self.generation.as_ref()
    }

    /// Runs until the coordinator refuses a new generation or asks to stop.
    pub fn run(&mut self) {
        while !self.coordinator.should_stop() && self.step() {}
    }

    /// Executes the current phase once. Returns `false` when no further
    /// generation may be started.
    pub fn step(&mut self) -> bool {
        match (self.phase, self.generation) {
            (Phase::Climb { tier }, Some(gen)) => {
                let (gen, improved) = self.climb(gen, tier);
                self.generation = Some(gen);
                self.phase = Phase::after_climb(tier, improved, self.max_tier);
                true
            }
            _ => self.restart(),
        }
    }

    fn restart(&mut self) -> bool {
        let Some(index) = self.coordinator.begin_generation() else {
            return false;
        };
        let best = random_keymap(&mut self.rng, self.scorer.key_count());
        let fitness = self.scorer.score(&best);
        self.generation = Some(Generation {
            index,
            best,
            fitness,
        });
        self.phase = Phase::Climb { tier: 0 };
        true
    }

    /// One tier of trials around the generation best. Every trial mutates
    /// the best so far, so an improvement mid-tier is climbed from at once.
    /// The radius does not drop back to tier 0 mid-block: the remaining
    /// trials keep drawing from `[0, tier]` and the reset applies to the
    /// next block.
    fn climb(&mut self, mut gen: Generation, tier: u8) -> (Generation, bool) {
        let key_count = self.scorer.key_count();
        let mut improved = false;

        for _ in 0..self.trials_per_tier {
            let count = mutation_count(&mut self.rng, tier);
            let candidate = mutate(&gen.best, count, &mut self.rng, key_count);
            let fitness = self.scorer.score(&candidate);

            if fitness > gen.fitness {
                gen.best = candidate;
                gen.fitness = fitness;
                improved = true;
                self.coordinator.propose(fitness, &candidate, gen.index);
            }
        }

        self.coordinator
            .record_evaluations(self.trials_per_tier as u64);
        (gen, improved)
    }
}

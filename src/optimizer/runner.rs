use super::coordinator::{Coordinator, ProgressCallback, SearchSnapshot};
use super::worker::Worker;
use crate::config::SearchParams;
use crate::error::{PentaforgeError, PfResult};
use crate::scorer::Scorer;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct OptimizationOptions {
    pub num_threads: usize,
    pub trials_per_tier: usize,
    pub max_tier: u8,
    /// Worker `i` is seeded with `seed + i`; unseeded workers draw from entropy.
    pub seed: Option<u64>,
    pub max_time: Option<Duration>,
    pub max_generations: Option<u64>,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self::from(&SearchParams::default())
    }
}

impl From<&SearchParams> for OptimizationOptions {
    fn from(params: &SearchParams) -> Self {
        Self {
            num_threads: params.threads,
            trials_per_tier: params.trials_per_tier,
            max_tier: params.max_tier,
            seed: params.seed,
            max_time: params.time_limit.map(Duration::from_secs),
            max_generations: params.max_generations,
        }
    }
}

pub struct Optimizer {
    scorer: Arc<Scorer>,
    options: OptimizationOptions,
}

impl Optimizer {
    pub fn new(scorer: Arc<Scorer>, options: OptimizationOptions) -> Self {
        Self { scorer, options }
    }

    /// Runs the search to completion and returns the final global best.
    ///
    /// Without a time or generation limit this only returns once another
    /// thread calls [`Coordinator::request_stop`]; use [`Optimizer::run_with`]
    /// to keep a handle on the coordinator.
    pub fn run<CB: ProgressCallback>(&self, callback: CB) -> PfResult<SearchSnapshot> {
        let coordinator = Coordinator::new(callback)
            .with_limits(self.options.max_time, self.options.max_generations);
        self.run_with(&coordinator)
    }

    /// Runs one worker per pool thread against a caller-owned coordinator.
    pub fn run_with<CB: ProgressCallback>(
        &self,
        coordinator: &Coordinator<CB>,
    ) -> PfResult<SearchSnapshot> {
        let opts = &self.options;
        if opts.num_threads == 0 || opts.trials_per_tier == 0 {
            return Err(PentaforgeError::Config(
                "Search needs at least one thread and one trial per tier".to_string(),
            ));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.num_threads)
            .thread_name(|i| format!("pentaforge-worker-{}", i))
            .build()
            .map_err(|e| {
                PentaforgeError::ResourceExhaustion(format!("Cannot start worker threads: {}", e))
            })?;

        info!(
            "🧵 Starting {} workers ({} trials per tier, max tier {})",
            opts.num_threads, opts.trials_per_tier, opts.max_tier
        );

        let scorer = self.scorer.as_ref();
        pool.broadcast(|ctx| {
            let rng = match opts.seed {
                Some(s) => fastrand::Rng::with_seed(s.wrapping_add(ctx.index() as u64)),
                None => fastrand::Rng::new(),
            };
            Worker::new(scorer, coordinator, rng, opts).run();
        });

        let snapshot = coordinator.read_snapshot();
        info!(
            "🏁 Search finished: {} generations, {} layouts, best {:.6}",
            snapshot.generations, snapshot.layouts_evaluated, snapshot.fitness
        );
        Ok(snapshot)
    }
}

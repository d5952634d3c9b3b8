use pentaforge::corpus::{CorpusStats, RawCounts};
use pentaforge::keymap::{Keymap, LETTER_COUNT};
use pentaforge::optimizer::{
    Coordinator, OptimizationOptions, Optimizer, Phase, ProgressCallback, SearchSnapshot, Worker,
};
use pentaforge::scorer::{Scorer, ScorerBuilder};
use rstest::rstest;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn keymap(offset: usize) -> Keymap {
    let idx: Vec<usize> = (0..LETTER_COUNT).map(|i| i + offset).collect();
    Keymap::from_indices(&idx, 47).unwrap()
}

fn small_scorer() -> Scorer {
    let mut raw = RawCounts::default();
    for (i, c) in raw.unigrams.iter_mut().enumerate() {
        *c = (LETTER_COUNT - i) as f64;
    }
    for (seq, count) in [("there", 9.0), ("which", 5.0), ("about", 4.0), ("ought", 2.0)] {
        raw.add_pentagram(seq, count).unwrap();
    }
    ScorerBuilder::new()
        .with_corpus(CorpusStats::from_counts(raw).unwrap())
        .build()
        .unwrap()
}

fn options(threads: usize, generations: u64) -> OptimizationOptions {
    OptimizationOptions {
        num_threads: threads,
        trials_per_tier: 64,
        max_tier: 3,
        seed: Some(7),
        max_time: Some(Duration::from_secs(60)),
        max_generations: Some(generations),
    }
}

#[derive(Default)]
struct Recorder {
    improvements: Mutex<Vec<f64>>,
    progress: Mutex<u64>,
}

impl ProgressCallback for Recorder {
    fn on_improvement(&self, snapshot: &SearchSnapshot) {
        self.improvements.lock().unwrap().push(snapshot.fitness);
    }

    fn on_progress(&self, _snapshot: &SearchSnapshot) {
        *self.progress.lock().unwrap() += 1;
    }
}

// --- COORDINATOR ---

#[rstest]
#[case(&[3.0, 2.5], 3.0, 0)]
#[case(&[2.5, 3.0], 3.0, 1)]
#[case(&[1.0, 1.0, 1.0], 1.0, 0)]
#[case(&[-5.0, f64::NAN, -6.0], -5.0, 0)]
fn test_global_best_is_order_independent_max(
    #[case] proposals: &[f64],
    #[case] best: f64,
    #[case] winner: usize,
) {
    let c = Coordinator::new(());
    for (i, &f) in proposals.iter().enumerate() {
        c.propose(f, &keymap(i), i as u64);
    }
    let snap = c.read_snapshot();
    assert_eq!(snap.fitness, best);
    assert_eq!(snap.keymap, Some(keymap(winner)));
    assert_eq!(snap.best_generation, winner as u64);
}

#[test]
fn test_ties_never_replace() {
    let c = Coordinator::new(());
    assert!(c.propose(2.0, &keymap(0), 0));
    assert!(!c.propose(2.0, &keymap(1), 1));
    assert_eq!(c.read_snapshot().keymap, Some(keymap(0)));
}

#[test]
fn test_concurrent_proposals_keep_maximum() {
    let c = Coordinator::new(());
    std::thread::scope(|s| {
        for t in 0..8 {
            let c = &c;
            s.spawn(move || {
                for i in 0..1000 {
                    let f = ((i * 8 + t) % 997) as f64;
                    c.propose(f, &keymap(t), t as u64);
                }
            });
        }
    });
    assert_eq!(c.read_snapshot().fitness, 996.0);
}

#[test]
fn test_counters_accumulate() {
    let c = Coordinator::new(());
    c.begin_generation();
    c.record_evaluations(100);
    c.record_evaluations(28);
    let snap = c.read_snapshot();
    assert_eq!(snap.generations, 1);
    assert_eq!(snap.layouts_evaluated, 128);
    assert!(snap.keymap.is_none());
    assert_eq!(snap.fitness, f64::NEG_INFINITY);
}

#[test]
fn test_time_limit_stops_search() {
    let c = Coordinator::new(()).with_limits(Some(Duration::ZERO), None);
    assert!(c.should_stop());
    assert_eq!(c.begin_generation(), None);
}

// --- WORKER ---

#[test]
fn test_worker_starts_with_restart() {
    let scorer = small_scorer();
    let coordinator = Coordinator::new(());
    let mut worker = Worker::new(&scorer, &coordinator, fastrand::Rng::with_seed(1), &options(1, 10));
    assert_eq!(worker.phase(), Phase::GenerateRestart);
    assert!(worker.generation().is_none());

    assert!(worker.step());
    assert_eq!(worker.phase(), Phase::Climb { tier: 0 });
    let gen = worker.generation().unwrap();
    assert_eq!(gen.index, 0);
    assert_eq!(gen.fitness, scorer.score(&gen.best));
    // The restart keymap itself is never proposed.
    assert!(coordinator.read_snapshot().keymap.is_none());
}

#[test]
fn test_generation_best_never_decreases() {
    let scorer = small_scorer();
    let coordinator = Coordinator::new(()).with_limits(None, Some(3));
    let mut worker = Worker::new(&scorer, &coordinator, fastrand::Rng::with_seed(11), &options(1, 3));

    let mut last: Option<(u64, f64)> = None;
    let mut tiers_seen = Vec::new();
    while worker.step() {
        if let Phase::Climb { tier } = worker.phase() {
            tiers_seen.push(tier);
        }
        let gen = worker.generation().unwrap();
        if let Some((index, fitness)) = last {
            if index == gen.index {
                assert!(gen.fitness >= fitness);
            }
        }
        assert_eq!(scorer.score(&gen.best), gen.fitness);
        last = Some((gen.index, gen.fitness));
    }

    assert_eq!(coordinator.read_snapshot().generations, 3);
    assert!(tiers_seen.iter().all(|&t| t <= 3));
    assert!(tiers_seen.contains(&3), "escalation never reached the top tier");
}

#[test]
fn test_worker_publishes_its_best() {
    let scorer = small_scorer();
    let coordinator = Coordinator::new(Recorder::default()).with_limits(None, Some(2));
    let mut worker = Worker::new(&scorer, &coordinator, fastrand::Rng::with_seed(5), &options(1, 2));
    worker.run();

    let snap = coordinator.read_snapshot();
    let best = snap.keymap.expect("a climb should improve a random keymap");
    assert_eq!(scorer.score(&best), snap.fitness);

    let improvements = coordinator.callback().improvements.lock().unwrap().clone();
    assert!(improvements.windows(2).all(|w| w[1] > w[0]));
    assert_eq!(*improvements.last().unwrap(), snap.fitness);
    // One progress report per completed tier.
    let layouts = snap.layouts_evaluated;
    assert_eq!(*coordinator.callback().progress.lock().unwrap() * 64, layouts);
}

// --- RUNNER ---

#[test]
fn test_runner_stops_at_generation_limit() {
    let optimizer = Optimizer::new(Arc::new(small_scorer()), options(4, 12));
    let result = optimizer.run(Recorder::default()).unwrap();

    assert_eq!(result.generations, 12);
    assert!(result.keymap.is_some());
    assert!(result.layouts_evaluated > 0);
    assert_eq!(result.layouts_evaluated % 64, 0);
}

#[test]
fn test_single_worker_run_is_reproducible() {
    let scorer = Arc::new(small_scorer());
    let a = Optimizer::new(scorer.clone(), options(1, 4)).run(()).unwrap();
    let b = Optimizer::new(scorer, options(1, 4)).run(()).unwrap();
    assert_eq!(a.keymap, b.keymap);
    assert_eq!(a.fitness, b.fitness);
    assert_eq!(a.layouts_evaluated, b.layouts_evaluated);
}

#[test]
fn test_global_best_is_at_least_every_proposal() {
    let optimizer = Optimizer::new(Arc::new(small_scorer()), options(3, 9));
    let coordinator = Coordinator::new(Recorder::default()).with_limits(None, Some(9));
    let result = optimizer.run_with(&coordinator).unwrap();

    let improvements = coordinator.callback().improvements.lock().unwrap().clone();
    assert!(!improvements.is_empty());
    assert!(improvements.windows(2).all(|w| w[1] > w[0]));
    assert!(improvements.iter().all(|&f| f <= result.fitness));
}

#[test]
fn test_stop_request_ends_unbounded_search() {
    let optimizer = Optimizer::new(
        Arc::new(small_scorer()),
        OptimizationOptions {
            max_time: None,
            max_generations: None,
            ..options(2, 0)
        },
    );
    let coordinator = Coordinator::new(());
    std::thread::scope(|s| {
        s.spawn(|| {
            std::thread::sleep(Duration::from_millis(50));
            coordinator.request_stop();
        });
        let result = optimizer.run_with(&coordinator).unwrap();
        assert!(result.generations >= 1);
    });
}

#[test]
fn test_zero_threads_is_config_error() {
    let optimizer = Optimizer::new(Arc::new(small_scorer()), options(0, 1));
    assert!(optimizer.run(()).is_err());
}

#[test]
fn test_options_follow_search_params() {
    let params = pentaforge::config::SearchParams {
        threads: 3,
        seed: Some(9),
        time_limit: Some(5),
        ..Default::default()
    };
    let opts = OptimizationOptions::from(&params);
    assert_eq!(opts.num_threads, 3);
    assert_eq!(opts.trials_per_tier, 2048);
    assert_eq!(opts.seed, Some(9));
    assert_eq!(opts.max_time, Some(Duration::from_secs(5)));
    assert_eq!(opts.max_generations, None);
}

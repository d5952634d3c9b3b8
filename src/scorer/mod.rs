pub mod builder;
pub mod engine;
pub mod flow;
pub mod loader;
pub mod physics;
pub mod types;

pub use self::builder::ScorerBuilder;
pub use self::types::ScoreDetails;
use self::physics::PairTables;
use crate::config::{FitnessWeights, FINGER_COUNT};
use crate::corpus::CorpusStats;
use crate::geometry::KeyboardGeometry;
use crate::keymap::Keymap;

/// Immutable evaluation context shared by every worker.
#[derive(Debug, Clone)]
pub struct Scorer {
    pub weights: FitnessWeights,
    pub geometry: KeyboardGeometry,
    pub corpus: CorpusStats,
    pub tables: PairTables,
    pub finger_targets: [f64; FINGER_COUNT],

    // Per-key lookups (size = key_count)
    pub home_distance: Vec<f64>,
    pub is_home: Vec<bool>,
    pub abs_finger: Vec<u8>,
}

impl Scorer {
    pub fn key_count(&self) -> usize {
        self.geometry.key_count()
    }

    /// Fitness of a keymap; higher is better.
    #[inline(always)]
    pub fn score(&self, keymap: &Keymap) -> f64 {
        engine::evaluate(self, keymap).fitness
    }

    /// Diagnostic breakdown; `fitness` equals what `score` returns.
    pub fn score_details(&self, keymap: &Keymap) -> ScoreDetails {
        engine::evaluate(self, keymap)
    }
}

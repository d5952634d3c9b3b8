use super::loader::{load_corpus, load_pentagrams, load_unigrams};
use super::physics::{home_distances, PairTables};
use super::Scorer;
use crate::config::FitnessWeights;
use crate::corpus::{CorpusStats, RawCounts};
use crate::error::{PentaforgeError, PfResult};
use crate::geometry::KeyboardGeometry;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Default)]
pub struct ScorerBuilder {
    weights: FitnessWeights,
    geometry: Option<KeyboardGeometry>,
    corpus: Option<CorpusStats>,
}

impl ScorerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_geometry(mut self, geometry: KeyboardGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_corpus(mut self, corpus: CorpusStats) -> Self {
        self.corpus = Some(corpus);
        self
    }

    pub fn with_corpus_from_files<P1: AsRef<Path>, P2: AsRef<Path>>(
        self,
        unigram_path: P1,
        pentagram_path: P2,
    ) -> PfResult<Self> {
        let corpus = load_corpus(unigram_path, pentagram_path)?;
        Ok(self.with_corpus(corpus))
    }

    pub fn with_corpus_from_readers<R1: Read, R2: Read>(
        self,
        unigrams: R1,
        pentagrams: R2,
    ) -> PfResult<Self> {
        let corpus = CorpusStats::from_counts(RawCounts {
            unigrams: load_unigrams(unigrams)?,
            pentagrams: load_pentagrams(pentagrams)?,
        })?;
        Ok(self.with_corpus(corpus))
    }

    /// Validates the inputs and derives every lookup table.
    pub fn build(self) -> PfResult<Scorer> {
        let geometry = self.geometry.unwrap_or_else(KeyboardGeometry::standard);
        let corpus = self
            .corpus
            .ok_or_else(|| PentaforgeError::Config("No corpus supplied to scorer".to_string()))?;
        let weights = self.weights;

        geometry.validate()?;
        weights.validate()?;
        let finger_targets = weights.get_finger_targets()?;

        let tables = PairTables::build(&geometry)?;
        let home_distance = home_distances(&geometry, &weights)?;
        let is_home = geometry.keys.iter().map(|k| k.is_home).collect();
        let abs_finger = geometry.keys.iter().map(|k| k.abs_finger).collect();

        debug!(
            "Scorer ready: {} keys, {} pentagrams",
            geometry.key_count(),
            corpus.pentagrams().len()
        );

        Ok(Scorer {
            weights,
            geometry,
            corpus,
            tables,
            finger_targets,
            home_distance,
            is_home,
            abs_finger,
        })
    }
}

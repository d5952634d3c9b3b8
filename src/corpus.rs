use crate::error::{PentaforgeError, PfResult};
use crate::keymap::{LetterId, LETTER_COUNT};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Five consecutive letters and their share of all pentagrams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pentagram {
    pub letters: [LetterId; 5],
    pub freq: f64,
}

/// Raw corpus counts, as read from disk or assembled by hand.
#[derive(Debug, Clone)]
pub struct RawCounts {
    pub unigrams: [f64; LETTER_COUNT],
    pub pentagrams: Vec<([LetterId; 5], f64)>,
}

impl Default for RawCounts {
    fn default() -> Self {
        Self {
            unigrams: [0.0; LETTER_COUNT],
            pentagrams: Vec::new(),
        }
    }
}

impl RawCounts {
    /// Adds `count` occurrences of a five letter sequence.
    pub fn add_pentagram(&mut self, seq: &str, count: f64) -> PfResult<()> {
        self.pentagrams.push((parse_sequence(seq)?, count));
        Ok(())
    }
}

/// Parses a five letter ASCII sequence.
pub fn parse_sequence(seq: &str) -> PfResult<[LetterId; 5]> {
    let letters: Vec<LetterId> = seq
        .chars()
        .map(|c| {
            LetterId::from_char(c).ok_or_else(|| {
                PentaforgeError::Config(format!(
                    "Pentagram '{}' contains non-letter '{}'",
                    seq, c
                ))
            })
        })
        .collect::<PfResult<_>>()?;

    letters.try_into().map_err(|v: Vec<LetterId>| {
        PentaforgeError::Config(format!(
            "Pentagram '{}' has {} letters (expected 5)",
            seq,
            v.len()
        ))
    })
}

/// Normalized corpus statistics; immutable once built.
#[derive(Debug, Clone)]
pub struct CorpusStats {
    unigrams: [f64; LETTER_COUNT],
    pentagrams: Vec<Pentagram>,
}

impl CorpusStats {
    /// Normalizes each table by its own total so corpora of any size compare.
    ///
    /// The unigram total must be positive. An empty pentagram table is
    /// accepted (every sequence term is then zero), a non-empty one must
    /// also have a positive total. Repeated sequences are merged.
    pub fn from_counts(raw: RawCounts) -> PfResult<Self> {
        let check = |what: &str, v: f64| -> PfResult<()> {
            if !v.is_finite() || v < 0.0 {
                return Err(PentaforgeError::Config(format!(
                    "{} count {} is not a finite non-negative number",
                    what, v
                )));
            }
            Ok(())
        };

        for (i, &c) in raw.unigrams.iter().enumerate() {
            check(&format!("Unigram '{}'", (b'a' + i as u8) as char), c)?;
        }
        let total_1: f64 = raw.unigrams.iter().sum();
        if total_1 <= 0.0 {
            return Err(PentaforgeError::Config(
                "Unigram counts do not sum to a positive total".to_string(),
            ));
        }
        let unigrams = raw.unigrams.map(|c| c / total_1);

        let mut merged: HashMap<[LetterId; 5], f64> = HashMap::new();
        let mut order = Vec::new();
        for (seq, count) in raw.pentagrams {
            check("Pentagram", count)?;
            let slot = merged.entry(seq).or_insert_with(|| {
                order.push(seq);
                0.0
            });
            *slot += count;
        }

        let total_5: f64 = merged.values().sum();
        if !order.is_empty() && total_5 <= 0.0 {
            return Err(PentaforgeError::Config(
                "Pentagram counts do not sum to a positive total".to_string(),
            ));
        }

        let mut pentagrams = Vec::new();
        pentagrams.try_reserve_exact(order.len()).map_err(|e| {
            PentaforgeError::ResourceExhaustion(format!(
                "pentagram table ({} entries): {}",
                order.len(),
                e
            ))
        })?;
        for seq in order {
            pentagrams.push(Pentagram {
                letters: seq,
                freq: merged[&seq] / total_5,
            });
        }

        debug!(
            "Corpus normalized: {:.0} letters, {} distinct pentagrams ({:.0} total)",
            total_1,
            pentagrams.len(),
            total_5
        );

        Ok(Self {
            unigrams,
            pentagrams,
        })
    }

    #[inline(always)]
    pub fn unigram(&self, letter: LetterId) -> f64 {
        self.unigrams[letter.index()]
    }

    pub fn unigrams(&self) -> &[f64; LETTER_COUNT] {
        &self.unigrams
    }

    pub fn pentagrams(&self) -> &[Pentagram] {
        &self.pentagrams
    }
}

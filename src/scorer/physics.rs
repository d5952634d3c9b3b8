use crate::config::FitnessWeights;
use crate::error::{PentaforgeError, PfResult};
use crate::geometry::{KeyId, KeyboardGeometry};
use tracing::debug;

/// Relational facts for every ordered key pair, flattened `u * n + v`.
#[derive(Debug, Clone)]
pub struct PairTables {
    n: usize,
    row_dist: Vec<u8>,
    same_hand: Vec<bool>,
    same_finger: Vec<bool>,
    row_jump: Vec<bool>,
    inroll: Vec<bool>,
}

fn reserve<T: Clone>(len: usize, fill: T, what: &str) -> PfResult<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|e| {
        PentaforgeError::ResourceExhaustion(format!("{} table ({} cells): {}", what, len, e))
    })?;
    v.resize(len, fill);
    Ok(v)
}

impl PairTables {
    pub fn build(geom: &KeyboardGeometry) -> PfResult<Self> {
        let n = geom.key_count();
        let mut row_dist = reserve(n * n, 0u8, "row distance")?;
        let mut same_hand = reserve(n * n, false, "same hand")?;
        let mut same_finger = reserve(n * n, false, "same finger")?;
        let mut row_jump = reserve(n * n, false, "row jump")?;
        let mut inroll = reserve(n * n, false, "inroll")?;

        for (u, ku) in geom.keys.iter().enumerate() {
            for (v, kv) in geom.keys.iter().enumerate() {
                let i = u * n + v;
                row_dist[i] = ku.row.abs_diff(kv.row);
                same_hand[i] = ku.hand == kv.hand;
                same_finger[i] = ku.abs_finger == kv.abs_finger;
                row_jump[i] = same_hand[i] && row_dist[i] != 0;
                inroll[i] = same_hand[i]
                    && ku.is_natural
                    && kv.is_natural
                    && kv.finger > ku.finger
                    && row_dist[i] <= 1;
            }
        }

        debug!("Pairwise tables built for {} keys ({} pairs)", n, n * n);

        Ok(Self {
            n,
            row_dist,
            same_hand,
            same_finger,
            row_jump,
            inroll,
        })
    }

    #[inline(always)]
    pub fn row_distance(&self, u: KeyId, v: KeyId) -> u8 {
        self.row_dist[u.index() * self.n + v.index()]
    }

    #[inline(always)]
    pub fn same_hand(&self, u: KeyId, v: KeyId) -> bool {
        self.same_hand[u.index() * self.n + v.index()]
    }

    #[inline(always)]
    pub fn same_finger(&self, u: KeyId, v: KeyId) -> bool {
        self.same_finger[u.index() * self.n + v.index()]
    }

    /// Same hand and a different row.
    #[inline(always)]
    pub fn row_jump(&self, u: KeyId, v: KeyId) -> bool {
        self.row_jump[u.index() * self.n + v.index()]
    }

    /// `u` then `v` rolls toward the index finger across natural keys,
    /// changing at most one row.
    #[inline(always)]
    pub fn inroll(&self, u: KeyId, v: KeyId) -> bool {
        self.inroll[u.index() * self.n + v.index()]
    }
}

/// Ergonomic distance of every key from its finger's home key.
///
/// Horizontal and vertical offsets are scaled into comparable physical units
/// before taking the Euclidean norm. Home keys are exactly 0.
pub fn home_distances(geom: &KeyboardGeometry, weights: &FitnessWeights) -> PfResult<Vec<f64>> {
    let homes = geom.home_keys();
    geom.keys
        .iter()
        .enumerate()
        .map(|(i, k)| {
            let home = homes[k.abs_finger as usize].ok_or_else(|| {
                PentaforgeError::Config(format!(
                    "Key {} belongs to finger {} which has no home key",
                    i, k.abs_finger
                ))
            })?;
            if home.index() == i {
                return Ok(0.0);
            }
            let h = geom.key(home);
            let dx = (k.x - h.x) * weights.horizontal_scale;
            let dy = (k.row as f64 - h.row as f64) * weights.vertical_scale;
            Ok((dx * dx + dy * dy).sqrt())
        })
        .collect()
}

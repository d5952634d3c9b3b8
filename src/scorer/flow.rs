use super::physics::PairTables;
use crate::geometry::KeyId;

/// One candidate pair inside a five key window, with the weight it
/// contributes when it is the first pair of its chain to qualify.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainLink {
    pub first: usize,
    pub second: usize,
    /// `1 / 2^(second - first - 1)`: adjacent letters weigh 1, each letter
    /// in between halves the weight.
    pub weight: f64,
}

const fn link(first: usize, second: usize, weight: f64) -> ChainLink {
    ChainLink {
        first,
        second,
        weight,
    }
}

/// Priority chains for same finger and row jump scans, one per starting
/// position. Each chain tries the nearest partner first and stops at the
/// first hit, so a start position contributes at most once.
pub const PAIR_CHAINS: [&[ChainLink]; 4] = [
    &[
        link(0, 1, 1.0),
        link(0, 2, 0.5),
        link(0, 3, 0.25),
        link(0, 4, 0.125),
    ],
    &[link(1, 2, 1.0), link(1, 3, 0.5), link(1, 4, 0.25)],
    &[link(2, 3, 1.0), link(2, 4, 0.5)],
    &[link(3, 4, 1.0)],
];

/// The ten window pairs in scan order for inrolls (`m` major, `n` minor).
/// Only the first qualifying pair of a window counts.
pub const INROLL_ORDER: [ChainLink; 10] = [
    link(0, 1, 1.0),
    link(0, 2, 0.5),
    link(0, 3, 0.25),
    link(0, 4, 0.125),
    link(1, 2, 1.0),
    link(1, 3, 0.5),
    link(1, 4, 0.25),
    link(2, 3, 1.0),
    link(2, 4, 0.5),
    link(3, 4, 1.0),
];

/// Sums the weight of the first qualifying link of every chain.
#[inline(always)]
pub fn scan_chains<F>(window: &[KeyId; 5], hit: F) -> f64
where
    F: Fn(KeyId, KeyId) -> bool,
{
    let mut total = 0.0;
    for chain in PAIR_CHAINS {
        if let Some(l) = chain
            .iter()
            .find(|l| hit(window[l.first], window[l.second]))
        {
            total += l.weight;
        }
    }
    total
}

/// Weight of the first qualifying link in `order`, or 0.
#[inline(always)]
pub fn first_match<F>(window: &[KeyId; 5], order: &[ChainLink], hit: F) -> f64
where
    F: Fn(KeyId, KeyId) -> bool,
{
    order
        .iter()
        .find(|l| hit(window[l.first], window[l.second]))
        .map_or(0.0, |l| l.weight)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandRun {
    None,
    /// Four consecutive keystrokes on one hand.
    Four,
    /// The whole window on one hand.
    Five,
}

/// Classifies a window by how long it stays on one hand.
///
/// The middle transitions `(b,c)` and `(c,d)` must both be same-hand. Then
/// both ends same-hand is a five run, exactly one end same-hand a four run.
#[inline(always)]
pub fn classify_hand_run(window: &[KeyId; 5], tables: &PairTables) -> HandRun {
    let [a, b, c, d, e] = *window;
    if !(tables.same_hand(b, c) && tables.same_hand(c, d)) {
        return HandRun::None;
    }
    match (tables.same_hand(a, b), tables.same_hand(d, e)) {
        (true, true) => HandRun::Five,
        (true, false) | (false, true) => HandRun::Four,
        (false, false) => HandRun::None,
    }
}

use serde::Serialize;

/// Per-term breakdown of one evaluation. Penalties are stored as positive
/// magnitudes; `fitness` is the combined score the search maximizes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreDetails {
    pub fitness: f64,

    // Monogram terms
    pub distance: f64,
    pub finger_inequality: f64,

    // Pentagram terms
    pub same_finger: f64,
    pub row_jumps: f64,
    pub four_same_hand: f64,
    pub five_same_hand: f64,
    pub inrolls: f64,

    /// Observed share of keystrokes per absolute finger.
    pub finger_load: [f64; 8],
}

use super::flow::{classify_hand_run, first_match, scan_chains, HandRun, INROLL_ORDER};
use super::{ScoreDetails, Scorer};
use crate::config::FitnessWeights;
use crate::keymap::Keymap;

/// Evaluates every term for one keymap.
///
/// Monogram terms read the per-key tables; pentagram terms translate each
/// window through the keymap and consult the pairwise tables only, so the
/// loop does no arithmetic beyond accumulation.
#[inline(always)]
pub fn evaluate(scorer: &Scorer, keymap: &Keymap) -> ScoreDetails {
    let keys = keymap.keys();
    let unigrams = scorer.corpus.unigrams();
    let mut d = ScoreDetails::default();

    for (letter, &k) in keys.iter().enumerate() {
        let freq = unigrams[letter];
        let ki = k.index();
        // Home keys carry zero distance whatever the letter frequency.
        if !scorer.is_home[ki] {
            d.distance += freq * scorer.home_distance[ki];
        }
        d.finger_load[scorer.abs_finger[ki] as usize] += freq;
    }

    d.finger_inequality = scorer
        .finger_targets
        .iter()
        .zip(d.finger_load.iter())
        .map(|(target, observed)| (target - observed).abs())
        .sum();

    let t = &scorer.tables;
    for p in scorer.corpus.pentagrams() {
        let window = p.letters.map(|l| keys[l.index()]);
        let f = p.freq;

        match classify_hand_run(&window, t) {
            HandRun::Five => d.five_same_hand += f,
            HandRun::Four => d.four_same_hand += f,
            HandRun::None => {}
        }

        d.same_finger += f * scan_chains(&window, |u, v| t.same_finger(u, v));
        d.row_jumps += f * scan_chains(&window, |u, v| t.row_jump(u, v));
        d.inrolls += f * first_match(&window, &INROLL_ORDER, |u, v| t.inroll(u, v));
    }

    d.fitness = combine(&d, &scorer.weights);
    d
}

#[inline(always)]
pub fn combine(d: &ScoreDetails, w: &FitnessWeights) -> f64 {
    w.inroll_bonus * d.inrolls
        - d.distance / w.distance_norm
        - d.finger_inequality
        - d.same_finger
        - d.four_same_hand
        - d.five_same_hand
        - d.row_jumps
}

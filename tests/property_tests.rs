use pentaforge::corpus::{CorpusStats, RawCounts};
use pentaforge::keymap::{Keymap, LETTER_COUNT};
use pentaforge::optimizer::mutation::{mutate, mutation_count, random_keymap};
use pentaforge::scorer::ScorerBuilder;
use proptest::prelude::*;

const STANDARD_KEYS: usize = 47;

// --- STRATEGIES ---

prop_compose! {
    fn arb_keymap(key_count: usize)(seed in any::<u64>()) -> Keymap {
        random_keymap(&mut fastrand::Rng::with_seed(seed), key_count)
    }
}

prop_compose! {
    fn arb_corpus()(
        unigrams in proptest::collection::vec(0.0..1000.0f64, LETTER_COUNT),
        pentagrams in proptest::collection::vec(("[a-z]{5}", 1.0..100.0f64), 0..40)
    ) -> CorpusStats {
        let mut raw = RawCounts::default();
        raw.unigrams.copy_from_slice(&unigrams);
        raw.unigrams[4] += 1.0; // keep the total positive
        for (seq, count) in pentagrams {
            raw.add_pentagram(&seq, count).unwrap();
        }
        CorpusStats::from_counts(raw).unwrap()
    }
}

proptest! {
    #[test]
    fn test_restart_keymap_is_injective(seed in any::<u64>(), key_count in 26usize..=255) {
        let map = random_keymap(&mut fastrand::Rng::with_seed(seed), key_count);
        prop_assert!(map.validate(key_count).is_ok());
    }

    #[test]
    fn test_mutation_preserves_injectivity(
        parent in arb_keymap(STANDARD_KEYS),
        seed in any::<u64>(),
        count in 0usize..=3
    ) {
        let child = mutate(&parent, count, &mut fastrand::Rng::with_seed(seed), STANDARD_KEYS);
        prop_assert!(child.validate(STANDARD_KEYS).is_ok());
    }

    #[test]
    fn test_zero_mutations_is_identity(parent in arb_keymap(STANDARD_KEYS), seed in any::<u64>()) {
        let child = mutate(&parent, 0, &mut fastrand::Rng::with_seed(seed), STANDARD_KEYS);
        prop_assert_eq!(child, parent);
    }

    #[test]
    fn test_mutation_is_deterministic(parent in arb_keymap(STANDARD_KEYS), seed in any::<u64>()) {
        let a = mutate(&parent, 3, &mut fastrand::Rng::with_seed(seed), STANDARD_KEYS);
        let b = mutate(&parent, 3, &mut fastrand::Rng::with_seed(seed), STANDARD_KEYS);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn test_single_mutation_moves_at_most_two_letters(
        parent in arb_keymap(STANDARD_KEYS),
        seed in any::<u64>()
    ) {
        let child = mutate(&parent, 1, &mut fastrand::Rng::with_seed(seed), STANDARD_KEYS);
        let moved = parent
            .keys()
            .iter()
            .zip(child.keys())
            .filter(|(a, b)| a != b)
            .count();
        prop_assert!(moved <= 2);
    }

    #[test]
    fn test_mutation_count_stays_in_tier(seed in any::<u64>(), tier in 0u8..=3) {
        let mut rng = fastrand::Rng::with_seed(seed);
        for _ in 0..64 {
            prop_assert!(mutation_count(&mut rng, tier) <= tier as usize);
        }
    }

    #[test]
    fn test_score_is_finite_and_repeatable(corpus in arb_corpus(), map in arb_keymap(STANDARD_KEYS)) {
        let scorer = ScorerBuilder::new().with_corpus(corpus).build().unwrap();
        let first = scorer.score(&map);
        prop_assert!(first.is_finite());
        prop_assert_eq!(scorer.score(&map), first);
        prop_assert_eq!(scorer.score_details(&map).fitness, first);
    }
}

#[test]
fn test_ten_thousand_trials_stay_injective() {
    let mut rng = fastrand::Rng::with_seed(42);
    let mut map = random_keymap(&mut rng, STANDARD_KEYS);
    for trial in 0..10_000 {
        let tier = (trial % 4) as u8;
        let count = mutation_count(&mut rng, tier);
        map = mutate(&map, count, &mut rng, STANDARD_KEYS);
        map.validate(STANDARD_KEYS).unwrap();
    }
}

#[test]
fn test_mutation_reaches_unused_keys() {
    // The standard board has 21 spare keys; relocation must be able to use them.
    let mut rng = fastrand::Rng::with_seed(3);
    let start = random_keymap(&mut rng, STANDARD_KEYS);
    let mut map = start;
    let mut seen = [false; STANDARD_KEYS];
    for _ in 0..5_000 {
        map = mutate(&map, 1, &mut rng, STANDARD_KEYS);
        for k in map.keys() {
            seen[k.index()] = true;
        }
    }
    assert!(seen.iter().all(|&s| s));
}

use crate::geometry::KeyId;
use crate::keymap::{Keymap, LETTER_COUNT};
use fastrand::Rng;

/// A fresh restart keymap: shuffle every key (Fisher-Yates) and hand the
/// first 26 to the letters in order.
pub fn random_keymap(rng: &mut Rng, key_count: usize) -> Keymap {
    debug_assert!(key_count >= LETTER_COUNT && key_count <= u8::MAX as usize);
    let mut keys: Vec<u8> = (0..key_count).map(|k| k as u8).collect();
    rng.shuffle(&mut keys);
    Keymap::from_keys_unchecked(std::array::from_fn(|i| KeyId(keys[i])))
}

/// Applies `count` relocation steps to a copy of `parent`.
///
/// Each step picks a letter and a target key. A letter already on the target
/// moves to the picked letter's old key (a swap); otherwise the letter just
/// moves onto the free key. The target index never equals the picked letter
/// index. The result is always injective.
pub fn mutate(parent: &Keymap, count: usize, rng: &mut Rng, key_count: usize) -> Keymap {
    let mut child = *parent;
    let keys = child.keys_mut();

    for _ in 0..count {
        let a = rng.usize(0..LETTER_COUNT);
        let b = loop {
            let b = rng.usize(0..key_count);
            if b != a {
                break b;
            }
        };
        let target = KeyId(b as u8);

        if let Some(occupant) = keys.iter().position(|&k| k == target) {
            keys[occupant] = keys[a];
        }
        keys[a] = target;
    }

    child
}

/// Mutation count for a tier, uniform over `0..=tier`.
#[inline(always)]
pub fn mutation_count(rng: &mut Rng, tier: u8) -> usize {
    rng.usize(0..=tier as usize)
}

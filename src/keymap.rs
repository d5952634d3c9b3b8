use crate::error::{PentaforgeError, PfResult};
use crate::geometry::KeyId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of the alphabet being placed.
pub const LETTER_COUNT: usize = 26;

/// One of the 26 letters, `a` = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LetterId(u8);

impl LetterId {
    pub fn new(index: usize) -> Option<Self> {
        (index < LETTER_COUNT).then_some(Self(index as u8))
    }

    pub fn from_char(c: char) -> Option<Self> {
        let c = c.to_ascii_lowercase();
        c.is_ascii_lowercase().then(|| Self(c as u8 - b'a'))
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn to_char(self) -> char {
        (b'a' + self.0) as char
    }

    pub fn all() -> impl Iterator<Item = LetterId> {
        (0..LETTER_COUNT as u8).map(LetterId)
    }
}

impl fmt::Display for LetterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Assignment of every letter to a distinct physical key.
///
/// Entry `i` is the key holding letter `i`. Not every key of the board is
/// used; the keymap only guarantees that no two letters share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keymap([KeyId; LETTER_COUNT]);

impl Keymap {
    /// Builds a keymap, checking range and injectivity against `key_count`.
    pub fn new(keys: [KeyId; LETTER_COUNT], key_count: usize) -> PfResult<Self> {
        let map = Self(keys);
        map.validate(key_count)?;
        Ok(map)
    }

    /// Builds a keymap from raw key indices (`a` first).
    pub fn from_indices(indices: &[usize], key_count: usize) -> PfResult<Self> {
        if indices.len() != LETTER_COUNT {
            return Err(PentaforgeError::Validation(format!(
                "Keymap needs {} keys, got {}",
                LETTER_COUNT,
                indices.len()
            )));
        }
        let mut keys = [KeyId(0); LETTER_COUNT];
        for (slot, &k) in keys.iter_mut().zip(indices) {
            if k >= key_count || k > u8::MAX as usize {
                return Err(PentaforgeError::Validation(format!(
                    "Key index {} is outside the board (0..{})",
                    k, key_count
                )));
            }
            *slot = KeyId(k as u8);
        }
        Self::new(keys, key_count)
    }

    /// Unchecked construction for callers that maintain the invariant themselves.
    pub(crate) fn from_keys_unchecked(keys: [KeyId; LETTER_COUNT]) -> Self {
        Self(keys)
    }

    pub fn validate(&self, key_count: usize) -> PfResult<()> {
        let mut seen = vec![false; key_count];
        for (letter, k) in self.0.iter().enumerate() {
            let idx = k.index();
            if idx >= key_count {
                return Err(PentaforgeError::Validation(format!(
                    "Letter '{}' is on key {} outside the board (0..{})",
                    (b'a' + letter as u8) as char,
                    idx,
                    key_count
                )));
            }
            if seen[idx] {
                return Err(PentaforgeError::Validation(format!(
                    "Key {} is assigned to more than one letter",
                    idx
                )));
            }
            seen[idx] = true;
        }
        Ok(())
    }

    #[inline(always)]
    pub fn key_of(&self, letter: LetterId) -> KeyId {
        self.0[letter.index()]
    }

    #[inline(always)]
    pub fn keys(&self) -> &[KeyId; LETTER_COUNT] {
        &self.0
    }

    #[inline(always)]
    pub(crate) fn keys_mut(&mut self) -> &mut [KeyId; LETTER_COUNT] {
        &mut self.0
    }

    /// The letter sitting on `key`, if any.
    pub fn letter_on(&self, key: KeyId) -> Option<LetterId> {
        self.0
            .iter()
            .position(|&k| k == key)
            .map(|i| LetterId(i as u8))
    }
}

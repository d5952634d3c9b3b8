use crate::error::PfResult;
use crate::keymap::{Keymap, LETTER_COUNT};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Reference layouts on the standard 47-key board, used as baselines.
#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum KnownLayout {
    Qwerty,
    Ieon,
}

impl KnownLayout {
    /// Key index of every letter, `a` first, on the standard board.
    pub fn key_indices(&self) -> [usize; LETTER_COUNT] {
        match self {
            Self::Qwerty => [
                26, 41, 39, 28, 16, 29, 30, 31, 21, 32, 33, 34, 43, 42, 22, 23, 14, 17, 27, 18, 20,
                40, 15, 38, 19, 37,
            ],
            Self::Ieon => [
                16, 31, 35, 36, 27, 20, 22, 32, 26, 24, 23, 21, 45, 29, 28, 46, 19, 42, 34, 33, 40,
                8, 43, 44, 15, 9,
            ],
        }
    }

    pub fn to_keymap(&self) -> PfResult<Keymap> {
        Keymap::from_indices(&self.key_indices(), STANDARD_KEYS)
    }
}

/// Key count of `KeyboardGeometry::standard`.
const STANDARD_KEYS: usize = 47;

pub fn all_layouts() -> PfResult<Vec<(KnownLayout, Keymap)>> {
    KnownLayout::iter()
        .map(|l| l.to_keymap().map(|m| (l, m)))
        .collect()
}

use crate::config::FINGER_COUNT;
use crate::error::{PentaforgeError, PfResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

/// Upper bound on physical keys; `KeyId` is a `u8`.
pub const MAX_KEYS: usize = 255;

/// Index of one physical key position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyId(pub u8);

impl KeyId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyNode {
    #[serde(default)]
    pub id: String,
    pub row: u8,
    pub hand: Hand,
    /// 0 = Pinky, 1 = Ring, 2 = Middle, 3 = Index
    pub finger: u8,
    /// 0 = Left Pinky .. 7 = Right Pinky
    pub abs_finger: u8,
    pub x: f64,
    #[serde(default)]
    pub is_home: bool,
    #[serde(default)]
    pub is_natural: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeyboardMeta {
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardDefinition {
    #[serde(default)]
    pub meta: KeyboardMeta,
    pub geometry: KeyboardGeometry,
}

impl KeyboardDefinition {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PfResult<Self> {
        let content = fs::read_to_string(path)?;
        let def: KeyboardDefinition = serde_json::from_str(&content)?;
        def.geometry.validate()?;
        Ok(def)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardGeometry {
    pub keys: Vec<KeyNode>,
    /// Horizontal distance between adjacent key centres, in `x` units.
    #[serde(default = "default_key_width")]
    pub key_width: f64,
}

fn default_key_width() -> f64 {
    19.0
}

impl KeyboardGeometry {
    pub fn new(keys: Vec<KeyNode>) -> Self {
        Self {
            keys,
            key_width: default_key_width(),
        }
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    #[inline(always)]
    pub fn key(&self, k: KeyId) -> &KeyNode {
        &self.keys[k.index()]
    }

    /// The home key of each absolute finger, if the finger has one.
    pub fn home_keys(&self) -> [Option<KeyId>; FINGER_COUNT] {
        let mut homes = [None; FINGER_COUNT];
        for (i, k) in self.keys.iter().enumerate() {
            if k.is_home && (k.abs_finger as usize) < FINGER_COUNT {
                homes[k.abs_finger as usize].get_or_insert(KeyId(i as u8));
            }
        }
        homes
    }

    /// Display position of a key: (row, column in key widths).
    pub fn grid_position(&self, k: KeyId) -> (usize, usize) {
        let node = self.key(k);
        let col = if self.key_width > 0.0 {
            (node.x / self.key_width).max(0.0).floor() as usize
        } else {
            0
        };
        (node.row as usize, col)
    }

    pub fn validate(&self) -> PfResult<()> {
        let n = self.keys.len();
        if n < crate::keymap::LETTER_COUNT {
            return Err(PentaforgeError::Config(format!(
                "Geometry has {} keys; at least {} are needed to place every letter",
                n,
                crate::keymap::LETTER_COUNT
            )));
        }
        if n > MAX_KEYS {
            return Err(PentaforgeError::Config(format!(
                "Geometry has {} keys; the maximum is {}",
                n, MAX_KEYS
            )));
        }
        if !(self.key_width.is_finite() && self.key_width > 0.0) {
            return Err(PentaforgeError::Config(
                "key_width must be positive".to_string(),
            ));
        }

        let mut ids = HashSet::new();
        let mut home_count = [0usize; FINGER_COUNT];
        let mut key_count = [0usize; FINGER_COUNT];

        for (i, k) in self.keys.iter().enumerate() {
            if k.finger > 3 {
                return Err(PentaforgeError::Config(format!(
                    "Key {} has relative finger {} (expected 0-3)",
                    i, k.finger
                )));
            }
            if k.abs_finger as usize >= FINGER_COUNT {
                return Err(PentaforgeError::Config(format!(
                    "Key {} has absolute finger {} (expected 0-7)",
                    i, k.abs_finger
                )));
            }
            let expected_abs = match k.hand {
                Hand::Left => k.finger,
                Hand::Right => 7 - k.finger,
            };
            if k.abs_finger != expected_abs {
                return Err(PentaforgeError::Config(format!(
                    "Key {} has absolute finger {} but hand {:?} / finger {} implies {}",
                    i, k.abs_finger, k.hand, k.finger, expected_abs
                )));
            }
            if !k.x.is_finite() {
                return Err(PentaforgeError::Config(format!(
                    "Key {} has a non-finite x coordinate",
                    i
                )));
            }
            if !k.id.is_empty() && !ids.insert(k.id.to_lowercase()) {
                return Err(PentaforgeError::Config(format!(
                    "Duplicate key id '{}'",
                    k.id
                )));
            }

            key_count[k.abs_finger as usize] += 1;
            if k.is_home {
                home_count[k.abs_finger as usize] += 1;
            }
        }

        for f in 0..FINGER_COUNT {
            if key_count[f] > 0 && home_count[f] != 1 {
                return Err(PentaforgeError::Config(format!(
                    "Finger {} owns {} keys but {} home keys (expected exactly 1)",
                    f, key_count[f], home_count[f]
                )));
            }
        }

        Ok(())
    }

    /// The 47-key row-staggered ANSI block: number row plus three letter rows.
    ///
    /// ```text
    ///  0   1   2   3   4   5   6   7   8   9   10  11  12  13
    ///    14  15  16  17  18  19  20  21  22  23  24  25
    ///      26  27  28  29  30  31  32  33  34  35  36
    ///        37  38  39  40  41  42  43  44  45  46
    /// ```
    pub fn standard() -> Self {
        const LABELS: [&str; 47] = [
            "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-", "=", "`", "\\", //
            "q", "w", "e", "r", "t", "y", "u", "i", "o", "p", "[", "]", //
            "a", "s", "d", "f", "g", "h", "j", "k", "l", ";", "'", //
            "z", "x", "c", "v", "b", "n", "m", ",", ".", "/",
        ];
        const X: [f64; 47] = [
            0.0, 19.0, 38.0, 57.0, 76.0, 95.0, 114.0, 133.0, 152.0, 171.0, 190.0, 209.0, 228.0,
            247.0, //
            9.0, 28.0, 47.0, 66.0, 85.0, 104.0, 123.0, 142.0, 161.0, 180.0, 199.0, 217.0, //
            14.0, 33.0, 52.0, 71.0, 90.0, 109.0, 128.0, 147.0, 166.0, 185.0, 204.0, //
            23.0, 42.0, 61.0, 80.0, 99.0, 118.0, 137.0, 156.0, 175.0, 194.0,
        ];
        const ROW_LENGTHS: [usize; 4] = [14, 12, 11, 10];
        const ABS_FINGER: [u8; 47] = [
            1, 1, 2, 2, 3, 3, 4, 5, 5, 5, 6, 6, 6, 6, //
            0, 1, 2, 3, 3, 4, 4, 5, 6, 7, 7, 7, //
            0, 1, 2, 3, 3, 4, 4, 5, 6, 7, 7, //
            1, 2, 3, 3, 3, 4, 4, 5, 6, 7,
        ];
        const HOME: [usize; 8] = [26, 27, 28, 29, 32, 33, 34, 35];
        const NATURAL: [usize; 15] = [15, 16, 21, 22, 26, 27, 28, 29, 32, 33, 34, 35, 40, 42, 46];

        let mut keys = Vec::with_capacity(47);
        let mut idx = 0;
        for (row, &len) in ROW_LENGTHS.iter().enumerate() {
            for _ in 0..len {
                let abs_finger = ABS_FINGER[idx];
                let (hand, finger) = if abs_finger < 4 {
                    (Hand::Left, abs_finger)
                } else {
                    (Hand::Right, 7 - abs_finger)
                };
                keys.push(KeyNode {
                    id: LABELS[idx].to_string(),
                    row: row as u8,
                    hand,
                    finger,
                    abs_finger,
                    x: X[idx],
                    is_home: HOME.contains(&idx),
                    is_natural: NATURAL.contains(&idx),
                });
                idx += 1;
            }
        }

        KeyboardGeometry::new(keys)
    }
}

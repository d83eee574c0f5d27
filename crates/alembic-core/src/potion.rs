//! Potion status effects.

use std::fmt;

/// Number of bits of a cooldown counter that are exposed as features.
///
/// Counters are encoded in binary; values above `2^bits - 1` saturate.
pub const POTION_COOLDOWN_BITS: usize = 4;

/// The kinds of potion a side can cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PotionType {
    /// Freezes enemy pieces in a zone around the target square.
    Freeze = 0,
    /// Lets a piece jump over the target square.
    Jump = 1,
}

impl PotionType {
    /// Total number of potion types.
    pub const COUNT: usize = 2;

    /// All potion types in index order.
    pub const ALL: [PotionType; 2] = [PotionType::Freeze, PotionType::Jump];

    /// Return the index (0..2).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name, used as the prefix of configuration keys.
    pub const fn name(self) -> &'static str {
        match self {
            PotionType::Freeze => "freeze",
            PotionType::Jump => "jump",
        }
    }
}

impl fmt::Display for PotionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Clamp a cooldown counter to the feature bit width.
#[inline]
pub const fn encoded_cooldown(cooldown: u8) -> u8 {
    let max = (1u8 << POTION_COOLDOWN_BITS) - 1;
    if cooldown > max { max } else { cooldown }
}

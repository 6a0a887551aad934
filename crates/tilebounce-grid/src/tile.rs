//! The closed tile vocabulary.
//!
//! Every level character maps to at most one [`TileKind`]. The table is fixed
//! at 24 entries; its order defines the texture slot of each kind, so a
//! texture manifest is matched to it positionally.

use serde::{Deserialize, Serialize};

/// Number of tile kinds, and therefore the exact number of texture slots.
pub const TILE_KIND_COUNT: usize = 24;

/// A known tile kind.
///
/// The discriminant is the texture slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall = 0,
    Ground = 1,
    Slide = 2,
    Bouncer = 3,
    Sky = 4,
    Flag = 5,
    Hole = 6,
    Plank = 7,
    Ring = 8,
    SizeUp = 9,
    Spike = 10,
    Star = 11,
    Heart = 12,
    Coin = 13,
    BallSpawn = 14,
    Tree = 15,
    Water = 16,
    SizeDown = 17,
    Vine = 18,
    Grass = 19,
    Hill = 20,
    Pipe = 21,
    Ice = 22,
    Cloud = 23,
}

impl TileKind {
    /// All kinds in texture-slot order.
    pub const ALL: [TileKind; TILE_KIND_COUNT] = [
        TileKind::Wall,
        TileKind::Ground,
        TileKind::Slide,
        TileKind::Bouncer,
        TileKind::Sky,
        TileKind::Flag,
        TileKind::Hole,
        TileKind::Plank,
        TileKind::Ring,
        TileKind::SizeUp,
        TileKind::Spike,
        TileKind::Star,
        TileKind::Heart,
        TileKind::Coin,
        TileKind::BallSpawn,
        TileKind::Tree,
        TileKind::Water,
        TileKind::SizeDown,
        TileKind::Vine,
        TileKind::Grass,
        TileKind::Hill,
        TileKind::Pipe,
        TileKind::Ice,
        TileKind::Cloud,
    ];

    /// Look up the kind for a level character. Unknown characters yield `None`.
    pub fn from_code(code: char) -> Option<Self> {
        let kind = match code {
            'X' => TileKind::Wall,
            'Z' => TileKind::Ground,
            'C' => TileKind::Slide,
            'S' => TileKind::Bouncer,
            '1' => TileKind::Sky,
            '2' => TileKind::Flag,
            '3' => TileKind::Hole,
            '4' => TileKind::Plank,
            '5' => TileKind::Ring,
            '6' => TileKind::SizeUp,
            '7' => TileKind::Spike,
            '8' => TileKind::Star,
            '9' => TileKind::Heart,
            'E' => TileKind::Coin,
            'Y' => TileKind::BallSpawn,
            'T' => TileKind::Tree,
            'W' => TileKind::Water,
            'U' => TileKind::SizeDown,
            'V' => TileKind::Vine,
            'G' => TileKind::Grass,
            'H' => TileKind::Hill,
            'P' => TileKind::Pipe,
            'I' => TileKind::Ice,
            'O' => TileKind::Cloud,
            _ => return None,
        };
        Some(kind)
    }

    /// The level character for this kind.
    pub fn code(self) -> char {
        match self {
            TileKind::Wall => 'X',
            TileKind::Ground => 'Z',
            TileKind::Slide => 'C',
            TileKind::Bouncer => 'S',
            TileKind::Sky => '1',
            TileKind::Flag => '2',
            TileKind::Hole => '3',
            TileKind::Plank => '4',
            TileKind::Ring => '5',
            TileKind::SizeUp => '6',
            TileKind::Spike => '7',
            TileKind::Star => '8',
            TileKind::Heart => '9',
            TileKind::Coin => 'E',
            TileKind::BallSpawn => 'Y',
            TileKind::Tree => 'T',
            TileKind::Water => 'W',
            TileKind::SizeDown => 'U',
            TileKind::Vine => 'V',
            TileKind::Grass => 'G',
            TileKind::Hill => 'H',
            TileKind::Pipe => 'P',
            TileKind::Ice => 'I',
            TileKind::Cloud => 'O',
        }
    }

    /// Texture slot in `0..TILE_KIND_COUNT`.
    #[inline]
    pub fn texture_index(self) -> usize {
        self as usize
    }

    /// Whether the terrain builder gives this tile a static collision box.
    ///
    /// Only wall, ground and slide are solid. Spikes, water, flags and pickups
    /// own their bodies through their entities.
    #[inline]
    pub fn is_solid(self) -> bool {
        matches!(self, TileKind::Wall | TileKind::Ground | TileKind::Slide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_has_24_unique_codes() {
        let codes: HashSet<char> = TileKind::ALL.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), TILE_KIND_COUNT);
    }

    #[test]
    fn code_lookup_is_inverse_of_code() {
        for kind in TileKind::ALL {
            assert_eq!(TileKind::from_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn all_is_in_slot_order() {
        for (slot, kind) in TileKind::ALL.iter().enumerate() {
            assert_eq!(kind.texture_index(), slot);
        }
    }

    #[test]
    fn unknown_codes_are_none() {
        for code in [' ', '.', '0', 'x', 'A', '#'] {
            assert_eq!(TileKind::from_code(code), None, "code {code:?}");
        }
    }

    #[test]
    fn only_wall_ground_slide_are_solid() {
        let solid: Vec<char> = TileKind::ALL
            .iter()
            .filter(|k| k.is_solid())
            .map(|k| k.code())
            .collect();
        assert_eq!(solid, vec!['X', 'Z', 'C']);
    }
}

//! The 16-tile cyclic track.

use serde::{Deserialize, Serialize};

use crate::cards::Element;

/// Number of tiles on the track.
pub const BOARD_SIZE: usize = 16;

/// Position on the track, always in `0..BOARD_SIZE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tile(pub u8);

impl Tile {
    /// Create a tile, wrapping out-of-range indices onto the track.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index % BOARD_SIZE as u8)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Move `steps` tiles; negative steps go counter-clockwise.
    #[must_use]
    pub fn offset(self, steps: i32) -> Self {
        let size = BOARD_SIZE as i32;
        Self((i32::from(self.0) + steps).rem_euclid(size) as u8)
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile {}", self.0)
    }
}

/// What landing on a tile triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// Duel against a chosen opponent.
    Battle,
    /// Everyone fights with the element fixed.
    Elemental(Element),
    /// The mover names the element for an all-in battle.
    Wildcard,
    Blank,
}

/// Immutable tile layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    tiles: [TileKind; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl Board {
    #[must_use]
    pub const fn new(tiles: [TileKind; BOARD_SIZE]) -> Self {
        Self { tiles }
    }

    /// The stock layout: battle tiles and blanks on the corners, every side
    /// mixing the three elements, two wildcards.
    #[must_use]
    pub const fn standard() -> Self {
        use Element::{Fire, Snow, Water};
        use TileKind::{Battle, Blank, Elemental, Wildcard};

        Self::new([
            Battle,
            Elemental(Fire),
            Elemental(Water),
            Elemental(Snow),
            Blank,
            Elemental(Snow),
            Wildcard,
            Elemental(Water),
            Battle,
            Elemental(Water),
            Elemental(Snow),
            Elemental(Fire),
            Blank,
            Elemental(Fire),
            Wildcard,
            Elemental(Snow),
        ])
    }

    /// A board where every tile has the same kind.
    #[must_use]
    pub const fn uniform(kind: TileKind) -> Self {
        Self::new([kind; BOARD_SIZE])
    }

    #[must_use]
    pub fn kind(&self, tile: Tile) -> TileKind {
        self.tiles[tile.index()]
    }

    #[must_use]
    pub fn tiles(&self) -> &[TileKind; BOARD_SIZE] {
        &self.tiles
    }

    /// Starting tile for `seat_index` when `seat_count` players spread evenly.
    #[must_use]
    pub fn starting_tile(seat_index: usize, seat_count: usize) -> Tile {
        let spacing = BOARD_SIZE / seat_count.max(1);
        Tile::new((seat_index * spacing % BOARD_SIZE) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_wraps() {
        assert_eq!(Tile::new(14).offset(5), Tile::new(3));
        assert_eq!(Tile::new(2).offset(-6), Tile::new(12));
        assert_eq!(Tile::new(0).offset(-1), Tile::new(15));
        assert_eq!(Tile::new(9).offset(16), Tile::new(9));
    }

    #[test]
    fn test_new_wraps() {
        assert_eq!(Tile::new(17), Tile::new(1));
    }

    #[test]
    fn test_standard_layout() {
        let board = Board::standard();

        assert_eq!(board.kind(Tile::new(0)), TileKind::Battle);
        assert_eq!(board.kind(Tile::new(1)), TileKind::Elemental(Element::Fire));
        assert_eq!(board.kind(Tile::new(4)), TileKind::Blank);
        assert_eq!(board.kind(Tile::new(6)), TileKind::Wildcard);

        for element in Element::ALL {
            let count = board
                .tiles()
                .iter()
                .filter(|&&kind| kind == TileKind::Elemental(element))
                .count();
            assert!(count >= 3);
        }
    }

    #[test]
    fn test_starting_tiles() {
        let tiles: Vec<_> = (0..4).map(|i| Board::starting_tile(i, 4)).collect();
        assert_eq!(tiles, vec![Tile(0), Tile(4), Tile(8), Tile(12)]);

        assert_eq!(Board::starting_tile(1, 2), Tile(8));
        assert_eq!(Board::starting_tile(2, 3), Tile(10));
    }

    #[test]
    fn test_board_serde() {
        let json = serde_json::to_string(&Board::uniform(TileKind::Blank)).unwrap();
        let parsed: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Board::uniform(TileKind::Blank));

        let kind: TileKind = serde_json::from_str(r#"{"elemental":"snow"}"#).unwrap();
        assert_eq!(kind, TileKind::Elemental(Element::Snow));
    }
}

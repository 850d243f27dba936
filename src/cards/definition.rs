//! Card definitions - static card data.
//!
//! A card is identified by its `CardId`; the catalog resolves the id to an
//! element and a face value. `Card` is the resolved form that lives in a
//! participant's hand.

use serde::{Deserialize, Serialize};

/// Unique identifier for a card definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// The three elements of the cycle.
///
/// Each element beats exactly one other and loses to the third:
/// fire melts snow, snow freezes water, water puts out fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Water,
    Snow,
}

impl Element {
    /// All elements, in a fixed order.
    pub const ALL: [Element; 3] = [Element::Fire, Element::Water, Element::Snow];

    /// The element this one beats.
    #[must_use]
    pub const fn beats(self) -> Element {
        match self {
            Element::Fire => Element::Snow,
            Element::Snow => Element::Water,
            Element::Water => Element::Fire,
        }
    }

    /// Does `self` beat `other`?
    #[must_use]
    pub fn beats_element(self, other: Element) -> bool {
        self.beats() == other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Snow => "snow",
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static card data as stored in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStats {
    pub element: Element,
    pub value: u8,
}

impl CardStats {
    #[must_use]
    pub const fn new(element: Element, value: u8) -> Self {
        Self { element, value }
    }
}

/// A resolved card: id plus its catalog stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub element: Element,
    pub value: u8,
}

impl Card {
    #[must_use]
    pub const fn new(id: CardId, element: Element, value: u8) -> Self {
        Self { id, element, value }
    }

    /// Combine an id with its catalog stats.
    #[must_use]
    pub const fn from_stats(id: CardId, stats: CardStats) -> Self {
        Self {
            id,
            element: stats.element,
            value: stats.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superiority_is_cyclic() {
        for element in Element::ALL {
            let beaten = element.beats();
            assert_ne!(element, beaten);
            // The beaten element never beats back
            assert!(!beaten.beats_element(element));
        }

        assert!(Element::Fire.beats_element(Element::Snow));
        assert!(Element::Snow.beats_element(Element::Water));
        assert!(Element::Water.beats_element(Element::Fire));
    }

    #[test]
    fn test_element_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Element::Snow).unwrap(), "\"snow\"");
        let parsed: Element = serde_json::from_str("\"water\"").unwrap();
        assert_eq!(parsed, Element::Water);
    }

    #[test]
    fn test_card_from_stats() {
        let card = Card::from_stats(CardId::new(3), CardStats::new(Element::Fire, 8));
        assert_eq!(card, Card::new(CardId::new(3), Element::Fire, 8));
        assert_eq!(format!("{}", card.id), "Card(3)");
    }
}

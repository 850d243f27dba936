//! Card catalog lookup.
//!
//! The `CardCatalog` trait is the read-only view the engine needs: resolve
//! an id to its element and value, and enumerate what exists. Catalogs are
//! shared across sessions behind an `Arc`.
//!
//! `CardRegistry` is the in-memory implementation.

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::definition::{CardId, CardStats, Element};

/// Catalog lookup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown card {0}")]
    UnknownCard(CardId),
}

/// Read-only card data service.
pub trait CardCatalog: Send + Sync {
    /// Resolve a card id.
    fn lookup(&self, id: CardId) -> Result<CardStats, CatalogError>;

    /// Total number of cards in the catalog.
    fn len(&self) -> usize;

    /// All card ids, in ascending order.
    fn card_ids(&self) -> Vec<CardId>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use waddle_fire::cards::{CardCatalog, CardId, CardRegistry, Element};
///
/// let registry = CardRegistry::new()
///     .with_card(CardId::new(1), Element::Fire, 3)
///     .with_card(CardId::new(2), Element::Snow, 7);
///
/// let stats = registry.lookup(CardId::new(2)).unwrap();
/// assert_eq!(stats.value, 7);
/// assert!(registry.lookup(CardId::new(9)).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardStats>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding one card per element and value `2..=12`.
    ///
    /// Ids are assigned as `element_index * 100 + value`, so `Fire 5` is
    /// card 5, `Water 5` is card 105 and `Snow 5` is card 205.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for (index, element) in Element::ALL.into_iter().enumerate() {
            for value in 2..=12u8 {
                let id = CardId::new(index as u32 * 100 + u32::from(value));
                registry.register(id, CardStats::new(element, value));
            }
        }
        registry
    }

    /// Register a card.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, id: CardId, stats: CardStats) {
        if self.cards.contains_key(&id) {
            panic!("Card with ID {:?} already registered", id);
        }
        self.cards.insert(id, stats);
    }

    /// Register a card (builder pattern).
    #[must_use]
    pub fn with_card(mut self, id: CardId, element: Element, value: u8) -> Self {
        self.register(id, CardStats::new(element, value));
        self
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }
}

impl CardCatalog for CardRegistry {
    fn lookup(&self, id: CardId) -> Result<CardStats, CatalogError> {
        self.cards
            .get(&id)
            .copied()
            .ok_or(CatalogError::UnknownCard(id))
    }

    fn len(&self) -> usize {
        self.cards.len()
    }

    fn card_ids(&self) -> Vec<CardId> {
        let mut ids: Vec<_> = self.cards.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = CardRegistry::new();
        registry.register(CardId::new(1), CardStats::new(Element::Water, 4));

        let stats = registry.lookup(CardId::new(1)).unwrap();
        assert_eq!(stats.element, Element::Water);
        assert_eq!(stats.value, 4);

        assert_eq!(
            registry.lookup(CardId::new(99)),
            Err(CatalogError::UnknownCard(CardId::new(99)))
        );
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_id_panics() {
        let _ = CardRegistry::new()
            .with_card(CardId::new(1), Element::Fire, 2)
            .with_card(CardId::new(1), Element::Snow, 3);
    }

    #[test]
    fn test_standard_registry() {
        let registry = CardRegistry::standard();

        assert_eq!(registry.len(), 33);
        assert_eq!(
            registry.lookup(CardId::new(105)).unwrap(),
            CardStats::new(Element::Water, 5)
        );
        assert_eq!(
            registry.lookup(CardId::new(212)).unwrap(),
            CardStats::new(Element::Snow, 12)
        );
    }

    #[test]
    fn test_card_ids_sorted() {
        let registry = CardRegistry::new()
            .with_card(CardId::new(9), Element::Fire, 2)
            .with_card(CardId::new(3), Element::Fire, 2)
            .with_card(CardId::new(5), Element::Fire, 2);

        assert_eq!(
            registry.card_ids(),
            vec![CardId::new(3), CardId::new(5), CardId::new(9)]
        );
        assert!(!registry.is_empty());
    }
}

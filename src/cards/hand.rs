//! Per-participant deck, dealt hand, and in-flight pick.
//!
//! The draw pile is refilled from the participant's source deck whenever it
//! runs dry, so dealing never stalls. Cards are resolved through the catalog
//! at draw time.

use super::definition::{Card, CardId, Element};
use super::registry::{CardCatalog, CatalogError};
use crate::core::GameRng;

/// A participant's cards.
#[derive(Clone, Debug)]
pub struct Hand {
    /// Deck list the draw pile is rebuilt from.
    source: Vec<CardId>,
    /// Remaining draw pile, already shuffled.
    deck: Vec<CardId>,
    dealt: Vec<Card>,
    pick: Option<Card>,
    target_size: usize,
}

impl Hand {
    /// Create an empty hand drawing from `source`.
    #[must_use]
    pub fn new(source: Vec<CardId>, target_size: usize) -> Self {
        Self {
            source,
            deck: Vec::new(),
            dealt: Vec::new(),
            pick: None,
            target_size,
        }
    }

    /// Deal cards until the hand is back at its target size.
    ///
    /// Returns the newly dealt cards.
    pub fn deal(
        &mut self,
        catalog: &dyn CardCatalog,
        rng: &mut GameRng,
    ) -> Result<Vec<Card>, CatalogError> {
        let mut fresh = Vec::new();

        while self.dealt.len() < self.target_size {
            let Some(id) = self.draw_id(rng) else {
                break;
            };
            let card = Card::from_stats(id, catalog.lookup(id)?);
            self.dealt.push(card);
            fresh.push(card);
        }

        Ok(fresh)
    }

    fn draw_id(&mut self, rng: &mut GameRng) -> Option<CardId> {
        if self.deck.is_empty() {
            self.deck = self.source.clone();
            rng.shuffle(&mut self.deck);
        }
        self.deck.pop()
    }

    /// Cards currently held.
    #[must_use]
    pub fn dealt(&self) -> &[Card] {
        &self.dealt
    }

    /// Cards left in the draw pile before the next refill.
    #[must_use]
    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    /// The committed card for the current encounter.
    #[must_use]
    pub fn pick(&self) -> Option<Card> {
        self.pick
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.dealt.iter().any(|card| card.id == id)
    }

    /// Can `id` be played into a battle whose element is `element`?
    ///
    /// With no fixed element anything held is playable. With one, an
    /// off-element card is refused while the hand holds both another
    /// off-element card and a card of the battle element. A hand with no
    /// matching card may play anything.
    #[must_use]
    pub fn can_play(&self, id: CardId, element: Option<Element>) -> bool {
        let Some(position) = self.dealt.iter().position(|card| card.id == id) else {
            return false;
        };
        let Some(element) = element else {
            return true;
        };
        if self.dealt[position].element == element {
            return true;
        }

        let holds_match = self.dealt.iter().any(|card| card.element == element);
        let other_off_element = self
            .dealt
            .iter()
            .enumerate()
            .any(|(i, card)| i != position && card.element != element);

        !(holds_match && other_off_element)
    }

    /// Move a held card into the pick slot.
    ///
    /// Returns `None` if the card is not held. Eligibility is checked by the
    /// caller through [`Hand::can_play`].
    pub fn play(&mut self, id: CardId) -> Option<Card> {
        let position = self.dealt.iter().position(|card| card.id == id)?;
        let card = self.dealt.remove(position);
        self.pick = Some(card);
        Some(card)
    }

    /// Choose a card to play on the owner's behalf.
    ///
    /// Prefers a card of the battle element when one is fixed and held,
    /// otherwise any held card.
    pub fn choose_auto(&self, element: Option<Element>, rng: &mut GameRng) -> Option<CardId> {
        let matching: Vec<CardId> = match element {
            Some(element) => self
                .dealt
                .iter()
                .filter(|card| card.element == element)
                .map(|card| card.id)
                .collect(),
            None => Vec::new(),
        };

        if !matching.is_empty() {
            return rng.choose(&matching).copied();
        }

        let all: Vec<CardId> = self.dealt.iter().map(|card| card.id).collect();
        rng.choose(&all).copied()
    }

    pub fn clear_pick(&mut self) {
        self.pick = None;
    }
}

//! Property checks for the board ring, the submission rule and battle
//! resolution.

use proptest::prelude::*;
use waddle_fire::cards::{Card, CardId, CardRegistry, Element, Hand};
use waddle_fire::core::{GameRng, Seat};
use waddle_fire::game::{resolve_duel, resolve_multi_party, Outcome, SpinRoll, Tile, BOARD_SIZE};

fn element() -> impl Strategy<Value = Element> {
    prop::sample::select(Element::ALL.to_vec())
}

fn card() -> impl Strategy<Value = Card> {
    (element(), 2u8..=12).prop_map(|(element, value)| Card::new(CardId::new(0), element, value))
}

proptest! {
    #[test]
    fn spin_candidates_stay_on_the_ring(from in 0u8..BOARD_SIZE as u8, amount in 1u8..=6) {
        let roll = SpinRoll::from_tile(Tile::new(from), amount);

        prop_assert!(roll.clockwise.index() < BOARD_SIZE);
        prop_assert!(roll.counter_clockwise.index() < BOARD_SIZE);
        prop_assert_ne!(roll.clockwise, roll.counter_clockwise);
        prop_assert!(!roll.contains(Tile::new(from)));
        prop_assert_eq!(roll.clockwise.offset(-i32::from(amount)), Tile::new(from));
    }

    /// Whatever is dealt, some card can always be played.
    #[test]
    fn every_hand_has_a_playable_card(
        elements in prop::collection::vec(element(), 1..=5),
        battle in prop::option::of(element()),
        seed in any::<u64>(),
    ) {
        let mut registry = CardRegistry::new();
        let mut ids = Vec::new();
        for (i, element) in elements.iter().enumerate() {
            let id = CardId::new(i as u32 + 1);
            registry = registry.with_card(id, *element, 5);
            ids.push(id);
        }

        let mut rng = GameRng::new(seed);
        let mut hand = Hand::new(ids.clone(), ids.len());
        hand.deal(&registry, &mut rng).unwrap();

        prop_assert!(ids.iter().any(|&id| hand.can_play(id, battle)));

        let auto = hand.choose_auto(battle, &mut rng).unwrap();
        prop_assert!(hand.can_play(auto, battle));
    }

    #[test]
    fn duel_outcomes_are_mirrored(first in card(), second in card()) {
        let (a, b) = resolve_duel(first, second);
        let (b2, a2) = resolve_duel(second, first);

        prop_assert_eq!(a, a2);
        prop_assert_eq!(b, b2);
        prop_assert_eq!(a == Outcome::Tied, b == Outcome::Tied);
    }

    #[test]
    fn multi_party_has_a_top_scorer(
        battle in element(),
        cards in prop::collection::vec(card(), 2..=4),
    ) {
        let plays: Vec<(Seat, Card)> = cards
            .into_iter()
            .enumerate()
            .map(|(i, card)| (Seat::new(i as u8), card))
            .collect();

        let outcomes = resolve_multi_party(battle, &plays);

        prop_assert_eq!(outcomes.len(), plays.len());
        prop_assert!(outcomes.iter().any(|outcome| *outcome != Outcome::Defeated));
        let winners = outcomes.iter().filter(|outcome| **outcome == Outcome::Winner).count();
        prop_assert!(winners <= 1);
    }
}

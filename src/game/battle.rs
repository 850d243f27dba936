//! Battle phase state machine and combat resolution.
//!
//! ```text
//! Idle ──▶ AwaitElementChoice ──┐
//!   │                           ├──▶ InCombat ──▶ Idle
//!   └────▶ AwaitOpponentChoice ─┘
//! ```
//!
//! Tile resolution moves the engine out of `Idle`; a battle is judged once
//! every combatant has a pick, which returns the engine to `Idle`.
//!
//! ## Resolution
//!
//! - **Multi-party**: a card scores its value if it matches the battle
//!   element, else 0. Everyone below the top score loses one energy. A
//!   shared top score is a tie for those players.
//! - **Duel**: same element compares values; different elements use the
//!   superiority cycle regardless of value. The winner gains one energy,
//!   the loser loses one.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::ninja::Ninja;
use crate::cards::{Card, CardId, Element};
use crate::core::{Seat, SeatMap, SessionError};

/// Seats taking part in one battle.
pub type Combatants = SmallVec<[Seat; 4]>;

/// Where the battle state machine is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    #[default]
    Idle = 0,
    AwaitElementChoice = 1,
    AwaitOpponentChoice = 2,
    InCombat = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleKind {
    /// Every participant, one fixed element.
    MultiParty,
    /// Two participants, superiority cycle applies.
    Duel,
}

/// A battle in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    pub kind: BattleKind,
    pub element: Option<Element>,
    pub seats: Combatants,
}

impl Battle {
    #[must_use]
    pub fn includes(&self, seat: Seat) -> bool {
        self.seats.contains(&seat)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Winner,
    Tied,
    Defeated,
}

/// One combatant's line in a judged battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatResult {
    pub seat: Seat,
    pub card: Card,
    pub outcome: Outcome,
    /// Energy after the battle.
    pub energy: u8,
}

/// Result of judging a battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    pub kind: BattleKind,
    pub results: Vec<CombatResult>,
    /// Element shown with the result.
    pub element: Option<Element>,
}

/// Score outcomes for a multi-party battle.
///
/// Returns one outcome per play, in input order.
#[must_use]
pub fn resolve_multi_party(element: Element, plays: &[(Seat, Card)]) -> Vec<Outcome> {
    let score = |card: &Card| if card.element == element { card.value } else { 0 };

    let Some(best) = plays.iter().map(|(_, card)| score(card)).max() else {
        return Vec::new();
    };
    let at_best = plays.iter().filter(|(_, card)| score(card) == best).count();

    plays
        .iter()
        .map(|(_, card)| {
            if score(card) < best {
                Outcome::Defeated
            } else if at_best > 1 {
                Outcome::Tied
            } else {
                Outcome::Winner
            }
        })
        .collect()
}

/// Outcomes for the two sides of a duel.
#[must_use]
pub fn resolve_duel(first: Card, second: Card) -> (Outcome, Outcome) {
    use std::cmp::Ordering;

    let first_wins = if first.element == second.element {
        match first.value.cmp(&second.value) {
            Ordering::Greater => Some(true),
            Ordering::Less => Some(false),
            Ordering::Equal => None,
        }
    } else {
        Some(first.element.beats_element(second.element))
    };

    match first_wins {
        Some(true) => (Outcome::Winner, Outcome::Defeated),
        Some(false) => (Outcome::Defeated, Outcome::Winner),
        None => (Outcome::Tied, Outcome::Tied),
    }
}

/// The battle state machine for one session.
#[derive(Clone, Debug, Default)]
pub struct BattleEngine {
    phase: BattlePhase,
    battle: Option<Battle>,
    /// Opponents the mover may pick from while awaiting a choice.
    candidates: Combatants,
    /// Who owes the pending element or opponent choice.
    chooser: Option<Seat>,
}

impl BattleEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    #[must_use]
    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    #[must_use]
    pub fn candidates(&self) -> &[Seat] {
        &self.candidates
    }

    #[must_use]
    pub fn chooser(&self) -> Option<Seat> {
        self.chooser
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.phase == BattlePhase::Idle
    }

    /// The mover owes an element choice.
    pub fn await_element(&mut self, mover: Seat) {
        self.phase = BattlePhase::AwaitElementChoice;
        self.chooser = Some(mover);
        self.candidates.clear();
    }

    /// The mover owes an opponent choice among `candidates`.
    pub fn await_opponent(&mut self, mover: Seat, candidates: &[Seat]) {
        self.phase = BattlePhase::AwaitOpponentChoice;
        self.chooser = Some(mover);
        self.candidates = SmallVec::from_slice(candidates);
    }

    /// Drop a seat from the pending opponent candidates.
    pub fn remove_candidate(&mut self, seat: Seat) {
        self.candidates.retain(|&mut candidate| candidate != seat);
    }

    pub fn start_multi_party(&mut self, element: Element, seats: &[Seat]) -> &Battle {
        self.begin(Battle {
            kind: BattleKind::MultiParty,
            element: Some(element),
            seats: SmallVec::from_slice(seats),
        })
    }

    pub fn start_duel(&mut self, mover: Seat, opponent: Seat) -> &Battle {
        self.begin(Battle {
            kind: BattleKind::Duel,
            element: None,
            seats: SmallVec::from_slice(&[mover, opponent]),
        })
    }

    fn begin(&mut self, battle: Battle) -> &Battle {
        self.phase = BattlePhase::InCombat;
        self.chooser = None;
        self.candidates.clear();
        self.battle.insert(battle)
    }

    /// Would `seat` playing `card` be accepted right now?
    #[must_use]
    pub fn can_submit(&self, ninjas: &SeatMap<Ninja>, seat: Seat, card: CardId) -> bool {
        if self.phase != BattlePhase::InCombat {
            return false;
        }
        let Some(battle) = &self.battle else {
            return false;
        };
        let Some(ninja) = ninjas.get(seat) else {
            return false;
        };

        battle.includes(seat)
            && ninja.hand.pick().is_none()
            && ninja.hand.can_play(card, battle.element)
    }

    /// Commit a card for `seat`. Returns `false` when rejected.
    pub fn submit(&self, ninjas: &mut SeatMap<Ninja>, seat: Seat, card: CardId) -> bool {
        if !self.can_submit(ninjas, seat, card) {
            return false;
        }
        ninjas[seat].hand.play(card).is_some()
    }

    /// Combatants still owing a card.
    #[must_use]
    pub fn pending(&self, ninjas: &SeatMap<Ninja>) -> Combatants {
        match (&self.battle, self.phase) {
            (Some(battle), BattlePhase::InCombat) => battle
                .seats
                .iter()
                .copied()
                .filter(|&seat| ninjas[seat].hand.pick().is_none())
                .collect(),
            _ => SmallVec::new(),
        }
    }

    #[must_use]
    pub fn all_submitted(&self, ninjas: &SeatMap<Ninja>) -> bool {
        self.phase == BattlePhase::InCombat && self.pending(ninjas).is_empty()
    }

    /// Resolve the battle, apply energy changes and return to `Idle`.
    pub fn judge(
        &mut self,
        ninjas: &mut SeatMap<Ninja>,
        max_energy: u8,
    ) -> Result<Judgment, SessionError> {
        let battle = self
            .battle
            .take()
            .ok_or_else(|| SessionError::invariant("judging with no battle in progress"))?;
        self.reset();

        if battle.seats.is_empty() {
            return Err(SessionError::invariant("judging a battle with no combatants"));
        }

        let mut plays = Vec::with_capacity(battle.seats.len());
        for &seat in &battle.seats {
            let card = ninjas[seat].hand.pick().ok_or_else(|| {
                SessionError::invariant(format!("{} judged without a pick", seat))
            })?;
            plays.push((seat, card));
        }

        let (outcomes, element) = match battle.kind {
            BattleKind::MultiParty => {
                let element = battle.element.ok_or_else(|| {
                    SessionError::invariant("multi-party battle without an element")
                })?;
                (resolve_multi_party(element, &plays), battle.element)
            }
            BattleKind::Duel => {
                let &[(_, first), (_, second)] = plays.as_slice() else {
                    return Err(SessionError::invariant(format!(
                        "duel with {} combatants",
                        plays.len()
                    )));
                };
                let (a, b) = resolve_duel(first, second);
                let element = match (a, b) {
                    (Outcome::Winner, _) => Some(first.element),
                    (_, Outcome::Winner) => Some(second.element),
                    _ => battle.element,
                };
                (vec![a, b], element)
            }
        };

        let mut results = Vec::with_capacity(plays.len());
        for ((seat, card), outcome) in plays.into_iter().zip(outcomes) {
            let ninja = &mut ninjas[seat];
            match (battle.kind, outcome) {
                (_, Outcome::Defeated) => ninja.lose_energy(),
                (BattleKind::Duel, Outcome::Winner) => ninja.gain_energy(max_energy),
                _ => {}
            }
            ninja.hand.clear_pick();

            results.push(CombatResult {
                seat,
                card,
                outcome,
                energy: ninja.energy,
            });
        }

        Ok(Judgment {
            kind: battle.kind,
            results,
            element,
        })
    }

    /// Drop any pending choice or battle.
    pub fn reset(&mut self) {
        self.phase = BattlePhase::Idle;
        self.battle = None;
        self.chooser = None;
        self.candidates.clear();
    }
}

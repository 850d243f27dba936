//! Session events: what comes in and what goes out.
//!
//! Inbound, every change to a session is a `SessionEvent` handled one at a
//! time: a player action, a timer firing, or a departure. Outbound, the
//! session emits `GameEvent`s through its host.
//!
//! Both action and event enums serialize as `{"action": ..., "args": ...}`
//! frames, matching the wire shape the dispatch layer decodes. Variant tags
//! are snake_case and argument fields camelCase.

use serde::{Deserialize, Serialize};

use super::autoplay::TimerToken;
use super::battle::{BattleKind, CombatResult};
use super::board::Tile;
use super::turn::SpinRoll;
use crate::cards::{Card, CardId, Element};
use crate::core::Seat;

/// An action sent by a seated player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "action",
    content = "args",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum PlayerAction {
    ReadyForNextRound,
    SelectSpinnerChannel {
        channel: u8,
    },
    SelectTile {
        tile: Tile,
    },
    ChooseElement {
        element: Element,
    },
    ChooseOpponent {
        seat: Seat,
    },
    SubmitCard {
        card_id: CardId,
    },
}

impl PlayerAction {
    /// Wire name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReadyForNextRound => "ready_for_next_round",
            Self::SelectSpinnerChannel { .. } => "select_spinner_channel",
            Self::SelectTile { .. } => "select_tile",
            Self::ChooseElement { .. } => "choose_element",
            Self::ChooseOpponent { .. } => "choose_opponent",
            Self::SubmitCard { .. } => "submit_card",
        }
    }
}

/// One entry in the session's serialized event stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Action { seat: Seat, action: PlayerAction },
    Timeout(TimerToken),
    Departed(Seat),
}

/// Public view of a participant, sent when the game starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    pub seat: Seat,
    pub username: String,
    pub color: u32,
    pub tile: Tile,
    pub energy: u8,
}

/// Notifications produced by a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "action",
    content = "args",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum GameEvent {
    GameStarted {
        participants: Vec<ParticipantInfo>,
    },
    /// Sent to each participant with their own hand.
    RoundStarted {
        active_seat: Seat,
        hand: Vec<Card>,
        spin: SpinRoll,
    },
    SpinnerSelected {
        channel: u8,
    },
    TileSelected {
        seat: Seat,
        tile: Tile,
    },
    BattleStarted {
        kind: BattleKind,
        element: Option<Element>,
        seats: Vec<Seat>,
    },
    OpponentCardSubmitted {
        seat: Seat,
    },
    BattleJudged {
        results: Vec<CombatResult>,
        element: Option<Element>,
        /// Rank per seat, 0 while still playing.
        podium: Vec<u8>,
    },
    ParticipantFinished {
        seat: Seat,
        rank: u8,
    },
    ParticipantDeparted {
        seat: Seat,
        all_departed: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_wire_shape() {
        let action: PlayerAction =
            serde_json::from_value(json!({"action": "submit_card", "args": {"cardId": 12}}))
                .unwrap();
        assert_eq!(action, PlayerAction::SubmitCard { card_id: CardId::new(12) });
        assert_eq!(action.name(), "submit_card");

        let ready: PlayerAction =
            serde_json::from_value(json!({"action": "ready_for_next_round"})).unwrap();
        assert_eq!(ready, PlayerAction::ReadyForNextRound);
    }

    #[test]
    fn test_event_wire_shape() {
        let event = GameEvent::TileSelected {
            seat: Seat::new(1),
            tile: Tile::new(9),
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"action": "tile_selected", "args": {"seat": 1, "tile": 9}})
        );
    }

    #[test]
    fn test_round_started_shape() {
        let event = GameEvent::RoundStarted {
            active_seat: Seat::new(0),
            hand: vec![Card::new(CardId::new(5), Element::Fire, 5)],
            spin: SpinRoll::from_tile(Tile::new(0), 3),
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "action": "round_started",
                "args": {
                    "activeSeat": 0,
                    "hand": [{"id": 5, "element": "fire", "value": 5}],
                    "spin": {"amount": 3, "clockwiseTile": 3, "counterClockwiseTile": 13}
                }
            })
        );
    }

    #[test]
    fn test_participant_departed_shape() {
        let event = GameEvent::ParticipantDeparted {
            seat: Seat::new(1),
            all_departed: false,
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"action": "participant_departed", "args": {"seat": 1, "allDeparted": false}})
        );
    }

    #[test]
    fn test_battle_started_shape() {
        let event = GameEvent::BattleStarted {
            kind: BattleKind::MultiParty,
            element: Some(Element::Water),
            seats: vec![Seat::new(0), Seat::new(2)],
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "action": "battle_started",
                "args": {"kind": "multi_party", "element": "water", "seats": [0, 2]}
            })
        );
    }
}

//! Per-session action dispatch table.
//!
//! The dispatch layer hands a session raw `(name, args)` pairs. The table
//! maps each action name to a decoder producing a typed `PlayerAction`, and
//! tracks which seats currently have their listener attached: a seat is
//! attached when it joins and detached when it leaves, and frames from a
//! detached seat are dropped.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use serde_json::Value;

use super::board::Tile;
use super::event::PlayerAction;
use crate::cards::{CardId, Element};
use crate::core::Seat;

/// Turns a frame's `args` into a typed action.
pub type Decoder = fn(&Value) -> Result<PlayerAction, serde_json::Error>;

/// Why a frame was not turned into an action.
#[derive(Debug)]
pub enum DispatchMiss {
    UnknownAction,
    NotListening,
    Malformed(serde_json::Error),
}

#[derive(Clone, Debug, Default)]
pub struct ActionTable {
    decoders: FxHashMap<&'static str, Decoder>,
    listening: FxHashSet<Seat>,
}

impl ActionTable {
    /// Table with every player action registered and no seat attached.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::default();
        table.register("ready_for_next_round", decode_ready);
        table.register("select_spinner_channel", decode_spinner);
        table.register("select_tile", decode_tile);
        table.register("choose_element", decode_element);
        table.register("choose_opponent", decode_opponent);
        table.register("submit_card", decode_card);
        table
    }

    pub fn register(&mut self, name: &'static str, decoder: Decoder) {
        self.decoders.insert(name, decoder);
    }

    pub fn attach(&mut self, seat: Seat) {
        self.listening.insert(seat);
    }

    pub fn detach(&mut self, seat: Seat) {
        self.listening.remove(&seat);
    }

    #[must_use]
    pub fn is_listening(&self, seat: Seat) -> bool {
        self.listening.contains(&seat)
    }

    /// Decode a frame from `seat`.
    pub fn decode(&self, seat: Seat, name: &str, args: &Value) -> Result<PlayerAction, DispatchMiss> {
        if !self.is_listening(seat) {
            return Err(DispatchMiss::NotListening);
        }
        let decoder = self.decoders.get(name).ok_or(DispatchMiss::UnknownAction)?;
        decoder(args).map_err(DispatchMiss::Malformed)
    }
}

fn decode_ready(_: &Value) -> Result<PlayerAction, serde_json::Error> {
    Ok(PlayerAction::ReadyForNextRound)
}

fn decode_spinner(args: &Value) -> Result<PlayerAction, serde_json::Error> {
    #[derive(Deserialize)]
    struct Args {
        channel: u8,
    }
    let Args { channel } = Args::deserialize(args)?;
    Ok(PlayerAction::SelectSpinnerChannel { channel })
}

fn decode_tile(args: &Value) -> Result<PlayerAction, serde_json::Error> {
    #[derive(Deserialize)]
    struct Args {
        tile: Tile,
    }
    let Args { tile } = Args::deserialize(args)?;
    Ok(PlayerAction::SelectTile { tile })
}

fn decode_element(args: &Value) -> Result<PlayerAction, serde_json::Error> {
    #[derive(Deserialize)]
    struct Args {
        element: Element,
    }
    let Args { element } = Args::deserialize(args)?;
    Ok(PlayerAction::ChooseElement { element })
}

fn decode_opponent(args: &Value) -> Result<PlayerAction, serde_json::Error> {
    #[derive(Deserialize)]
    struct Args {
        seat: Seat,
    }
    let Args { seat } = Args::deserialize(args)?;
    Ok(PlayerAction::ChooseOpponent { seat })
}

fn decode_card(args: &Value) -> Result<PlayerAction, serde_json::Error> {
    #[derive(Deserialize)]
    struct Args {
        #[serde(rename = "cardId")]
        card_id: CardId,
    }
    let Args { card_id } = Args::deserialize(args)?;
    Ok(PlayerAction::SubmitCard { card_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> ActionTable {
        let mut table = ActionTable::standard();
        table.attach(Seat::new(0));
        table
    }

    #[test]
    fn test_decodes_each_action() {
        let table = table();
        let seat = Seat::new(0);

        let cases = [
            ("ready_for_next_round", json!({}), PlayerAction::ReadyForNextRound),
            (
                "select_spinner_channel",
                json!({"channel": 1}),
                PlayerAction::SelectSpinnerChannel { channel: 1 },
            ),
            ("select_tile", json!({"tile": 5}), PlayerAction::SelectTile { tile: Tile::new(5) }),
            (
                "choose_element",
                json!({"element": "fire"}),
                PlayerAction::ChooseElement { element: Element::Fire },
            ),
            (
                "choose_opponent",
                json!({"seat": 2}),
                PlayerAction::ChooseOpponent { seat: Seat::new(2) },
            ),
            (
                "submit_card",
                json!({"cardId": 204}),
                PlayerAction::SubmitCard { card_id: CardId::new(204) },
            ),
        ];

        for (name, args, expected) in cases {
            assert_eq!(table.decode(seat, name, &args).unwrap(), expected);
        }
    }

    #[test]
    fn test_unknown_and_malformed() {
        let table = table();
        let seat = Seat::new(0);

        assert!(matches!(
            table.decode(seat, "send_move", &json!({})),
            Err(DispatchMiss::UnknownAction)
        ));
        assert!(matches!(
            table.decode(seat, "select_tile", &json!({"tile": "north"})),
            Err(DispatchMiss::Malformed(_))
        ));
        assert!(matches!(
            table.decode(seat, "submit_card", &json!(null)),
            Err(DispatchMiss::Malformed(_))
        ));
    }

    #[test]
    fn test_detached_seat_is_ignored() {
        let mut table = table();

        assert!(matches!(
            table.decode(Seat::new(1), "ready_for_next_round", &json!({})),
            Err(DispatchMiss::NotListening)
        ));

        table.detach(Seat::new(0));
        assert!(!table.is_listening(Seat::new(0)));
        assert!(matches!(
            table.decode(Seat::new(0), "ready_for_next_round", &json!({})),
            Err(DispatchMiss::NotListening)
        ));
    }
}

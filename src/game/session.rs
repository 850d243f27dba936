//! The game session orchestrator.
//!
//! `GameSession` owns every participant, the turn scheduler, the battle
//! engine, the podium and the idle timer, and is driven by one serialized
//! stream of `SessionEvent`s. Invalid or out-of-turn actions are dropped
//! without a reply; only broken session state is reported as an error.
//!
//! ## Round flow
//!
//! ```text
//! round_started ─▶ select_spinner_channel ─▶ select_tile ─▶ tile resolution
//!                                                             │
//!     ┌───────────── blank ◀──────────────────────────────────┤
//!     │                      choose_element / choose_opponent ┤
//!     │                                                       ▼
//!     └──── next round ◀── elimination ◀── battle_judged ◀── submit_card
//! ```
//!
//! Timer firings and departures re-enter through the same `handle` call as
//! player actions and synthesize the same transitions a player would.

use std::sync::Arc;

use serde_json::Value;
use smallvec::SmallVec;
use tracing::{debug, info, trace, warn};

use super::action::{ActionTable, DispatchMiss};
use super::autoplay::{AutoplayTimer, TimeoutKind, TimerToken};
use super::battle::{BattleEngine, BattlePhase, Combatants, Judgment};
use super::board::{Board, Tile, TileKind};
use super::event::{GameEvent, ParticipantInfo, PlayerAction, SessionEvent};
use super::host::SessionHost;
use super::ninja::{Ninja, SeatedUser, UserId, SPINNER_CHANNELS};
use super::podium::{Finish, Podium};
use super::turn::{SpinRoll, TurnScheduler};
use crate::cards::{CardCatalog, CardId, Element, Hand};
use crate::core::{GameRng, Seat, SeatMap, SessionConfig, SessionError};

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// Started; waiting for every participant to report ready.
    WaitingForReady,
    Playing,
    Finished,
}

/// One running game.
pub struct GameSession<H: SessionHost> {
    id: u64,
    config: SessionConfig,
    catalog: Arc<dyn CardCatalog>,
    host: H,
    rng: GameRng,
    ninjas: SeatMap<Ninja>,
    turns: TurnScheduler,
    battle: BattleEngine,
    podium: Podium,
    timer: AutoplayTimer,
    actions: ActionTable,
    status: SessionStatus,
}

impl<H: SessionHost> GameSession<H> {
    /// Seat `users` in order and prepare their hands.
    ///
    /// Fails if the config is invalid, the seat count is out of range, or a
    /// deck names a card the catalog does not know.
    pub fn new(
        id: u64,
        config: SessionConfig,
        catalog: Arc<dyn CardCatalog>,
        users: Vec<SeatedUser>,
        host: H,
    ) -> Result<Self, SessionError> {
        config.validate()?;

        let seat_count = users.len();
        if seat_count < config.min_players || seat_count > config.max_players {
            return Err(SessionError::SeatCount {
                min: config.min_players,
                max: config.max_players,
                got: seat_count,
            });
        }

        let mut ninjas = Vec::with_capacity(seat_count);
        for (index, user) in users.into_iter().enumerate() {
            let deck = if user.deck.is_empty() {
                catalog.card_ids()
            } else {
                user.deck.clone()
            };
            if deck.is_empty() {
                return Err(SessionError::InvalidConfig(format!(
                    "{} has no cards to draw",
                    user.username
                )));
            }
            for &card in &deck {
                catalog.lookup(card)?;
            }

            let seat = Seat::new(index as u8);
            let tile = Board::starting_tile(index, seat_count);
            let hand = Hand::new(deck, config.hand_size);
            ninjas.push(Ninja::new(seat, user, tile, config.starting_energy, hand));
        }

        let mut actions = ActionTable::standard();
        for seat in Seat::all(seat_count) {
            actions.attach(seat);
        }

        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let timer = AutoplayTimer::new(config.idle_timeout());

        Ok(Self {
            id,
            config,
            catalog,
            host,
            rng,
            ninjas: SeatMap::from_vec(ninjas),
            turns: TurnScheduler::new(),
            battle: BattleEngine::new(),
            podium: Podium::new(seat_count),
            timer,
            actions,
            status: SessionStatus::WaitingForReady,
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn ninjas(&self) -> &SeatMap<Ninja> {
        &self.ninjas
    }

    #[must_use]
    pub fn ninja(&self, seat: Seat) -> Option<&Ninja> {
        self.ninjas.get(seat)
    }

    #[must_use]
    pub fn podium(&self) -> &Podium {
        &self.podium
    }

    #[must_use]
    pub fn battle(&self) -> &BattleEngine {
        &self.battle
    }

    #[must_use]
    pub fn active_seat(&self) -> Option<Seat> {
        match self.status {
            SessionStatus::Playing => self.turns.current(),
            _ => None,
        }
    }

    #[must_use]
    pub fn spin(&self) -> Option<SpinRoll> {
        self.turns.spin()
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.turns.round()
    }

    /// Currently armed idle timeout.
    #[must_use]
    pub fn armed_timeout(&self) -> Option<TimerToken> {
        self.timer.armed()
    }

    /// Seats still taking turns, in seat order.
    #[must_use]
    pub fn rotation(&self) -> Combatants {
        self.ninjas
            .iter()
            .filter(|(_, ninja)| ninja.in_rotation)
            .map(|(seat, _)| seat)
            .collect()
    }

    // === Lifecycle ===

    /// Announce the game. The first round begins once everyone is ready.
    pub fn start(&mut self) {
        let participants = self
            .ninjas
            .values()
            .map(|ninja| ParticipantInfo {
                seat: ninja.seat,
                username: ninja.user.username.clone(),
                color: ninja.user.color,
                tile: ninja.tile,
                energy: ninja.energy,
            })
            .collect();

        info!(session = self.id, seats = self.ninjas.seat_count(), "game started");
        self.host.broadcast(&GameEvent::GameStarted { participants });
    }

    /// A seated participant (re)joined: attach their listener.
    pub fn on_join(&mut self, seat: Seat) {
        if self.ninjas.get(seat).is_some_and(|ninja| ninja.connected) {
            self.actions.attach(seat);
        }
    }

    /// A participant left: detach their listener and reconcile the game.
    pub fn on_leave(&mut self, seat: Seat) -> Result<(), SessionError> {
        self.handle(SessionEvent::Departed(seat))
    }

    /// Decode and apply a raw frame from the dispatch layer.
    pub fn dispatch(&mut self, user: UserId, name: &str, args: &Value) -> Result<(), SessionError> {
        let Some(seat) = self.host.seat_of(user) else {
            trace!(session = self.id, ?user, name, "frame from unseated user");
            return Ok(());
        };

        match self.actions.decode(seat, name, args) {
            Ok(action) => self.handle(SessionEvent::Action { seat, action }),
            Err(DispatchMiss::UnknownAction) => {
                warn!(session = self.id, %seat, name, "unknown action");
                Ok(())
            }
            Err(DispatchMiss::NotListening) => {
                trace!(session = self.id, %seat, name, "seat not listening");
                Ok(())
            }
            Err(DispatchMiss::Malformed(err)) => {
                debug!(session = self.id, %seat, name, %err, "malformed action");
                Ok(())
            }
        }
    }

    /// Apply one event from the session's serialized stream.
    pub fn handle(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        match event {
            SessionEvent::Action { seat, action } => self.apply(seat, action),
            SessionEvent::Timeout(token) => self.on_timeout(token),
            SessionEvent::Departed(seat) => self.on_departure(seat),
        }
    }

    fn apply(&mut self, seat: Seat, action: PlayerAction) -> Result<(), SessionError> {
        if self.ninjas.get(seat).is_none() || self.status == SessionStatus::Finished {
            trace!(session = self.id, %seat, action = action.name(), "ignored");
            return Ok(());
        }

        let name = action.name();
        let accepted = match action {
            PlayerAction::ReadyForNextRound => self.mark_ready(seat)?,
            PlayerAction::SelectSpinnerChannel { channel } => self.select_spinner(seat, channel),
            PlayerAction::SelectTile { tile } => self.select_tile(seat, tile)?,
            PlayerAction::ChooseElement { element } => self.choose_element(seat, element)?,
            PlayerAction::ChooseOpponent { seat: opponent } => {
                self.choose_opponent(seat, opponent)?
            }
            PlayerAction::SubmitCard { card_id } => self.submit_card(seat, card_id)?,
        };

        if !accepted {
            trace!(session = self.id, %seat, action = name, "rejected");
        }
        Ok(())
    }

    // === Player actions ===

    fn mark_ready(&mut self, seat: Seat) -> Result<bool, SessionError> {
        if self.status != SessionStatus::WaitingForReady || self.ninjas[seat].ready {
            return Ok(false);
        }

        self.ninjas[seat].ready = true;
        debug!(session = self.id, %seat, "ready");
        self.start_if_ready()?;
        Ok(true)
    }

    fn start_if_ready(&mut self) -> Result<(), SessionError> {
        let all_ready = self
            .ninjas
            .values()
            .filter(|ninja| ninja.in_rotation)
            .all(|ninja| ninja.ready);

        if all_ready && self.status == SessionStatus::WaitingForReady {
            self.status = SessionStatus::Playing;
            self.begin_round()?;
        }
        Ok(())
    }

    fn is_mover(&self, seat: Seat) -> bool {
        self.status == SessionStatus::Playing && self.turns.current() == Some(seat)
    }

    fn select_spinner(&mut self, seat: Seat, channel: u8) -> bool {
        if !self.is_mover(seat)
            || !self.battle.is_idle()
            || channel >= SPINNER_CHANNELS
            || self.ninjas[seat].has_selected_spinner()
        {
            return false;
        }

        self.record_spinner(seat, channel);
        true
    }

    fn record_spinner(&mut self, seat: Seat, channel: u8) {
        self.ninjas[seat].spinner = Some(channel);
        debug!(session = self.id, %seat, channel, "spinner selected");
        self.host.broadcast(&GameEvent::SpinnerSelected { channel });
    }

    fn select_tile(&mut self, seat: Seat, tile: Tile) -> Result<bool, SessionError> {
        let reachable = self.turns.spin().is_some_and(|spin| spin.contains(tile));

        if !self.is_mover(seat)
            || !self.ninjas[seat].has_selected_spinner()
            || !self.battle.is_idle()
            || !reachable
        {
            return Ok(false);
        }

        self.cancel_timeout(TimeoutKind::Movement);
        self.move_to(seat, tile, false)?;
        Ok(true)
    }

    fn choose_element(&mut self, seat: Seat, element: Element) -> Result<bool, SessionError> {
        if self.battle.phase() != BattlePhase::AwaitElementChoice
            || self.battle.chooser() != Some(seat)
        {
            return Ok(false);
        }

        self.cancel_timeout(TimeoutKind::Movement);
        self.start_multi_party(seat, element)?;
        Ok(true)
    }

    fn choose_opponent(&mut self, seat: Seat, opponent: Seat) -> Result<bool, SessionError> {
        if self.battle.phase() != BattlePhase::AwaitOpponentChoice
            || self.battle.chooser() != Some(seat)
            || !self.battle.candidates().contains(&opponent)
        {
            return Ok(false);
        }

        self.cancel_timeout(TimeoutKind::Movement);
        self.start_duel(seat, opponent)?;
        Ok(true)
    }

    fn submit_card(&mut self, seat: Seat, card: CardId) -> Result<bool, SessionError> {
        if self.status != SessionStatus::Playing
            || !self.battle.submit(&mut self.ninjas, seat, card)
        {
            return Ok(false);
        }

        debug!(session = self.id, %seat, %card, "card submitted");
        self.announce_submission(seat);
        self.judge_if_complete()?;
        Ok(true)
    }

    fn announce_submission(&mut self, seat: Seat) {
        let event = GameEvent::OpponentCardSubmitted { seat };
        let others: Vec<Seat> = self
            .ninjas
            .iter()
            .filter(|(other, ninja)| *other != seat && ninja.connected)
            .map(|(other, _)| other)
            .collect();

        for other in others {
            self.host.send(other, &event);
        }
    }

    // === Movement and tile resolution ===

    fn move_to(&mut self, mover: Seat, tile: Tile, forced: bool) -> Result<(), SessionError> {
        self.ninjas[mover].tile = tile;
        debug!(session = self.id, %mover, %tile, forced, "tile selected");
        self.host.broadcast(&GameEvent::TileSelected { seat: mover, tile });

        self.resolve_tile(mover, tile, forced)
    }

    fn resolve_tile(&mut self, mover: Seat, tile: Tile, forced: bool) -> Result<(), SessionError> {
        let occupants: Combatants = self
            .ninjas
            .iter()
            .filter(|(seat, ninja)| *seat != mover && ninja.in_rotation && ninja.tile == tile)
            .map(|(seat, _)| seat)
            .collect();

        if !occupants.is_empty() {
            return self.require_opponent(mover, &occupants, forced);
        }

        match self.config.board.kind(tile) {
            TileKind::Elemental(element) => self.start_multi_party(mover, element),
            TileKind::Wildcard if forced => {
                let element = self.random_element();
                self.start_multi_party(mover, element)
            }
            TileKind::Wildcard => {
                self.battle.await_element(mover);
                self.arm_timeout(TimeoutKind::Movement);
                Ok(())
            }
            TileKind::Battle => {
                let others: Combatants = self
                    .rotation()
                    .into_iter()
                    .filter(|&seat| seat != mover)
                    .collect();
                if others.is_empty() {
                    return self.begin_round();
                }
                self.require_opponent(mover, &others, forced)
            }
            TileKind::Blank => self.begin_round(),
        }
    }

    /// Start a duel against the only candidate, a random one under forced
    /// play, or wait for the mover to choose.
    fn require_opponent(
        &mut self,
        mover: Seat,
        candidates: &[Seat],
        forced: bool,
    ) -> Result<(), SessionError> {
        match candidates {
            [only] => self.start_duel(mover, *only),
            _ if forced => {
                let opponent = *self
                    .rng
                    .choose(candidates)
                    .ok_or_else(|| SessionError::invariant("no opponent to choose from"))?;
                self.start_duel(mover, opponent)
            }
            _ => {
                self.battle.await_opponent(mover, candidates);
                self.arm_timeout(TimeoutKind::Movement);
                Ok(())
            }
        }
    }

    fn random_element(&mut self) -> Element {
        let index = self.rng.gen_range_usize(0..Element::ALL.len());
        Element::ALL[index]
    }

    // === Battles ===

    fn start_multi_party(&mut self, mover: Seat, element: Element) -> Result<(), SessionError> {
        let mut seats = self.rotation();
        if !seats.contains(&mover) {
            seats.push(mover);
            seats.sort_unstable();
        }

        self.battle.start_multi_party(element, &seats);
        self.on_battle_started()
    }

    fn start_duel(&mut self, mover: Seat, opponent: Seat) -> Result<(), SessionError> {
        self.battle.start_duel(mover, opponent);
        self.on_battle_started()
    }

    fn on_battle_started(&mut self) -> Result<(), SessionError> {
        let battle = self
            .battle
            .battle()
            .ok_or_else(|| SessionError::invariant("battle started without a battle"))?;

        let event = GameEvent::BattleStarted {
            kind: battle.kind,
            element: battle.element,
            seats: battle.seats.to_vec(),
        };
        let absent: Combatants = battle
            .seats
            .iter()
            .copied()
            .filter(|&seat| !self.ninjas[seat].connected)
            .collect();

        debug!(session = self.id, ?event, "battle started");
        self.host.broadcast(&event);
        self.arm_timeout(TimeoutKind::Combat);

        // Departed combatants cannot act for themselves
        for seat in absent {
            self.auto_submit(seat)?;
        }
        self.judge_if_complete()
    }

    fn auto_submit(&mut self, seat: Seat) -> Result<(), SessionError> {
        let element = self.battle.battle().and_then(|battle| battle.element);
        let card = self.ninjas[seat].hand.choose_auto(element, &mut self.rng);

        let accepted = card.is_some_and(|card| self.battle.submit(&mut self.ninjas, seat, card));
        if !accepted {
            return Err(SessionError::invariant(format!(
                "{} has no playable card for autoplay",
                seat
            )));
        }

        debug!(session = self.id, %seat, "card submitted by autoplay");
        self.announce_submission(seat);
        Ok(())
    }

    fn judge_if_complete(&mut self) -> Result<(), SessionError> {
        if !self.battle.all_submitted(&self.ninjas) {
            return Ok(());
        }

        self.cancel_timeout(TimeoutKind::Combat);
        let Judgment {
            results, element, ..
        } = self.battle.judge(&mut self.ninjas, self.config.max_energy)?;

        let finished = self.podium.eliminate(&mut self.ninjas);
        let podium = self.podium.ranks().values().copied().collect();

        debug!(session = self.id, ?results, "battle judged");
        self.host.broadcast(&GameEvent::BattleJudged {
            results,
            element,
            podium,
        });

        self.announce_finishes(&finished);
        self.continue_or_finish()
    }

    // === Rounds ===

    fn begin_round(&mut self) -> Result<(), SessionError> {
        self.battle.reset();

        let active = self
            .turns
            .advance_turn(&mut self.ninjas, &mut self.rng)
            .ok_or_else(|| SessionError::invariant("round started with nobody in rotation"))?;
        let spin = self
            .turns
            .spin()
            .ok_or_else(|| SessionError::invariant("round started without a spin"))?;

        for seat in self.rotation() {
            self.ninjas[seat].hand.deal(self.catalog.as_ref(), &mut self.rng)?;
        }

        debug!(
            session = self.id,
            round = self.turns.round(),
            %active,
            amount = spin.amount,
            "round started"
        );

        for seat in self.rotation() {
            let ninja = &self.ninjas[seat];
            if !ninja.connected {
                continue;
            }
            let event = GameEvent::RoundStarted {
                active_seat: active,
                hand: ninja.hand.dealt().to_vec(),
                spin,
            };
            self.host.send(seat, &event);
        }

        self.arm_timeout(TimeoutKind::Movement);
        Ok(())
    }

    fn continue_or_finish(&mut self) -> Result<(), SessionError> {
        if self.podium.is_complete() {
            self.finish();
            Ok(())
        } else {
            self.begin_round()
        }
    }

    fn announce_finishes(&mut self, finished: &[Finish]) {
        for &Finish { seat, rank } in finished {
            info!(session = self.id, %seat, rank, "participant finished");
            // A departed seat learns nothing more; its rank is in the podium
            if self.ninjas[seat].connected {
                self.host.send(seat, &GameEvent::ParticipantFinished { seat, rank });
            }
        }
    }

    fn finish(&mut self) {
        self.status = SessionStatus::Finished;
        self.clear_timeout();
        self.battle.reset();
        self.turns.clear();

        let ranks: Vec<u8> = self.podium.ranks().values().copied().collect();
        info!(session = self.id, ?ranks, "game finished");
    }

    // === Autoplay ===

    fn on_timeout(&mut self, token: TimerToken) -> Result<(), SessionError> {
        let Some(kind) = self.timer.fire(token) else {
            warn!(session = self.id, ?token, "stale timeout");
            return Ok(());
        };
        if self.status != SessionStatus::Playing {
            return Ok(());
        }

        debug!(session = self.id, ?kind, "idle timeout");
        match kind {
            TimeoutKind::Movement => self.force_movement(),
            TimeoutKind::Combat => self.force_combat(),
        }
    }

    /// Act for whoever owes the movement-phase decision.
    fn force_movement(&mut self) -> Result<(), SessionError> {
        match self.battle.phase() {
            BattlePhase::Idle => match self.turns.current() {
                Some(seat) => self.force_move(seat),
                None => Ok(()),
            },
            BattlePhase::AwaitElementChoice | BattlePhase::AwaitOpponentChoice => {
                self.force_choice()
            }
            BattlePhase::InCombat => Ok(()),
        }
    }

    fn force_move(&mut self, seat: Seat) -> Result<(), SessionError> {
        if !self.ninjas[seat].has_selected_spinner() {
            let channel = self.rng.gen_range_usize(0..SPINNER_CHANNELS as usize) as u8;
            self.record_spinner(seat, channel);
        }

        let spin = self
            .turns
            .spin()
            .ok_or_else(|| SessionError::invariant("forced move without a spin"))?;
        let tile = *self
            .rng
            .choose(&spin.candidates())
            .ok_or_else(|| SessionError::invariant("spin has no candidate tiles"))?;

        self.cancel_timeout(TimeoutKind::Movement);
        self.move_to(seat, tile, true)
    }

    fn force_choice(&mut self) -> Result<(), SessionError> {
        self.cancel_timeout(TimeoutKind::Movement);
        let chooser = self
            .battle
            .chooser()
            .ok_or_else(|| SessionError::invariant("pending choice without a chooser"))?;

        match self.battle.phase() {
            BattlePhase::AwaitElementChoice => {
                let element = self.random_element();
                self.start_multi_party(chooser, element)
            }
            BattlePhase::AwaitOpponentChoice => {
                let candidates: Combatants = SmallVec::from_slice(self.battle.candidates());
                self.require_opponent(chooser, &candidates, true)
            }
            _ => Ok(()),
        }
    }

    fn force_combat(&mut self) -> Result<(), SessionError> {
        for seat in self.battle.pending(&self.ninjas) {
            self.auto_submit(seat)?;
        }
        self.judge_if_complete()
    }

    // === Departures ===

    fn on_departure(&mut self, seat: Seat) -> Result<(), SessionError> {
        let Some(ninja) = self.ninjas.get_mut(seat) else {
            return Ok(());
        };
        if !ninja.connected {
            return Ok(());
        }
        ninja.connected = false;
        self.actions.detach(seat);

        if self.status == SessionStatus::Finished || ninja.is_ranked() {
            debug!(session = self.id, %seat, "finished participant left");
            return Ok(());
        }

        let rank = self
            .podium
            .assign(seat)
            .ok_or_else(|| SessionError::invariant(format!("{} left with no rank free", seat)))?;
        let was_mover = self.turns.current() == Some(seat);
        let ninja = &mut self.ninjas[seat];
        ninja.rank = rank;
        ninja.in_rotation = false;

        let all_departed = self.podium.finish_position() <= 1;
        info!(session = self.id, %seat, rank, "participant departed");
        self.host.broadcast(&GameEvent::ParticipantDeparted { seat, all_departed });
        self.announce_finishes(&[Finish { seat, rank }]);

        if all_departed {
            if let Some(survivor) = self.podium.crown_survivor(&mut self.ninjas) {
                self.announce_finishes(&[survivor]);
            }
            self.finish();
            return Ok(());
        }

        if self.status == SessionStatus::WaitingForReady {
            return self.start_if_ready();
        }

        match self.battle.phase() {
            BattlePhase::Idle if was_mover => {
                self.cancel_timeout(TimeoutKind::Movement);
                self.force_move(seat)
            }
            BattlePhase::AwaitElementChoice | BattlePhase::AwaitOpponentChoice
                if self.battle.chooser() == Some(seat) =>
            {
                self.force_choice()
            }
            BattlePhase::AwaitOpponentChoice if self.battle.candidates().contains(&seat) => {
                self.battle.remove_candidate(seat);
                let remaining: Combatants = SmallVec::from_slice(self.battle.candidates());
                match (remaining.as_slice(), self.battle.chooser()) {
                    (&[only], Some(chooser)) => {
                        self.cancel_timeout(TimeoutKind::Movement);
                        self.start_duel(chooser, only)
                    }
                    ([], _) => self.begin_round(),
                    _ => Ok(()),
                }
            }
            BattlePhase::InCombat if self.battle.pending(&self.ninjas).contains(&seat) => {
                self.auto_submit(seat)?;
                self.judge_if_complete()
            }
            _ => Ok(()),
        }
    }

    // === Timers ===

    fn arm_timeout(&mut self, kind: TimeoutKind) {
        let (replaced, scheduled) = self.timer.arm(kind);
        if let Some(token) = replaced {
            self.host.cancel_timeout(token);
        }
        self.host.schedule_timeout(scheduled);
    }

    fn cancel_timeout(&mut self, kind: TimeoutKind) {
        if let Some(token) = self.timer.cancel(kind) {
            self.host.cancel_timeout(token);
        }
    }

    fn clear_timeout(&mut self) {
        if let Some(token) = self.timer.clear() {
            self.host.cancel_timeout(token);
        }
    }
}

impl<H: SessionHost> std::fmt::Debug for GameSession<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("round", &self.turns.round())
            .field("active_seat", &self.turns.current())
            .field("phase", &self.battle.phase())
            .field("finish_position", &self.podium.finish_position())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardRegistry;
    use crate::game::battle::BattleKind;
    use crate::game::host::{Recipient, RecordingHost};

    fn session(players: u64) -> GameSession<RecordingHost> {
        session_on(players, TileKind::Blank)
    }

    fn session_on(players: u64, kind: TileKind) -> GameSession<RecordingHost> {
        let users = (1..=players)
            .map(|id| SeatedUser::new(id, format!("p{}", id)))
            .collect();
        let host = RecordingHost::new((1..=players).map(UserId));
        let config = SessionConfig::new().board(Board::uniform(kind)).seed(5);

        GameSession::new(1, config, Arc::new(CardRegistry::standard()), users, host).unwrap()
    }

    fn ready_all(session: &mut GameSession<RecordingHost>) {
        session.start();
        for seat in Seat::all(session.ninjas().seat_count()) {
            session
                .handle(SessionEvent::Action {
                    seat,
                    action: PlayerAction::ReadyForNextRound,
                })
                .unwrap();
        }
    }

    fn act(session: &mut GameSession<RecordingHost>, seat: Seat, action: PlayerAction) {
        session.handle(SessionEvent::Action { seat, action }).unwrap();
    }

    /// Put `occupants` on seat 0's clockwise candidate and everyone else on
    /// seat 0's own tile, which a spin never reaches. Returns the candidate.
    fn crowd_clockwise(session: &mut GameSession<RecordingHost>, occupants: &[Seat]) -> Tile {
        assert_eq!(session.active_seat(), Some(Seat(0)));
        let spin = session.spin().unwrap();
        let home = session.ninjas[Seat(0)].tile;

        for seat in Seat::all(session.ninjas.seat_count()).skip(1) {
            session.ninjas[seat].tile = if occupants.contains(&seat) {
                spin.clockwise
            } else {
                home
            };
        }
        spin.clockwise
    }

    fn land_on(session: &mut GameSession<RecordingHost>, tile: Tile) {
        act(session, Seat(0), PlayerAction::SelectSpinnerChannel { channel: 0 });
        act(session, Seat(0), PlayerAction::SelectTile { tile });
    }

    #[test]
    fn test_starting_tiles_are_spread() {
        let session = session(4);
        let tiles: Vec<u8> = session.ninjas().values().map(|ninja| ninja.tile.0).collect();
        assert_eq!(tiles, vec![0, 4, 8, 12]);
        assert_eq!(session.rotation().len(), 4);
    }

    #[test]
    fn test_round_started_skips_departed_seats() {
        let mut session = session(3);
        ready_all(&mut session);
        session.on_leave(Seat(1)).unwrap();
        session.host_mut().drain();

        // Autoplay until the next round is dealt
        while session.round() < 2 {
            let token = session.armed_timeout().unwrap();
            session.handle(SessionEvent::Timeout(token)).unwrap();
        }

        let dealt_to: Vec<Recipient> = session
            .host()
            .outbox
            .iter()
            .filter(|(_, event)| matches!(event, GameEvent::RoundStarted { .. }))
            .map(|(to, _)| *to)
            .collect();
        assert!(!dealt_to.contains(&Recipient::Seat(Seat(1))));
        assert!(!dealt_to.is_empty());
    }

    #[test]
    fn test_actions_after_finish_are_ignored() {
        let mut session = session(2);
        ready_all(&mut session);
        session.on_leave(Seat(0)).unwrap();
        assert_eq!(session.status(), SessionStatus::Finished);
        assert_eq!(session.active_seat(), None);

        let before = session.host().outbox.len();
        session
            .handle(SessionEvent::Action {
                seat: Seat(1),
                action: PlayerAction::SelectSpinnerChannel { channel: 0 },
            })
            .unwrap();
        assert_eq!(session.host().outbox.len(), before);
    }

    #[test]
    fn test_single_occupant_forces_duel_over_tile_kind() {
        let mut session = session_on(3, TileKind::Elemental(Element::Fire));
        ready_all(&mut session);
        let tile = crowd_clockwise(&mut session, &[Seat(1)]);

        land_on(&mut session, tile);

        let battle = session.battle().battle().unwrap();
        assert_eq!(battle.kind, BattleKind::Duel);
        assert_eq!(battle.element, None);
        assert_eq!(battle.seats.as_slice(), &[Seat(0), Seat(1)]);
        assert_eq!(session.battle().phase(), BattlePhase::InCombat);
    }

    #[test]
    fn test_crowded_tile_offers_only_occupants() {
        let mut session = session(4);
        ready_all(&mut session);
        let tile = crowd_clockwise(&mut session, &[Seat(1), Seat(2)]);

        land_on(&mut session, tile);

        assert_eq!(session.battle().phase(), BattlePhase::AwaitOpponentChoice);
        assert_eq!(session.battle().candidates(), &[Seat(1), Seat(2)]);
        assert_eq!(session.battle().chooser(), Some(Seat(0)));

        // Seat 3 is in rotation but not on the tile
        act(&mut session, Seat(0), PlayerAction::ChooseOpponent { seat: Seat(3) });
        assert_eq!(session.battle().phase(), BattlePhase::AwaitOpponentChoice);

        act(&mut session, Seat(0), PlayerAction::ChooseOpponent { seat: Seat(2) });
        let battle = session.battle().battle().unwrap();
        assert_eq!(battle.kind, BattleKind::Duel);
        assert_eq!(battle.seats.as_slice(), &[Seat(0), Seat(2)]);
    }

    #[test]
    fn test_idle_opponent_choice_picks_an_occupant() {
        let mut session = session(4);
        ready_all(&mut session);
        let tile = crowd_clockwise(&mut session, &[Seat(1), Seat(2)]);
        land_on(&mut session, tile);
        assert_eq!(session.battle().phase(), BattlePhase::AwaitOpponentChoice);

        let token = session.armed_timeout().unwrap();
        session.handle(SessionEvent::Timeout(token)).unwrap();

        let battle = session.battle().battle().unwrap();
        assert_eq!(battle.kind, BattleKind::Duel);
        assert!(battle.includes(Seat(0)));
        assert!(!battle.includes(Seat(3)));
        assert!(battle.includes(Seat(1)) || battle.includes(Seat(2)));
        assert_eq!(battle.seats.len(), 2);
    }

    #[test]
    fn test_debug_summary() {
        let session = session(2);
        let debug = format!("{:?}", session);
        assert!(debug.contains("WaitingForReady"));
    }
}

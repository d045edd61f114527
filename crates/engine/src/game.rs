//! Turn state machine
//!
//! [`Game::apply`] is the only way a player changes the game. Each call
//! validates the intent against the current phase and seat, then applies it in
//! full and reports what happened as an [`Outcome`]. A rejected intent returns
//! a [`GameError`] and leaves every field untouched.

use crate::core::{match_over, score_round, Deck, Hand, Player, RoundResult, ShuffleRng};
use crate::error::GameError;
use crate::event::{GameEvent, Outcome};
use crate::snapshot::{CardView, GameSnapshot, PlayerView};
use crate::types::{
    Card, DrawSource, Intent, Phase, PlayerId, HAND_SIZE, MATCH_END_SCORE, MAX_PLAYERS,
    MIN_PLAYERS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Master seed for every round's deck; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Re-run the two-card initiative reveal before every round, not just the first
    pub initiative_each_round: bool,
    pub match_end_score: i32,
    pub max_players: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            initiative_each_round: false,
            match_end_score: MATCH_END_SCORE,
            max_players: MAX_PLAYERS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    rng: ShuffleRng,
    players: Vec<Player>,
    deck: Deck,
    phase: Phase,
    /// Seat index of the player holding the turn
    current: usize,
    pending: Option<Card>,
    pending_from_discard: bool,
    final_round: bool,
    round_ender: Option<PlayerId>,
    /// Players still owed their last turn of the final round
    final_owed: Vec<PlayerId>,
    /// Seat that opens rounds once initiative is settled
    opener: Option<PlayerId>,
    round: u32,
    last_result: Option<RoundResult>,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ShuffleRng::new(seed),
            None => ShuffleRng::from_entropy(),
        };
        Self {
            config,
            rng,
            players: Vec::with_capacity(MAX_PLAYERS),
            deck: Deck::empty(),
            phase: Phase::Lobby,
            current: 0,
            pending: None,
            pending_from_discard: false,
            final_round: false,
            round_ender: None,
            final_owed: Vec::new(),
            opener: None,
            round: 0,
            last_result: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub fn seat_of(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id() == id)
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn pending(&self) -> Option<&Card> {
        self.pending.as_ref()
    }

    pub fn is_final_round(&self) -> bool {
        self.final_round
    }

    pub fn round_ender(&self) -> Option<PlayerId> {
        self.round_ender
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    /// Player holding the turn, only while a turn is in progress
    pub fn current_player(&self) -> Option<PlayerId> {
        if self.phase.is_turn_phase() {
            self.players.get(self.current).map(Player::id)
        } else {
            None
        }
    }

    /// Every card value in play: draw pile, discard pile, hands, pending slot
    pub fn card_values(&self) -> Vec<i8> {
        let mut values: Vec<i8> = self.deck.cards().map(Card::value).collect();
        for player in &self.players {
            values.extend(player.hand().cards().iter().map(Card::value));
        }
        values.extend(self.pending.iter().map(Card::value));
        values
    }

    /// Seat a player. Only allowed before the match starts or after it ended.
    ///
    /// Seating into a finished match reopens the table: everyone already
    /// seated stays, scores go back to zero, and the phase returns to Lobby.
    pub fn add_player(&mut self, id: PlayerId, name: &str) -> Result<(), GameError> {
        if !matches!(self.phase, Phase::Lobby | Phase::MatchOver) {
            return Err(GameError::MatchInProgress);
        }
        if self.players.len() >= self.config.max_players {
            return Err(GameError::TableFull(self.config.max_players));
        }
        if self.seat_of(id).is_some() {
            return Err(GameError::DuplicatePlayer(id));
        }
        if self.players.iter().any(|p| p.name() == name) {
            return Err(GameError::NameTaken(name.to_string()));
        }
        if self.phase == Phase::MatchOver {
            self.reopen();
        }
        self.players.push(Player::new(id, name));
        log::debug!("[engine] seated player {id} ({name})");
        Ok(())
    }

    /// Unseat a player in any phase
    ///
    /// The leaver's hand is tucked under the discard pile and a pending card
    /// goes on top, so no card leaves play. The turn and the final-round
    /// bookkeeping move past the empty seat.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Outcome, GameError> {
        let seat = self.seat_of(id).ok_or(GameError::UnknownPlayer(id))?;
        let held_turn = self.phase.is_turn_phase() && seat == self.current;

        let mut leaver = self.players.remove(seat);
        let hand = leaver.hand_mut().take_all();
        if !hand.is_empty() {
            self.deck.tuck_under_discard(hand);
        }
        if held_turn {
            if let Some(card) = self.pending.take() {
                self.deck.discard(card);
            }
            self.pending_from_discard = false;
        }

        let mut outcome = Outcome::new(self.phase);
        outcome.events.push(GameEvent::PlayerLeft(id));

        let remaining = self.players.len();
        if seat < self.current {
            self.current -= 1;
        } else if remaining > 0 {
            self.current %= remaining;
        } else {
            self.current = 0;
        }
        let successor = (remaining > 0).then(|| self.players[seat % remaining].id());
        if self.opener == Some(id) {
            self.opener = successor;
        }
        self.final_owed.retain(|p| *p != id);

        if self.phase.is_in_match() && remaining < MIN_PLAYERS {
            log::info!("[engine] match abandoned, {remaining} player(s) left");
            self.phase = Phase::MatchOver;
            if let Some(card) = self.pending.take() {
                self.deck.discard(card);
            }
            self.final_round = false;
            self.final_owed.clear();
            outcome.events.push(GameEvent::MatchAbandoned);
            outcome.phase = self.phase;
            return Ok(outcome);
        }

        match self.phase {
            Phase::InitialReveal => self.settle_initiative(&mut outcome),
            phase if phase.is_turn_phase() => {
                if self.final_round && self.final_owed.is_empty() {
                    self.finish_round(&mut outcome);
                } else if held_turn {
                    self.hand_turn_to(self.current, &mut outcome);
                }
            }
            _ => {}
        }

        outcome.phase = self.phase;
        Ok(outcome)
    }

    /// Validate and apply one player intent
    pub fn apply(&mut self, player: PlayerId, intent: Intent) -> Result<Outcome, GameError> {
        let seat = self
            .seat_of(player)
            .ok_or(GameError::UnknownPlayer(player))?;

        let mut outcome = Outcome::new(self.phase);
        match intent {
            Intent::Start => self.start_round(&mut outcome)?,
            Intent::Draw(source) => self.draw(seat, source, &mut outcome)?,
            Intent::Exchange(index) => self.exchange(seat, index, &mut outcome)?,
            Intent::Discard => self.discard(seat, &mut outcome)?,
            Intent::Reveal(index) if self.phase == Phase::InitialReveal => {
                self.initial_reveal(seat, index, &mut outcome)?
            }
            Intent::Reveal(index) => self.reveal(seat, index, &mut outcome)?,
        }
        outcome.phase = self.phase;
        Ok(outcome)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            round: self.round,
            phase: self.phase.into(),
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    id: p.id().0,
                    name: p.name().to_string(),
                    score: p.score(),
                    hand: p.hand().cards().iter().map(CardView::from).collect(),
                })
                .collect(),
            discard_top: self.deck.peek_discard().map(CardView::from),
            draw_count: self.deck.draw_len(),
            current_player: self.current_player().map(|id| id.0),
            pending: self.pending.as_ref().map(CardView::from),
            final_round: self.final_round,
        }
    }

    fn reopen(&mut self) {
        log::info!("[engine] table reopened after {} round(s)", self.round);
        self.players = self
            .players
            .iter()
            .map(|p| Player::new(p.id(), p.name()))
            .collect();
        self.deck = Deck::empty();
        self.phase = Phase::Lobby;
        self.current = 0;
        self.pending = None;
        self.pending_from_discard = false;
        self.final_round = false;
        self.round_ender = None;
        self.final_owed.clear();
        self.opener = None;
        self.round = 0;
        self.last_result = None;
    }

    fn start_round(&mut self, outcome: &mut Outcome) -> Result<(), GameError> {
        if !matches!(self.phase, Phase::Lobby | Phase::RoundOver) {
            return Err(GameError::WrongPhase {
                action: "start",
                phase: self.phase,
            });
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::InsufficientPlayers {
                joined: self.players.len(),
                required: MIN_PLAYERS,
            });
        }

        let mut deck = Deck::build_seeded(self.rng.next_seed());
        let mut hands = Vec::with_capacity(self.players.len());
        for _ in 0..self.players.len() {
            let mut cards = Vec::with_capacity(HAND_SIZE);
            for _ in 0..HAND_SIZE {
                cards.push(deck.draw_or_recycle()?);
            }
            hands.push(Hand::new(cards));
        }
        deck.flip_initial_discard()?;

        for (player, hand) in self.players.iter_mut().zip(hands) {
            player.deal(hand);
        }
        self.deck = deck;
        self.round += 1;
        self.pending = None;
        self.pending_from_discard = false;
        self.final_round = false;
        self.round_ender = None;
        self.final_owed.clear();
        outcome.events.push(GameEvent::Started { round: self.round });
        log::info!(
            "[engine] round {} dealt to {} players",
            self.round,
            self.players.len()
        );

        match self.opener {
            Some(opener) if !self.config.initiative_each_round => {
                let seat = self.seat_of(opener).unwrap_or(0);
                self.hand_turn_to(seat, outcome);
            }
            _ => self.phase = Phase::InitialReveal,
        }
        Ok(())
    }

    fn initial_reveal(
        &mut self,
        seat: usize,
        index: usize,
        outcome: &mut Outcome,
    ) -> Result<(), GameError> {
        let player = &self.players[seat];
        if player.initiative_ready() {
            return Err(GameError::InitiativeDone(player.id()));
        }
        Self::check_face_down(player.hand(), index)?;

        let id = player.id();
        self.players[seat].hand_mut().reveal(index);
        outcome.events.push(GameEvent::Revealed { player: id, index });
        self.settle_initiative(outcome);
        Ok(())
    }

    /// Once everyone has revealed, the highest visible total opens.
    /// Ties go to the earliest seat.
    fn settle_initiative(&mut self, outcome: &mut Outcome) {
        if !self.players.iter().all(Player::initiative_ready) {
            return;
        }
        let mut best = 0usize;
        for (seat, player) in self.players.iter().enumerate() {
            if player.hand().visible_sum() > self.players[best].hand().visible_sum() {
                best = seat;
            }
        }
        self.opener = Some(self.players[best].id());
        log::info!("[engine] player {} opens", self.players[best].id());
        self.hand_turn_to(best, outcome);
    }

    fn check_turn(&self, seat: usize, action: &'static str, phase: Phase) -> Result<(), GameError> {
        if !self.phase.is_turn_phase() {
            return Err(GameError::WrongPhase {
                action,
                phase: self.phase,
            });
        }
        if seat != self.current {
            return Err(GameError::NotYourTurn {
                player: self.players[seat].id(),
                current: self.players[self.current].id(),
            });
        }
        if self.phase != phase {
            return Err(GameError::WrongPhase {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }

    fn check_index(hand: &Hand, index: usize) -> Result<(), GameError> {
        if index >= hand.len() {
            return Err(GameError::InvalidIndex {
                index,
                len: hand.len(),
            });
        }
        Ok(())
    }

    fn check_face_down(hand: &Hand, index: usize) -> Result<(), GameError> {
        Self::check_index(hand, index)?;
        if hand.get(index).is_some_and(Card::is_face_up) {
            return Err(GameError::AlreadyFaceUp(index));
        }
        Ok(())
    }

    fn draw(
        &mut self,
        seat: usize,
        source: DrawSource,
        outcome: &mut Outcome,
    ) -> Result<(), GameError> {
        self.check_turn(seat, "pick", Phase::AwaitingDraw)?;

        let (card, recycled) = match source {
            DrawSource::Deck => {
                let recycled = self.deck.draw_len() == 0;
                (self.deck.draw_or_recycle()?, recycled)
            }
            DrawSource::Discard => (self.deck.draw_from_discard()?, false),
        };

        let player = self.players[seat].id();
        self.pending = Some(card.revealed());
        self.pending_from_discard = source == DrawSource::Discard;
        self.phase = Phase::AwaitingDecision;
        outcome.events.push(GameEvent::Drew {
            player,
            source,
            recycled,
        });
        Ok(())
    }

    fn exchange(
        &mut self,
        seat: usize,
        index: usize,
        outcome: &mut Outcome,
    ) -> Result<(), GameError> {
        self.check_turn(seat, "exchange", Phase::AwaitingDecision)?;
        Self::check_index(self.players[seat].hand(), index)?;
        let card = self.pending.take().ok_or(GameError::WrongPhase {
            action: "exchange",
            phase: self.phase,
        })?;

        let player = self.players[seat].id();
        let displaced = self.players[seat]
            .hand_mut()
            .replace(index, card.revealed())
            .ok_or(GameError::InvalidIndex { index, len: 0 })?;
        self.deck.discard(displaced);
        self.pending_from_discard = false;
        outcome.events.push(GameEvent::Exchanged {
            player,
            index,
            displaced_value: displaced.value(),
        });

        self.after_hand_mutation(seat, outcome);
        self.end_turn(outcome);
        Ok(())
    }

    fn discard(&mut self, seat: usize, outcome: &mut Outcome) -> Result<(), GameError> {
        self.check_turn(seat, "discard", Phase::AwaitingDecision)?;
        if self.pending_from_discard {
            return Err(GameError::MustExchange);
        }
        if self.players[seat].hand().face_down_count() == 0 {
            return Err(GameError::NothingToReveal);
        }
        let card = self.pending.take().ok_or(GameError::WrongPhase {
            action: "discard",
            phase: self.phase,
        })?;

        self.deck.discard(card);
        self.phase = Phase::AwaitingReveal;
        outcome.events.push(GameEvent::Discarded {
            player: self.players[seat].id(),
        });
        Ok(())
    }

    fn reveal(
        &mut self,
        seat: usize,
        index: usize,
        outcome: &mut Outcome,
    ) -> Result<(), GameError> {
        self.check_turn(seat, "reveal", Phase::AwaitingReveal)?;
        Self::check_face_down(self.players[seat].hand(), index)?;

        let player = self.players[seat].id();
        self.players[seat].hand_mut().reveal(index);
        outcome.events.push(GameEvent::Revealed { player, index });

        self.after_hand_mutation(seat, outcome);
        self.end_turn(outcome);
        Ok(())
    }

    /// Clear matching columns, then check for the first fully revealed hand
    fn after_hand_mutation(&mut self, seat: usize, outcome: &mut Outcome) {
        let id = self.players[seat].id();
        let cleared = self.players[seat].hand_mut().clear_matching_columns();
        if !cleared.is_empty() {
            log::debug!("[engine] player {id} cleared columns {:?}", cleared.columns);
            for card in cleared.cards {
                self.deck.discard(card);
            }
            outcome.events.push(GameEvent::ColumnsCleared {
                player: id,
                columns: cleared.columns,
            });
        }

        if !self.final_round && self.players[seat].hand().all_face_up() {
            self.final_round = true;
            self.round_ender = Some(id);
            self.final_owed = self
                .players
                .iter()
                .map(Player::id)
                .filter(|p| *p != id)
                .collect();
            log::info!("[engine] player {id} revealed every card, final round");
            outcome.events.push(GameEvent::FinalRound { player: id });
        }
    }

    fn end_turn(&mut self, outcome: &mut Outcome) {
        if self.final_round {
            let id = self.players[self.current].id();
            self.final_owed.retain(|p| *p != id);
            if self.final_owed.is_empty() {
                self.finish_round(outcome);
                return;
            }
        }
        let next = (self.current + 1) % self.players.len();
        self.hand_turn_to(next, outcome);
    }

    fn hand_turn_to(&mut self, seat: usize, outcome: &mut Outcome) {
        self.current = seat;
        self.pending = None;
        self.pending_from_discard = false;
        self.phase = Phase::AwaitingDraw;
        outcome
            .events
            .push(GameEvent::TurnChanged(self.players[seat].id()));
    }

    fn finish_round(&mut self, outcome: &mut Outcome) {
        let result = score_round(&mut self.players, self.round_ender, self.round);
        self.pending = None;
        self.pending_from_discard = false;
        self.final_round = false;
        self.final_owed.clear();

        if match_over(&self.players, self.config.match_end_score) {
            log::info!("[engine] match over after round {}", self.round);
            self.phase = Phase::MatchOver;
            outcome.events.push(GameEvent::MatchOver(result.clone()));
        } else {
            log::info!("[engine] round {} over", self.round);
            self.phase = Phase::RoundOver;
            outcome.events.push(GameEvent::RoundOver(result.clone()));
        }
        self.last_result = Some(result);
    }

    #[cfg(test)]
    fn rig_hand(&mut self, seat: usize, values: &[(i8, bool)]) {
        use crate::types::CardId;
        let cards = values
            .iter()
            .enumerate()
            .map(|(i, &(value, up))| {
                let card = Card::new(CardId(1000 + (seat * 100 + i) as u32), value);
                if up {
                    card.revealed()
                } else {
                    card
                }
            })
            .collect();
        self.players[seat].deal(Hand::new(cards));
    }
}

use crate::action::Action;
use crate::card::Card;
use crate::config::SessionConfig;
use crate::error::RuleViolation;
use crate::hand::Hand;
use crate::rank::Class;
use crate::rules::{Effect, Field, THOUSAND_DAY_HAND_THRESHOLD};
use crate::shape::Play;

/// The outcome of one seat's turn, enough for the coordinator to broadcast a snapshot and the
/// journal to record a `turn`/`special` event pair.
#[derive(Debug, Clone)]
pub struct TurnResult {
    pub seat: usize,
    /// What was actually applied — a forced pass differs from `requested` when the seat's
    /// submission failed validation (§7: illegal plays are contained as a pass, not fatal).
    pub action_taken: Action,
    pub forced_pass: bool,
    pub effects: Vec<Effect>,
    pub finished: bool,
    /// `None` once four seats have finished — the game is over.
    pub next_active_seat: Option<usize>,
    pub thousand_day_hand: bool,
}

/// Owns one game's live state: hands, field, whose turn it is, and the finishing order.
/// Mutated only through `submit_action`.
#[derive(Debug, Clone)]
pub struct MatchState {
    pub hands: [Hand; 5],
    pub field: Field,
    pub active_seat: usize,
    pub turn_counter: u32,
    pub finish_order: Vec<usize>,
    pub consecutive_pass_total: u32,
    pub game_number: u32,
}

impl MatchState {
    pub fn new(hands: [Vec<Card>; 5], game_number: u32, first_leader: usize) -> Self {
        Self {
            hands: hands.map(Hand::new),
            field: Field::new(),
            active_seat: first_leader,
            turn_counter: 0,
            finish_order: Vec::new(),
            consecutive_pass_total: 0,
            game_number,
        }
    }

    /// The seat holding the Spade-3 — the mandated first leader of game 1 (§4.4).
    pub fn find_spade_three_holder(hands: &[Vec<Card>; 5]) -> usize {
        hands
            .iter()
            .position(|hand| hand.iter().any(Card::is_spade_three))
            .expect("the Spade-3 is always in exactly one of the five dealt hands")
    }

    pub fn is_over(&self) -> bool {
        self.finish_order.len() >= 4
    }

    fn next_non_finished_seat(&self, from: usize) -> Option<usize> {
        for offset in 1..=5 {
            let candidate = (from + offset) % 5;
            if !self.hands[candidate].is_empty() {
                return Some(candidate);
            }
        }
        None
    }

    /// Process one seat's submitted action. Returns `Err` only for preconditions the
    /// coordinator is responsible for upholding (right seat, non-finished seat); malformed or
    /// illegal *content* is silently converted into a forced pass per §7.
    pub fn submit_action(
        &mut self,
        seat: usize,
        action: Action,
        config: &SessionConfig,
    ) -> Result<TurnResult, RuleViolation> {
        if seat != self.active_seat {
            return Err(RuleViolation::NotPlayersTurn);
        }
        if self.hands[seat].is_empty() {
            return Err(RuleViolation::FinishedPlayerCannotAct);
        }

        let requested_play = Play::new(action.cards().to_vec());
        let (effective_play, forced_pass) =
            match self.field.validate(&self.hands[seat], &requested_play) {
                Ok(()) => (requested_play, false),
                Err(_) => (Play::pass(), true),
            };

        if !effective_play.is_pass() {
            self.hands[seat].remove(&effective_play.cards);
        }

        let effects = self.field.apply(&effective_play, seat, config);

        if effective_play.is_pass() {
            self.consecutive_pass_total += 1;
        } else {
            self.consecutive_pass_total = 0;
        }

        let finished = !effective_play.is_pass() && self.hands[seat].is_empty();
        if finished {
            self.finish_order.push(seat);
        }

        self.turn_counter += 1;

        let thousand_day_hand = self.consecutive_pass_total >= THOUSAND_DAY_HAND_THRESHOLD;
        if thousand_day_hand {
            self.field.clear();
            self.consecutive_pass_total = 0;
        }

        let next_active_seat = self.advance_active_seat(seat, thousand_day_hand, &effects);

        let action_taken = if effective_play.is_pass() {
            Action::Pass
        } else {
            Action::Play(effective_play.cards)
        };

        Ok(TurnResult {
            seat,
            action_taken,
            forced_pass,
            effects,
            finished,
            next_active_seat,
            thousand_day_hand,
        })
    }

    fn advance_active_seat(
        &mut self,
        seat: usize,
        thousand_day_hand: bool,
        effects: &[Effect],
    ) -> Option<usize> {
        if self.is_over() {
            return None;
        }

        if let Some(Effect::FieldClear { next_leader }) = effects
            .iter()
            .find(|e| matches!(e, Effect::FieldClear { .. }))
        {
            let leader = *next_leader;
            let chosen = if self.hands[leader].is_empty() {
                self.next_non_finished_seat(leader)
            } else {
                Some(leader)
            };
            let chosen = chosen.expect("at least one seat holds cards while the game is live");
            self.active_seat = chosen;
            return Some(chosen);
        }

        if thousand_day_hand {
            let chosen = self
                .next_non_finished_seat(seat)
                .expect("at least one seat holds cards while the game is live");
            self.active_seat = chosen;
            return Some(chosen);
        }

        let finished: [bool; 5] = std::array::from_fn(|s| self.hands[s].is_empty());
        if self.field.all_others_passed(finished) {
            let last_player = self
                .field
                .last_player
                .expect("all_others_passed implies a last_player");
            self.field.clear();
            let leader = if self.hands[last_player].is_empty() {
                self.next_non_finished_seat(last_player)
            } else {
                Some(last_player)
            };
            let leader = leader.expect("at least one seat holds cards while the game is live");
            self.active_seat = leader;
            return Some(leader);
        }

        let next = self
            .next_non_finished_seat(seat)
            .expect("at least one seat holds cards while the game is live");
        self.active_seat = next;
        Some(next)
    }

    /// `finish_order` padded with the fifth (never-finished) seat once the game has ended.
    pub fn completed_finish_order(&self) -> Vec<usize> {
        let mut order = self.finish_order.clone();
        if order.len() == 4 {
            if let Some(last) = (0..5).find(|seat| !order.contains(seat)) {
                order.push(last);
            }
        }
        order
    }

    pub fn classes(&self) -> [Class; 5] {
        let order = self.completed_finish_order();
        let mut classes = [Class::Heimin; 5];
        for (position, seat) in order.iter().enumerate() {
            classes[*seat] = Class::for_finish_position(position);
        }
        classes
    }

    pub fn points(&self) -> [i32; 5] {
        let classes = self.classes();
        let mut points = [0; 5];
        for (seat, class) in classes.iter().enumerate() {
            points[seat] = class.award().points;
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, Rank, Suit};
    use crate::deck::Deck;
    use crate::rng::Random;

    fn dealt_hands(seed: u64) -> [Vec<Card>; 5] {
        let mut rng = Random::from_seed(Some(seed));
        let mut deck = Deck::default();
        deck.shuffle(&mut rng);
        deck.deal_all()
    }

    #[test]
    fn test_first_leader_holds_spade_three() {
        let hands = dealt_hands(1);
        let leader = MatchState::find_spade_three_holder(&hands);
        assert!(hands[leader].iter().any(Card::is_spade_three));
    }

    #[test]
    fn test_card_conservation_across_a_full_game() {
        let hands = dealt_hands(2);
        let leader = MatchState::find_spade_three_holder(&hands);
        let mut state = MatchState::new(hands, 1, leader);
        let config = SessionConfig::default();

        let mut turns = 0;
        while !state.is_over() && turns < 2000 {
            let seat = state.active_seat;
            let action = state.hands[seat]
                .cards()
                .first()
                .map(|c| Action::Play(vec![*c]))
                .unwrap_or(Action::Pass);
            let requested = if state.field.validate(&state.hands[seat], &Play::new(action.cards().to_vec())).is_ok() {
                action
            } else {
                Action::Pass
            };
            state.submit_action(seat, requested, &config).unwrap();
            turns += 1;
        }

        // Discarded plays never return to a hand or reappear elsewhere: what remains held
        // plus whatever currently sits on the field can only ever shrink from 53.
        let total_remaining: usize = state.hands.iter().map(Hand::len).sum();
        let in_field = state.field.last_play.as_ref().map_or(0, |p| p.cards.len());
        assert!(total_remaining + in_field <= 53);
        assert!(state.is_over());
    }

    #[test]
    fn test_turn_advances_to_nonempty_seat() {
        let hands = dealt_hands(3);
        let leader = MatchState::find_spade_three_holder(&hands);
        let mut state = MatchState::new(hands, 1, leader);
        let config = SessionConfig::default();
        let before = state.active_seat;
        let result = state.submit_action(before, Action::Pass, &config).unwrap();
        if let Some(next) = result.next_active_seat {
            assert!(!state.hands[next].is_empty());
        }
    }

    #[test]
    fn test_field_clears_when_everyone_passes_even_if_leader_already_finished() {
        let mut state = MatchState::new(
            [
                vec![Card::new(Suit::Spade, Rank::Four)],
                vec![Card::new(Suit::Heart, Rank::Three)],
                vec![
                    Card::new(Suit::Heart, Rank::Four),
                    Card::new(Suit::Heart, Rank::Five),
                ],
                vec![Card::new(Suit::Heart, Rank::Six)],
                vec![Card::new(Suit::Heart, Rank::Seven)],
            ],
            1,
            0,
        );
        let config = SessionConfig::default();

        let result = state
            .submit_action(0, Action::Play(vec![Card::new(Suit::Spade, Rank::Four)]), &config)
            .unwrap();
        assert!(result.finished);
        assert_eq!(state.active_seat, 1);

        state.submit_action(1, Action::Pass, &config).unwrap();
        state.submit_action(2, Action::Pass, &config).unwrap();
        state.submit_action(3, Action::Pass, &config).unwrap();
        state.submit_action(4, Action::Pass, &config).unwrap();

        // seat 0 (the last player) already finished, so the lead falls to the next
        // non-finished seat instead of stalling until thousand-day-hand.
        assert!(state.field.is_clear());
        assert_eq!(state.active_seat, 1);
    }

    #[test]
    fn test_not_players_turn_is_rejected() {
        let hands = dealt_hands(4);
        let leader = MatchState::find_spade_three_holder(&hands);
        let mut state = MatchState::new(hands, 1, leader);
        let config = SessionConfig::default();
        let wrong_seat = (leader + 1) % 5;
        assert_eq!(
            state.submit_action(wrong_seat, Action::Pass, &config),
            Err(RuleViolation::NotPlayersTurn)
        );
    }

    #[test]
    fn test_illegal_play_is_forced_to_pass_not_fatal() {
        let mut state = MatchState::new(
            [
                vec![Card::new(Suit::Spade, Rank::Four)],
                vec![Card::new(Suit::Heart, Rank::Three)],
                vec![Card::new(Suit::Heart, Rank::Four)],
                vec![Card::new(Suit::Heart, Rank::Five)],
                vec![Card::new(Suit::Heart, Rank::Six)],
            ],
            1,
            0,
        );
        let config = SessionConfig::default();
        state.submit_action(0, Action::Play(vec![Card::new(Suit::Spade, Rank::Four)]), &config).unwrap();
        // Seat 1 tries to play a weaker card than the field (Three < Four): forced pass.
        let result = state
            .submit_action(1, Action::Play(vec![Card::new(Suit::Heart, Rank::Three)]), &config)
            .unwrap();
        assert!(result.forced_pass);
        assert!(matches!(result.action_taken, Action::Pass));
        assert_eq!(state.hands[1].len(), 1);
    }
}

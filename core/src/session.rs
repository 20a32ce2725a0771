use crate::card::Card;
use crate::config::SessionConfig;
use crate::match_state::MatchState;
use crate::rank::Class;
use crate::rng::Random;

/// State carried across the whole session: running totals and each seat's standing class,
/// both of which feed the next game's deal/exchange (§3, §4.4).
#[derive(Debug, Clone)]
pub struct SessionState {
    pub games_remaining: u32,
    pub total_games: u32,
    pub seat_classes: Option<[Class; 5]>,
    pub cumulative_points: [i32; 5],
}

impl SessionState {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            games_remaining: config.num_games,
            total_games: config.num_games,
            seat_classes: None,
            cumulative_points: [0; 5],
        }
    }

    pub fn is_complete(&self) -> bool {
        self.games_remaining == 0
    }

    pub fn current_game_number(&self) -> u32 {
        self.total_games - self.games_remaining + 1
    }

    /// Deal a fresh game's hands and pick its leader. Game 1 has no standing classes yet, so
    /// the Spade-3 holder leads; later games lead with the previous game's *daihinmin*. Also
    /// returns the forced exchanges that were applied, for the coordinator's journal.
    pub fn deal_game(&self, rng: &mut Random) -> (MatchState, Vec<ExchangeMove>) {
        let mut deck = crate::deck::Deck::default();
        deck.shuffle(rng);
        let mut hands = deck.deal_all();

        let moves = match self.seat_classes {
            Some(classes) => exchange_hands(&mut hands, &classes),
            None => Vec::new(),
        };

        let leader = match self.seat_classes {
            None => MatchState::find_spade_three_holder(&hands),
            Some(classes) => classes
                .iter()
                .position(|c| *c == Class::Daihinmin)
                .expect("exactly one seat holds the Daihinmin class"),
        };

        (MatchState::new(hands, self.current_game_number(), leader), moves)
    }

    /// Fold one finished game's result into the session: award points, update classes, and
    /// decrement the remaining-games counter.
    pub fn record_game_result(&mut self, state: &MatchState) {
        let points = state.points();
        for seat in 0..5 {
            self.cumulative_points[seat] += points[seat];
        }
        self.seat_classes = Some(state.classes());
        self.games_remaining = self.games_remaining.saturating_sub(1);
    }

    /// Final standing: seat indices ordered strongest to weakest by cumulative points, ties
    /// broken by seat index.
    pub fn ranking(&self) -> Vec<usize> {
        let mut seats: Vec<usize> = (0..5).collect();
        seats.sort_by(|a, b| {
            self.cumulative_points[*b]
                .cmp(&self.cumulative_points[*a])
                .then(a.cmp(b))
        });
        seats
    }
}

/// One direction of a forced exchange: `cards` moved from `from_seat` to `to_seat`.
#[derive(Debug, Clone)]
pub struct ExchangeMove {
    pub from_seat: usize,
    pub to_seat: usize,
    pub cards: Vec<Card>,
}

/// Forced exchange between classes before a game deals in (§4.4): each class paired via
/// `Class::exchange_partner` swaps `ClassAward::exchange_cards` cards (daifugo <-> daihinmin 2,
/// fugo <-> hinmin 1), centralizing the pairing/count in `rank.rs` rather than hardcoding them
/// here. The low-class seat always gives up its strongest cards; the high-class seat gives
/// back its weakest.
fn exchange_hands(hands: &mut [Vec<Card>; 5], classes: &[Class; 5]) -> Vec<ExchangeMove> {
    let mut moves = Vec::new();
    let mut paired = std::collections::HashSet::new();
    for class in Class::by_finish_order() {
        if paired.contains(&class) {
            continue;
        }
        if let Some(partner) = class.exchange_partner() {
            paired.insert(class);
            paired.insert(partner);
            let count = class.award().exchange_cards;
            moves.extend(apply_exchange(hands, classes, class, partner, count));
        }
    }
    moves
}

fn apply_exchange(
    hands: &mut [Vec<Card>; 5],
    classes: &[Class; 5],
    a: Class,
    b: Class,
    count: usize,
) -> Vec<ExchangeMove> {
    let (low, high) = if a.gives_strongest() { (a, b) } else { (b, a) };
    let high_seat = classes.iter().position(|c| *c == high).expect("class present");
    let low_seat = classes.iter().position(|c| *c == low).expect("class present");

    let mut high_hand = crate::hand::Hand::new(std::mem::take(&mut hands[high_seat]));
    let mut low_hand = crate::hand::Hand::new(std::mem::take(&mut hands[low_seat]));

    let from_low = low_hand.take_strongest(count);
    let from_high = high_hand.take_weakest(count);

    high_hand.add(from_low.clone());
    low_hand.add(from_high.clone());

    hands[high_seat] = high_hand.cards().to_vec();
    hands[low_seat] = low_hand.cards().to_vec();

    vec![
        ExchangeMove {
            from_seat: low_seat,
            to_seat: high_seat,
            cards: from_low,
        },
        ExchangeMove {
            from_seat: high_seat,
            to_seat: low_seat,
            cards: from_high,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    #[test]
    fn test_new_session_tracks_remaining_games() {
        let config = SessionConfig {
            num_games: 3,
            ..SessionConfig::default()
        };
        let state = SessionState::new(&config);
        assert_eq!(state.games_remaining, 3);
        assert!(!state.is_complete());
    }

    #[test]
    fn test_scenario_f_exchange_moves_strongest_and_weakest() {
        let mut hands: [Vec<Card>; 5] = Default::default();
        hands[0] = vec![
            Card::new(Suit::Spade, Rank::Two),
            Card::Joker,
            Card::new(Suit::Spade, Rank::Three),
        ];
        hands[4] = vec![
            Card::new(Suit::Heart, Rank::Three),
            Card::new(Suit::Diamond, Rank::Four),
        ];
        let classes = [
            Class::Daifugo,
            Class::Fugo,
            Class::Heimin,
            Class::Hinmin,
            Class::Daihinmin,
        ];

        let moves = exchange_hands(&mut hands, &classes);

        // The daihinmin's two strongest (its whole hand here) move to the daifugo.
        assert!(hands[0].contains(&Card::new(Suit::Heart, Rank::Three)));
        assert!(hands[0].contains(&Card::new(Suit::Diamond, Rank::Four)));
        // The Joker, counted as strongest (hand.rs), is never among the daifugo's weakest
        // two given back, so it stays put.
        assert!(hands[0].contains(&Card::Joker));
        assert!(hands[4].contains(&Card::new(Suit::Spade, Rank::Two)));
        assert!(hands[4].contains(&Card::new(Suit::Spade, Rank::Three)));
        assert!(!hands[4].contains(&Card::Joker));

        // Both class pairs (daifugo/daihinmin and fugo/hinmin) produce a move in each
        // direction; seats 1 and 3 start empty here, so their moves carry no cards.
        assert_eq!(moves.len(), 4);
        assert!(moves
            .iter()
            .any(|m| m.from_seat == 4 && m.to_seat == 0 && m.cards.len() == 2));
        assert!(moves
            .iter()
            .any(|m| m.from_seat == 0 && m.to_seat == 4 && m.cards.len() == 2));
    }

    #[test]
    fn test_ranking_orders_by_cumulative_points() {
        let config = SessionConfig::default();
        let mut state = SessionState::new(&config);
        state.cumulative_points = [1, 5, 3, 2, 4];
        assert_eq!(state.ranking(), vec![1, 4, 2, 3, 0]);
    }
}

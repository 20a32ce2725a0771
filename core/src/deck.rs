use crate::card::{self, Card};
use crate::rng::Random;
use rand::seq::SliceRandom;

/// Seats 0 and 1 receive an extra card each so the 53-card deck divides evenly across five
/// seats (53 = 11 + 11 + 10 + 10 + 10). Resolves an ambiguity the wire spec leaves unstated.
pub const DEAL_SIZES: [usize; 5] = [11, 11, 10, 10, 10];

/// The shuffled, drawable deck for one game.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn shuffle(&mut self, rng: &mut Random) {
        self.cards.shuffle(rng.inner_mut());
    }

    pub fn draw(&mut self, n: usize) -> Option<Vec<Card>> {
        if self.cards.len() < n {
            return None;
        }
        Some(self.cards.drain(0..n).collect())
    }

    /// Deal the full deck out to five hands per `DEAL_SIZES`, consuming it.
    pub fn deal_all(mut self) -> [Vec<Card>; 5] {
        let mut hands: [Vec<Card>; 5] = Default::default();
        for (seat, size) in DEAL_SIZES.iter().enumerate() {
            hands[seat] = self.draw(*size).expect("deck holds exactly 53 cards");
        }
        debug_assert!(self.is_empty());
        hands
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self { cards: card::deck() }
    }
}

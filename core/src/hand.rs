use crate::card::{Card, Rank, Suit};
use indexmap::IndexMap;
use itertools::Itertools;

/// The cards held by one seat. Order is insertion order on deal, but seats are free to submit
/// any subset of their held cards as a play regardless of position.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand(Vec<Card>);

impl Hand {
    pub fn new(cards: Vec<Card>) -> Self {
        Self(cards)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.0
    }

    pub fn contains_all(&self, cards: &[Card]) -> bool {
        let mut remaining = self.0.clone();
        for card in cards {
            match remaining.iter().position(|c| c == card) {
                Some(pos) => {
                    remaining.remove(pos);
                }
                None => return false,
            }
        }
        true
    }

    /// Remove the given cards from the hand. Panics if `contains_all` would have been false;
    /// callers must check legality before mutating.
    pub fn remove(&mut self, cards: &[Card]) {
        for card in cards {
            let pos = self
                .0
                .iter()
                .position(|c| c == card)
                .expect("remove called with a card not in hand");
            self.0.remove(pos);
        }
    }

    pub fn add(&mut self, cards: Vec<Card>) {
        self.0.extend(cards);
    }

    /// Held cards grouped by rank, descending by rank strength. The Joker is its own group.
    pub fn ranks_freq(&self) -> IndexMap<Option<Rank>, Vec<Card>> {
        let mut counts: IndexMap<Option<Rank>, Vec<Card>> = IndexMap::new();
        for card in &self.0 {
            counts.entry(card.rank()).or_default().push(*card);
        }
        counts
            .into_iter()
            .sorted_by(|a, b| Ord::cmp(&b.0, &a.0))
            .collect()
    }

    /// Held cards grouped by suit, descending by suit tie-break order. The Joker is excluded.
    pub fn suits_freq(&self) -> IndexMap<Suit, Vec<Card>> {
        let mut counts: IndexMap<Suit, Vec<Card>> = IndexMap::new();
        for card in self.0.iter().filter(|c| !c.is_joker()) {
            counts
                .entry(card.suit().expect("non-joker card has a suit"))
                .or_default()
                .push(*card);
        }
        counts
            .into_iter()
            .sorted_by(|a, b| Ord::cmp(&b.0, &a.0))
            .collect()
    }

    pub fn holds_spade_three(&self) -> bool {
        self.0.iter().any(Card::is_spade_three)
    }

    /// Take the `n` strongest cards by rank (Joker counted as strongest), for a forced
    /// exchange (§4.4/§4.5). Removes them from the hand.
    pub fn take_strongest(&mut self, n: usize) -> Vec<Card> {
        self.take_by_strength(n, true)
    }

    /// Take the `n` weakest cards by rank, for the receiving side of a forced exchange.
    pub fn take_weakest(&mut self, n: usize) -> Vec<Card> {
        self.take_by_strength(n, false)
    }

    fn take_by_strength(&mut self, n: usize, strongest: bool) -> Vec<Card> {
        let mut ordered = self.0.clone();
        ordered.sort_by_key(|c| match c {
            Card::Joker => 13,
            Card::Standard(_, rank) => *rank as i32,
        });
        if strongest {
            ordered.reverse();
        }
        let taken: Vec<Card> = ordered.into_iter().take(n).collect();
        self.remove(&taken);
        taken
    }
}

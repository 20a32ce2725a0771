//! The play classifier (C2): decides what *shape* a set of cards forms, and the key used to
//! compare it against whatever is currently on the field.

use crate::card::{Card, Rank, Suit};
use std::collections::BTreeSet;

/// The family of a non-pass, non-invalid play. Two plays can only be compared against each
/// other in the rule engine if they share a family (and, for `Group`/`Sequence`, a size) —
/// except for the Joker-single / Spade-3-return exception (§4.3).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ShapeFamily {
    Single,
    JokerSingle,
    Group,
    Sequence,
}

/// The recognized shape of a submitted play, plus enough structure to validate and compare it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum PlayShape {
    Pass,
    Single { rank: Rank, suit: Suit },
    JokerSingle,
    Group {
        rank: Rank,
        size: u8,
        suits: Vec<Suit>,
        has_joker: bool,
    },
    Sequence {
        suit: Suit,
        low: Rank,
        size: u8,
        joker_slot: Option<u8>,
    },
    Invalid,
}

impl PlayShape {
    pub fn family(&self) -> Option<ShapeFamily> {
        match self {
            Self::Single { .. } => Some(ShapeFamily::Single),
            Self::JokerSingle => Some(ShapeFamily::JokerSingle),
            Self::Group { .. } => Some(ShapeFamily::Group),
            Self::Sequence { .. } => Some(ShapeFamily::Sequence),
            Self::Pass | Self::Invalid => None,
        }
    }

    pub fn size(&self) -> u8 {
        match self {
            Self::Pass => 0,
            Self::Single { .. } | Self::JokerSingle => 1,
            Self::Group { size, .. } => *size,
            Self::Sequence { size, .. } => *size,
            Self::Invalid => 0,
        }
    }

    /// The rank used to compare strength against another play of the same family/size.
    /// `None` for `Pass`, `Invalid`, and `JokerSingle` (which beats any single unconditionally
    /// rather than by rank comparison).
    pub fn representative_rank(&self) -> Option<Rank> {
        match self {
            Self::Single { rank, .. } => Some(*rank),
            Self::Group { rank, .. } => Some(*rank),
            Self::Sequence { suit: _, low, size, .. } => {
                let top_ordinal = *low as usize + *size as usize - 1;
                Rank::ranks().get(top_ordinal).copied()
            }
            Self::JokerSingle | Self::Pass | Self::Invalid => None,
        }
    }

    /// Suits contributed by the non-Joker cards of this play (used for suit-lock).
    pub fn suits(&self) -> Vec<Suit> {
        match self {
            Self::Single { suit, .. } => vec![*suit],
            Self::Group { suits, .. } => suits.clone(),
            Self::Sequence { suit, .. } => vec![*suit],
            Self::JokerSingle | Self::Pass | Self::Invalid => Vec::new(),
        }
    }

    pub fn contains_eight(&self, cards: &[Card]) -> bool {
        let _ = self;
        cards.iter().any(|c| c.rank().is_some_and(|r| r.is_eight()))
    }

    pub fn contains_jack(&self, cards: &[Card]) -> bool {
        let _ = self;
        cards.iter().any(|c| c.rank().is_some_and(|r| r.is_jack()))
    }

    /// A four-card group or a five-card sequence triggers revolution.
    pub fn triggers_revolution(&self) -> bool {
        matches!(self, Self::Group { size: 4, .. }) || matches!(self, Self::Sequence { size: 5, .. })
    }
}

/// A candidate play: the raw cards submitted plus their classified shape.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Play {
    pub cards: Vec<Card>,
    pub shape: PlayShape,
}

impl Play {
    pub fn new(cards: Vec<Card>) -> Self {
        let shape = classify(&cards);
        Self { cards, shape }
    }

    pub fn pass() -> Self {
        Self {
            cards: Vec::new(),
            shape: PlayShape::Pass,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self.shape, PlayShape::Pass)
    }

    pub fn is_valid_shape(&self) -> bool {
        !matches!(self.shape, PlayShape::Invalid)
    }
}

/// Classify a candidate set of cards per §4.2's classification order.
pub fn classify(cards: &[Card]) -> PlayShape {
    if cards.is_empty() {
        return PlayShape::Pass;
    }
    if cards.len() == 1 {
        return match cards[0] {
            Card::Joker => PlayShape::JokerSingle,
            Card::Standard(suit, rank) => PlayShape::Single { rank, suit },
        };
    }
    if let Some(group) = try_group(cards) {
        return group;
    }
    if let Some(sequence) = try_sequence(cards) {
        return sequence;
    }
    PlayShape::Invalid
}

fn try_group(cards: &[Card]) -> Option<PlayShape> {
    let n = cards.len();
    if !(2..=4).contains(&n) {
        return None;
    }
    let has_joker = cards.iter().any(Card::is_joker);
    let non_jokers: Vec<Card> = cards.iter().copied().filter(|c| !c.is_joker()).collect();
    if non_jokers.is_empty() {
        return None;
    }
    let rank = non_jokers[0].rank().expect("non-joker card has a rank");
    if !non_jokers.iter().all(|c| c.rank() == Some(rank)) {
        return None;
    }
    let suits: BTreeSet<Suit> = non_jokers.iter().filter_map(Card::suit).collect();
    Some(PlayShape::Group {
        rank,
        size: n as u8,
        suits: suits.into_iter().collect(),
        has_joker,
    })
}

fn try_sequence(cards: &[Card]) -> Option<PlayShape> {
    let n = cards.len();
    if !(3..=13).contains(&n) {
        return None;
    }
    let has_joker = cards.iter().any(Card::is_joker);
    let non_jokers: Vec<Card> = cards.iter().copied().filter(|c| !c.is_joker()).collect();
    if non_jokers.is_empty() {
        return None;
    }
    let suit = non_jokers[0].suit().expect("non-joker card has a suit");
    if !non_jokers.iter().all(|c| c.suit() == Some(suit)) {
        return None;
    }
    let mut ordinals: Vec<i32> = non_jokers
        .iter()
        .map(|c| c.rank().expect("non-joker card has a rank") as i32)
        .collect();
    ordinals.sort_unstable();
    let before_dedup = ordinals.len();
    ordinals.dedup();
    if ordinals.len() != before_dedup {
        // a repeated rank within one suit can't happen with a real deck, but a synthetic
        // candidate play (e.g. a malformed client response) might claim one; reject it.
        return None;
    }

    if !has_joker {
        for window in ordinals.windows(2) {
            if window[1] != window[0] + 1 {
                return None;
            }
        }
        let low = Rank::ranks()[ordinals[0] as usize];
        return Some(PlayShape::Sequence {
            suit,
            low,
            size: n as u8,
            joker_slot: None,
        });
    }

    // Joker fills exactly one slot in a window of size `n`. Scan windows by ascending low
    // rank so that, among multiple valid placements, the lower one wins (§4.2 tie-break).
    let max_low = 13i32 - n as i32;
    for low_ord in 0..=max_low {
        let high_ord = low_ord + n as i32 - 1;
        if ordinals.iter().all(|&o| (low_ord..=high_ord).contains(&o)) {
            let missing = (low_ord..=high_ord).find(|o| !ordinals.contains(o));
            if let Some(missing) = missing {
                let low = Rank::ranks()[low_ord as usize];
                return Some(PlayShape::Sequence {
                    suit,
                    low,
                    size: n as u8,
                    joker_slot: Some((missing - low_ord) as u8),
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, Rank, Suit};

    fn c(suit: Suit, rank: Rank) -> Card {
        Card::new(suit, rank)
    }

    #[test]
    fn test_pass_and_joker_single() {
        assert_eq!(classify(&[]), PlayShape::Pass);
        assert_eq!(classify(&[Card::Joker]), PlayShape::JokerSingle);
    }

    #[test]
    fn test_single() {
        let shape = classify(&[c(Suit::Spade, Rank::Three)]);
        assert_eq!(
            shape,
            PlayShape::Single {
                rank: Rank::Three,
                suit: Suit::Spade
            }
        );
    }

    #[test]
    fn test_group_plain() {
        let cards = vec![
            c(Suit::Spade, Rank::Five),
            c(Suit::Heart, Rank::Five),
            c(Suit::Diamond, Rank::Five),
        ];
        let shape = classify(&cards);
        match shape {
            PlayShape::Group {
                rank,
                size,
                has_joker,
                ..
            } => {
                assert_eq!(rank, Rank::Five);
                assert_eq!(size, 3);
                assert!(!has_joker);
            }
            other => panic!("expected Group, got {other:?}"),
        }
    }

    #[test]
    fn test_group_with_joker() {
        let cards = vec![
            Card::Joker,
            c(Suit::Spade, Rank::King),
            c(Suit::Heart, Rank::King),
        ];
        let shape = classify(&cards);
        match shape {
            PlayShape::Group {
                rank, has_joker, ..
            } => {
                assert_eq!(rank, Rank::King);
                assert!(has_joker);
            }
            other => panic!("expected Group, got {other:?}"),
        }
    }

    #[test]
    fn test_sequence_plain() {
        let cards = vec![
            c(Suit::Heart, Rank::Five),
            c(Suit::Heart, Rank::Six),
            c(Suit::Heart, Rank::Seven),
        ];
        let shape = classify(&cards);
        match shape {
            PlayShape::Sequence {
                suit,
                low,
                size,
                joker_slot,
            } => {
                assert_eq!(suit, Suit::Heart);
                assert_eq!(low, Rank::Five);
                assert_eq!(size, 3);
                assert_eq!(joker_slot, None);
            }
            other => panic!("expected Sequence, got {other:?}"),
        }
    }

    #[test]
    fn test_sequence_joker_fills_inner_gap() {
        // Jo, H5, H7 -> 5,6,7 with the Joker filling slot 6 (design notes §9).
        let cards = vec![
            Card::Joker,
            c(Suit::Heart, Rank::Five),
            c(Suit::Heart, Rank::Seven),
        ];
        let shape = classify(&cards);
        match shape {
            PlayShape::Sequence {
                low, joker_slot, ..
            } => {
                assert_eq!(low, Rank::Five);
                assert_eq!(joker_slot, Some(1));
            }
            other => panic!("expected Sequence, got {other:?}"),
        }
    }

    #[test]
    fn test_sequence_joker_ties_toward_lower_rank() {
        // Jo, H5, H6 could extend down to [4,5,6] or up to [5,6,7]; lower wins.
        let cards = vec![
            Card::Joker,
            c(Suit::Heart, Rank::Five),
            c(Suit::Heart, Rank::Six),
        ];
        let shape = classify(&cards);
        match shape {
            PlayShape::Sequence {
                low, joker_slot, ..
            } => {
                assert_eq!(low, Rank::Four);
                assert_eq!(joker_slot, Some(0));
            }
            other => panic!("expected Sequence, got {other:?}"),
        }
    }

    #[test]
    fn test_mixed_suit_non_consecutive_is_invalid() {
        let cards = vec![
            c(Suit::Heart, Rank::Five),
            c(Suit::Spade, Rank::Nine),
            c(Suit::Club, Rank::King),
        ];
        assert_eq!(classify(&cards), PlayShape::Invalid);
    }

    #[test]
    fn test_classifier_totality() {
        // Every set of 1..=14 cards drawn from the deck classifies as exactly one family.
        let deck = crate::card::deck();
        for size in 1..=14 {
            for combo in deck.iter().copied().take(size + 3).collect::<Vec<_>>().chunks(size) {
                if combo.len() != size {
                    continue;
                }
                let shape = classify(combo);
                let is_one_of = matches!(
                    shape,
                    PlayShape::Pass
                        | PlayShape::Single { .. }
                        | PlayShape::JokerSingle
                        | PlayShape::Group { .. }
                        | PlayShape::Sequence { .. }
                        | PlayShape::Invalid
                );
                assert!(is_one_of);
            }
        }
    }

    #[test]
    fn test_revolution_triggers() {
        let group4 = PlayShape::Group {
            rank: Rank::Five,
            size: 4,
            suits: vec![Suit::Spade],
            has_joker: false,
        };
        assert!(group4.triggers_revolution());
        let seq5 = PlayShape::Sequence {
            suit: Suit::Heart,
            low: Rank::Three,
            size: 5,
            joker_slot: None,
        };
        assert!(seq5.triggers_revolution());
        let seq3 = PlayShape::Sequence {
            suit: Suit::Heart,
            low: Rank::Three,
            size: 3,
            joker_slot: None,
        };
        assert!(!seq3.triggers_revolution());
    }
}

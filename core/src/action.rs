use crate::card::Card;
use std::fmt;

/// A seat's move on its turn: play a set of cards, or pass.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Action {
    Play(Vec<Card>),
    Pass,
}

impl Action {
    pub fn cards(&self) -> &[Card] {
        match self {
            Self::Play(cards) => cards,
            Self::Pass => &[],
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Play(cards) => {
                write!(f, "Play:")?;
                for card in cards {
                    write!(f, " {card}")?;
                }
                Ok(())
            }
            Self::Pass => write!(f, "Pass"),
        }
    }
}

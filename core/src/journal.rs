//! JSONL event journal, emitted in lockstep with state transitions (§6). Writing is the
//! coordinator's job; this module only defines the event shapes and the line-oriented sink.

use crate::card::Card;
use crate::rank::Class;
#[cfg(feature = "serde")]
use serde::Serialize;
use std::io::{self, Write};

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone)]
pub struct PlayerInfo {
    pub id: usize,
    pub name: String,
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone)]
pub struct ExchangeRecord {
    pub from: usize,
    pub to: usize,
    pub cards: String,
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TurnKind {
    Play,
    Pass,
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CardType {
    Empty,
    Single,
    Pair,
    Sequence,
    JokerSingle,
}

/// The field's persistent modifiers at the moment a turn was recorded (§6: `state (revolution,
/// eleven_back, locked)`), nested rather than flattened so a reader can treat it as one unit.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnState {
    pub revolution: bool,
    pub eleven_back: bool,
    pub locked: bool,
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SpecialKind {
    EightStop,
    Revolution,
    ElevenBack,
    Lock,
    FieldClear,
    PlayerFinish,
}

/// One observable transition, one JSON object, one line. Tagged with `event` so a reader can
/// dispatch on a single field (§6).
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
#[derive(Debug, Clone)]
pub enum JournalEvent {
    SessionStart {
        timestamp: String,
        players: Vec<PlayerInfo>,
    },
    GameStart {
        game: u32,
        hands: Vec<String>,
        ranks: Vec<Class>,
        first_player: usize,
    },
    Exchange {
        game: u32,
        exchanges: Vec<ExchangeRecord>,
        hands_after: Vec<String>,
    },
    Turn {
        game: u32,
        turn: u32,
        player: usize,
        action: TurnKind,
        cards: String,
        card_type: CardType,
        field: String,
        hands: Vec<usize>,
        state: TurnState,
    },
    Special {
        game: u32,
        turn: u32,
        event: SpecialKind,
        player: usize,
        detail: Option<String>,
    },
    GameEnd {
        finish_order: Vec<usize>,
        new_ranks: Vec<Class>,
    },
    SessionEnd {
        total_games: u32,
        final_points: Vec<i32>,
        ranking: Vec<usize>,
    },
}

pub fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::format)
        .collect::<Vec<_>>()
        .join(",")
}

/// An append-only JSONL sink. The coordinator owns exactly one of these and writes to it
/// serially (§5) — never concurrently from a worker I/O path.
pub struct Journal<W: Write> {
    writer: W,
}

impl<W: Write> Journal<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(feature = "serde")]
    pub fn write_event(&mut self, event: &JournalEvent) -> Result<(), crate::error::SessionError> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    #[test]
    fn test_format_cards_joins_symbolic_forms() {
        let cards = vec![Card::new(Suit::Spade, Rank::Three), Card::Joker];
        assert_eq!(format_cards(&cards), "S3,Jo");
    }

    #[test]
    fn test_format_cards_empty_is_empty_string() {
        assert_eq!(format_cards(&[]), "");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_turn_event_serializes_with_tag() {
        let event = JournalEvent::Turn {
            game: 1,
            turn: 4,
            player: 2,
            action: TurnKind::Play,
            cards: "S3".to_string(),
            card_type: CardType::Single,
            field: "H4".to_string(),
            hands: vec![10, 10, 9, 10, 10],
            state: TurnState {
                revolution: false,
                eleven_back: false,
                locked: false,
            },
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"turn\""));
        assert!(json.contains("\"action\":\"play\""));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_journal_writes_one_line_per_event() {
        let mut buffer: Vec<u8> = Vec::new();
        {
            let mut journal = Journal::new(&mut buffer);
            journal
                .write_event(&JournalEvent::SessionEnd {
                    total_games: 3,
                    final_points: vec![5, 4, 3, 2, 1],
                    ranking: vec![0, 1, 2, 3, 4],
                })
                .unwrap();
        }
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.matches('\n').count(), 1);
        assert!(text.starts_with('{'));
    }
}

use std::fmt;

/// A card's rank, ordered by strength under the *Normal* rank direction: weakest first, `Two`
/// strongest. `Revolution` and `eleven_back` invert this ordering at the field, never here.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Rank {
    Three = 0,
    Four = 1,
    Five = 2,
    Six = 3,
    Seven = 4,
    Eight = 5,
    Nine = 6,
    Ten = 7,
    Jack = 8,
    Queen = 9,
    King = 10,
    Ace = 11,
    Two = 12,
}

/// All ranks, weakest to strongest. This is what `Rank::ranks()` returns.
const RANKS: [Rank; 13] = [
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
    Rank::Two,
];

impl Rank {
    pub const fn ranks() -> [Self; 13] {
        RANKS
    }

    /// 0-based column in the wire matrix (rows 1..4 carry 13 rank columns, 0..12).
    pub const fn matrix_col(&self) -> usize {
        *self as usize
    }

    fn from_literal(s: &str) -> Option<Self> {
        Some(match s {
            "3" => Self::Three,
            "4" => Self::Four,
            "5" => Self::Five,
            "6" => Self::Six,
            "7" => Self::Seven,
            "8" => Self::Eight,
            "9" => Self::Nine,
            "10" => Self::Ten,
            "J" => Self::Jack,
            "Q" => Self::Queen,
            "K" => Self::King,
            "A" => Self::Ace,
            "2" => Self::Two,
            _ => return None,
        })
    }

    fn literal(&self) -> &'static str {
        match self {
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            Self::Ace => "A",
            Self::Two => "2",
        }
    }

    /// The next-stronger rank, or `None` for `Two` (used by sequence contiguity checks).
    pub fn succ(&self) -> Option<Self> {
        RANKS.get(*self as usize + 1).copied()
    }

    /// Whether this is an eight, for eight-cut detection.
    pub fn is_eight(&self) -> bool {
        matches!(self, Self::Eight)
    }

    /// Whether this is a jack, for eleven-back detection.
    pub fn is_jack(&self) -> bool {
        matches!(self, Self::Jack)
    }
}

/// The four suits, ordered Spade > Heart > Diamond > Club for exchange tie-breaking (§4.4).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Suit {
    Spade = 0,
    Heart = 1,
    Diamond = 2,
    Club = 3,
}

/// All of the suits. This is what `Suit::suits()` returns.
const SUITS: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Diamond, Suit::Club];

impl Suit {
    pub const fn suits() -> [Self; 4] {
        SUITS
    }

    /// 0-based row offset among the four suit rows (`1 + offset` is the wire matrix row).
    pub const fn matrix_row_offset(&self) -> usize {
        *self as usize
    }

    fn letter(&self) -> char {
        match self {
            Self::Spade => 'S',
            Self::Heart => 'H',
            Self::Diamond => 'D',
            Self::Club => 'C',
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        Some(match c {
            'S' => Self::Spade,
            'H' => Self::Heart,
            'D' => Self::Diamond,
            'C' => Self::Club,
            _ => return None,
        })
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A single playing card, or the Joker.
///
/// `Card` carries no owner or position; `Hand` tracks which cards belong to which seat. The
/// Joker is reserved matrix row 1 (the Spade row), column 14 — it never occupies a real rank
/// column (§6).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Card {
    Standard(Suit, Rank),
    Joker,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self::Standard(suit, rank)
    }

    pub fn is_joker(&self) -> bool {
        matches!(self, Self::Joker)
    }

    pub fn suit(&self) -> Option<Suit> {
        match self {
            Self::Standard(s, _) => Some(*s),
            Self::Joker => None,
        }
    }

    pub fn rank(&self) -> Option<Rank> {
        match self {
            Self::Standard(_, r) => Some(*r),
            Self::Joker => None,
        }
    }

    pub fn is_spade_three(&self) -> bool {
        matches!(self, Self::Standard(Suit::Spade, Rank::Three))
    }

    /// Matrix `(row, col)` this card occupies, per §6's fixed layout.
    pub fn matrix_cell(&self) -> (usize, usize) {
        match self {
            Self::Standard(suit, rank) => (1 + suit.matrix_row_offset(), rank.matrix_col()),
            Self::Joker => (1, 14),
        }
    }

    /// Parse the symbolic wire/journal form: `S3`, `H10`, `DJ`, or `Jo` for the Joker.
    pub fn parse(s: &str) -> Option<Self> {
        if s == "Jo" {
            return Some(Self::Joker);
        }
        let mut chars = s.chars();
        let suit = Suit::from_letter(chars.next()?)?;
        let rank = Rank::from_literal(chars.as_str())?;
        Some(Self::Standard(suit, rank))
    }

    /// Format back to the symbolic form; `Card::parse(&c.format()) == Some(c)`.
    pub fn format(&self) -> String {
        match self {
            Self::Standard(suit, rank) => format!("{suit}{}", rank.literal()),
            Self::Joker => "Jo".to_string(),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// The 8x15 big-endian wire/journal matrix shape shared by the card model and the protocol
/// codec (§6).
pub type Matrix = [[i32; 15]; 8];

/// Set every cell this card occupies to 1. Used to build the card-membership rows (1-4) of a
/// query or broadcast matrix; the protocol layer marks a chosen play with 2 separately.
pub fn matrix_from_cards(cards: &[Card]) -> Matrix {
    let mut grid: Matrix = [[0; 15]; 8];
    for card in cards {
        let (row, col) = card.matrix_cell();
        grid[row][col] = 1;
    }
    grid
}

/// Inverse of `matrix_from_cards`: any nonzero cell in rows 1-4 (or the Joker cell) is read
/// back as present, regardless of whether it's marked 1 (member) or 2 (chosen play).
pub fn cards_from_matrix(grid: &Matrix) -> Vec<Card> {
    let mut cards = Vec::new();
    for suit in Suit::suits() {
        for rank in Rank::ranks() {
            let card = Card::new(suit, rank);
            let (row, col) = card.matrix_cell();
            if grid[row][col] != 0 {
                cards.push(card);
            }
        }
    }
    let (row, col) = Card::Joker.matrix_cell();
    if grid[row][col] != 0 {
        cards.push(Card::Joker);
    }
    cards
}

/// The full 53-card Daihinmin deck: 52 standard cards plus one Joker.
pub fn deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(53);
    for suit in Suit::suits() {
        for rank in Rank::ranks() {
            cards.push(Card::new(suit, rank));
        }
    }
    cards.push(Card::Joker);
    cards
}

//! The fixed 480-byte matrix frame and the matrix builders that map it onto field/hand state
//! (C5, §4.5, §6). No length prefix, no framing bytes — every frame is exactly
//! `ROWS * COLS * 4` bytes of big-endian `i32`.

use crate::card::{self, Card, Matrix};
use crate::config::PROTOCOL_VERSION;
use crate::error::ProtocolError;
use crate::rank::Class;
use crate::rules::Field;

pub const ROWS: usize = 8;
pub const COLS: usize = 15;
pub const FRAME_BYTES: usize = ROWS * COLS * 4;

pub fn matrix_to_bytes(matrix: &Matrix) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(FRAME_BYTES);
    for row in matrix {
        for cell in row {
            bytes.extend_from_slice(&cell.to_be_bytes());
        }
    }
    bytes
}

pub fn matrix_from_bytes(bytes: &[u8]) -> Result<Matrix, ProtocolError> {
    if bytes.len() != FRAME_BYTES {
        return Err(ProtocolError::UnexpectedFrameLength {
            expected: FRAME_BYTES,
            actual: bytes.len(),
        });
    }
    let mut matrix: Matrix = [[0; COLS]; ROWS];
    for (row_idx, row) in matrix.iter_mut().enumerate() {
        for (col_idx, cell) in row.iter_mut().enumerate() {
            let offset = (row_idx * COLS + col_idx) * 4;
            let mut word = [0u8; 4];
            word.copy_from_slice(&bytes[offset..offset + 4]);
            *cell = i32::from_be_bytes(word);
        }
    }
    Ok(matrix)
}

/// Row 0 metadata cell indices, named per §6's exact layout.
pub mod meta {
    pub const TURN_OR_VERSION: usize = 0;
    pub const ACTIVE_SEAT: usize = 1;
    pub const YOUR_TURN: usize = 2;
    pub const IS_START_OF_TRICK: usize = 3;
    pub const REVOLUTION: usize = 4;
    pub const ELEVEN_BACK: usize = 5;
    pub const EIGHT_CUT_NOTICE: usize = 6;
    pub const SUIT_LOCK_ACTIVE: usize = 7;
    pub const SUIT_LOCK_MASK_START: usize = 8; // cols 8..=11
    pub const GAME_NUMBER: usize = 12;
    pub const TOTAL_GAMES: usize = 13;
    pub const END_OF_SESSION: usize = 14;
}

fn suit_lock_mask(field: &Field) -> [i32; 4] {
    let mut mask = [0; 4];
    if let Some(suits) = &field.suit_lock {
        for suit in suits {
            mask[suit.matrix_row_offset()] = 1;
        }
    }
    mask
}

/// Build the one-shot handshake matrix the server sends immediately on connect.
pub fn build_handshake(seat: usize) -> Matrix {
    let mut matrix: Matrix = [[0; COLS]; ROWS];
    matrix[0][meta::TURN_OR_VERSION] = PROTOCOL_VERSION as i32;
    matrix[0][meta::ACTIVE_SEAT] = seat as i32;
    matrix
}

pub fn handshake_version(matrix: &Matrix) -> i32 {
    matrix[0][meta::TURN_OR_VERSION]
}

/// Build the "your turn" query matrix sent to the active seat: field state, active flags, and
/// the recipient's own hand (value 1 per held card).
pub fn build_query(
    field: &Field,
    turn: u32,
    active_seat: usize,
    recipient_hand: &[Card],
    game_number: u32,
    total_games: u32,
    end_of_session: bool,
) -> Matrix {
    let mut matrix = card::matrix_from_cards(recipient_hand);
    matrix[0][meta::TURN_OR_VERSION] = turn as i32;
    matrix[0][meta::ACTIVE_SEAT] = active_seat as i32;
    matrix[0][meta::YOUR_TURN] = 1;
    matrix[0][meta::IS_START_OF_TRICK] = field.is_clear() as i32;
    matrix[0][meta::REVOLUTION] = field.revolution as i32;
    matrix[0][meta::ELEVEN_BACK] = field.eleven_back_active as i32;
    matrix[0][meta::EIGHT_CUT_NOTICE] = field.eight_cut_notice as i32;
    matrix[0][meta::SUIT_LOCK_ACTIVE] = field.suit_lock.is_some() as i32;
    let mask = suit_lock_mask(field);
    for (offset, value) in mask.iter().enumerate() {
        matrix[0][meta::SUIT_LOCK_MASK_START + offset] = *value;
    }
    matrix[0][meta::GAME_NUMBER] = game_number as i32;
    matrix[0][meta::TOTAL_GAMES] = total_games as i32;
    matrix[0][meta::END_OF_SESSION] = end_of_session as i32;

    matrix
}

/// Parse a client's response matrix into the chosen play. Cells marked 2 are the chosen
/// cards; an all-zero response (no 2 cells) is a pass.
pub fn parse_response(matrix: &Matrix) -> Vec<Card> {
    let mut played: Matrix = [[0; COLS]; ROWS];
    for (row, cells) in matrix.iter().enumerate().take(5).skip(1) {
        for (col, value) in cells.iter().enumerate() {
            if *value == 2 {
                played[row][col] = *value;
            }
        }
    }
    card::cards_from_matrix(&played)
}

/// Build the post-turn broadcast matrix seen by every seat: the resulting field plus the
/// per-seat metadata rows (finished flags, card counts, classes, cumulative points).
pub fn build_broadcast(
    field: &Field,
    turn: u32,
    active_seat: usize,
    hand_sizes: [usize; 5],
    finished: [bool; 5],
    classes: [Class; 5],
    cumulative_points: [i32; 5],
    game_number: u32,
    total_games: u32,
    end_of_session: bool,
) -> Matrix {
    let last_cards: Vec<Card> = field
        .last_play
        .as_ref()
        .map(|p| p.cards.clone())
        .unwrap_or_default();
    let mut matrix = card::matrix_from_cards(&last_cards);
    matrix[0][meta::TURN_OR_VERSION] = turn as i32;
    matrix[0][meta::ACTIVE_SEAT] = active_seat as i32;
    matrix[0][meta::IS_START_OF_TRICK] = field.is_clear() as i32;
    matrix[0][meta::REVOLUTION] = field.revolution as i32;
    matrix[0][meta::ELEVEN_BACK] = field.eleven_back_active as i32;
    matrix[0][meta::EIGHT_CUT_NOTICE] = field.eight_cut_notice as i32;
    matrix[0][meta::SUIT_LOCK_ACTIVE] = field.suit_lock.is_some() as i32;
    let mask = suit_lock_mask(field);
    for (offset, value) in mask.iter().enumerate() {
        matrix[0][meta::SUIT_LOCK_MASK_START + offset] = *value;
    }
    matrix[0][meta::GAME_NUMBER] = game_number as i32;
    matrix[0][meta::TOTAL_GAMES] = total_games as i32;
    matrix[0][meta::END_OF_SESSION] = end_of_session as i32;

    for seat in 0..5 {
        matrix[5][seat] = finished[seat] as i32;
        matrix[5][5 + seat] = hand_sizes[seat] as i32;
        matrix[6][seat] = class_code(classes[seat]);
        matrix[7][seat] = cumulative_points[seat];
    }

    matrix
}

fn class_code(class: Class) -> i32 {
    match class {
        Class::Daifugo => 0,
        Class::Fugo => 1,
        Class::Heimin => 2,
        Class::Hinmin => 3,
        Class::Daihinmin => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    #[test]
    fn test_byte_roundtrip() {
        let mut matrix: Matrix = [[0; COLS]; ROWS];
        matrix[0][0] = PROTOCOL_VERSION as i32;
        matrix[1][0] = 1;
        matrix[7][4] = -3;
        let bytes = matrix_to_bytes(&matrix);
        assert_eq!(bytes.len(), FRAME_BYTES);
        let back = matrix_from_bytes(&bytes).unwrap();
        assert_eq!(back, matrix);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let bytes = vec![0u8; 10];
        assert!(matches!(
            matrix_from_bytes(&bytes),
            Err(ProtocolError::UnexpectedFrameLength { .. })
        ));
    }

    #[test]
    fn test_handshake_carries_protocol_version() {
        let matrix = build_handshake(3);
        assert_eq!(handshake_version(&matrix), PROTOCOL_VERSION as i32);
        assert_eq!(matrix[0][meta::ACTIVE_SEAT], 3);
    }

    #[test]
    fn test_query_marks_your_turn_and_hand() {
        let field = Field::new();
        let hand = vec![Card::new(Suit::Spade, Rank::Three)];
        let matrix = build_query(&field, 1, 2, &hand, 1, 1, false);
        assert_eq!(matrix[0][meta::YOUR_TURN], 1);
        let (row, col) = Card::new(Suit::Spade, Rank::Three).matrix_cell();
        assert_eq!(matrix[row][col], 1);
    }

    #[test]
    fn test_query_carries_eight_cut_notice() {
        let mut field = Field::new();
        field.eight_cut_notice = true;
        let matrix = build_query(&field, 1, 2, &[], 1, 1, false);
        assert_eq!(matrix[0][meta::EIGHT_CUT_NOTICE], 1);

        let broadcast = build_broadcast(
            &field,
            1,
            2,
            [0; 5],
            [false; 5],
            [Class::Heimin; 5],
            [0; 5],
            1,
            1,
            false,
        );
        assert_eq!(broadcast[0][meta::EIGHT_CUT_NOTICE], 1);
    }

    #[test]
    fn test_response_pass_is_empty() {
        let matrix: Matrix = [[0; COLS]; ROWS];
        assert!(parse_response(&matrix).is_empty());
    }

    #[test]
    fn test_response_extracts_chosen_play() {
        let mut matrix: Matrix = [[0; COLS]; ROWS];
        let (row, col) = Card::new(Suit::Heart, Rank::Ten).matrix_cell();
        matrix[row][col] = 2;
        let played = parse_response(&matrix);
        assert_eq!(played, vec![Card::new(Suit::Heart, Rank::Ten)]);
    }
}

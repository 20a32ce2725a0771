//! Session coordinator (C6): accepts five connections, assigns seats, drives the
//! deal/exchange/play/score loop via `MatchState`/`SessionState`, and keeps every seat's view
//! synchronized through broadcast barriers (§4.6, §5).

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::action::Action;
use crate::card::{self, Matrix};
use crate::config::{SessionConfig, PROTOCOL_VERSION};
use crate::error::{ProtocolError, SessionError};
use crate::journal::{
    CardType, ExchangeRecord, Journal, JournalEvent, PlayerInfo, SpecialKind, TurnKind, TurnState,
};
use crate::match_state::MatchState;
use crate::protocol::{self, FRAME_BYTES};
use crate::rng::Random;
use crate::rules::Effect;
use crate::session::SessionState;
use crate::shape::PlayShape;

const SEATS: usize = 5;

struct Connection {
    stream: TcpStream,
}

impl Connection {
    fn send(&mut self, matrix: &Matrix) -> Result<(), SessionError> {
        let bytes = protocol::matrix_to_bytes(matrix);
        self.stream.write_all(&bytes)?;
        Ok(())
    }
}

enum Inbound {
    Response { seat: usize, matrix: Matrix },
    Disconnected { seat: usize },
}

/// Spawn a reader thread for one seat's connection. It only ever reads frames and forwards
/// them; all writes happen from the coordinator thread directly on its own stream handle.
fn spawn_reader(seat: usize, mut stream: TcpStream, sender: mpsc::Sender<Inbound>) {
    thread::spawn(move || loop {
        let mut buf = [0u8; FRAME_BYTES];
        match stream.read_exact(&mut buf) {
            Ok(()) => match protocol::matrix_from_bytes(&buf) {
                Ok(matrix) => {
                    if sender.send(Inbound::Response { seat, matrix }).is_err() {
                        return;
                    }
                }
                Err(_) => {
                    let _ = sender.send(Inbound::Disconnected { seat });
                    return;
                }
            },
            Err(_) => {
                let _ = sender.send(Inbound::Disconnected { seat });
                return;
            }
        }
    });
}

/// Accept exactly five TCP connections on `config.port`, run the handshake on each, and
/// return them ordered by seat (connection order, per §4.6).
fn accept_five(config: &SessionConfig) -> Result<[Connection; SEATS], SessionError> {
    let listener = TcpListener::bind(("0.0.0.0", config.port))?;
    tracing::info!(port = config.port, "listening for players");

    let mut connections: Vec<Connection> = Vec::with_capacity(SEATS);
    for seat in 0..SEATS {
        let (mut stream, _addr) = listener.accept()?;
        let handshake = protocol::build_handshake(seat);
        stream.write_all(&protocol::matrix_to_bytes(&handshake))?;

        let mut reply = [0u8; FRAME_BYTES];
        stream.read_exact(&mut reply)?;
        let reply = protocol::matrix_from_bytes(&reply)?;
        let client_version = protocol::handshake_version(&reply);
        if client_version != PROTOCOL_VERSION as i32 {
            return Err(SessionError::Protocol(ProtocolError::UnsupportedProtocolVersion {
                expected: PROTOCOL_VERSION,
                received: client_version.max(0) as u32,
            }));
        }
        tracing::info!(seat, "player connected");
        connections.push(Connection { stream });
    }

    connections
        .try_into()
        .map_err(|_| SessionError::PlayerCountMismatch {
            expected: SEATS,
            actual: SEATS,
        })
}

/// Run a complete session: accept players, loop games to completion, and write every
/// observable transition to the journal.
pub fn run_session<W: Write>(
    config: SessionConfig,
    mut journal: Journal<W>,
) -> Result<(), SessionError> {
    config
        .validate()
        .map_err(SessionError::SessionAborted)?;

    let mut connections = accept_five(&config)?;
    let (sender, receiver) = mpsc::channel();
    for (seat, connection) in connections.iter().enumerate() {
        let stream = connection.stream.try_clone()?;
        spawn_reader(seat, stream, sender.clone());
    }

    journal.write_event(&JournalEvent::SessionStart {
        timestamp: "unknown".to_string(),
        players: (0..SEATS)
            .map(|id| PlayerInfo {
                id,
                name: format!("seat-{id}"),
            })
            .collect(),
    })?;

    let mut rng = Random::from_seed(config.rng_seed);
    let mut session = SessionState::new(&config);

    while !session.is_complete() {
        let game_span = tracing::info_span!("game", game = session.current_game_number());
        let _enter = game_span.enter();
        run_one_game(&config, &mut session, &mut rng, &mut connections, &receiver, &mut journal)?;
    }

    journal.write_event(&JournalEvent::SessionEnd {
        total_games: session.total_games,
        final_points: session.cumulative_points.to_vec(),
        ranking: session.ranking(),
    })?;
    journal.flush()?;
    Ok(())
}

fn run_one_game<W: Write>(
    config: &SessionConfig,
    session: &mut SessionState,
    rng: &mut Random,
    connections: &mut [Connection; SEATS],
    receiver: &mpsc::Receiver<Inbound>,
    journal: &mut Journal<W>,
) -> Result<(), SessionError> {
    let previous_classes = session.seat_classes;
    let (mut state, exchange_moves) = session.deal_game(rng);

    if previous_classes.is_some() {
        journal.write_event(&JournalEvent::Exchange {
            game: state.game_number,
            exchanges: exchange_moves
                .iter()
                .map(|m| ExchangeRecord {
                    from: m.from_seat,
                    to: m.to_seat,
                    cards: crate::journal::format_cards(&m.cards),
                })
                .collect(),
            hands_after: state
                .hands
                .iter()
                .map(|h| crate::journal::format_cards(h.cards()))
                .collect(),
        })?;
    }

    journal.write_event(&JournalEvent::GameStart {
        game: state.game_number,
        hands: state
            .hands
            .iter()
            .map(|h| crate::journal::format_cards(h.cards()))
            .collect(),
        ranks: previous_classes
            .map(|c| c.to_vec())
            .unwrap_or_else(|| vec![crate::rank::Class::Heimin; SEATS]),
        first_player: state.active_seat,
    })?;

    loop {
        let seat = state.active_seat;
        let query = protocol::build_query(
            &state.field,
            state.turn_counter,
            seat,
            state.hands[seat].cards(),
            state.game_number,
            session.total_games,
            session.games_remaining <= 1,
        );
        connections[seat].send(&query)?;

        let action = match receiver.recv_timeout(Duration::from_secs(config.read_timeout_secs)) {
            Ok(Inbound::Response { seat: responder, matrix }) if responder == seat => {
                let cards = card::cards_from_matrix(&matrix);
                if cards.is_empty() {
                    Action::Pass
                } else {
                    Action::Play(cards)
                }
            }
            Ok(Inbound::Response { .. }) => {
                tracing::warn!(seat, "received a response from an unprompted seat; ignoring");
                Action::Pass
            }
            Ok(Inbound::Disconnected { seat: who }) => {
                return Err(SessionError::SessionAborted(format!(
                    "seat {who} disconnected"
                )));
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(seat, "read timeout; forcing a pass");
                Action::Pass
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(SessionError::SessionAborted(
                    "all reader threads disconnected".to_string(),
                ));
            }
        };

        let result = state
            .submit_action(seat, action, config)
            .map_err(SessionError::Rule)?;

        journal.write_event(&turn_event(&state, &result))?;
        for special in special_events(&state, &result) {
            journal.write_event(&special)?;
        }

        broadcast_snapshot(connections, &state, session)?;

        if result.next_active_seat.is_none() {
            break;
        }
    }

    journal.write_event(&JournalEvent::GameEnd {
        finish_order: state.completed_finish_order(),
        new_ranks: state.classes().to_vec(),
    })?;

    session.record_game_result(&state);
    Ok(())
}

fn card_type_of(shape: &PlayShape) -> CardType {
    match shape {
        PlayShape::Pass => CardType::Empty,
        PlayShape::Single { .. } => CardType::Single,
        PlayShape::JokerSingle => CardType::JokerSingle,
        PlayShape::Group { .. } => CardType::Pair,
        PlayShape::Sequence { .. } => CardType::Sequence,
        PlayShape::Invalid => CardType::Empty,
    }
}

fn turn_event(state: &MatchState, result: &crate::match_state::TurnResult) -> JournalEvent {
    let cards = result.action_taken.cards();
    let shape = crate::shape::classify(cards);
    JournalEvent::Turn {
        game: state.game_number,
        turn: state.turn_counter,
        player: result.seat,
        action: if result.action_taken.is_pass() {
            TurnKind::Pass
        } else {
            TurnKind::Play
        },
        cards: crate::journal::format_cards(cards),
        card_type: card_type_of(&shape),
        field: state
            .field
            .last_play
            .as_ref()
            .map(|p| crate::journal::format_cards(&p.cards))
            .unwrap_or_default(),
        hands: state.hands.iter().map(|h| h.len()).collect(),
        state: TurnState {
            revolution: state.field.revolution,
            eleven_back: state.field.eleven_back_active,
            locked: state.field.suit_lock.is_some(),
        },
    }
}

fn special_events(state: &MatchState, result: &crate::match_state::TurnResult) -> Vec<JournalEvent> {
    let mut events = Vec::new();
    for effect in &result.effects {
        let kind = match effect {
            Effect::EightCut => Some(SpecialKind::EightStop),
            Effect::Revolution => Some(SpecialKind::Revolution),
            Effect::ElevenBack => Some(SpecialKind::ElevenBack),
            Effect::SuitLock(_) => Some(SpecialKind::Lock),
            Effect::FieldClear { .. } => Some(SpecialKind::FieldClear),
        };
        if let Some(kind) = kind {
            events.push(JournalEvent::Special {
                game: state.game_number,
                turn: state.turn_counter,
                event: kind,
                player: result.seat,
                detail: None,
            });
        }
    }
    if result.finished {
        events.push(JournalEvent::Special {
            game: state.game_number,
            turn: state.turn_counter,
            event: SpecialKind::PlayerFinish,
            player: result.seat,
            detail: None,
        });
    }
    events
}

fn broadcast_snapshot(
    connections: &mut [Connection; SEATS],
    state: &MatchState,
    session: &SessionState,
) -> Result<(), SessionError> {
    let classes = state.classes();
    let mut hand_sizes = [0usize; SEATS];
    let mut finished = [false; SEATS];
    for seat in 0..SEATS {
        hand_sizes[seat] = state.hands[seat].len();
        finished[seat] = state.hands[seat].is_empty();
    }
    let matrix = protocol::build_broadcast(
        &state.field,
        state.turn_counter,
        state.active_seat,
        hand_sizes,
        finished,
        classes,
        session.cumulative_points,
        state.game_number,
        session.total_games,
        session.games_remaining <= 1,
    );
    for connection in connections.iter_mut() {
        connection.send(&matrix)?;
    }
    Ok(())
}

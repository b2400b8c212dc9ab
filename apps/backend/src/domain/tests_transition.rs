use crate::domain::{
    advance, replay, Board, GameStatus, Marker, Move, MoveRejection, SessionState,
};

fn mv(row: i32, col: i32, marker: Marker) -> Move {
    Move::new(row, col, marker)
}

#[test]
fn test_new_state_is_empty_x_to_move() {
    let state = SessionState::new();
    assert_eq!(state.board, Board::new());
    assert_eq!(state.turn, Marker::X);
    assert_eq!(state.status, GameStatus::InProgress);
    assert!(state.moves.is_empty());
}

#[test]
fn test_advance_flips_turn_and_records_move() {
    let start = SessionState::new();
    let next = advance(&start, &mv(0, 0, Marker::X)).unwrap();

    assert_eq!(next.turn, Marker::O);
    assert_eq!(next.moves, vec![mv(0, 0, Marker::X)]);
    assert_eq!(next.board.encode(), "X........");
    // input snapshot is untouched
    assert_eq!(start, SessionState::new());
}

#[test]
fn test_winning_move_keeps_turn_and_concludes() {
    let state = replay(&[
        mv(0, 0, Marker::X),
        mv(1, 0, Marker::O),
        mv(0, 1, Marker::X),
        mv(1, 1, Marker::O),
        mv(0, 2, Marker::X),
    ])
    .unwrap();

    assert_eq!(state.status, GameStatus::WonByX);
    assert_eq!(state.turn, Marker::X);
    assert_eq!(state.moves.len(), 5);
}

#[test]
fn test_no_moves_after_conclusion() {
    let state = replay(&[
        mv(0, 0, Marker::X),
        mv(1, 0, Marker::O),
        mv(0, 1, Marker::X),
        mv(1, 1, Marker::O),
        mv(0, 2, Marker::X),
    ])
    .unwrap();

    // Neither marker may move, whatever the turn field says
    assert_eq!(
        advance(&state, &mv(1, 2, Marker::O)),
        Err(MoveRejection::GameConcluded)
    );
    assert_eq!(
        advance(&state, &mv(2, 2, Marker::X)),
        Err(MoveRejection::GameConcluded)
    );
}

#[test]
fn test_draw_sequence() {
    // Final board X O X / X O O / O X X
    let state = replay(&[
        mv(0, 0, Marker::X),
        mv(0, 1, Marker::O),
        mv(0, 2, Marker::X),
        mv(1, 1, Marker::O),
        mv(1, 0, Marker::X),
        mv(2, 0, Marker::O),
        mv(2, 1, Marker::X),
        mv(1, 2, Marker::O),
        mv(2, 2, Marker::X),
    ])
    .unwrap();

    assert_eq!(state.board.encode(), "XOXXOOOXX");
    assert_eq!(state.status, GameStatus::Draw);
}

#[test]
fn test_rejection_leaves_state_unchanged() {
    let state = advance(&SessionState::new(), &mv(0, 0, Marker::X)).unwrap();
    let before = state.clone();

    assert_eq!(
        advance(&state, &mv(0, 0, Marker::O)),
        Err(MoveRejection::CellOccupied)
    );
    assert_eq!(state, before);
}

#[test]
fn test_replay_stops_at_first_illegal_move() {
    let result = replay(&[mv(0, 0, Marker::X), mv(0, 1, Marker::X)]);
    assert_eq!(result, Err(MoveRejection::OutOfTurn));
}

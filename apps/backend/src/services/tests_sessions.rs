use std::sync::Arc;

use crate::domain::{GameStatus, Marker, Move};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::memory::InMemoryStore;
use crate::repos::players::PlayerStore;
use crate::repos::sessions::Session;
use crate::services::players::PlayerService;
use crate::services::sessions::{Seats, SessionService};

fn engine() -> (SessionService, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let service = SessionService::new(store.clone(), store.clone());
    (service, store)
}

/// Plays `moves` in order starting at the session's current version.
async fn play(
    service: &SessionService,
    mut session: Session,
    moves: &[(i32, i32, Marker)],
) -> Session {
    for &(row, col, marker) in moves {
        session = service
            .submit_move(session.id, Move::new(row, col, marker), session.version)
            .await
            .unwrap();
    }
    session
}

fn rejection_kind(err: &DomainError) -> Option<&ValidationKind> {
    match err {
        DomainError::Validation(kind, _) => Some(kind),
        _ => None,
    }
}

#[tokio::test]
async fn new_session_is_empty_x_to_move() {
    let (service, _) = engine();
    let session = service.create_session().await.unwrap();

    assert_eq!(session.version, 0);
    assert_eq!(session.turn, Marker::X);
    assert_eq!(session.status, GameStatus::InProgress);
    assert!(session.moves.is_empty());
    assert_eq!(session.board.encode(), ".........");
}

#[tokio::test]
async fn get_unknown_session_is_not_found() {
    let (service, _) = engine();
    let err = service.get_session(404).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Session, _)));
}

#[tokio::test]
async fn x_wins_top_row_at_version_five() {
    let (service, _) = engine();
    let session = service.create_session().await.unwrap();

    let session = play(
        &service,
        session,
        &[
            (0, 0, Marker::X),
            (1, 0, Marker::O),
            (0, 1, Marker::X),
            (1, 1, Marker::O),
            (0, 2, Marker::X),
        ],
    )
    .await;

    assert_eq!(session.status, GameStatus::WonByX);
    assert_eq!(session.version, 5);
    assert_eq!(session.moves.len(), 5);
}

#[tokio::test]
async fn full_board_without_line_is_draw() {
    let (service, _) = engine();
    let session = service.create_session().await.unwrap();

    let session = play(
        &service,
        session,
        &[
            (0, 0, Marker::X),
            (0, 1, Marker::O),
            (0, 2, Marker::X),
            (1, 1, Marker::O),
            (1, 0, Marker::X),
            (2, 0, Marker::O),
            (2, 1, Marker::X),
            (1, 2, Marker::O),
            (2, 2, Marker::X),
        ],
    )
    .await;

    assert_eq!(session.board.encode(), "XOXXOOOXX");
    assert_eq!(session.status, GameStatus::Draw);
    assert_eq!(session.version, 9);
}

#[tokio::test]
async fn turn_alternates_after_each_move() {
    let (service, _) = engine();
    let session = service.create_session().await.unwrap();

    let session = play(&service, session, &[(1, 1, Marker::X)]).await;
    assert_eq!(session.turn, Marker::O);
    let session = play(&service, session, &[(0, 0, Marker::O)]).await;
    assert_eq!(session.turn, Marker::X);
}

#[tokio::test]
async fn occupied_cell_is_rejected_without_state_change() {
    let (service, _) = engine();
    let session = service.create_session().await.unwrap();
    let session = play(&service, session, &[(1, 1, Marker::X)]).await;

    let err = service
        .submit_move(session.id, Move::new(1, 1, Marker::O), session.version)
        .await
        .unwrap_err();
    assert_eq!(rejection_kind(&err), Some(&ValidationKind::CellOccupied));
    assert_eq!(
        err,
        DomainError::validation(ValidationKind::CellOccupied, "cell occupied")
    );

    let reloaded = service.get_session(session.id).await.unwrap();
    assert_eq!(reloaded.version, session.version);
    assert_eq!(reloaded.board, session.board);
}

#[tokio::test]
async fn out_of_bounds_and_out_of_turn_are_rejected() {
    let (service, _) = engine();
    let session = service.create_session().await.unwrap();

    let err = service
        .submit_move(session.id, Move::new(3, 0, Marker::X), 0)
        .await
        .unwrap_err();
    assert_eq!(rejection_kind(&err), Some(&ValidationKind::OutOfBounds));

    let err = service
        .submit_move(session.id, Move::new(-1, 2, Marker::X), 0)
        .await
        .unwrap_err();
    assert_eq!(rejection_kind(&err), Some(&ValidationKind::OutOfBounds));

    let err = service
        .submit_move(session.id, Move::new(0, 0, Marker::O), 0)
        .await
        .unwrap_err();
    assert_eq!(rejection_kind(&err), Some(&ValidationKind::OutOfTurn));

    assert_eq!(service.get_session(session.id).await.unwrap().version, 0);
}

#[tokio::test]
async fn move_after_win_is_rejected_as_concluded() {
    let (service, _) = engine();
    let session = service.create_session().await.unwrap();
    let session = play(
        &service,
        session,
        &[
            (0, 0, Marker::X),
            (1, 0, Marker::O),
            (0, 1, Marker::X),
            (1, 1, Marker::O),
            (0, 2, Marker::X),
        ],
    )
    .await;

    let err = service
        .submit_move(session.id, Move::new(2, 2, Marker::X), session.version)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DomainError::validation(ValidationKind::GameConcluded, "game already concluded")
    );
}

#[tokio::test]
async fn stale_version_is_a_conflict_and_changes_nothing() {
    let (service, _) = engine();
    let session = service.create_session().await.unwrap();
    let session = play(&service, session, &[(0, 0, Marker::X)]).await;

    let err = service
        .submit_move(session.id, Move::new(1, 1, Marker::O), session.version - 1)
        .await
        .unwrap_err();
    assert!(err.is_version_conflict());
    assert_eq!(err, DomainError::version_conflict(0, 1));

    let reloaded = service.get_session(session.id).await.unwrap();
    assert_eq!(reloaded, session);
}

#[tokio::test]
async fn same_move_twice_at_same_version() {
    let (service, _) = engine();
    let session = service.create_session().await.unwrap();
    let mv = Move::new(1, 1, Marker::X);

    let first = service.submit_move(session.id, mv, 0).await;
    let second = service.submit_move(session.id, mv, 0).await;

    assert_eq!(first.unwrap().version, 1);
    assert!(second.unwrap_err().is_version_conflict());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_have_exactly_one_winner() {
    let (service, _) = engine();
    let session = service.create_session().await.unwrap();

    let handles: Vec<_> = (0..9)
        .map(|cell| {
            let service = service.clone();
            let id = session.id;
            tokio::spawn(async move {
                service
                    .submit_move(id, Move::new(cell / 3, cell % 3, Marker::X), 0)
                    .await
            })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(s) => {
                accepted += 1;
                assert_eq!(s.version, 1);
            }
            Err(e) => assert!(e.is_version_conflict(), "unexpected error: {e}"),
        }
    }

    assert_eq!(accepted, 1);
    let stored = service.get_session(session.id).await.unwrap();
    assert_eq!(stored.version, 1);
    assert_eq!(stored.moves.len(), 1);
}

#[tokio::test]
async fn seated_players_move_by_seat() {
    let (service, store) = engine();
    let alice = PlayerStore::insert(store.as_ref(), "alice").await.unwrap();
    let bob = PlayerStore::insert(store.as_ref(), "bob").await.unwrap();

    let session = service
        .create_session_with_seats(Seats {
            x: Some(alice.id),
            o: Some(bob.id),
        })
        .await
        .unwrap();

    let session = service
        .submit_player_move(session.id, alice.id, 0, 0, 0)
        .await
        .unwrap();
    assert_eq!(session.moves[0].marker, Marker::X);

    // bob is O, so moving now is his turn; alice moving again is out of turn
    let err = service
        .submit_player_move(session.id, alice.id, 1, 1, 1)
        .await
        .unwrap_err();
    assert_eq!(rejection_kind(&err), Some(&ValidationKind::OutOfTurn));

    let session = service
        .submit_player_move(session.id, bob.id, 1, 1, 1)
        .await
        .unwrap();
    assert_eq!(session.moves[1].marker, Marker::O);
}

#[tokio::test]
async fn unseated_player_is_rejected() {
    let (service, store) = engine();
    let alice = PlayerStore::insert(store.as_ref(), "alice").await.unwrap();
    let carol = PlayerStore::insert(store.as_ref(), "carol").await.unwrap();

    let session = service
        .create_session_with_seats(Seats {
            x: Some(alice.id),
            o: None,
        })
        .await
        .unwrap();

    let err = service
        .submit_player_move(session.id, carol.id, 0, 0, 0)
        .await
        .unwrap_err();
    assert_eq!(rejection_kind(&err), Some(&ValidationKind::NotSeated));
}

#[tokio::test]
async fn bare_marker_cannot_move_a_seated_side() {
    let (service, store) = engine();
    let alice = PlayerStore::insert(store.as_ref(), "alice").await.unwrap();
    let bob = PlayerStore::insert(store.as_ref(), "bob").await.unwrap();

    let session = service
        .create_session_with_seats(Seats {
            x: Some(alice.id),
            o: Some(bob.id),
        })
        .await
        .unwrap();

    let err = service
        .submit_move(session.id, Move::new(0, 0, Marker::X), 0)
        .await
        .unwrap_err();
    assert_eq!(rejection_kind(&err), Some(&ValidationKind::NotSeated));

    let reloaded = service.get_session(session.id).await.unwrap();
    assert_eq!(reloaded.version, 0);
    assert!(reloaded.moves.is_empty());
}

#[tokio::test]
async fn open_side_still_moves_by_marker() {
    let (service, store) = engine();
    let alice = PlayerStore::insert(store.as_ref(), "alice").await.unwrap();

    let session = service
        .create_session_with_seats(Seats {
            x: Some(alice.id),
            o: None,
        })
        .await
        .unwrap();
    let session = service
        .submit_player_move(session.id, alice.id, 0, 0, 0)
        .await
        .unwrap();

    let session = service
        .submit_move(session.id, Move::new(1, 1, Marker::O), session.version)
        .await
        .unwrap();
    assert_eq!(session.version, 2);

    let err = service
        .submit_move(session.id, Move::new(2, 2, Marker::X), session.version)
        .await
        .unwrap_err();
    assert_eq!(rejection_kind(&err), Some(&ValidationKind::NotSeated));
}

#[tokio::test]
async fn join_fills_x_then_o_then_is_full() {
    let (service, store) = engine();
    let alice = PlayerStore::insert(store.as_ref(), "alice").await.unwrap();
    let bob = PlayerStore::insert(store.as_ref(), "bob").await.unwrap();
    let carol = PlayerStore::insert(store.as_ref(), "carol").await.unwrap();

    let session = service.create_session().await.unwrap();
    let session = service.join_session(session.id, alice.id).await.unwrap();
    assert_eq!(session.player_x, Some(alice.id));
    assert_eq!(session.version, 1);

    let err = service.join_session(session.id, alice.id).await.unwrap_err();
    assert_eq!(rejection_kind(&err), Some(&ValidationKind::AlreadySeated));

    let session = service.join_session(session.id, bob.id).await.unwrap();
    assert_eq!(session.player_o, Some(bob.id));
    assert_eq!(session.version, 2);

    let err = service.join_session(session.id, carol.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::SessionFull, _)));
}

#[tokio::test]
async fn join_takes_the_open_seat_and_checks_the_player() {
    let (service, store) = engine();
    let alice = PlayerStore::insert(store.as_ref(), "alice").await.unwrap();
    let bob = PlayerStore::insert(store.as_ref(), "bob").await.unwrap();

    let session = service
        .create_session_with_seats(Seats {
            x: None,
            o: Some(alice.id),
        })
        .await
        .unwrap();

    let err = service.join_session(session.id, 404).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Player, _)));

    let joined = service.join_session(session.id, bob.id).await.unwrap();
    assert_eq!(joined.player_x, Some(bob.id));

    let err = service.join_session(999, bob.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Session, _)));
}

#[tokio::test]
async fn join_after_conclusion_is_rejected() {
    let (service, store) = engine();
    let alice = PlayerStore::insert(store.as_ref(), "alice").await.unwrap();

    let session = service.create_session().await.unwrap();
    let session = play(
        &service,
        session,
        &[
            (0, 0, Marker::X),
            (1, 0, Marker::O),
            (0, 1, Marker::X),
            (1, 1, Marker::O),
            (0, 2, Marker::X),
        ],
    )
    .await;

    let err = service.join_session(session.id, alice.id).await.unwrap_err();
    assert_eq!(rejection_kind(&err), Some(&ValidationKind::GameConcluded));
    assert_eq!(service.get_session(session.id).await.unwrap().player_x, None);
}

#[tokio::test]
async fn join_invalidates_the_version_a_mover_holds() {
    let (service, store) = engine();
    let alice = PlayerStore::insert(store.as_ref(), "alice").await.unwrap();

    let session = service.create_session().await.unwrap();
    service.join_session(session.id, alice.id).await.unwrap();

    let err = service
        .submit_move(session.id, Move::new(0, 0, Marker::O), 0)
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::version_conflict(0, 1));
}

#[tokio::test]
async fn list_sessions_pages_by_id() {
    let (service, _) = engine();
    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(service.create_session().await.unwrap().id);
    }

    let page: Vec<i64> = service
        .list_sessions(1, 500)
        .await
        .unwrap()
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(page, ids[1..].to_vec());
    assert_eq!(service.list_sessions(0, 0).await.unwrap().len(), 1, "limit clamps up to 1");
}

#[tokio::test]
async fn seats_must_reference_distinct_existing_players() {
    let (service, store) = engine();
    let alice = PlayerStore::insert(store.as_ref(), "alice").await.unwrap();

    let err = service
        .create_session_with_seats(Seats {
            x: Some(alice.id),
            o: Some(alice.id),
        })
        .await
        .unwrap_err();
    assert_eq!(rejection_kind(&err), Some(&ValidationKind::InvalidSeats));

    let err = service
        .create_session_with_seats(Seats {
            x: Some(alice.id),
            o: Some(999),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Player, _)));
}

#[tokio::test]
async fn player_service_validates_and_lists() {
    let store = Arc::new(InMemoryStore::new());
    let players = PlayerService::new(store);

    let alice = players.create_player("  alice  ").await.unwrap();
    assert_eq!(alice.username, "alice");

    let err = players.create_player("alice").await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_, _)));

    let err = players.create_player("").await.unwrap_err();
    assert_eq!(rejection_kind(&err), Some(&ValidationKind::InvalidUsername));

    players.create_player("bob").await.unwrap();
    let page = players.list_players(0, 0).await.unwrap();
    assert_eq!(page.len(), 1, "limit clamps up to 1");
    let page = players.list_players(1, 500).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].username, "bob");

    assert_eq!(
        players.find_by_username("alice").await.unwrap().map(|p| p.id),
        Some(alice.id)
    );
    assert!(players.get_player(77).await.is_err());
}

use tictactoe_backend::domain::{GameStatus, Marker, Move};
use tictactoe_backend::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use tictactoe_backend::services::Seats;
use tictactoe_backend::AppError;

use crate::support::factory::{create_player, play, DRAW, X_TOP_ROW};
use crate::support::test_state::build_test_state;

#[tokio::test]
async fn x_wins_top_row_at_version_five() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let session = play(&state.session_service(), Seats::default(), &X_TOP_ROW).await?;

    assert_eq!(session.status, GameStatus::WonByX);
    assert_eq!(session.version, 5);
    assert_eq!(session.board.encode(), "XXXOO....");
    Ok(())
}

#[tokio::test]
async fn full_board_draw_is_persisted() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let service = state.session_service();
    let session = play(&service, Seats::default(), &DRAW).await?;

    let reloaded = service.get_session(session.id).await?;
    assert_eq!(reloaded.status, GameStatus::Draw);
    assert_eq!(reloaded.board.encode(), "XOXXOOOXX");
    assert_eq!(reloaded.moves.len(), 9);
    Ok(())
}

#[tokio::test]
async fn rejected_move_leaves_row_untouched() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let service = state.session_service();
    let session = play(&service, Seats::default(), &X_TOP_ROW[..1]).await?;

    let err = service
        .submit_move(session.id, Move::new(0, 0, Marker::O), session.version)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DomainError::validation(ValidationKind::CellOccupied, "cell occupied")
    );

    let reloaded = service.get_session(session.id).await?;
    assert_eq!(reloaded.version, 1);
    assert_eq!(reloaded.board, session.board);
    Ok(())
}

#[tokio::test]
async fn move_after_conclusion_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let service = state.session_service();
    let session = play(&service, Seats::default(), &X_TOP_ROW).await?;

    let err = service
        .submit_move(session.id, Move::new(2, 2, Marker::O), session.version)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DomainError::validation(ValidationKind::GameConcluded, "game already concluded")
    );
    Ok(())
}

#[tokio::test]
async fn stale_version_is_a_conflict() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let service = state.session_service();
    let session = play(&service, Seats::default(), &X_TOP_ROW[..2]).await?;

    let err = service
        .submit_move(session.id, Move::new(2, 2, Marker::X), session.version - 1)
        .await
        .unwrap_err();
    assert!(err.is_version_conflict(), "got {err:?}");
    assert_eq!(service.get_session(session.id).await?.version, 2);
    Ok(())
}

#[tokio::test]
async fn unknown_session_is_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let err = state
        .session_service()
        .submit_move(4242, Move::new(0, 0, Marker::X), 0)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Session, _)));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_submissions_commit_once() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let service = state.session_service();
    let session = service.create_session().await?;

    let handles: Vec<_> = (0..6)
        .map(|cell| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .submit_move(session.id, Move::new(cell / 3, cell % 3, Marker::X), 0)
                    .await
            })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => accepted += 1,
            Err(e) => assert!(e.is_version_conflict(), "unexpected error: {e}"),
        }
    }

    assert_eq!(accepted, 1);
    let stored = service.get_session(session.id).await?;
    assert_eq!(stored.version, 1);
    assert_eq!(stored.moves.len(), 1);
    Ok(())
}

#[tokio::test]
async fn seated_moves_resolve_markers() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let alice = create_player(&state, "alice").await?;
    let bob = create_player(&state, "bob").await?;
    let service = state.session_service();

    let session = service
        .create_session_with_seats(Seats {
            x: Some(alice.id),
            o: Some(bob.id),
        })
        .await?;
    assert_eq!(session.player_x, Some(alice.id));

    let session = service
        .submit_player_move(session.id, alice.id, 1, 1, 0)
        .await?;
    let session = service
        .submit_player_move(session.id, bob.id, 0, 0, 1)
        .await?;
    let markers: Vec<Marker> = session.moves.iter().map(|m| m.marker).collect();
    assert_eq!(markers, vec![Marker::X, Marker::O]);
    Ok(())
}

#[tokio::test]
async fn seat_for_missing_player_is_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let err = state
        .session_service()
        .create_session_with_seats(Seats {
            x: Some(31337),
            o: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Player, _)));
    Ok(())
}

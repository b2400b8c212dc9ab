use tictactoe_backend::errors::domain::{ConflictKind, DomainError, ValidationKind};
use tictactoe_backend::AppError;

use crate::support::test_state::build_test_state;

#[tokio::test]
async fn registration_trims_and_rejects_duplicates() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let players = state.player_service();

    let alice = players.create_player("  alice ").await?;
    assert_eq!(alice.username, "alice");

    let err = players.create_player("alice").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::UsernameTaken, _)
    ));

    let err = players.create_player(&"z".repeat(33)).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidUsername, _)
    ));

    assert_eq!(
        players.find_by_username(" alice").await?.map(|p| p.id),
        Some(alice.id)
    );
    Ok(())
}

#[tokio::test]
async fn listing_is_ordered_by_id() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let players = state.player_service();
    for name in ["carol", "alice", "bob"] {
        players.create_player(name).await?;
    }

    let all = players.list_players(0, 100).await?;
    let names: Vec<&str> = all.iter().map(|p| p.username.as_str()).collect();
    assert_eq!(names, vec!["carol", "alice", "bob"]);
    Ok(())
}

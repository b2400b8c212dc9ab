use std::sync::Arc;

use crate::domain::{Marker, Move};
use crate::repos::memory::InMemoryStore;
use crate::repos::players::{Player, PlayerStore};
use crate::services::leaderboard::{LeaderboardService, DEFAULT_LEADERBOARD_LIMIT};
use crate::services::sessions::{Seats, SessionService};

struct Fixture {
    store: Arc<InMemoryStore>,
    sessions: SessionService,
    board: LeaderboardService,
}

fn fixture() -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    Fixture {
        sessions: SessionService::new(store.clone(), store.clone()),
        board: LeaderboardService::new(store.clone()),
        store,
    }
}

impl Fixture {
    async fn player(&self, name: &str) -> Player {
        PlayerStore::insert(self.store.as_ref(), name).await.unwrap()
    }

    /// Seated sides move as their player, open sides by marker.
    async fn play(&self, seats: Seats, moves: &[(i32, i32, Marker)]) {
        let mut session = self.sessions.create_session_with_seats(seats).await.unwrap();
        for &(row, col, marker) in moves {
            session = match session.player_for(marker) {
                Some(player_id) => self
                    .sessions
                    .submit_player_move(session.id, player_id, row, col, session.version)
                    .await
                    .unwrap(),
                None => self
                    .sessions
                    .submit_move(session.id, Move::new(row, col, marker), session.version)
                    .await
                    .unwrap(),
            };
        }
    }
}

/// X takes the top row in five moves.
const X_FAST: [(i32, i32, Marker); 5] = [
    (0, 0, Marker::X),
    (1, 0, Marker::O),
    (0, 1, Marker::X),
    (1, 1, Marker::O),
    (0, 2, Marker::X),
];

/// O takes the middle column in six moves.
const O_WINS: [(i32, i32, Marker); 6] = [
    (0, 0, Marker::X),
    (0, 1, Marker::O),
    (2, 2, Marker::X),
    (1, 1, Marker::O),
    (0, 2, Marker::X),
    (2, 1, Marker::O),
];

/// X wins on the anti-diagonal in seven moves.
const X_SLOW: [(i32, i32, Marker); 7] = [
    (0, 2, Marker::X),
    (0, 0, Marker::O),
    (1, 1, Marker::X),
    (0, 1, Marker::O),
    (1, 0, Marker::X),
    (2, 2, Marker::O),
    (2, 0, Marker::X),
];

const DRAW: [(i32, i32, Marker); 9] = [
    (0, 0, Marker::X),
    (0, 1, Marker::O),
    (0, 2, Marker::X),
    (1, 1, Marker::O),
    (1, 0, Marker::X),
    (2, 0, Marker::O),
    (2, 1, Marker::X),
    (1, 2, Marker::O),
    (2, 2, Marker::X),
];

#[tokio::test]
async fn wins_rank_desc_with_id_tiebreak() {
    let f = fixture();
    let alice = f.player("alice").await;
    let bob = f.player("bob").await;
    let carol = f.player("carol").await;
    let dave = f.player("dave").await;

    let seats = |x: &Player, o: &Player| Seats {
        x: Some(x.id),
        o: Some(o.id),
    };

    // carol: 2 wins, alice: 1, bob: 1, dave: 1
    f.play(seats(&carol, &alice), &X_FAST).await;
    f.play(seats(&carol, &bob), &X_SLOW).await;
    f.play(seats(&alice, &bob), &X_FAST).await;
    f.play(seats(&dave, &bob), &O_WINS).await;
    f.play(seats(&dave, &alice), &X_FAST).await;

    let top = f.board.top_by_wins(DEFAULT_LEADERBOARD_LIMIT).await.unwrap();
    let ranked: Vec<(&str, u32)> = top.iter().map(|e| (e.username.as_str(), e.win_count)).collect();
    assert_eq!(ranked, vec![("carol", 2), ("alice", 1), ("bob", 1)]);
}

#[tokio::test]
async fn efficiency_ranks_fewest_moves_first() {
    let f = fixture();
    let alice = f.player("alice").await;
    let bob = f.player("bob").await;

    // alice wins in 7, bob wins in 5 and 6
    f.play(
        Seats {
            x: Some(alice.id),
            o: Some(bob.id),
        },
        &X_SLOW,
    )
    .await;
    f.play(
        Seats {
            x: Some(bob.id),
            o: Some(alice.id),
        },
        &X_FAST,
    )
    .await;
    f.play(
        Seats {
            x: Some(alice.id),
            o: Some(bob.id),
        },
        &O_WINS,
    )
    .await;

    let top = f.board.top_by_efficiency(3).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].username, "bob");
    assert!((top[0].efficiency - 5.5).abs() < f64::EPSILON);
    assert_eq!(top[1].username, "alice");
    assert!((top[1].efficiency - 7.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn draws_and_unseated_wins_are_ignored() {
    let f = fixture();
    let alice = f.player("alice").await;

    f.play(
        Seats {
            x: Some(alice.id),
            o: None,
        },
        &DRAW,
    )
    .await;
    // alice holds O, X wins unseated
    f.play(
        Seats {
            x: None,
            o: Some(alice.id),
        },
        &X_FAST,
    )
    .await;
    // in-progress sessions are not concluded
    f.play(Seats::default(), &X_FAST[..2]).await;

    assert!(f.board.top_by_wins(3).await.unwrap().is_empty());
    assert!(f.board.top_by_efficiency(3).await.unwrap().is_empty());
}

#[tokio::test]
async fn limit_truncates() {
    let f = fixture();
    for name in ["a", "b", "c", "d", "e"] {
        let p = f.player(name).await;
        f.play(
            Seats {
                x: Some(p.id),
                o: None,
            },
            &X_FAST,
        )
        .await;
    }

    assert_eq!(f.board.top_by_wins(3).await.unwrap().len(), 3);
    assert_eq!(f.board.top_by_wins(10).await.unwrap().len(), 5);
    assert!(f.board.top_by_efficiency(0).await.unwrap().is_empty());
}

#[tokio::test]
async fn wins_after_joining_are_credited() {
    let f = fixture();
    let alice = f.player("alice").await;
    let bob = f.player("bob").await;

    let session = f.sessions.create_session().await.unwrap();
    let session = f.sessions.join_session(session.id, alice.id).await.unwrap();
    let mut session = f.sessions.join_session(session.id, bob.id).await.unwrap();
    assert_eq!(session.version, 2);

    for &(row, col, marker) in &O_WINS {
        let player_id = session.player_for(marker).unwrap();
        session = f
            .sessions
            .submit_player_move(session.id, player_id, row, col, session.version)
            .await
            .unwrap();
    }

    let top = f.board.top_by_wins(3).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].player_id, bob.id);
    let fastest = f.board.top_by_efficiency(3).await.unwrap();
    assert!((fastest[0].efficiency - 6.0).abs() < f64::EPSILON);
}

//! Integration tests for room actors and the room manager.

use std::sync::Arc;

use intrigue_game::{GameError, GameState, Phase, RuleConfig};
use intrigue_protocol::{Action, PlayerId, Response, RoomId};
use intrigue_room::{RoomConfig, RoomError, RoomHandle, RoomManager};

// =========================================================================
// Helpers
// =========================================================================

fn pid(id: &str) -> PlayerId {
    PlayerId::new(id)
}

fn seeded() -> RoomManager {
    RoomManager::with_config(RoomConfig {
        seed: Some(42),
        ..RoomConfig::default()
    })
}

async fn seat(room: &RoomHandle, id: &str, name: &str) -> Arc<GameState> {
    let (id, name) = (pid(id), name.to_string());
    room.mutate(move |state, _| state.add_player(id, &name))
        .await
        .unwrap()
}

/// Seats `names` (ids are the lowercased names) and starts the game.
async fn started(room: &RoomHandle, names: &[&str]) -> Arc<GameState> {
    for name in names {
        seat(room, &name.to_lowercase(), name).await;
    }
    let by = pid(&names[0].to_lowercase());
    room.mutate(move |state, rng| state.start(&by, rng))
        .await
        .unwrap()
}

fn open(mgr: &mut RoomManager) -> RoomHandle {
    let room_id = mgr.create_room();
    mgr.handle(room_id).unwrap()
}

fn turn_id(state: &GameState) -> PlayerId {
    let name = state.turn_player.as_deref().unwrap();
    state.player_named(name).unwrap().id.clone()
}

// =========================================================================
// RoomManager
// =========================================================================

#[tokio::test]
async fn test_create_room_returns_unique_ids() {
    let mut mgr = RoomManager::new();
    let r1 = mgr.create_room();
    let r2 = mgr.create_room();
    assert_ne!(r1, r2);
    assert_eq!(mgr.room_count(), 2);
    assert!(mgr.room_ids().contains(&r1));
}

#[tokio::test]
async fn test_handle_for_unknown_room() {
    let mgr = RoomManager::new();
    assert!(matches!(
        mgr.handle(RoomId(u64::MAX)),
        Err(RoomError::NotFound(RoomId(u64::MAX)))
    ));
}

#[tokio::test]
async fn test_new_room_is_empty_and_unstarted() {
    let mut mgr = RoomManager::new();
    let room = open(&mut mgr);

    let state = room.snapshot();
    assert!(state.players.is_empty());
    assert!(!state.is_started);
    assert_eq!(state.deck.len(), 15);
    assert_eq!(state.phase(), Phase::Idle);
}

#[tokio::test]
async fn test_rooms_use_configured_rules() {
    let mut mgr = RoomManager::with_config(RoomConfig {
        rules: RuleConfig {
            copies_per_influence: 4,
            max_players: 2,
            ..RuleConfig::default()
        },
        ..RoomConfig::default()
    });
    let room = open(&mut mgr);
    assert_eq!(room.snapshot().deck.len(), 20);

    seat(&room, "a", "Ann").await;
    seat(&room, "b", "Bea").await;
    let err = room
        .mutate(|state, _| state.add_player(pid("c"), "Cal"))
        .await
        .unwrap_err();
    assert_eq!(err, RoomError::Game(GameError::RoomFull));
}

#[tokio::test]
async fn test_destroy_room() {
    let mut mgr = RoomManager::new();
    let room_id = mgr.create_room();
    let stale = mgr.handle(room_id).unwrap();
    seat(&stale, "a", "Ann").await;

    let removed = mgr.remove_room(room_id).unwrap();
    removed.shutdown().await.unwrap();

    assert_eq!(mgr.room_count(), 0);
    assert!(matches!(mgr.handle(room_id), Err(RoomError::NotFound(_))));
    assert!(matches!(
        mgr.remove_room(room_id),
        Err(RoomError::NotFound(_))
    ));

    let err = stale
        .mutate(|state, _| state.add_player(pid("b"), "Bea"))
        .await
        .unwrap_err();
    assert_eq!(err, RoomError::Unavailable(room_id));
    assert!(err.is_retryable());

    // The last committed state is still readable.
    assert_eq!(stale.snapshot().players.len(), 1);
}

// =========================================================================
// RoomHandle::mutate
// =========================================================================

#[tokio::test]
async fn test_mutate_commits_and_publishes() {
    let mut mgr = RoomManager::new();
    let room = open(&mut mgr);

    let committed = seat(&room, "a", "Ann").await;

    assert_eq!(committed.players.len(), 1);
    assert_eq!(*room.snapshot(), *committed);
}

#[tokio::test]
async fn test_failed_mutate_leaves_state_untouched() {
    let mut mgr = seeded();
    let room = open(&mut mgr);
    seat(&room, "a", "Ann").await;
    let before = room.snapshot();

    // Changes made before the error must not leak.
    let err = room
        .mutate(|state, _| {
            state.players[0].coins = 99;
            state.log("should not be kept");
            Err(GameError::NotStarted)
        })
        .await
        .unwrap_err();

    assert_eq!(err, RoomError::Game(GameError::NotStarted));
    assert!(Arc::ptr_eq(&before, &room.snapshot()));
    assert_eq!(room.snapshot().players[0].coins, 2);
}

#[tokio::test]
async fn test_rejected_game_move_reports_kind() {
    let mut mgr = RoomManager::new();
    let room = open(&mut mgr);
    let state = started(&room, &["Ann", "Bea"]).await;

    let actor = turn_id(&state);
    let err = room
        .mutate(move |state, _| state.propose_action(&actor, Action::Coup, Some("Ann")))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RoomError::Game(GameError::InsufficientCoins { .. })
    ));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_subscribe_sees_commits() {
    let mut mgr = RoomManager::new();
    let room = open(&mut mgr);
    let mut updates = room.subscribe();
    updates.borrow_and_update();

    seat(&room, "a", "Ann").await;

    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().players.len(), 1);
}

#[tokio::test]
async fn test_seeded_rooms_differ_by_room_id() {
    let mut mgr = seeded();
    let first = open(&mut mgr);
    let second = open(&mut mgr);
    assert_ne!(first.snapshot().deck, second.snapshot().deck);
}

// =========================================================================
// Concurrency
// =========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_passes_match_serial_application() {
    let mut mgr = seeded();
    let room = open(&mut mgr);
    let names = ["Ann", "Bea", "Cal", "Dan", "Eve", "Fay"];
    let state = started(&room, &names).await;

    let actor = turn_id(&state);
    let proposed = room
        .mutate(move |state, _| state.propose_action(&actor, Action::ForeignAid, None))
        .await
        .unwrap();
    let responders: Vec<PlayerId> = proposed
        .pending_action
        .as_ref()
        .unwrap()
        .pending_players
        .iter()
        .map(|name| proposed.player_named(name).unwrap().id.clone())
        .collect();
    assert_eq!(responders.len(), 5);

    let mut tasks = Vec::new();
    for id in responders.clone() {
        let room = room.clone();
        tasks.push(tokio::spawn(async move {
            room.mutate(move |state, _| state.respond_to_action(&id, Response::Pass, None))
                .await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let mut serial = GameState::clone(&proposed);
    for id in responders.iter().rev() {
        serial.respond_to_action(id, Response::Pass, None).unwrap();
    }

    let concurrent = room.snapshot();
    assert_eq!(*concurrent, serial);
    assert_eq!(concurrent.phase(), Phase::Idle);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_challenges_admit_exactly_one() {
    let mut mgr = seeded();
    let room = open(&mut mgr);
    let state = started(&room, &["Ann", "Bea", "Cal", "Dan"]).await;

    let actor = turn_id(&state);
    let proposed = room
        .mutate(move |state, _| state.propose_action(&actor, Action::Tax, None))
        .await
        .unwrap();
    let responders: Vec<PlayerId> = proposed
        .pending_action
        .as_ref()
        .unwrap()
        .pending_players
        .iter()
        .map(|name| proposed.player_named(name).unwrap().id.clone())
        .collect();

    let mut tasks = Vec::new();
    for id in responders {
        let room = room.clone();
        tasks.push(tokio::spawn(async move {
            room.mutate(move |state, _| {
                state.respond_to_action(&id, Response::Challenge, None)
            })
            .await
        }));
    }
    let mut accepted = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(RoomError::Game(GameError::NotAwaitingResponse(_))) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(room.snapshot().phase(), Phase::ActionChallenged);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rooms_progress_independently() {
    let mut mgr = RoomManager::new();
    let mut rooms = Vec::new();
    for _ in 0..8 {
        rooms.push(open(&mut mgr));
    }

    let mut tasks = Vec::new();
    for room in rooms.clone() {
        tasks.push(tokio::spawn(async move {
            for i in 0..4 {
                let id = pid(&format!("p{i}"));
                let name = format!("Player{i}");
                room.mutate(move |state, _| state.add_player(id, &name))
                    .await
                    .unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    for room in rooms {
        let state = room.snapshot();
        assert_eq!(state.players.len(), 4);
        assert_eq!(state.deck.len(), 15 - 8);
    }
}

//! Актор стола и лобби поверх tokio с остановленным временем.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use poker_table_engine::api::{
    ClientIntent, ErrorCode, HoleCardsView, ServerMessage, TableSnapshot, Viewer,
};
use poker_table_engine::domain::{chips::Chips, hand::Phase, table::TableConfig, PlayerId};
use poker_table_engine::engine::{actions::ActionSource, PlayerActionKind};
use poker_table_engine::infra::{
    telemetry::init_test_tracing,
    persistence::{HandArchive, InMemoryHandArchive},
    rng::{FixedSeedSource, SeedSource},
    rng_seed::RngSeed,
};
use poker_table_engine::server::{ClientSession, Lobby};
use poker_table_engine::EngineConfig;

type Inbox = mpsc::UnboundedReceiver<ServerMessage>;

fn lobby_with(archive: InMemoryHandArchive) -> Arc<Lobby> {
    init_test_tracing();
    let lobby = Lobby::new(EngineConfig::default())
        .expect("in-memory lobby")
        .with_archive_factory(Arc::new(move |_| Box::new(archive.clone()) as Box<dyn HandArchive>))
        .with_seed_factory(Arc::new(|_| {
            Box::new(FixedSeedSource::new(RngSeed::from_u64(11))) as Box<dyn SeedSource>
        }));
    Arc::new(lobby)
}

fn session(lobby: &Arc<Lobby>, conn: u64, player_id: PlayerId) -> (ClientSession, Inbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ClientSession::new(conn, player_id, Arc::clone(lobby), tx), rx)
}

/// Ждать первое сообщение, подходящее под `pick`. Остальные пропускаем.
async fn wait_for<T>(rx: &mut Inbox, mut pick: impl FnMut(ServerMessage) -> Option<T>) -> T {
    let found = timeout(Duration::from_secs(600), async {
        while let Some(msg) = rx.recv().await {
            if let Some(found) = pick(msg) {
                return Some(found);
            }
        }
        None
    })
    .await;
    match found {
        Ok(Some(found)) => found,
        _ => panic!("ожидаемое сообщение не пришло"),
    }
}

async fn sit(session: &mut ClientSession, table_id: u64, name: &str) {
    session
        .handle(ClientIntent::SitAtSeat {
            table_id,
            seat: None,
            buy_in: Chips(1000),
            display_name: name.to_string(),
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn lobby_lists_created_tables() {
    let lobby = lobby_with(InMemoryHandArchive::new());
    let a = lobby.create_table(TableConfig::six_max("A", 5, 10)).await.unwrap();
    let b = lobby.create_table(TableConfig::six_max("B", 25, 50)).await.unwrap();

    let list = lobby.list_tables().await;
    assert_eq!(list.iter().map(|t| t.table_id).collect::<Vec<_>>(), vec![a, b]);
    assert_eq!(list[1].big_blind, Chips(50));
    assert_eq!(list[0].seated, 0);

    let bad = TableConfig::six_max("bad", 10, 5);
    let err = lobby.create_table(bad).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidConfig);

    let err = lobby.table(999).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::TableNotFound);

    lobby.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn errors_go_only_to_the_sender() {
    let lobby = lobby_with(InMemoryHandArchive::new());
    let table_id = lobby.create_table(TableConfig::six_max("T", 5, 10)).await.unwrap();
    let (mut alice, mut alice_rx) = session(&lobby, 1, 1);
    let (mut bob, mut bob_rx) = session(&lobby, 2, 2);
    sit(&mut alice, table_id, "alice").await;
    sit(&mut bob, table_id, "bob").await;

    // Раздача ещё не началась.
    bob.handle(ClientIntent::PlayerAction {
        table_id,
        action: PlayerActionKind::Check,
    })
    .await;
    let err = wait_for(&mut bob_rx, |m| match m {
        ServerMessage::Error(e) => Some(e),
        _ => None,
    })
    .await;
    assert_eq!(err.code, ErrorCode::NoActiveHand);

    while let Ok(msg) = alice_rx.try_recv() {
        assert!(!matches!(msg, ServerMessage::Error(_)), "чужая ошибка: {msg:?}");
    }

    bob.handle_json("{\"type\":\"no_such_intent\"}").await;
    let err = wait_for(&mut bob_rx, |m| match m {
        ServerMessage::Error(e) => Some(e),
        _ => None,
    })
    .await;
    assert_eq!(err.code, ErrorCode::BadRequest);

    lobby.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn countdown_deals_and_timeout_auto_folds() {
    let archive = InMemoryHandArchive::new();
    let lobby = lobby_with(archive.clone());
    let table_id = lobby.create_table(TableConfig::six_max("T", 5, 10)).await.unwrap();
    let (mut alice, mut alice_rx) = session(&lobby, 1, 1);
    let (mut bob, _bob_rx) = session(&lobby, 2, 2);
    sit(&mut alice, table_id, "alice").await;
    sit(&mut bob, table_id, "bob").await;

    // Хедз-ап: alice на кнопке и ходит первой.
    let turn = wait_for(&mut alice_rx, |m| match m {
        ServerMessage::TurnStart { turn, .. } => Some(turn),
        _ => None,
    })
    .await;
    assert_eq!(turn.player_id, 1);

    // Никто не ходит: через 30 сек движок фолдит за alice.
    let outcome = wait_for(&mut alice_rx, |m| match m {
        ServerMessage::HandResult { outcome } => Some(outcome),
        _ => None,
    })
    .await;
    let last = outcome.log.last().expect("log");
    assert_eq!(last.source, ActionSource::Timeout);
    assert!(!outcome.went_to_showdown);
    assert!(outcome.revealed.is_empty());

    lobby.shutdown().await;
    assert_eq!(archive.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn each_player_gets_own_projection() {
    let lobby = lobby_with(InMemoryHandArchive::new());
    let table_id = lobby.create_table(TableConfig::six_max("T", 5, 10)).await.unwrap();
    let (mut alice, mut alice_rx) = session(&lobby, 1, 1);
    let (mut bob, _bob_rx) = session(&lobby, 2, 2);
    let (mut watcher, mut watcher_rx) = session(&lobby, 3, 3);
    sit(&mut alice, table_id, "alice").await;
    sit(&mut bob, table_id, "bob").await;
    watcher.handle(ClientIntent::WatchTable { table_id }).await;

    let in_hand = |m: ServerMessage| match m {
        ServerMessage::TableState(s) if s.phase == Phase::Preflop => Some(s),
        _ => None,
    };
    let mine: TableSnapshot = wait_for(&mut alice_rx, in_hand).await;
    assert_eq!(mine.viewer, Viewer::Seat(0));
    assert!(matches!(seat_cards(&mine, 0), HoleCardsView::Visible(_)));
    assert_eq!(seat_cards(&mine, 1), HoleCardsView::Hidden);

    let theirs: TableSnapshot = wait_for(&mut watcher_rx, in_hand).await;
    assert_eq!(theirs.viewer, Viewer::Spectator);
    assert_eq!(seat_cards(&theirs, 0), HoleCardsView::Hidden);
    assert_eq!(seat_cards(&theirs, 1), HoleCardsView::Hidden);

    lobby.shutdown().await;
}

fn seat_cards(snapshot: &TableSnapshot, seat: usize) -> HoleCardsView {
    snapshot.seats[seat]
        .as_ref()
        .map(|s| s.hole_cards.clone())
        .expect("occupied")
}

#[tokio::test(start_paused = true)]
async fn resume_after_disconnect_sends_reconnect_state() {
    let lobby = lobby_with(InMemoryHandArchive::new());
    let table_id = lobby.create_table(TableConfig::six_max("T", 5, 10)).await.unwrap();
    let (mut alice, alice_rx) = session(&lobby, 1, 1);
    sit(&mut alice, table_id, "alice").await;
    drop(alice_rx);
    alice.close().await;

    let snapshot = lobby
        .table(table_id)
        .await
        .unwrap()
        .snapshot(Viewer::Spectator)
        .await
        .unwrap();
    let seat = snapshot.seats[0].as_ref().expect("seat kept");
    assert!(!seat.connected);
    assert_eq!(seat.stack, Chips(1000));

    let (mut again, mut again_rx) = session(&lobby, 7, 1);
    again.handle(ClientIntent::ResumeSession { table_id }).await;
    let state = wait_for(&mut again_rx, |m| match m {
        ServerMessage::ReconnectState(s) => Some(s),
        _ => None,
    })
    .await;
    assert_eq!(state.viewer, Viewer::Seat(0));
    let seat = state.seats[0].as_ref().expect("seat kept");
    assert!(seat.connected);
    assert!(!seat.sitting_out);

    lobby.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn stale_connection_closing_keeps_player_connected() {
    let lobby = lobby_with(InMemoryHandArchive::new());
    let table_id = lobby.create_table(TableConfig::six_max("T", 5, 10)).await.unwrap();
    let (mut old, _old_rx) = session(&lobby, 1, 1);
    sit(&mut old, table_id, "alice").await;

    // Новое соединение подхватывает место раньше, чем закрылось старое.
    let (mut fresh, mut fresh_rx) = session(&lobby, 2, 1);
    fresh.handle(ClientIntent::ResumeSession { table_id }).await;
    wait_for(&mut fresh_rx, |m| match m {
        ServerMessage::ReconnectState(_) => Some(()),
        _ => None,
    })
    .await;
    old.close().await;

    let table = lobby.table(table_id).await.unwrap();
    let snapshot = table.snapshot(Viewer::Spectator).await.unwrap();
    assert!(snapshot.seats[0].as_ref().expect("seat kept").connected);

    // Окно переподключения не запущено: место не уходит в sitting out.
    tokio::time::advance(Duration::from_secs(300)).await;
    let snapshot = table.snapshot(Viewer::Spectator).await.unwrap();
    let seat = snapshot.seats[0].as_ref().expect("seat kept");
    assert!(seat.connected);
    assert!(!seat.sitting_out);

    // Закрытие актуального соединения по-прежнему отключает игрока.
    fresh.close().await;
    let snapshot = table.snapshot(Viewer::Spectator).await.unwrap();
    assert!(!snapshot.seats[0].as_ref().expect("seat kept").connected);

    lobby.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn spectators_see_showdown_cards_after_the_hand() {
    let lobby = lobby_with(InMemoryHandArchive::new());
    let table_id = lobby.create_table(TableConfig::six_max("T", 5, 10)).await.unwrap();
    let (mut alice, mut alice_rx) = session(&lobby, 1, 1);
    let (mut bob, mut bob_rx) = session(&lobby, 2, 2);
    let (mut watcher, mut watcher_rx) = session(&lobby, 3, 3);
    sit(&mut alice, table_id, "alice").await;
    sit(&mut bob, table_id, "bob").await;
    watcher.handle(ClientIntent::WatchTable { table_id }).await;

    wait_for(&mut alice_rx, |m| match m {
        ServerMessage::TurnStart { turn, .. } if turn.player_id == 1 => Some(()),
        _ => None,
    })
    .await;
    alice
        .handle(ClientIntent::PlayerAction {
            table_id,
            action: PlayerActionKind::AllIn,
        })
        .await;
    wait_for(&mut bob_rx, |m| match m {
        ServerMessage::TurnStart { turn, .. } if turn.player_id == 2 => Some(()),
        _ => None,
    })
    .await;
    bob.handle(ClientIntent::PlayerAction {
        table_id,
        action: PlayerActionKind::Call,
    })
    .await;

    let shown = wait_for(&mut watcher_rx, |m| match m {
        ServerMessage::TableState(s) if s.phase == Phase::Showdown => Some(s),
        _ => None,
    })
    .await;
    assert_eq!(shown.viewer, Viewer::Spectator);
    assert_eq!(shown.board.len(), 5);
    assert!(matches!(seat_cards(&shown, 0), HoleCardsView::Visible(_)));
    assert!(matches!(seat_cards(&shown, 1), HoleCardsView::Visible(_)));

    lobby.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn actions_flow_through_the_actor() {
    let lobby = lobby_with(InMemoryHandArchive::new());
    let table_id = lobby.create_table(TableConfig::six_max("T", 5, 10)).await.unwrap();
    let (mut alice, mut alice_rx) = session(&lobby, 1, 1);
    let (mut bob, mut bob_rx) = session(&lobby, 2, 2);
    sit(&mut alice, table_id, "alice").await;
    sit(&mut bob, table_id, "bob").await;

    wait_for(&mut alice_rx, |m| match m {
        ServerMessage::TurnStart { turn, .. } if turn.player_id == 1 => Some(()),
        _ => None,
    })
    .await;
    alice
        .handle(ClientIntent::PlayerAction {
            table_id,
            action: PlayerActionKind::Fold,
        })
        .await;

    let outcome = wait_for(&mut bob_rx, |m| match m {
        ServerMessage::HandResult { outcome } => Some(outcome),
        _ => None,
    })
    .await;
    assert_eq!(outcome.winnings, vec![(1, Chips(15))]);
    assert_eq!(outcome.log.last().map(|e| e.source), Some(ActionSource::Player));

    let summary = lobby.table(table_id).await.unwrap().summary();
    assert_eq!(summary.seated, 2);

    lobby.shutdown().await;
}

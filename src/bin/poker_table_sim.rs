// src/bin/poker_table_sim.rs
//
// Прогон ботов через настоящий стек: лобби → актор стола → сессии.
// Запуск: poker_table_sim [tables] [bots_per_table] [hands] [config.json]

use std::sync::Arc;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use poker_table_engine::api::{ClientIntent, ServerMessage};
use poker_table_engine::domain::table::TableConfig;
use poker_table_engine::engine::table_runtime::TurnInfo;
use poker_table_engine::engine::PlayerActionKind;
use poker_table_engine::eval::describe_hand;
use poker_table_engine::infra::telemetry::init_tracing;
use poker_table_engine::server::{ClientSession, Lobby};
use poker_table_engine::EngineConfig;

#[tokio::main]
async fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let tables: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(2);
    let bots: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(4).clamp(2, 6);
    let hands: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(20);

    let config = match args.get(4) {
        Some(path) => match EngineConfig::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("config error: {err}");
                std::process::exit(2);
            }
        },
        None => EngineConfig {
            countdown_secs: 1,
            ..EngineConfig::default()
        },
    };

    let lobby = match Lobby::new(config) {
        Ok(lobby) => Arc::new(lobby),
        Err(err) => {
            eprintln!("archive error: {err}");
            std::process::exit(2);
        }
    };

    let mut tasks = Vec::new();
    let mut conn = 0u64;
    for t in 0..tables {
        let table_cfg = TableConfig::six_max(format!("SIM {}", t + 1), 50, 100);
        let buy_in = table_cfg.max_buy_in;
        let table_id = match lobby.create_table(table_cfg).await {
            Ok(id) => id,
            Err(err) => {
                warn!(code = err.code.as_str(), "create table failed: {}", err.message);
                continue;
            }
        };

        for b in 0..bots {
            conn += 1;
            let player_id = lobby.ids().next_player_id();
            let (tx, rx) = mpsc::unbounded_channel();
            let mut session = ClientSession::new(conn, player_id, Arc::clone(&lobby), tx);
            session
                .handle(ClientIntent::SitAtSeat {
                    table_id,
                    seat: None,
                    buy_in,
                    display_name: format!("bot-{}-{}", t + 1, b + 1),
                })
                .await;
            tasks.push(tokio::spawn(run_bot(session, rx, table_id, hands)));
        }
    }

    for task in tasks {
        let _ = task.await;
    }

    for summary in lobby.list_tables().await {
        info!(
            table_id = summary.table_id,
            name = %summary.name,
            seated = summary.seated,
            phase = ?summary.phase,
            "table summary"
        );
    }
    lobby.shutdown().await;
}

/// Бот играет, пока не увидит `hands` итогов раздач (или стол не затихнет).
async fn run_bot(
    mut session: ClientSession,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
    table_id: u64,
    hands: usize,
) {
    let me = session.player_id();
    let mut seen = 0usize;

    loop {
        let msg = match timeout(Duration::from_secs(10), rx.recv()).await {
            Ok(Some(msg)) => msg,
            _ => break,
        };
        match msg {
            ServerMessage::TurnStart { turn, .. } if turn.player_id == me => {
                let action = choose_action(&turn);
                session
                    .handle(ClientIntent::PlayerAction { table_id, action })
                    .await;
            }
            ServerMessage::HandResult { outcome } => {
                seen += 1;
                for shown in &outcome.revealed {
                    debug!(
                        player_id = shown.player_id,
                        hand_id = outcome.hand_id,
                        "showdown: {}",
                        describe_hand(shown.rank)
                    );
                }
                if seen >= hands {
                    info!(player_id = me, hand_id = outcome.hand_id, "bot done");
                    break;
                }
            }
            ServerMessage::Error(err) => {
                warn!(player_id = me, code = err.code.as_str(), "{}", err.message);
            }
            _ => {}
        }
    }

    session
        .handle(ClientIntent::LeaveTable { table_id })
        .await;
    session.close().await;
}

fn choose_action(turn: &TurnInfo) -> PlayerActionKind {
    let roll: u8 = rand::thread_rng().gen_range(0..100);
    let facing_bet = !turn.call_amount.is_zero();
    if !turn.can_raise {
        return if roll < 20 { PlayerActionKind::Fold } else { PlayerActionKind::Call };
    }
    match (facing_bet, roll) {
        (true, 0..=19) => PlayerActionKind::Fold,
        (true, 20..=84) => PlayerActionKind::Call,
        (false, 0..=69) => PlayerActionKind::Check,
        (_, 95..) => PlayerActionKind::AllIn,
        _ if turn.min_raise_to < turn.max_raise_to => PlayerActionKind::Raise(turn.min_raise_to),
        (true, _) => PlayerActionKind::Call,
        (false, _) => PlayerActionKind::Check,
    }
}

//! Актор стола: одна tokio-задача на стол.
//!
//! Команды приходят через упорядоченную очередь и обрабатываются строго
//! по одной. Таймер один: на каждой итерации цикл спит до ближайшего
//! дедлайна рантайма, новый дедлайн автоматически заменяет старый.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Duration, Instant};
use tracing::{debug, info, warn};

use crate::api::dto::ServerMessage;
use crate::api::errors::{ApiError, HAND_VOIDED_NOTICE};
use crate::api::projection::{project, TableSnapshot, Viewer};
use crate::api::queries::{summarize, TableSummary};
use crate::domain::chips::Chips;
use crate::domain::table::SeatIndex;
use crate::domain::{PlayerId, TableId};
use crate::engine::actions::PlayerActionKind;
use crate::engine::table_runtime::{TableEvent, TableRuntime};

/// Идентификатор соединения клиента.
pub type ConnectionId = u64;

/// Канал сообщений в одно соединение.
pub type Outbox = mpsc::UnboundedSender<ServerMessage>;

type Reply<T> = oneshot::Sender<Result<T, ApiError>>;

/// Команда в очередь стола.
#[derive(Debug)]
pub enum TableCommand {
    Sit {
        conn: ConnectionId,
        outbox: Outbox,
        player_id: PlayerId,
        display_name: String,
        seat: Option<SeatIndex>,
        buy_in: Chips,
        reply: Reply<SeatIndex>,
    },
    Leave {
        player_id: PlayerId,
        reply: Reply<()>,
    },
    Act {
        player_id: PlayerId,
        action: PlayerActionKind,
        reply: Reply<()>,
    },
    Watch {
        conn: ConnectionId,
        outbox: Outbox,
    },
    Resume {
        conn: ConnectionId,
        outbox: Outbox,
        player_id: PlayerId,
        reply: Reply<()>,
    },
    SetSittingOut {
        player_id: PlayerId,
        sitting_out: bool,
        reply: Reply<()>,
    },
    /// Соединение закрылось.
    Disconnect {
        conn: ConnectionId,
    },
    Snapshot {
        viewer: Viewer,
        reply: oneshot::Sender<TableSnapshot>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Ручка стола для остальных частей сервера. Дёшево клонируется.
#[derive(Clone, Debug)]
pub struct TableHandle {
    table_id: TableId,
    sender: mpsc::Sender<TableCommand>,
    summary: watch::Receiver<TableSummary>,
}

impl TableHandle {
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Последняя сводка для лобби. Не заходит в очередь стола.
    pub fn summary(&self) -> TableSummary {
        self.summary.borrow().clone()
    }

    async fn send(&self, cmd: TableCommand) -> Result<(), ApiError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| ApiError::table_closed(self.table_id))
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> TableCommand,
    ) -> Result<T, ApiError> {
        let (tx, rx) = oneshot::channel();
        self.send(make(tx)).await?;
        rx.await.map_err(|_| ApiError::table_closed(self.table_id))?
    }

    pub async fn sit(
        &self,
        conn: ConnectionId,
        outbox: Outbox,
        player_id: PlayerId,
        display_name: String,
        seat: Option<SeatIndex>,
        buy_in: Chips,
    ) -> Result<SeatIndex, ApiError> {
        self.request(|reply| TableCommand::Sit {
            conn,
            outbox,
            player_id,
            display_name,
            seat,
            buy_in,
            reply,
        })
        .await
    }

    pub async fn leave(&self, player_id: PlayerId) -> Result<(), ApiError> {
        self.request(|reply| TableCommand::Leave { player_id, reply })
            .await
    }

    pub async fn act(&self, player_id: PlayerId, action: PlayerActionKind) -> Result<(), ApiError> {
        self.request(|reply| TableCommand::Act {
            player_id,
            action,
            reply,
        })
        .await
    }

    pub async fn watch(&self, conn: ConnectionId, outbox: Outbox) -> Result<(), ApiError> {
        self.send(TableCommand::Watch { conn, outbox }).await
    }

    pub async fn resume(
        &self,
        conn: ConnectionId,
        outbox: Outbox,
        player_id: PlayerId,
    ) -> Result<(), ApiError> {
        self.request(|reply| TableCommand::Resume {
            conn,
            outbox,
            player_id,
            reply,
        })
        .await
    }

    pub async fn set_sitting_out(&self, player_id: PlayerId, sitting_out: bool) -> Result<(), ApiError> {
        self.request(|reply| TableCommand::SetSittingOut {
            player_id,
            sitting_out,
            reply,
        })
        .await
    }

    pub async fn disconnect(&self, conn: ConnectionId) -> Result<(), ApiError> {
        self.send(TableCommand::Disconnect { conn }).await
    }

    pub async fn snapshot(&self, viewer: Viewer) -> Result<TableSnapshot, ApiError> {
        let (tx, rx) = oneshot::channel();
        self.send(TableCommand::Snapshot { viewer, reply: tx }).await?;
        rx.await.map_err(|_| ApiError::table_closed(self.table_id))
    }

    pub async fn shutdown(&self) -> Result<(), ApiError> {
        let (tx, rx) = oneshot::channel();
        self.send(TableCommand::Shutdown { reply: tx }).await?;
        rx.await.map_err(|_| ApiError::table_closed(self.table_id))
    }
}

/// Получатель проекций стола.
#[derive(Debug)]
struct Recipient {
    outbox: Outbox,
    /// None — зритель.
    player_id: Option<PlayerId>,
}

pub struct TableActor {
    runtime: TableRuntime,
    inbox: mpsc::Receiver<TableCommand>,
    recipients: HashMap<ConnectionId, Recipient>,
    summary: watch::Sender<TableSummary>,
    /// Точка отсчёта: tokio-время ↔ unix ms.
    started: Instant,
    started_wall_ms: u64,
}

impl TableActor {
    /// Запустить актор стола в отдельной задаче.
    pub fn spawn(runtime: TableRuntime, inbox_capacity: usize) -> (TableHandle, JoinHandle<()>) {
        let table_id = runtime.table().id;
        let (sender, inbox) = mpsc::channel(inbox_capacity.max(1));
        let (summary, summary_rx) = watch::channel(summarize(runtime.table(), current_phase(&runtime)));

        let actor = TableActor {
            runtime,
            inbox,
            recipients: HashMap::new(),
            summary,
            started: Instant::now(),
            started_wall_ms: wall_clock_ms(),
        };
        let join = tokio::spawn(actor.run());

        let handle = TableHandle {
            table_id,
            sender,
            summary: summary_rx,
        };
        (handle, join)
    }

    fn now_ms(&self) -> u64 {
        self.started_wall_ms + self.started.elapsed().as_millis() as u64
    }

    fn instant_for(&self, at_ms: u64) -> Instant {
        self.started + Duration::from_millis(at_ms.saturating_sub(self.started_wall_ms))
    }

    async fn run(mut self) {
        let table_id = self.runtime.table().id;
        info!(table_id, "table actor started");

        loop {
            let wake = self.runtime.next_wakeup().map(|ms| self.instant_for(ms));
            tokio::select! {
                cmd = self.inbox.recv() => {
                    match cmd {
                        Some(TableCommand::Shutdown { reply }) => {
                            self.teardown();
                            let _ = reply.send(());
                            break;
                        }
                        Some(cmd) => self.handle(cmd),
                        None => {
                            self.teardown();
                            break;
                        }
                    }
                }
                _ = sleep_until_opt(wake) => {
                    let events = self.runtime.tick(self.now_ms());
                    self.publish(events);
                }
            }
        }

        info!(table_id, "table actor stopped");
    }

    fn handle(&mut self, cmd: TableCommand) {
        let now = self.now_ms();
        match cmd {
            TableCommand::Sit {
                conn,
                outbox,
                player_id,
                display_name,
                seat,
                buy_in,
                reply,
            } => match self.runtime.sit(player_id, display_name, seat, buy_in, now) {
                Ok((seat, events)) => {
                    self.attach_player(conn, outbox, player_id);
                    let _ = reply.send(Ok(seat));
                    self.publish(events);
                }
                Err(err) => {
                    let _ = reply.send(Err(err.into()));
                }
            },

            TableCommand::Leave { player_id, reply } => match self.runtime.leave(player_id, now) {
                Ok(events) => {
                    let _ = reply.send(Ok(()));
                    self.publish(events);
                }
                Err(err) => {
                    let _ = reply.send(Err(err.into()));
                }
            },

            TableCommand::Act {
                player_id,
                action,
                reply,
            } => match self.runtime.act(player_id, action, now) {
                Ok(events) => {
                    let _ = reply.send(Ok(()));
                    self.publish(events);
                }
                Err(err) => {
                    debug!(table_id = self.runtime.table().id, player_id, error = %err, "action rejected");
                    let _ = reply.send(Err(err.into()));
                }
            },

            TableCommand::Watch { conn, outbox } => {
                let snapshot = self.snapshot_for(Viewer::Spectator);
                let _ = outbox.send(ServerMessage::TableState(snapshot));
                self.recipients.insert(
                    conn,
                    Recipient {
                        outbox,
                        player_id: None,
                    },
                );
            }

            TableCommand::Resume {
                conn,
                outbox,
                player_id,
                reply,
            } => match self.runtime.reconnect(player_id) {
                Ok((_, events)) => {
                    let viewer = self.viewer_of(Some(player_id));
                    let _ = outbox.send(ServerMessage::ReconnectState(self.snapshot_for(viewer)));
                    self.attach_player(conn, outbox, player_id);
                    let _ = reply.send(Ok(()));
                    self.publish(events);
                }
                Err(err) => {
                    let _ = reply.send(Err(err.into()));
                }
            },

            TableCommand::SetSittingOut {
                player_id,
                sitting_out,
                reply,
            } => match self.runtime.set_sitting_out(player_id, sitting_out, now) {
                Ok(events) => {
                    let _ = reply.send(Ok(()));
                    self.publish(events);
                }
                Err(err) => {
                    let _ = reply.send(Err(err.into()));
                }
            },

            TableCommand::Disconnect { conn } => {
                if let Some(Recipient {
                    player_id: Some(player_id),
                    ..
                }) = self.recipients.remove(&conn)
                {
                    // Старое соединение могло закрыться уже после нового.
                    if self.connection_of(player_id).is_some() {
                        debug!(table_id = self.runtime.table().id, player_id, conn, "stale connection closed");
                        return;
                    }
                    let events = self.runtime.disconnect(player_id, now);
                    self.publish(events);
                }
            }

            TableCommand::Snapshot { viewer, reply } => {
                let _ = reply.send(self.snapshot_for(viewer));
            }

            TableCommand::Shutdown { reply } => {
                self.teardown();
                let _ = reply.send(());
            }
        }
    }

    /// У игрока одно актуальное соединение: новое вытесняет прежние.
    fn attach_player(&mut self, conn: ConnectionId, outbox: Outbox, player_id: PlayerId) {
        self.recipients
            .retain(|c, r| *c == conn || r.player_id != Some(player_id));
        self.recipients.insert(
            conn,
            Recipient {
                outbox,
                player_id: Some(player_id),
            },
        );
    }

    fn connection_of(&self, player_id: PlayerId) -> Option<ConnectionId> {
        self.recipients
            .iter()
            .find(|(_, r)| r.player_id == Some(player_id))
            .map(|(conn, _)| *conn)
    }

    fn viewer_of(&self, player_id: Option<PlayerId>) -> Viewer {
        player_id
            .and_then(|p| self.runtime.table().seat_of(p))
            .map(Viewer::Seat)
            .unwrap_or(Viewer::Spectator)
    }

    fn snapshot_for(&self, viewer: Viewer) -> TableSnapshot {
        project(
            self.runtime.table(),
            self.runtime.projected_hand(),
            viewer,
            self.runtime.version(),
            self.runtime.turn_deadline(),
        )
    }

    /// Разослать события всему столу, потом каждому — свою проекцию.
    fn publish(&mut self, events: Vec<TableEvent>) {
        if events.is_empty() {
            return;
        }
        let table_id = self.runtime.table().id;

        for event in events {
            let msg = match event {
                TableEvent::PlayerJoined {
                    seat,
                    player_id,
                    display_name,
                    stack,
                } => Some(ServerMessage::PlayerJoined {
                    table_id,
                    seat,
                    player_id,
                    display_name,
                    stack,
                }),
                TableEvent::PlayerLeft {
                    seat, player_id, ..
                } => Some(ServerMessage::PlayerLeft {
                    table_id,
                    seat,
                    player_id,
                }),
                TableEvent::TurnStarted(turn) => Some(ServerMessage::TurnStart { table_id, turn }),
                TableEvent::ActionAccepted(entry) => Some(ServerMessage::ActionAck { table_id, entry }),
                TableEvent::HandFinished(outcome) => Some(ServerMessage::HandResult { outcome: *outcome }),
                TableEvent::HandVoided(voided) => Some(ServerMessage::HandVoided {
                    table_id,
                    hand_id: voided.hand_id,
                    message: HAND_VOIDED_NOTICE.to_string(),
                }),
                TableEvent::CountdownStarted { .. }
                | TableEvent::HandStarted { .. }
                | TableEvent::ConnectionChanged { .. }
                | TableEvent::SittingOutChanged { .. } => None,
            };
            if let Some(msg) = msg {
                self.broadcast(msg);
            }
        }

        let viewers: Vec<(ConnectionId, Viewer)> = self
            .recipients
            .iter()
            .map(|(conn, r)| (*conn, self.viewer_of(r.player_id)))
            .collect();
        for (conn, viewer) in viewers {
            let snapshot = self.snapshot_for(viewer);
            if let Some(r) = self.recipients.get(&conn) {
                let _ = r.outbox.send(ServerMessage::TableState(snapshot));
            }
        }
        self.recipients.retain(|_, r| !r.outbox.is_closed());

        self.summary
            .send_replace(summarize(self.runtime.table(), current_phase(&self.runtime)));
    }

    fn broadcast(&self, msg: ServerMessage) {
        for r in self.recipients.values() {
            let _ = r.outbox.send(msg.clone());
        }
    }

    fn teardown(&mut self) {
        if let Err(err) = self.runtime.teardown() {
            warn!(table_id = self.runtime.table().id, error = %err, "archive flush failed on teardown");
        }
        self.recipients.clear();
    }
}

fn current_phase(runtime: &TableRuntime) -> crate::domain::hand::Phase {
    runtime
        .hand()
        .map(|h| h.phase)
        .unwrap_or(runtime.table().phase)
}

async fn sleep_until_opt(at: Option<Instant>) {
    match at {
        Some(at) => sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

//! Сессия клиента: разбирает намерения и направляет их в лобби или стол.
//!
//! Ответы и ошибки уходят только в исходящий канал этой сессии.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::api::commands::ClientIntent;
use crate::api::dto::ServerMessage;
use crate::api::errors::ApiError;
use crate::domain::{PlayerId, TableId};

use super::actor::{ConnectionId, Outbox};
use super::lobby::Lobby;

pub struct ClientSession {
    conn: ConnectionId,
    player_id: PlayerId,
    lobby: Arc<Lobby>,
    outbox: Outbox,
    /// Столы, на которые подписано соединение.
    attached: HashSet<TableId>,
}

impl ClientSession {
    pub fn new(conn: ConnectionId, player_id: PlayerId, lobby: Arc<Lobby>, outbox: Outbox) -> Self {
        Self {
            conn,
            player_id,
            lobby,
            outbox,
            attached: HashSet::new(),
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    /// Обработать одно намерение. Ошибка уходит клиенту сообщением `error`.
    pub async fn handle(&mut self, intent: ClientIntent) {
        debug!(conn = self.conn, player_id = self.player_id, intent = ?intent, "client intent");
        if let Err(err) = self.dispatch(intent).await {
            let _ = self.outbox.send(ServerMessage::Error(err));
        }
    }

    /// Разобрать сырое JSON-сообщение транспорта.
    pub async fn handle_json(&mut self, raw: &str) {
        match serde_json::from_str::<ClientIntent>(raw) {
            Ok(intent) => self.handle(intent).await,
            Err(err) => {
                let _ = self
                    .outbox
                    .send(ServerMessage::Error(ApiError::bad_request(err.to_string())));
            }
        }
    }

    async fn dispatch(&mut self, intent: ClientIntent) -> Result<(), ApiError> {
        match intent {
            ClientIntent::CreateTable { config } => {
                let table_id = self.lobby.create_table(config).await?;
                let _ = self.outbox.send(ServerMessage::TableCreated { table_id });
            }
            ClientIntent::SitAtSeat {
                table_id,
                seat,
                buy_in,
                display_name,
            } => {
                let table = self.lobby.table(table_id).await?;
                let seat = table
                    .sit(self.conn, self.outbox.clone(), self.player_id, display_name, seat, buy_in)
                    .await?;
                self.attached.insert(table_id);
                let _ = self.outbox.send(ServerMessage::Seated { table_id, seat });
            }
            ClientIntent::LeaveTable { table_id } => {
                self.lobby.table(table_id).await?.leave(self.player_id).await?;
            }
            ClientIntent::PlayerAction { table_id, action } => {
                self.lobby.table(table_id).await?.act(self.player_id, action).await?;
            }
            ClientIntent::RequestTables => {
                let tables = self.lobby.list_tables().await;
                let _ = self.outbox.send(ServerMessage::TableList { tables });
            }
            ClientIntent::WatchTable { table_id } => {
                self.lobby
                    .table(table_id)
                    .await?
                    .watch(self.conn, self.outbox.clone())
                    .await?;
                self.attached.insert(table_id);
            }
            ClientIntent::ResumeSession { table_id } => {
                self.lobby
                    .table(table_id)
                    .await?
                    .resume(self.conn, self.outbox.clone(), self.player_id)
                    .await?;
                self.attached.insert(table_id);
            }
            ClientIntent::SetSittingOut {
                table_id,
                sitting_out,
            } => {
                self.lobby
                    .table(table_id)
                    .await?
                    .set_sitting_out(self.player_id, sitting_out)
                    .await?;
            }
        }
        Ok(())
    }

    /// Соединение закрылось: столы отмечают игрока отключённым,
    /// дальше работает окно переподключения.
    pub async fn close(self) {
        for table_id in self.attached {
            if let Ok(table) = self.lobby.table(table_id).await {
                let _ = table.disconnect(self.conn).await;
            }
        }
    }
}

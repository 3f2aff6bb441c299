use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::table::SeatIndex;
use crate::domain::{HandId, PlayerId, TableId};
use crate::engine::game_loop::HandOutcome;
use crate::engine::hand_history::ActionLogEntry;
use crate::engine::table_runtime::TurnInfo;

use super::errors::ApiError;
use super::projection::TableSnapshot;
use super::queries::TableSummary;

/// Сообщение сервера клиенту.
///
/// `TableState` / `ReconnectState` адресные (у каждого получателя своя
/// проекция), остальные — на весь стол, кроме `Error` и ответов на запрос.
#[allow(clippy::large_enum_variant)]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    TableCreated {
        table_id: TableId,
    },
    Seated {
        table_id: TableId,
        seat: SeatIndex,
    },
    TableState(TableSnapshot),
    TurnStart {
        table_id: TableId,
        #[serde(flatten)]
        turn: TurnInfo,
    },
    ActionAck {
        table_id: TableId,
        entry: ActionLogEntry,
    },
    /// Итог раздачи: выигрыши, показанные руки, поты, сид и полный журнал.
    HandResult {
        outcome: HandOutcome,
    },
    /// Раздача аннулирована, стеки восстановлены. Детали — в логах сервера.
    HandVoided {
        table_id: TableId,
        hand_id: HandId,
        message: String,
    },
    PlayerJoined {
        table_id: TableId,
        seat: SeatIndex,
        player_id: PlayerId,
        display_name: String,
        stack: Chips,
    },
    PlayerLeft {
        table_id: TableId,
        seat: SeatIndex,
        player_id: PlayerId,
    },
    ReconnectState(TableSnapshot),
    TableList {
        tables: Vec<TableSummary>,
    },
    Error(ApiError),
}

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::table::{SeatIndex, TableConfig};
use crate::domain::TableId;
use crate::engine::actions::PlayerActionKind;

/// Намерение клиента. Транспорт доставляет их по порядку для одного соединения.
///
/// Действие в раздаче — закрытый набор `PlayerActionKind`; вне фаз
/// торговли оно отклоняется до того, как дойдёт до расчёта.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientIntent {
    CreateTable {
        config: TableConfig,
    },
    /// Сесть за стол. Без `seat` — первое свободное место.
    SitAtSeat {
        table_id: TableId,
        seat: Option<SeatIndex>,
        buy_in: Chips,
        display_name: String,
    },
    LeaveTable {
        table_id: TableId,
    },
    PlayerAction {
        table_id: TableId,
        action: PlayerActionKind,
    },
    RequestTables,
    WatchTable {
        table_id: TableId,
    },
    /// Вернуться на своё место после обрыва связи.
    ResumeSession {
        table_id: TableId,
    },
    SetSittingOut {
        table_id: TableId,
        sitting_out: bool,
    },
}

impl ClientIntent {
    /// Стол, к которому относится намерение (если относится).
    pub fn table_id(&self) -> Option<TableId> {
        match self {
            ClientIntent::CreateTable { .. } | ClientIntent::RequestTables => None,
            ClientIntent::SitAtSeat { table_id, .. }
            | ClientIntent::LeaveTable { table_id }
            | ClientIntent::PlayerAction { table_id, .. }
            | ClientIntent::WatchTable { table_id }
            | ClientIntent::ResumeSession { table_id }
            | ClientIntent::SetSittingOut { table_id, .. } => Some(*table_id),
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::PlayerId;

/// Статус игрока внутри конкретной раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    /// Игрок в раздаче и ещё может делать ставки.
    Active,
    /// Игрок сфолдил и больше не претендует ни на один банк.
    Folded,
    /// Игрок в олл-ине – не может больше делать ставки.
    AllIn,
}

/// Состояние соединения игрока.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum ConnectionStatus {
    Connected,
    /// Отключён с момента `since_ms` (unix ms).
    Disconnected { since_ms: u64 },
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }
}

/// Игрок на месте за столом. Живёт дольше отдельных раздач.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatedPlayer {
    pub player_id: PlayerId,
    pub display_name: String,
    /// Текущий стек за столом (никогда не отрицательный).
    pub stack: Chips,
    pub connection: ConnectionStatus,
    /// Пропускает следующие раздачи, но держит место и стек.
    pub sitting_out: bool,
    /// Игрок ушёл посреди раздачи: место освобождается, когда раздача закончится.
    pub leaving: bool,
}

impl SeatedPlayer {
    pub fn new(player_id: PlayerId, display_name: impl Into<String>, stack: Chips) -> Self {
        Self {
            player_id,
            display_name: display_name.into(),
            stack,
            connection: ConnectionStatus::Connected,
            sitting_out: false,
            leaving: false,
        }
    }

    /// Может ли игрок попасть в следующую раздачу.
    pub fn is_eligible_for_hand(&self) -> bool {
        !self.sitting_out && !self.leaving && !self.stack.is_zero()
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::{Chips, Phase, PlayerId, SeatIndex};

/// Тип действия игрока в раунде ставок.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "amount")]
pub enum PlayerActionKind {
    Fold,
    Check,
    Call,
    /// Рейз (или бет, если ставки ещё нет) ДО указанной суммы за раунд.
    Raise(Chips),
    /// All-in – поставить весь стек.
    AllIn,
}

impl PlayerActionKind {
    /// Действия игрока допустимы только в фазах торговли.
    pub fn is_legal_in(&self, phase: Phase) -> bool {
        phase.is_betting()
    }
}

/// Кто инициировал действие. Нужен для аудита авто-ходов.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionSource {
    /// Игрок сам прислал действие.
    Player,
    /// Истёк таймер хода — движок сделал check/fold за игрока.
    Timeout,
    /// Игрок покинул стол посреди раздачи.
    Forfeit,
    /// Обязательная ставка (блайнд).
    Blind,
}

/// Конкретное действие игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAction {
    /// Какой игрок действует.
    pub player_id: PlayerId,
    /// В каком месте он сидит.
    pub seat: SeatIndex,
    /// Само действие.
    pub kind: PlayerActionKind,
}

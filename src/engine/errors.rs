use crate::domain::{Chips, Phase, PlayerId, SeatIndex};

use thiserror::Error;

/// Ошибки движка покера.
///
/// Две группы:
/// - ошибки валидации — запрос отклонён, состояние не тронуто;
/// - ошибки целостности (`Integrity*`) — раздача аннулируется, стеки откатываются.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Некорректная конфигурация стола: {0}")]
    InvalidConfig(String),

    #[error("Место {0} не существует за столом")]
    InvalidSeat(SeatIndex),

    #[error("Место {0} уже занято")]
    SeatTaken(SeatIndex),

    #[error("Свободных мест нет")]
    TableFull,

    #[error("Игрок {0} уже сидит за столом")]
    AlreadySeated(PlayerId),

    #[error("Бай-ин {amount} вне диапазона {min}..={max}")]
    BuyInOutOfRange { amount: Chips, min: Chips, max: Chips },

    #[error("Игрок {0} не найден за столом")]
    PlayerNotAtTable(PlayerId),

    #[error("Недостаточно активных игроков для раздачи")]
    NotEnoughPlayers,

    #[error("Раздача уже идёт")]
    HandAlreadyInProgress,

    #[error("Раздача не активна")]
    NoActiveHand,

    #[error("Действие недопустимо в фазе {0:?}")]
    WrongPhase(Phase),

    #[error("Сейчас не ход места {0}")]
    NotYourTurn(SeatIndex),

    #[error("Место {0} не участвует в раздаче или уже не может действовать")]
    SeatNotInHand(SeatIndex),

    #[error("Недопустимое действие в текущем состоянии раздачи")]
    IllegalAction,

    #[error("Недостаточно фишек для этой ставки")]
    NotEnoughChips,

    #[error("Рейз до {total} меньше минимального {min_total}")]
    RaiseTooSmall { total: Chips, min_total: Chips },

    #[error("Невозможно выполнить check – нужно хотя бы уравнять ставку")]
    CannotCheck,

    #[error("Невозможно выполнить call – нет ставки для уравнивания")]
    CannotCall,

    #[error("Не удалось получить энтропию для сида: {0}")]
    IntegritySeed(String),

    #[error("Нарушен баланс фишек: ожидали {expected}, получили {actual}")]
    IntegrityConservation { expected: Chips, actual: Chips },

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}

impl EngineError {
    /// Ошибка целостности: раздачу нельзя продолжать и нельзя молча повторять.
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            EngineError::IntegritySeed(_)
                | EngineError::IntegrityConservation { .. }
                | EngineError::Internal(_)
        )
    }
}

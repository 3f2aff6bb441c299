use serde::{Deserialize, Serialize};

use crate::domain::TableId;
use crate::engine::EngineError;

/// Стабильный код ошибки для клиента.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    TableNotFound,
    TableClosed,
    InvalidConfig,
    InvalidSeat,
    SeatTaken,
    TableFull,
    AlreadySeated,
    BuyInOutOfRange,
    NotAtTable,
    NotEnoughPlayers,
    HandInProgress,
    NoActiveHand,
    WrongPhase,
    NotYourTurn,
    SeatNotInHand,
    IllegalAction,
    InsufficientStack,
    RaiseTooSmall,
    CannotCheck,
    CannotCall,
    HandVoided,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::TableNotFound => "TABLE_NOT_FOUND",
            ErrorCode::TableClosed => "TABLE_CLOSED",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::InvalidSeat => "INVALID_SEAT",
            ErrorCode::SeatTaken => "SEAT_TAKEN",
            ErrorCode::TableFull => "TABLE_FULL",
            ErrorCode::AlreadySeated => "ALREADY_SEATED",
            ErrorCode::BuyInOutOfRange => "BUY_IN_OUT_OF_RANGE",
            ErrorCode::NotAtTable => "NOT_AT_TABLE",
            ErrorCode::NotEnoughPlayers => "NOT_ENOUGH_PLAYERS",
            ErrorCode::HandInProgress => "HAND_IN_PROGRESS",
            ErrorCode::NoActiveHand => "NO_ACTIVE_HAND",
            ErrorCode::WrongPhase => "WRONG_PHASE",
            ErrorCode::NotYourTurn => "NOT_YOUR_TURN",
            ErrorCode::SeatNotInHand => "SEAT_NOT_IN_HAND",
            ErrorCode::IllegalAction => "ILLEGAL_ACTION",
            ErrorCode::InsufficientStack => "INSUFFICIENT_STACK",
            ErrorCode::RaiseTooSmall => "RAISE_TOO_SMALL",
            ErrorCode::CannotCheck => "CANNOT_CHECK",
            ErrorCode::CannotCall => "CANNOT_CALL",
            ErrorCode::HandVoided => "HAND_VOIDED",
        }
    }
}

/// Ошибка, которую видит клиент: код + сообщение.
/// Отправляется только соединению, приславшему запрос.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

/// Общий текст для аннулированной раздачи; детали — только в логах.
pub const HAND_VOIDED_NOTICE: &str = "hand voided, stacks restored";

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn table_not_found(table_id: TableId) -> Self {
        Self::new(ErrorCode::TableNotFound, format!("стол {table_id} не найден"))
    }

    pub fn table_closed(table_id: TableId) -> Self {
        Self::new(ErrorCode::TableClosed, format!("стол {table_id} закрыт"))
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        let code = match &err {
            EngineError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            EngineError::InvalidSeat(_) => ErrorCode::InvalidSeat,
            EngineError::SeatTaken(_) => ErrorCode::SeatTaken,
            EngineError::TableFull => ErrorCode::TableFull,
            EngineError::AlreadySeated(_) => ErrorCode::AlreadySeated,
            EngineError::BuyInOutOfRange { .. } => ErrorCode::BuyInOutOfRange,
            EngineError::PlayerNotAtTable(_) => ErrorCode::NotAtTable,
            EngineError::NotEnoughPlayers => ErrorCode::NotEnoughPlayers,
            EngineError::HandAlreadyInProgress => ErrorCode::HandInProgress,
            EngineError::NoActiveHand => ErrorCode::NoActiveHand,
            EngineError::WrongPhase(_) => ErrorCode::WrongPhase,
            EngineError::NotYourTurn(_) => ErrorCode::NotYourTurn,
            EngineError::SeatNotInHand(_) => ErrorCode::SeatNotInHand,
            EngineError::IllegalAction => ErrorCode::IllegalAction,
            EngineError::NotEnoughChips => ErrorCode::InsufficientStack,
            EngineError::RaiseTooSmall { .. } => ErrorCode::RaiseTooSmall,
            EngineError::CannotCheck => ErrorCode::CannotCheck,
            EngineError::CannotCall => ErrorCode::CannotCall,
            EngineError::IntegritySeed(_)
            | EngineError::IntegrityConservation { .. }
            | EngineError::Internal(_) => ErrorCode::HandVoided,
        };
        let message = if err.is_integrity() {
            HAND_VOIDED_NOTICE.to_string()
        } else {
            err.to_string()
        };
        Self { code, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Chips;

    #[test]
    fn integrity_details_stay_internal() {
        let api: ApiError = EngineError::IntegrityConservation {
            expected: Chips(10),
            actual: Chips(9),
        }
        .into();
        assert_eq!(api.code, ErrorCode::HandVoided);
        assert_eq!(api.message, HAND_VOIDED_NOTICE);
    }

    #[test]
    fn codes_serialize_screaming() {
        let json = serde_json::to_string(&ErrorCode::CannotCall).unwrap();
        assert_eq!(json, format!("\"{}\"", ErrorCode::CannotCall.as_str()));
    }
}

//! Покерный движок: ставки, переход улиц, сайд-поты, шоудаун.
//!
//! Высокоуровневые объекты: `HandEngine` (одна раздача) и
//! `TableRuntime` (стол между раздачами).
//! Основные операции:
//!   - `start_hand` – запустить новую раздачу
//!   - `apply_action` – применить действие игрока
//!   - `advance_if_needed` – авто-переход улиц/завершение раздачи
//!   - `advance_or_void` – то же сразу после старта, с откатом при ошибке

pub mod actions;
pub mod betting;
pub mod errors;
pub mod game_loop;
pub mod hand_history;
pub mod positions;
pub mod pot;
pub mod settlement;
pub mod side_pots;
pub mod table_runtime;
pub mod validation;

pub use actions::{ActionSource, PlayerAction, PlayerActionKind};
pub use errors::EngineError;
pub use game_loop::{
    advance_if_needed, advance_or_void, apply_action, apply_timeout, chips_in_play,
    forfeit_seat, start_hand, void_hand, HandEngine, HandOutcome, HandSeat, HandStatus, HandVoided, RevealedHand,
};
pub use hand_history::{ActionKind, ActionLog, ActionLogEntry};
pub use pot::Pot;
pub use settlement::PotAward;
pub use side_pots::{compute_side_pots, Contribution, SidePot};
pub use table_runtime::{TableEvent, TableRuntime, TurnInfo};

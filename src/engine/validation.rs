use crate::domain::chips::Chips;
use crate::domain::player::PlayerStatus;
use crate::domain::table::SeatIndex;
use crate::engine::actions::PlayerActionKind;
use crate::engine::betting::BettingState;
use crate::engine::errors::EngineError;
use crate::engine::game_loop::HandSeat;
use crate::engine::hand_history::ActionKind;

/// Проверенное действие: сколько фишек уходит в банк и какой станет ставка игрока.
///
/// Валидация ничего не меняет — применение делает game_loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedAction {
    pub kind: ActionKind,
    /// Фишки, которые действие переносит из стека в банк.
    pub chips_in: Chips,
    /// Ставка игрока за раунд после действия.
    pub new_total: Chips,
    /// После действия у игрока не осталось фишек.
    pub all_in: bool,
}

/// Проверка, может ли игрок выполнить это действие при текущем состоянии ставок.
pub fn validate_action(
    index: SeatIndex,
    seat: &HandSeat,
    stack: Chips,
    action: &PlayerActionKind,
    betting: &BettingState,
) -> Result<ResolvedAction, EngineError> {
    if seat.status != PlayerStatus::Active {
        return Err(EngineError::IllegalAction);
    }

    let committed = seat.committed_round;
    let to_call = diff_to_call(committed, betting);

    match action {
        PlayerActionKind::Fold => Ok(ResolvedAction {
            kind: ActionKind::Fold,
            chips_in: Chips::ZERO,
            new_total: committed,
            all_in: false,
        }),

        PlayerActionKind::Check => {
            if committed == betting.current_bet {
                Ok(ResolvedAction {
                    kind: ActionKind::Check,
                    chips_in: Chips::ZERO,
                    new_total: committed,
                    all_in: false,
                })
            } else {
                Err(EngineError::CannotCheck)
            }
        }

        PlayerActionKind::Call => {
            if to_call.is_zero() {
                return Err(EngineError::CannotCall);
            }
            if stack <= to_call {
                // Колл на весь стек превращается в олл-ин.
                return all_in(committed, stack);
            }
            Ok(ResolvedAction {
                kind: ActionKind::Call,
                chips_in: to_call,
                new_total: committed + to_call,
                all_in: false,
            })
        }

        PlayerActionKind::Raise(total) => {
            let total = *total;
            if !betting.may_raise(index) {
                return Err(EngineError::IllegalAction);
            }
            if total <= betting.current_bet {
                return Err(EngineError::IllegalAction);
            }
            let needed = total.saturating_sub(committed);
            if needed > stack {
                return Err(EngineError::NotEnoughChips);
            }
            if needed == stack {
                // Рейз на весь стек = олл-ин, в т.ч. меньше минимального.
                return all_in(committed, stack);
            }
            let min_total = betting.min_raise_total();
            if total < min_total {
                return Err(EngineError::RaiseTooSmall { total, min_total });
            }
            Ok(ResolvedAction {
                kind: ActionKind::Raise,
                chips_in: needed,
                new_total: total,
                all_in: false,
            })
        }

        PlayerActionKind::AllIn => {
            if stack.is_zero() {
                return Err(EngineError::IllegalAction);
            }
            // После короткого олл-ина олл-ин допустим только как колл.
            if stack > to_call && !betting.may_raise(index) {
                return Err(EngineError::IllegalAction);
            }
            all_in(committed, stack)
        }
    }
}

fn all_in(committed: Chips, stack: Chips) -> Result<ResolvedAction, EngineError> {
    Ok(ResolvedAction {
        kind: ActionKind::AllIn,
        chips_in: stack,
        new_total: committed + stack,
        all_in: true,
    })
}

/// Сколько фишек нужно добавить игроку, чтобы уравнять текущую ставку.
pub fn diff_to_call(committed: Chips, betting: &BettingState) -> Chips {
    betting.current_bet.saturating_sub(committed)
}

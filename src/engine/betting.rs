use serde::{Deserialize, Serialize};

use crate::domain::{Chips, Phase, SeatIndex};

/// Состояние раунда ставок (на конкретной улице).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BettingState {
    /// Текущая целевая ставка, до которой должны дотянуться игроки.
    /// В пределах раунда только растёт.
    pub current_bet: Chips,
    /// Минимальный размер повышающей части рейза.
    pub min_raise: Chips,
    /// Улица, к которой относится этот раунд.
    pub phase: Phase,
    /// Очередь ходящих (по кругу), кто ещё должен сделать действие на этой улице.
    pub to_act: Vec<SeatIndex>,
    /// Места, которым после короткого олл-ина осталось только уравнять
    /// или сбросить: право на рейз у них уже использовано.
    #[serde(default)]
    pub call_only: Vec<SeatIndex>,
}

/// Как действие повлияло на уровень ставки.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BetLevelChange {
    /// Ставка не выросла (check/call/fold/all-in на колл или меньше).
    None,
    /// Полный рейз: торговля переоткрывается для всех.
    FullRaise,
    /// Олл-ин меньше минимального рейза: ставка выросла, уже походившие
    /// игроки должны доуравнять, но рейзить не могут.
    ShortAllIn,
}

impl BettingState {
    pub fn new(phase: Phase, current_bet: Chips, min_raise: Chips, to_act: Vec<SeatIndex>) -> Self {
        Self {
            current_bet,
            min_raise,
            phase,
            to_act,
            call_only: Vec::new(),
        }
    }

    /// Следующий, кто должен ходить.
    pub fn next_to_act(&self) -> Option<SeatIndex> {
        self.to_act.first().copied()
    }

    /// Удалить seat из очереди to_act, если он там есть.
    pub fn mark_acted(&mut self, seat: SeatIndex) {
        self.to_act.retain(|s| *s != seat);
        self.call_only.retain(|s| *s != seat);
    }

    /// Может ли место повышать ставку в этом раунде.
    pub fn may_raise(&self, seat: SeatIndex) -> bool {
        !self.call_only.contains(&seat)
    }

    /// Минимальная сумма «рейза до» для следующего рейза.
    pub fn min_raise_total(&self) -> Chips {
        self.current_bet + self.min_raise
    }

    /// Классифицировать новую ставку `new_total` (сумма за раунд) игрока.
    pub fn classify(&self, new_total: Chips) -> BetLevelChange {
        if new_total <= self.current_bet {
            return BetLevelChange::None;
        }
        let increment = new_total.saturating_sub(self.current_bet);
        if increment >= self.min_raise {
            BetLevelChange::FullRaise
        } else {
            BetLevelChange::ShortAllIn
        }
    }

    /// Полный рейз: новый current_bet, новый min_raise, новая очередь.
    pub fn on_full_raise(&mut self, new_total: Chips, new_to_act: Vec<SeatIndex>) {
        let increment = new_total.saturating_sub(self.current_bet);
        self.current_bet = new_total;
        self.min_raise = increment;
        self.to_act = new_to_act;
        self.call_only.clear();
    }

    /// Короткий олл-ин: поднимаем current_bet, min_raise не трогаем.
    ///
    /// `new_to_act` — прежняя очередь плюс недоуравнявшие места
    /// (по кругу после `seat`). Из них те, кого в очереди не было,
    /// получают только call/fold.
    pub fn on_short_all_in(&mut self, seat: SeatIndex, new_total: Chips, new_to_act: Vec<SeatIndex>) {
        self.current_bet = new_total;
        self.mark_acted(seat);
        for &s in &new_to_act {
            if !self.to_act.contains(&s) && !self.call_only.contains(&s) {
                self.call_only.push(s);
            }
        }
        self.to_act = new_to_act;
    }

    /// Раунд завершён, когда очередь пуста.
    pub fn is_round_complete(&self) -> bool {
        self.to_act.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_distinguishes_full_and_short_raises() {
        let b = BettingState::new(Phase::Preflop, Chips(100), Chips(100), vec![0, 1, 2]);
        assert_eq!(b.classify(Chips(100)), BetLevelChange::None);
        assert_eq!(b.classify(Chips(150)), BetLevelChange::ShortAllIn);
        assert_eq!(b.classify(Chips(200)), BetLevelChange::FullRaise);
    }

    #[test]
    fn short_all_in_requeues_callers_without_raise_rights() {
        // Место 1 уже уравняло 100, место 3 ещё не ходило.
        let mut b = BettingState::new(Phase::Flop, Chips(100), Chips(100), vec![2, 3]);
        b.on_short_all_in(2, Chips(150), vec![3, 1]);
        assert_eq!(b.current_bet, Chips(150));
        assert_eq!(b.min_raise, Chips(100));
        assert_eq!(b.to_act, vec![3, 1]);
        assert!(b.may_raise(3));
        assert!(!b.may_raise(1));

        b.mark_acted(1);
        assert!(b.may_raise(1));
    }

    #[test]
    fn full_raise_restores_raise_rights() {
        let mut b = BettingState::new(Phase::Flop, Chips(100), Chips(100), vec![2]);
        b.on_short_all_in(2, Chips(150), vec![0]);
        assert!(!b.may_raise(0));
        b.on_full_raise(Chips(300), vec![0]);
        assert!(b.may_raise(0));
    }
}

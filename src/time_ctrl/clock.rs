// src/time_ctrl/clock.rs
//! Таймер хода: один на стол, привязан к конкретному ходу.

use serde::{Deserialize, Serialize};

use crate::domain::table::SeatIndex;
use crate::domain::HandId;

use super::TimeRules;

/// Взведённый дедлайн хода.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnDeadline {
    pub hand_id: HandId,
    /// Номер хода внутри раздачи.
    pub turn_seq: u64,
    pub seat: SeatIndex,
    pub deadline_ms: u64,
}

/// Результат проверки таймера.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeoutState {
    /// Время ещё не вышло.
    Ongoing,
    /// Дедлайн прошёл — надо авто-check/авто-fold.
    TimedOut(TurnDeadline),
    /// Таймер не взведён.
    NoActivePlayer,
}

/// Таймер хода. Новый `arm` всегда отменяет предыдущий.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TurnClock {
    armed: Option<TurnDeadline>,
}

impl TurnClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(
        &mut self,
        hand_id: HandId,
        turn_seq: u64,
        seat: SeatIndex,
        now_ms: u64,
        rules: &TimeRules,
    ) -> TurnDeadline {
        let deadline = TurnDeadline {
            hand_id,
            turn_seq,
            seat,
            deadline_ms: now_ms + rules.turn_timeout_ms,
        };
        self.armed = Some(deadline);
        deadline
    }

    /// Привести таймер к текущему ходу раздачи.
    ///
    /// Тот же (hand_id, turn_seq) — дедлайн не трогаем, иначе взводим заново.
    /// Возвращает Some только при новом взводе.
    pub fn sync(
        &mut self,
        hand_id: HandId,
        turn_seq: u64,
        actor: Option<SeatIndex>,
        now_ms: u64,
        rules: &TimeRules,
    ) -> Option<TurnDeadline> {
        let Some(seat) = actor else {
            self.cancel();
            return None;
        };
        match self.armed {
            Some(d) if d.hand_id == hand_id && d.turn_seq == turn_seq => None,
            _ => Some(self.arm(hand_id, turn_seq, seat, now_ms, rules)),
        }
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn current(&self) -> Option<TurnDeadline> {
        self.armed
    }

    pub fn poll(&self, now_ms: u64) -> TimeoutState {
        match self.armed {
            None => TimeoutState::NoActivePlayer,
            Some(d) if now_ms >= d.deadline_ms => TimeoutState::TimedOut(d),
            Some(_) => TimeoutState::Ongoing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rearming_same_turn_keeps_deadline() {
        let rules = TimeRules::new(30, 5, 120);
        let mut clock = TurnClock::new();
        let first = clock.sync(1, 1, Some(2), 1_000, &rules);
        assert_eq!(first.map(|d| d.deadline_ms), Some(31_000));
        assert_eq!(clock.sync(1, 1, Some(2), 20_000, &rules), None);
        assert_eq!(clock.poll(30_999), TimeoutState::Ongoing);
        assert!(matches!(clock.poll(31_000), TimeoutState::TimedOut(_)));
    }

    #[test]
    fn new_turn_replaces_pending_deadline() {
        let rules = TimeRules::new(10, 5, 120);
        let mut clock = TurnClock::new();
        clock.sync(1, 1, Some(0), 0, &rules);
        let next = clock.sync(1, 2, Some(1), 4_000, &rules);
        assert_eq!(next.map(|d| (d.seat, d.deadline_ms)), Some((1, 14_000)));
        clock.sync(1, 3, None, 5_000, &rules);
        assert_eq!(clock.poll(100_000), TimeoutState::NoActivePlayer);
    }
}

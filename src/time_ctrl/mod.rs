// src/time_ctrl/mod.rs
//! Контроль времени стола.
//!
//! Здесь собираем:
//! - правила (`TimeRules`);
//! - таймер хода (`TurnClock`);
//! - окно переподключения (`ReconnectTracker`);
//! - отсчёт перед раздачей;
//! - фасад `TimeController`, которым пользуется рантайм стола.

pub mod clock;
pub mod reconnect;
pub mod time_rules;

pub use clock::{TimeoutState, TurnClock, TurnDeadline};
pub use reconnect::{ReconnectOutcome, ReconnectTracker};
pub use time_rules::TimeRules;

use crate::domain::PlayerId;

/// Какое авто-действие нужно сделать по времени.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutoActionDecision {
    /// Время не вышло — действий со стороны движка не требуется.
    None,
    /// Время хода истекло — AUTO CHECK / AUTO FOLD
    /// в зависимости от состояния раздачи (это уже решает движок).
    TimeoutCheckOrFold(TurnDeadline),
}

/// Высокоуровневый контроллер времени для стола.
#[derive(Clone, Debug)]
pub struct TimeController {
    pub rules: TimeRules,
    pub clock: TurnClock,
    pub reconnect: ReconnectTracker,
    countdown_until: Option<u64>,
}

impl TimeController {
    pub fn new(rules: TimeRules) -> Self {
        Self {
            rules,
            clock: TurnClock::new(),
            reconnect: ReconnectTracker::new(),
            countdown_until: None,
        }
    }

    /// Запустить отсчёт, если он ещё не идёт. Возвращает момент старта раздачи.
    pub fn start_countdown(&mut self, now_ms: u64) -> u64 {
        *self
            .countdown_until
            .get_or_insert(now_ms + self.rules.countdown_ms)
    }

    pub fn cancel_countdown(&mut self) {
        self.countdown_until = None;
    }

    pub fn countdown_deadline(&self) -> Option<u64> {
        self.countdown_until
    }

    /// Отсчёт закончился: сбрасываем его и сообщаем true.
    pub fn take_countdown_elapsed(&mut self, now_ms: u64) -> bool {
        match self.countdown_until {
            Some(at) if now_ms >= at => {
                self.countdown_until = None;
                true
            }
            _ => false,
        }
    }

    /// Проверить таймер хода.
    pub fn on_time_passed(&self, now_ms: u64) -> AutoActionDecision {
        match self.clock.poll(now_ms) {
            TimeoutState::TimedOut(deadline) => AutoActionDecision::TimeoutCheckOrFold(deadline),
            TimeoutState::Ongoing | TimeoutState::NoActivePlayer => AutoActionDecision::None,
        }
    }

    pub fn expired_reconnects(&mut self, now_ms: u64) -> Vec<PlayerId> {
        self.reconnect.take_expired(now_ms)
    }

    /// Ближайший момент, когда столу нужно проснуться.
    pub fn next_wakeup(&self) -> Option<u64> {
        [
            self.clock.current().map(|d| d.deadline_ms),
            self.countdown_until,
            self.reconnect.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Закрытие стола: все таймеры отменяются.
    pub fn cancel_all(&mut self) {
        self.clock.cancel();
        self.countdown_until = None;
        self.reconnect = ReconnectTracker::new();
    }
}

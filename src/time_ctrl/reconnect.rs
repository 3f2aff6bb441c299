//! Окно переподключения.
//!
//! Отключившийся игрок ничего не теряет: стек, карты и статус в раздаче
//! остаются как есть, таймер хода идёт полностью. Если окно истекло,
//! место уходит в sitting out со следующей раздачи.

use std::collections::{HashMap, HashSet};

use crate::domain::PlayerId;

use super::TimeRules;

/// Что произошло при возвращении игрока.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconnectOutcome {
    /// Вернулся в пределах окна.
    Resumed,
    /// Окно уже истекло: соединение восстановлено, но sitting out остаётся.
    ResumedAfterGrace,
    /// Игрок и не был отключён.
    NotDisconnected,
}

#[derive(Clone, Debug, Default)]
pub struct ReconnectTracker {
    /// Игрок → момент окончания окна (unix ms).
    pending: HashMap<PlayerId, u64>,
    lapsed: HashSet<PlayerId>,
}

impl ReconnectTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Начать окно. Повторное отключение окно не продлевает.
    pub fn on_disconnect(&mut self, player_id: PlayerId, now_ms: u64, rules: &TimeRules) -> u64 {
        self.lapsed.remove(&player_id);
        *self
            .pending
            .entry(player_id)
            .or_insert(now_ms + rules.reconnect_grace_ms)
    }

    pub fn on_reconnect(&mut self, player_id: PlayerId) -> ReconnectOutcome {
        if self.pending.remove(&player_id).is_some() {
            ReconnectOutcome::Resumed
        } else if self.lapsed.remove(&player_id) {
            ReconnectOutcome::ResumedAfterGrace
        } else {
            ReconnectOutcome::NotDisconnected
        }
    }

    /// Забрать игроков, у которых окно истекло к `now_ms`.
    pub fn take_expired(&mut self, now_ms: u64) -> Vec<PlayerId> {
        let mut expired: Vec<PlayerId> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now_ms)
            .map(|(player, _)| *player)
            .collect();
        expired.sort_unstable();
        for player in &expired {
            self.pending.remove(player);
            self.lapsed.insert(*player);
        }
        expired
    }

    /// Игрок ушёл из-за стола: больше не отслеживаем.
    pub fn forget(&mut self, player_id: PlayerId) {
        self.pending.remove(&player_id);
        self.lapsed.remove(&player_id);
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.values().min().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_expiry_and_late_resume() {
        let rules = TimeRules::new(30, 5, 120);
        let mut t = ReconnectTracker::new();
        assert_eq!(t.on_disconnect(7, 1_000, &rules), 121_000);
        assert!(t.take_expired(120_999).is_empty());
        assert_eq!(t.take_expired(121_000), vec![7]);
        assert_eq!(t.on_reconnect(7), ReconnectOutcome::ResumedAfterGrace);
        assert_eq!(t.on_reconnect(7), ReconnectOutcome::NotDisconnected);
    }

    #[test]
    fn resume_inside_window() {
        let rules = TimeRules::new(30, 5, 120);
        let mut t = ReconnectTracker::new();
        t.on_disconnect(3, 0, &rules);
        assert_eq!(t.on_reconnect(3), ReconnectOutcome::Resumed);
        assert_eq!(t.next_deadline(), None);
    }
}

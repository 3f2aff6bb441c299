// src/time_ctrl/time_rules.rs
//! Конфигурация тайминга стола.
//!
//! Здесь описываем только "правила", без состояния. Всё в миллисекундах.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::domain::table::TableConfig;

/// Правила тайминга для одного стола.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeRules {
    /// Сколько даётся на каждый ход.
    pub turn_timeout_ms: u64,
    /// Пауза между набором игроков и стартом раздачи.
    pub countdown_ms: u64,
    /// Сколько ждём отключившегося игрока, прежде чем посадить его в sitting out.
    pub reconnect_grace_ms: u64,
}

impl TimeRules {
    pub const fn new(turn_timeout_secs: u64, countdown_secs: u64, reconnect_grace_secs: u64) -> Self {
        Self {
            turn_timeout_ms: turn_timeout_secs * 1000,
            countdown_ms: countdown_secs * 1000,
            reconnect_grace_ms: reconnect_grace_secs * 1000,
        }
    }

    /// 30 сек на ход, 5 сек отсчёт, 2 минуты на переподключение.
    pub const fn standard() -> Self {
        Self::new(30, 5, 120)
    }

    /// Таймаут хода из конфига стола, остальное — из конфига движка.
    pub fn for_table(table: &TableConfig, engine: &EngineConfig) -> Self {
        Self::new(
            table.turn_timeout_secs as u64,
            engine.countdown_secs,
            engine.reconnect_grace_secs,
        )
    }
}

impl Default for TimeRules {
    fn default() -> Self {
        Self::standard()
    }
}

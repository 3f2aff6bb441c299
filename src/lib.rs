//! Авторитетный серверный движок стола Texas Hold'em.
//!
//! Слои снизу вверх: `domain` → `engine` (раздача и стол) →
//! `api` (намерения, сообщения, проекции) → `server` (актор на стол,
//! лобби, сессии). `infra` и `time_ctrl` — сиды, архив, логи, таймеры.

pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
pub mod server;
pub mod time_ctrl;

pub use config::{ConfigError, EngineConfig};

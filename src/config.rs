//! Конфигурация процесса (общая для всех столов).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("не удалось прочитать конфиг {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("некорректный JSON конфига: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("некорректное значение {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Настройки движка. Все поля необязательны в JSON.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Пауза перед стартом раздачи, когда набралось 2+ игрока.
    pub countdown_secs: u64,
    /// Окно переподключения.
    pub reconnect_grace_secs: u64,
    /// Ёмкость очереди команд одного стола.
    pub inbox_capacity: usize,
    /// Файл архива раздач (JSON lines). None — архив только в памяти.
    pub archive_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            countdown_secs: 5,
            reconnect_grace_secs: 120,
            inbox_capacity: 256,
            archive_path: None,
        }
    }
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: EngineConfig = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inbox_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "inbox_capacity",
                reason: "должно быть > 0".into(),
            });
        }
        if self.reconnect_grace_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "reconnect_grace_secs",
                reason: "должно быть > 0".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg = EngineConfig::from_json_str(r#"{ "countdown_secs": 2 }"#).unwrap();
        assert_eq!(cfg.countdown_secs, 2);
        assert_eq!(cfg.reconnect_grace_secs, 120);
        assert_eq!(cfg.inbox_capacity, 256);
        assert!(cfg.archive_path.is_none());
    }

    #[test]
    fn zero_inbox_is_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "inbox_capacity": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "inbox_capacity", .. }));
    }
}

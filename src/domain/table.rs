use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::player::SeatedPlayer;
use crate::domain::{PlayerId, TableId, MAX_SEATS};
use crate::engine::errors::EngineError;

/// Индекс места за столом (0..max_seats-1).
pub type SeatIndex = u8;

/// Конфиг стола: блайнды, лимиты бай-ина, число мест, таймаут хода.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    /// Имя стола (для лобби).
    pub name: String,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub min_buy_in: Chips,
    pub max_buy_in: Chips,
    /// Количество мест (2..=6).
    pub max_seats: u8,
    /// Сколько секунд даётся на ход.
    pub turn_timeout_secs: u32,
    /// Идентификатор валюты/токена, в минимальных единицах которого считаются фишки.
    pub currency: String,
}

impl TableConfig {
    /// Стандартный 6-max стол.
    pub fn six_max(name: impl Into<String>, small_blind: u64, big_blind: u64) -> Self {
        Self {
            name: name.into(),
            small_blind: Chips(small_blind),
            big_blind: Chips(big_blind),
            min_buy_in: Chips(big_blind * 20),
            max_buy_in: Chips(big_blind * 200),
            max_seats: MAX_SEATS as u8,
            turn_timeout_secs: 30,
            currency: "CHIP".to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.small_blind.is_zero() {
            return Err(invalid("small_blind = 0"));
        }
        if self.big_blind < self.small_blind {
            return Err(invalid(format!(
                "big_blind ({}) < small_blind ({})",
                self.big_blind, self.small_blind
            )));
        }
        if self.min_buy_in > self.max_buy_in {
            return Err(invalid(format!(
                "min_buy_in ({}) > max_buy_in ({})",
                self.min_buy_in, self.max_buy_in
            )));
        }
        if self.min_buy_in < self.big_blind {
            return Err(invalid("min_buy_in < big_blind"));
        }
        if !(2..=MAX_SEATS as u8).contains(&self.max_seats) {
            return Err(invalid(format!(
                "max_seats = {}, expected 2..={}",
                self.max_seats, MAX_SEATS
            )));
        }
        if self.turn_timeout_secs == 0 {
            return Err(invalid("turn_timeout_secs = 0"));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> EngineError {
    EngineError::InvalidConfig(reason.into())
}

/// Основное состояние стола между раздачами.
///
/// Стеки меняются только через расчёт раздачи и бай-ин/кэш-аут.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub config: TableConfig,
    /// Места за столом: индекс вектора = SeatIndex. None – место пустое.
    pub seats: Vec<Option<SeatedPlayer>>,
    /// Кнопка прошлой раздачи (None до первой раздачи).
    pub dealer_button: Option<SeatIndex>,
    /// Фаза стола, пока раздачи нет (`Waiting` / `Countdown`).
    pub phase: Phase,
    pub hands_played: u64,
}

impl Table {
    /// Создать пустой стол с заданной конфигурацией.
    pub fn new(id: TableId, config: TableConfig) -> Self {
        let seats = vec![None; config.max_seats as usize];
        Self {
            id,
            config,
            seats,
            dealer_button: None,
            phase: Phase::Waiting,
            hands_played: 0,
        }
    }

    pub fn max_seats(&self) -> u8 {
        self.config.max_seats
    }

    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_seat_empty(&self, index: SeatIndex) -> bool {
        self.seats
            .get(index as usize)
            .map(|s| s.is_none())
            .unwrap_or(false)
    }

    pub fn seat(&self, index: SeatIndex) -> Option<&SeatedPlayer> {
        self.seats.get(index as usize).and_then(|s| s.as_ref())
    }

    pub fn seat_mut(&mut self, index: SeatIndex) -> Option<&mut SeatedPlayer> {
        self.seats.get_mut(index as usize).and_then(|s| s.as_mut())
    }

    /// Место, где сидит игрок.
    pub fn seat_of(&self, player_id: PlayerId) -> Option<SeatIndex> {
        self.seats.iter().position(|s| {
            s.as_ref()
                .map(|p| p.player_id == player_id)
                .unwrap_or(false)
        })
        .map(|idx| idx as SeatIndex)
    }

    pub fn first_empty_seat(&self) -> Option<SeatIndex> {
        self.seats
            .iter()
            .position(|s| s.is_none())
            .map(|idx| idx as SeatIndex)
    }

    /// Места, которые могут участвовать в следующей раздаче.
    pub fn eligible_seats(&self) -> Vec<SeatIndex> {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(idx, s)| match s {
                Some(p) if p.is_eligible_for_hand() => Some(idx as SeatIndex),
                _ => None,
            })
            .collect()
    }

    /// Сумма стеков всех сидящих игроков.
    pub fn total_stacks(&self) -> Chips {
        self.seats.iter().flatten().map(|p| p.stack).sum()
    }
}

use serde::{Deserialize, Serialize};

/// Фаза стола/раздачи.
///
/// `Waiting` и `Countdown` — стол без активной раздачи,
/// `Preflop..River` — раунды ставок, `Showdown` — вскрытие и расчёт.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Waiting,
    Countdown,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Phase {
    /// Идёт ли в этой фазе раунд ставок.
    pub fn is_betting(self) -> bool {
        matches!(self, Phase::Preflop | Phase::Flop | Phase::Turn | Phase::River)
    }

    /// Следующая улица и сколько карт борда она открывает.
    pub fn next_street(self) -> Option<(Phase, usize)> {
        match self {
            Phase::Preflop => Some((Phase::Flop, 3)),
            Phase::Flop => Some((Phase::Turn, 1)),
            Phase::Turn => Some((Phase::River, 1)),
            _ => None,
        }
    }
}

/// Сила руки. Больше — сильнее. Сравнивается только на равенство/порядок,
/// внутренняя кодировка принадлежит evaluator'у.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandRank(pub u32);

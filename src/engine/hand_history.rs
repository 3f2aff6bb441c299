use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::{HandId, Phase, PlayerId, SeatIndex};
use crate::engine::actions::ActionSource;

/// Вид записанного действия.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    PostSmallBlind,
    PostBigBlind,
    Fold,
    Check,
    Call,
    Raise,
    AllIn,
}

/// Одна запись журнала действий раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionLogEntry {
    pub hand_id: HandId,
    /// Порядковый номер в раздаче: 0, 1, 2, ... без пропусков.
    pub seq: u32,
    /// Wall-clock, unix ms.
    pub timestamp_ms: u64,
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub kind: ActionKind,
    /// Сколько фишек ушло из стека в банк (0 для fold/check).
    pub amount: Chips,
    /// Ставка игрока за раунд после действия.
    pub round_total: Chips,
    pub phase: Phase,
    pub source: ActionSource,
}

/// Журнал действий раздачи. Только дописывается.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionLog {
    hand_id: HandId,
    entries: Vec<ActionLogEntry>,
}

/// Данные для новой записи (seq и hand_id проставляет журнал).
#[derive(Clone, Copy, Debug)]
pub struct NewEntry {
    pub timestamp_ms: u64,
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub kind: ActionKind,
    pub amount: Chips,
    pub round_total: Chips,
    pub phase: Phase,
    pub source: ActionSource,
}

impl ActionLog {
    pub fn new(hand_id: HandId) -> Self {
        Self {
            hand_id,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, e: NewEntry) -> &ActionLogEntry {
        let seq = self.entries.len() as u32;
        self.entries.push(ActionLogEntry {
            hand_id: self.hand_id,
            seq,
            timestamp_ms: e.timestamp_ms,
            seat: e.seat,
            player_id: e.player_id,
            kind: e.kind,
            amount: e.amount,
            round_total: e.round_total,
            phase: e.phase,
            source: e.source,
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[ActionLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ActionLogEntry> {
        self.entries.last()
    }
}

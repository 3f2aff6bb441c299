use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::table::Table;
use crate::domain::TableId;

/// Строка лобби. Публикуется актором стола, читается без захода в стол.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSummary {
    pub table_id: TableId,
    pub name: String,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub min_buy_in: Chips,
    pub max_buy_in: Chips,
    pub currency: String,
    pub seated: u8,
    pub max_seats: u8,
    pub phase: Phase,
}

pub fn summarize(table: &Table, phase: Phase) -> TableSummary {
    TableSummary {
        table_id: table.id,
        name: table.config.name.clone(),
        small_blind: table.config.small_blind,
        big_blind: table.config.big_blind,
        min_buy_in: table.config.min_buy_in,
        max_buy_in: table.config.max_buy_in,
        currency: table.config.currency.clone(),
        seated: table.seated_count() as u8,
        max_seats: table.config.max_seats,
        phase,
    }
}

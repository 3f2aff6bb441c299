//! Проекция состояния стола для конкретного получателя.
//!
//! Чистая функция: ничего не меняет, вызывается после каждой мутации
//! для каждого подключённого игрока и зрителя.
//!
//! Карманные карты видны только владельцу места, а после перехода
//! в `Showdown` — всем, для не сфолдивших мест. Остальным приходит
//! только факт наличия карт. Стеки и ставки видны всем.

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::player::PlayerStatus;
use crate::domain::table::{SeatIndex, Table};
use crate::domain::{HandId, PlayerId, TableId};
use crate::engine::game_loop::{HandEngine, HandSeat};
use crate::engine::side_pots::SidePot;

/// Кто смотрит на стол.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "seat", rename_all = "snake_case")]
pub enum Viewer {
    Seat(SeatIndex),
    Spectator,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", content = "cards", rename_all = "snake_case")]
pub enum HoleCardsView {
    /// Место не в раздаче.
    None,
    /// Карты есть, но получателю их видеть нельзя.
    Hidden,
    Visible([Card; 2]),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatView {
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub display_name: String,
    pub stack: Chips,
    pub connected: bool,
    pub sitting_out: bool,
    /// None — место не участвует в текущей раздаче.
    pub status: Option<PlayerStatus>,
    pub committed_round: Chips,
    pub committed_total: Chips,
    pub hole_cards: HoleCardsView,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSnapshot {
    /// Версия состояния стола; растёт с каждой мутацией.
    pub version: u64,
    pub table_id: TableId,
    pub name: String,
    pub currency: String,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub max_seats: u8,
    pub phase: Phase,
    pub hand_id: Option<HandId>,
    pub dealer: Option<SeatIndex>,
    pub small_blind_seat: Option<SeatIndex>,
    pub big_blind_seat: Option<SeatIndex>,
    pub board: Vec<Card>,
    pub pot: Chips,
    pub side_pots: Vec<SidePot>,
    pub current_bet: Chips,
    pub min_raise: Chips,
    pub current_actor: Option<SeatIndex>,
    pub turn_deadline_ms: Option<u64>,
    /// Длина = max_seats, None — пустое место.
    pub seats: Vec<Option<SeatView>>,
    pub viewer: Viewer,
}

/// Собрать снапшот для одного получателя.
pub fn project(
    table: &Table,
    hand: Option<&HandEngine>,
    viewer: Viewer,
    version: u64,
    turn_deadline_ms: Option<u64>,
) -> TableSnapshot {
    let seats = table
        .seats
        .iter()
        .enumerate()
        .map(|(idx, slot)| {
            let seat = idx as SeatIndex;
            slot.as_ref().map(|p| {
                // Место могли занять после прошлой раздачи.
                let in_hand = hand
                    .and_then(|h| h.seat(seat))
                    .filter(|hs| hs.player_id == p.player_id);
                SeatView {
                    seat,
                    player_id: p.player_id,
                    display_name: p.display_name.clone(),
                    stack: p.stack,
                    connected: p.connection.is_connected(),
                    sitting_out: p.sitting_out,
                    status: in_hand.map(|hs| hs.status),
                    committed_round: in_hand.map(|hs| hs.committed_round).unwrap_or(Chips::ZERO),
                    committed_total: in_hand.map(|hs| hs.committed_total).unwrap_or(Chips::ZERO),
                    hole_cards: hole_cards_view(hand, seat, in_hand, viewer),
                }
            })
        })
        .collect();

    TableSnapshot {
        version,
        table_id: table.id,
        name: table.config.name.clone(),
        currency: table.config.currency.clone(),
        small_blind: table.config.small_blind,
        big_blind: table.config.big_blind,
        max_seats: table.config.max_seats,
        phase: hand.map(|h| h.phase).unwrap_or(table.phase),
        hand_id: hand.map(|h| h.hand_id),
        dealer: hand.map(|h| h.positions.dealer).or(table.dealer_button),
        small_blind_seat: hand.map(|h| h.positions.small_blind),
        big_blind_seat: hand.map(|h| h.positions.big_blind),
        board: hand.map(|h| h.board.clone()).unwrap_or_default(),
        pot: hand.map(|h| h.pot_total()).unwrap_or(Chips::ZERO),
        side_pots: hand.map(|h| h.side_pots.clone()).unwrap_or_default(),
        current_bet: hand.map(|h| h.betting.current_bet).unwrap_or(Chips::ZERO),
        min_raise: hand.map(|h| h.betting.min_raise).unwrap_or(Chips::ZERO),
        current_actor: hand.and_then(|h| h.current_actor),
        turn_deadline_ms,
        seats,
        viewer,
    }
}

fn hole_cards_view(
    hand: Option<&HandEngine>,
    seat: SeatIndex,
    in_hand: Option<&HandSeat>,
    viewer: Viewer,
) -> HoleCardsView {
    let (Some(hand), Some(hs)) = (hand, in_hand) else {
        return HoleCardsView::None;
    };
    let own = viewer == Viewer::Seat(seat);
    let shown = hand.showdown_reached && hs.status != PlayerStatus::Folded;
    if own || shown {
        HoleCardsView::Visible(hs.hole_cards)
    } else {
        HoleCardsView::Hidden
    }
}

//! Раздача банков по итогам шоудауна.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Chips, HandRank, SeatIndex};
use crate::engine::positions::seats_in_order_after;
use crate::engine::side_pots::SidePot;

/// Выплата одного пота.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotAward {
    /// Номер пота: 0 — основной, дальше сайд-поты по возрастанию уровня.
    pub pot_index: usize,
    pub amount: Chips,
    pub eligible_seats: Vec<SeatIndex>,
    /// Победители и их доли (с учётом нечётных фишек).
    pub shares: Vec<(SeatIndex, Chips)>,
    /// Выигрышная комбинация; None, если пот забрали без сравнения рук.
    pub winning_rank: Option<HandRank>,
}

/// Разделить каждый пот между лучшими руками из его претендентов.
///
/// Пот с одним претендентом отдаётся ему без сравнения рук.
/// При сплите остаток раздаётся по одной фишке, начиная с места
/// сразу после кнопки, по часовой стрелке.
pub fn award_pots(
    pots: &[SidePot],
    ranks: &HashMap<SeatIndex, HandRank>,
    dealer: SeatIndex,
) -> Vec<PotAward> {
    let mut awards = Vec::with_capacity(pots.len());

    for (pot_index, pot) in pots.iter().enumerate() {
        let (winners, winning_rank) = if pot.eligible_seats.len() == 1 {
            (pot.eligible_seats.clone(), None)
        } else {
            best_seats(&pot.eligible_seats, ranks)
        };

        if winners.is_empty() {
            continue;
        }

        awards.push(PotAward {
            pot_index,
            amount: pot.amount,
            eligible_seats: pot.eligible_seats.clone(),
            shares: split_amount(pot.amount, &winners, dealer),
            winning_rank,
        });
    }

    awards
}

/// Места с лучшей рукой среди `eligible`.
fn best_seats(
    eligible: &[SeatIndex],
    ranks: &HashMap<SeatIndex, HandRank>,
) -> (Vec<SeatIndex>, Option<HandRank>) {
    let best = eligible.iter().filter_map(|s| ranks.get(s)).max().copied();
    match best {
        Some(best) => {
            let winners = eligible
                .iter()
                .copied()
                .filter(|s| ranks.get(s) == Some(&best))
                .collect();
            (winners, Some(best))
        }
        None => (Vec::new(), None),
    }
}

/// Поровну между победителями, нечётные фишки — по часовой от кнопки.
pub fn split_amount(amount: Chips, winners: &[SeatIndex], dealer: SeatIndex) -> Vec<(SeatIndex, Chips)> {
    if winners.is_empty() {
        return Vec::new();
    }
    let ordered = seats_in_order_after(winners, dealer);
    let n = ordered.len() as u64;
    let share = amount.0 / n;
    let mut remainder = amount.0 % n;

    ordered
        .into_iter()
        .map(|seat| {
            let mut prize = share;
            if remainder > 0 {
                prize += 1;
                remainder -= 1;
            }
            (seat, Chips(prize))
        })
        .collect()
}

use serde::{Deserialize, Serialize};

use crate::domain::{chips::Chips, SeatIndex};

/// Сайд-пот: часть банка, в которую участвуют только некоторые игроки.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidePot {
    pub amount: Chips,
    /// Кто может выиграть этот пот. Никогда не пустой.
    pub eligible_seats: Vec<SeatIndex>,
}

/// Вклад одного места в раздачу.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contribution {
    pub seat: SeatIndex,
    /// Сколько суммарно фишек внёс игрок (во всех улицах).
    pub amount: Chips,
    pub folded: bool,
    pub all_in: bool,
}

/// Посчитать сайд-поты из сумм, которые внесли игроки.
///
/// Уровни — различные суммы вкладов не сфолдивших игроков (по возрастанию)
/// плюс максимальный вклад за столом. Обычно это суммы олл-инов и
/// общая ставка тех, кто дошёл до конца. Пот уровня L собирает с каждого
/// игрока `min(вклад, L) - min(вклад, предыдущий L)`, поэтому сумма потов
/// всегда равна сумме вкладов, включая фишки сфолдивших.
///
/// Претенденты на пот — не сфолдившие игроки, чей вклад дотягивает до уровня.
/// Если таких нет (все на этом уровне сфолдили), фишки уровня уходят
/// в предыдущий пот, а без предыдущего — всем не сфолдившим.
pub fn compute_side_pots(contributions: &[Contribution]) -> Vec<SidePot> {
    let mut levels: Vec<Chips> = contributions
        .iter()
        .filter(|c| !c.folded && !c.amount.is_zero())
        .map(|c| c.amount)
        .collect();

    if let Some(max) = contributions.iter().map(|c| c.amount).max() {
        if !max.is_zero() {
            levels.push(max);
        }
    }

    levels.sort_unstable();
    levels.dedup();

    let mut pots: Vec<SidePot> = Vec::new();
    let mut carry = Chips::ZERO;
    let mut prev_level = Chips::ZERO;

    for level in levels {
        let amount: Chips = contributions
            .iter()
            .map(|c| c.amount.min(level).saturating_sub(c.amount.min(prev_level)))
            .sum();
        prev_level = level;

        let mut eligible: Vec<SeatIndex> = contributions
            .iter()
            .filter(|c| !c.folded && c.amount >= level)
            .map(|c| c.seat)
            .collect();
        eligible.sort_unstable();

        if eligible.is_empty() {
            if let Some(last) = pots.last_mut() {
                last.amount += amount;
                continue;
            }
            eligible = live_seats(contributions);
            if eligible.is_empty() {
                carry += amount;
                continue;
            }
        }

        pots.push(SidePot {
            amount: amount + std::mem::take(&mut carry),
            eligible_seats: eligible,
        });
    }

    pots.retain(|p| !p.amount.is_zero());
    pots
}

fn live_seats(contributions: &[Contribution]) -> Vec<SeatIndex> {
    let mut seats: Vec<SeatIndex> = contributions
        .iter()
        .filter(|c| !c.folded)
        .map(|c| c.seat)
        .collect();
    seats.sort_unstable();
    seats
}

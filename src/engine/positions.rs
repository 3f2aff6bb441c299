use crate::domain::SeatIndex;

/// Кнопка и блайнды для новой раздачи.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlindPositions {
    pub dealer: SeatIndex,
    pub small_blind: SeatIndex,
    pub big_blind: SeatIndex,
}

/// Следующее место из `seats` по часовой стрелке строго после `after`.
///
/// `seats` — отсортированный список участвующих мест.
pub fn next_seat_after(seats: &[SeatIndex], after: SeatIndex) -> Option<SeatIndex> {
    seats
        .iter()
        .copied()
        .find(|&s| s > after)
        .or_else(|| seats.first().copied())
}

/// Все места из `seats`, начиная со следующего после `after`, по кругу.
pub fn seats_in_order_after(seats: &[SeatIndex], after: SeatIndex) -> Vec<SeatIndex> {
    let mut sorted = seats.to_vec();
    sorted.sort_unstable();
    let split = sorted.iter().position(|&s| s > after).unwrap_or(sorted.len());
    let mut res = sorted[split..].to_vec();
    res.extend_from_slice(&sorted[..split]);
    res
}

/// Предложить кнопку и блайнды.
///
/// - кнопка: следующее участвующее место после прошлой кнопки (или первое, если раздач не было);
/// - SB/BB: два следующих места после кнопки;
/// - хедз-ап: кнопка сама ставит SB.
pub fn assign_blinds(seats: &[SeatIndex], previous_dealer: Option<SeatIndex>) -> Option<BlindPositions> {
    let mut sorted = seats.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() < 2 {
        return None;
    }

    let dealer = match previous_dealer {
        Some(button) => next_seat_after(&sorted, button)?,
        None => sorted[0],
    };

    if sorted.len() == 2 {
        let other = next_seat_after(&sorted, dealer)?;
        return Some(BlindPositions {
            dealer,
            small_blind: dealer,
            big_blind: other,
        });
    }

    let small_blind = next_seat_after(&sorted, dealer)?;
    let big_blind = next_seat_after(&sorted, small_blind)?;
    Some(BlindPositions {
        dealer,
        small_blind,
        big_blind,
    })
}

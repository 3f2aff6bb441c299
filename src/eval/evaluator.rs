use crate::domain::card::{Card, Rank, Suit};
use crate::domain::hand::HandRank;

use super::hand_rank::{encode, HandCategory};
use super::HandEvaluator;

/// Стандартная оценка 7 карт холдема без таблиц: считаем ранги и масти
/// один раз и проверяем категории сверху вниз.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardEvaluator;

impl HandEvaluator for StandardEvaluator {
    fn evaluate(&self, cards: &[Card; 7]) -> HandRank {
        evaluate_cards(cards)
    }
}

/// Лучшая 5-карточная рука из 5..=7 карт.
pub fn evaluate_cards(cards: &[Card]) -> HandRank {
    let mut rank_counts = [0u8; 15];
    let mut suit_masks = [0u16; 4];
    let mut all_mask = 0u16;

    for card in cards {
        let v = card.rank.value() as usize;
        rank_counts[v] += 1;
        suit_masks[card.suit.index()] |= 1 << v;
        all_mask |= 1 << v;
    }

    // Флеш и стрит-флеш.
    if let Some(suit) = Suit::ALL
        .iter()
        .find(|s| suit_masks[s.index()].count_ones() >= 5)
    {
        let mask = suit_masks[suit.index()];
        if let Some(high) = straight_high(mask) {
            return encode(HandCategory::StraightFlush, &[high]);
        }
        let top: Vec<Rank> = ranks_desc(mask).into_iter().take(5).collect();
        return encode(HandCategory::Flush, &top);
    }

    // Группы одинаковых рангов: (count, rank), сильнейшие первыми.
    let mut groups: Vec<(u8, Rank)> = Rank::ALL
        .iter()
        .rev()
        .filter(|r| rank_counts[r.value() as usize] > 0)
        .map(|r| (rank_counts[r.value() as usize], *r))
        .collect();
    groups.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));

    let kickers = |exclude: &[Rank], n: usize| -> Vec<Rank> {
        ranks_desc(all_mask)
            .into_iter()
            .filter(|r| !exclude.contains(r))
            .take(n)
            .collect()
    };

    let (top_count, top_rank) = groups[0];

    if top_count == 4 {
        let mut ranks = vec![top_rank];
        ranks.extend(kickers(&[top_rank], 1));
        return encode(HandCategory::FourOfAKind, &ranks);
    }

    if top_count == 3 {
        if let Some(&(_, pair_rank)) = groups[1..].iter().find(|(c, _)| *c >= 2) {
            return encode(HandCategory::FullHouse, &[top_rank, pair_rank]);
        }
    }

    if let Some(high) = straight_high(all_mask) {
        return encode(HandCategory::Straight, &[high]);
    }

    if top_count == 3 {
        let mut ranks = vec![top_rank];
        ranks.extend(kickers(&[top_rank], 2));
        return encode(HandCategory::ThreeOfAKind, &ranks);
    }

    if top_count == 2 {
        if let Some(&(2, second_pair)) = groups.get(1) {
            let mut ranks = vec![top_rank, second_pair];
            ranks.extend(kickers(&[top_rank, second_pair], 1));
            return encode(HandCategory::TwoPair, &ranks);
        }
        let mut ranks = vec![top_rank];
        ranks.extend(kickers(&[top_rank], 3));
        return encode(HandCategory::OnePair, &ranks);
    }

    encode(HandCategory::HighCard, &kickers(&[], 5))
}

/// Старшая карта стрита в маске рангов (бит = значение ранга).
/// Колесо A2345 → пятёрка.
fn straight_high(mask: u16) -> Option<Rank> {
    let ace_low = if mask & (1 << Rank::Ace.value()) != 0 { 1 << 1 } else { 0 };
    let mask = mask | ace_low;
    (5u8..=14)
        .rev()
        .find(|&high| {
            let run = 0b11111u16 << (high - 4);
            mask & run == run
        })
        .and_then(Rank::from_value)
}

fn ranks_desc(mask: u16) -> Vec<Rank> {
    Rank::ALL
        .iter()
        .rev()
        .copied()
        .filter(|r| mask & (1 << r.value()) != 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::hand_rank::hand_category;

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace().map(|c| c.parse().unwrap()).collect()
    }

    #[test]
    fn detects_wheel_straight() {
        let r = evaluate_cards(&cards("Ah 2c 3d 4s 5h Kd Qc"));
        assert_eq!(hand_category(r), HandCategory::Straight);
        let six_high = evaluate_cards(&cards("6h 2c 3d 4s 5h Kd Qc"));
        assert!(six_high > r);
    }

    #[test]
    fn full_house_beats_flush() {
        let fh = evaluate_cards(&cards("Kh Kd Ks 2h 2c 9h 4h"));
        let fl = evaluate_cards(&cards("Ah Jh 9h 4h 2h Kd Qc"));
        assert_eq!(hand_category(fh), HandCategory::FullHouse);
        assert_eq!(hand_category(fl), HandCategory::Flush);
        assert!(fh > fl);
    }

    #[test]
    fn kicker_breaks_pair_tie() {
        let a = evaluate_cards(&cards("As Ad Kc 7h 5d 3c 2s"));
        let b = evaluate_cards(&cards("Ah Ac Qc 7h 5d 3c 2s"));
        assert!(a > b);
    }

    #[test]
    fn steel_wheel_is_straight_flush() {
        let r = evaluate_cards(&cards("Ac 2c 3c 4c 5c Kd Kh"));
        assert_eq!(hand_category(r), HandCategory::StraightFlush);
    }
}

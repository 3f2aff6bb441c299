use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank, Suit};

/// Колода карт раздачи: фиксированный порядок 52 карт + курсор.
///
/// Карты не удаляются при сдаче — курсор просто сдвигается, поэтому
/// полный порядок колоды остаётся в архиве раздачи для аудита.
/// Перемешивание делает infra (`infra::rng::new_shuffled_deck`), НЕ здесь.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
    cursor: usize,
}

impl Deck {
    /// Стандартная 52-карточная колода в порядке:
    /// Clubs 2..A, Diamonds 2..A, Hearts 2..A, Spades 2..A.
    pub fn standard_52() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck { cards, cursor: 0 }
    }

    /// Колода с заданным порядком (курсор в начале).
    pub fn from_order(cards: Vec<Card>) -> Self {
        Deck { cards, cursor: 0 }
    }

    /// Полный порядок колоды, включая уже сданные карты.
    pub fn order(&self) -> &[Card] {
        &self.cards
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.cursor
    }

    /// Взять одну карту сверху колоды.
    pub fn draw_one(&mut self) -> Option<Card> {
        let card = self.cards.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(card)
    }

    /// Взять n карт сверху (меньше, если колода кончилась).
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        let mut taken = Vec::with_capacity(n);
        for _ in 0..n {
            match self.draw_one() {
                Some(card) => taken.push(card),
                None => break,
            }
        }
        taken
    }
}

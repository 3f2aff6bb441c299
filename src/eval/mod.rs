//! Оценка силы рук (Texas Hold'em).
//!
//! Движок видит только трейт `HandEvaluator`: 7 карт → `HandRank`.
//! `StandardEvaluator` — реализация по умолчанию.

pub mod evaluator;
pub mod hand_rank;

use crate::domain::card::Card;
use crate::domain::hand::HandRank;

pub use evaluator::{evaluate_cards, StandardEvaluator};
pub use hand_rank::{describe_hand, hand_category, HandCategory};

/// Внешняя функция силы руки.
///
/// `cards[0..2]` — карманные карты, `cards[2..7]` — борд.
/// Чем больше результат, тем сильнее рука; равные значения = сплит.
pub trait HandEvaluator: Send + Sync {
    fn evaluate(&self, cards: &[Card; 7]) -> HandRank;
}

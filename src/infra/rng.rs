use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

use crate::domain::deck::Deck;
use crate::domain::{HandId, TableId};
use crate::infra::rng_seed::RngSeed;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeedError {
    #[error("источник энтропии ОС недоступен: {0}")]
    Entropy(String),
}

/// Источник сидов для новых раздач.
///
/// Ошибка означает, что раздачу начинать нельзя: повторять молча тоже нельзя.
pub trait SeedSource: Send {
    fn next_seed(&mut self, table_id: TableId, hand_id: HandId) -> Result<RngSeed, SeedError>;
}

/// Боевой источник: 32 байта из ОС + контекст раздачи через SHA-256.
#[derive(Debug, Default)]
pub struct OsSeedSource {
    counter: u64,
}

impl OsSeedSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SeedSource for OsSeedSource {
    fn next_seed(&mut self, table_id: TableId, hand_id: HandId) -> Result<RngSeed, SeedError> {
        let mut entropy = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut entropy)
            .map_err(|e| SeedError::Entropy(e.to_string()))?;
        self.counter += 1;
        Ok(RngSeed::from_bytes(entropy).derive(table_id, hand_id, self.counter))
    }
}

/// Детерминированный источник для тестов и реплея.
#[derive(Clone, Debug)]
pub struct FixedSeedSource {
    base: RngSeed,
    counter: u64,
}

impl FixedSeedSource {
    pub fn new(base: RngSeed) -> Self {
        Self { base, counter: 0 }
    }
}

impl SeedSource for FixedSeedSource {
    fn next_seed(&mut self, table_id: TableId, hand_id: HandId) -> Result<RngSeed, SeedError> {
        self.counter += 1;
        Ok(self.base.derive(table_id, hand_id, self.counter))
    }
}

/// Детерминированная тасовка: ChaCha20 от байт сида + Fisher–Yates
/// по каноническому порядку `Deck::standard_52`.
pub fn new_shuffled_deck(seed: &RngSeed) -> Deck {
    let mut rng = ChaCha20Rng::from_seed(seed.bytes);
    let mut cards = Deck::standard_52().order().to_vec();
    cards.shuffle(&mut rng);
    Deck::from_order(cards)
}

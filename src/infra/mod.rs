//! Инфраструктурный слой вокруг покерного движка:
//! - генерация ID;
//! - сиды и детерминированная тасовка;
//! - архив сыгранных раздач;
//! - инициализация tracing.

pub mod ids;
pub mod persistence;
pub mod rng;
pub mod rng_seed;
pub mod telemetry;

pub use ids::IdGenerator;
pub use persistence::{ArchiveError, ArchivedHand, HandArchive, InMemoryHandArchive, JsonLinesArchive};
pub use rng::{new_shuffled_deck, FixedSeedSource, OsSeedSource, SeedError, SeedSource};
pub use rng_seed::RngSeed;

//! Общие утилиты интеграционных тестов.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use poker_table_engine::domain::{
    card::Card,
    chips::Chips,
    hand::HandRank,
    player::SeatedPlayer,
    table::{SeatIndex, Table, TableConfig},
    PlayerId,
};
use poker_table_engine::engine::{
    actions::{ActionSource, PlayerAction, PlayerActionKind},
    errors::EngineError,
    game_loop::{apply_action, start_hand, HandEngine, HandStatus},
    table_runtime::TableRuntime,
};
use poker_table_engine::eval::HandEvaluator;
use poker_table_engine::infra::{
    ids::IdGenerator,
    persistence::InMemoryHandArchive,
    rng::FixedSeedSource,
    rng_seed::RngSeed,
};
use poker_table_engine::time_ctrl::TimeRules;

pub const SB: u64 = 5;
pub const BB: u64 = 10;

/// Игрок на месте `seat` всегда имеет id 100 + seat.
pub fn pid(seat: SeatIndex) -> PlayerId {
    100 + seat as PlayerId
}

pub fn config() -> TableConfig {
    TableConfig::six_max("test", SB, BB)
}

/// Стол 5/10, места 0.. заняты стеками из `stacks` (0 — место пустое).
pub fn table_with_stacks(stacks: &[u64]) -> Table {
    let mut table = Table::new(1, config());
    for (idx, &stack) in stacks.iter().enumerate() {
        if stack > 0 {
            let seat = idx as SeatIndex;
            table.seats[idx] = Some(SeatedPlayer::new(pid(seat), format!("p{seat}"), Chips(stack)));
        }
    }
    table
}

pub fn seed(n: u64) -> RngSeed {
    RngSeed::from_u64(n)
}

/// Стол + раздача, начатая с фиксированным сидом в момент 0.
pub fn started(stacks: &[u64]) -> (Table, HandEngine) {
    let mut table = table_with_stacks(stacks);
    let hand = start_hand(&mut table, 1, seed(42), 0).expect("hand must start");
    (table, hand)
}

/// Действие от имени места в момент 1000.
pub fn act(
    table: &mut Table,
    hand: &mut HandEngine,
    seat: SeatIndex,
    kind: PlayerActionKind,
    evaluator: &dyn HandEvaluator,
) -> Result<HandStatus, EngineError> {
    let action = PlayerAction {
        player_id: pid(seat),
        seat,
        kind,
    };
    apply_action(table, hand, action, ActionSource::Player, 1_000, evaluator)
}

/// Оценщик со сценарием: сила руки задаётся по карманным картам места.
///
/// Незнакомые карманные карты получают самый слабый ранг.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRanks {
    by_hole: HashMap<[Card; 2], HandRank>,
}

impl ScriptedRanks {
    /// `ranks`: (место, сила) для уже разданной раздачи.
    pub fn for_hand(hand: &HandEngine, ranks: &[(SeatIndex, u32)]) -> Self {
        let by_hole = ranks
            .iter()
            .filter_map(|&(seat, rank)| hand.seat(seat).map(|hs| (hs.hole_cards, HandRank(rank))))
            .collect();
        Self { by_hole }
    }
}

impl HandEvaluator for ScriptedRanks {
    fn evaluate(&self, cards: &[Card; 7]) -> HandRank {
        self.by_hole
            .get(&[cards[0], cards[1]])
            .copied()
            .unwrap_or(HandRank(0))
    }
}

/// Рантайм стола 5/10 со стандартными таймингами, фиксированным сидом
/// и архивом в памяти, который тест может читать.
pub fn runtime() -> (TableRuntime, InMemoryHandArchive) {
    let archive = InMemoryHandArchive::new();
    let runtime = TableRuntime::new(
        Table::new(1, config()),
        TimeRules::standard(),
        Arc::new(IdGenerator::new()),
    )
    .with_seed_source(Box::new(FixedSeedSource::new(seed(7))))
    .with_archive(Box::new(archive.clone()));
    (runtime, archive)
}

pub fn total_stacks(table: &Table) -> Chips {
    table.total_stacks()
}

//! Сайд-поты и раздача банков.
//!
//! Проверяем:
//! - уровни олл-инов и состав претендентов;
//! - фишки сфолдивших остаются в потах, которые они оплатили;
//! - нечётные фишки при сплите раздаются по часовой от кнопки.

mod common;

use std::collections::HashMap;

use common::*;

use poker_table_engine::domain::{chips::Chips, hand::HandRank, table::SeatIndex};
use poker_table_engine::engine::{
    actions::PlayerActionKind,
    game_loop::HandStatus,
    settlement::{award_pots, split_amount},
    side_pots::{compute_side_pots, Contribution, SidePot},
};

fn contrib(seat: SeatIndex, amount: u64, folded: bool, all_in: bool) -> Contribution {
    Contribution {
        seat,
        amount: Chips(amount),
        folded,
        all_in,
    }
}

fn pot_info(p: &SidePot) -> (u64, Vec<SeatIndex>) {
    let mut seats = p.eligible_seats.clone();
    seats.sort_unstable();
    (p.amount.0, seats)
}

/// Три олл-ина 100 / 50 / 200.
#[test]
fn three_all_ins_make_three_tiers() {
    let pots = compute_side_pots(&[
        contrib(0, 100, false, true),
        contrib(1, 50, false, true),
        contrib(2, 200, false, true),
    ]);
    let info: Vec<_> = pots.iter().map(pot_info).collect();
    assert_eq!(
        info,
        vec![(150, vec![0, 1, 2]), (100, vec![0, 2]), (100, vec![2])]
    );
}

#[test]
fn equal_contributions_make_one_pot() {
    let pots = compute_side_pots(&[contrib(0, 100, false, true), contrib(1, 100, false, false)]);
    assert_eq!(pots.iter().map(pot_info).collect::<Vec<_>>(), vec![(200, vec![0, 1])]);
}

#[test]
fn folded_chips_stay_in_the_pots_they_funded() {
    // Место 1 внесло 80 и сфолдило, место 0 олл-ин на 50.
    let pots = compute_side_pots(&[
        contrib(0, 50, false, true),
        contrib(1, 80, true, false),
        contrib(2, 120, false, false),
    ]);
    let info: Vec<_> = pots.iter().map(pot_info).collect();
    assert_eq!(info, vec![(150, vec![0, 2]), (100, vec![2])]);

    let total: u64 = pots.iter().map(|p| p.amount.0).sum();
    assert_eq!(total, 250);
}

#[test]
fn odd_chip_goes_to_first_winner_after_button() {
    // Кнопка на 3: первым после неё по часовой идёт место 0.
    let shares = split_amount(Chips(101), &[3, 0], 3);
    assert_eq!(shares, vec![(0, Chips(51)), (3, Chips(50))]);

    let shares = split_amount(Chips(100), &[1, 4, 5], 4);
    assert_eq!(shares, vec![(5, Chips(34)), (1, Chips(33)), (4, Chips(33))]);
}

#[test]
fn each_pot_is_awarded_independently() {
    let pots = vec![
        SidePot {
            amount: Chips(150),
            eligible_seats: vec![0, 1, 2],
        },
        SidePot {
            amount: Chips(100),
            eligible_seats: vec![0, 2],
        },
        SidePot {
            amount: Chips(100),
            eligible_seats: vec![2],
        },
    ];
    // Лучшая рука у короткого стека (место 1), вторая — у места 0.
    let ranks: HashMap<SeatIndex, HandRank> =
        [(0, HandRank(50)), (1, HandRank(90)), (2, HandRank(10))].into_iter().collect();

    let awards = award_pots(&pots, &ranks, 0);
    let shares: Vec<_> = awards.iter().map(|a| a.shares.clone()).collect();
    assert_eq!(
        shares,
        vec![
            vec![(1, Chips(150))],
            vec![(0, Chips(100))],
            vec![(2, Chips(100))],
        ]
    );
    assert_eq!(awards[2].winning_rank, None, "единственный претендент забирает без сравнения");
}

/// Тот же сценарий 100 / 50 / 200 через настоящую раздачу.
#[test]
fn all_in_tiers_through_a_real_hand() {
    // Кнопка 0, SB 1, BB 2.
    let (mut table, mut hand) = started(&[100, 50, 200]);
    let ranks = ScriptedRanks::for_hand(&hand, &[(0, 50), (1, 90), (2, 10)]);

    act(&mut table, &mut hand, 0, PlayerActionKind::AllIn, &ranks).unwrap();
    act(&mut table, &mut hand, 1, PlayerActionKind::AllIn, &ranks).unwrap();
    let status = act(&mut table, &mut hand, 2, PlayerActionKind::AllIn, &ranks).unwrap();

    let outcome = match status {
        HandStatus::Finished(outcome) => outcome,
        other => panic!("ожидали завершённую раздачу, получили {other:?}"),
    };
    assert!(outcome.went_to_showdown);
    assert_eq!(outcome.board.len(), 5);

    let pots: Vec<(u64, Vec<SeatIndex>)> = outcome
        .pots
        .iter()
        .map(|p| (p.amount.0, p.eligible_seats.clone()))
        .collect();
    assert_eq!(
        pots,
        vec![(150, vec![0, 1, 2]), (100, vec![0, 2]), (100, vec![2])]
    );

    assert_eq!(table.seat(0).map(|p| p.stack), Some(Chips(100)));
    assert_eq!(table.seat(1).map(|p| p.stack), Some(Chips(150)));
    assert_eq!(table.seat(2).map(|p| p.stack), Some(Chips(100)));
    assert_eq!(total_stacks(&table), Chips(350));
}

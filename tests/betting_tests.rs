//! Раунд ставок: валидация, очередь ходов, правило короткого олл-ина.

mod common;

use common::*;

use poker_table_engine::api::errors::ApiError;
use poker_table_engine::domain::{chips::Chips, hand::Phase, player::PlayerStatus};
use poker_table_engine::engine::{
    actions::PlayerActionKind, errors::EngineError, game_loop::HandStatus,
    hand_history::ActionKind,
};
use poker_table_engine::eval::StandardEvaluator;

#[test]
fn preflop_setup_three_handed() {
    let (table, hand) = started(&[1000, 1000, 1000]);

    assert_eq!(hand.positions.dealer, 0);
    assert_eq!(hand.positions.small_blind, 1);
    assert_eq!(hand.positions.big_blind, 2);
    assert_eq!(hand.phase, Phase::Preflop);
    assert_eq!(hand.current_actor, Some(0), "первым ходит место после BB");
    assert_eq!(hand.betting.current_bet, Chips(BB));
    assert_eq!(hand.betting.min_raise, Chips(BB));
    assert_eq!(hand.pot_total(), Chips(SB + BB));

    assert_eq!(table.seat(1).map(|p| p.stack), Some(Chips(1000 - SB)));
    assert_eq!(table.seat(2).map(|p| p.stack), Some(Chips(1000 - BB)));

    let kinds: Vec<ActionKind> = hand.log.entries().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![ActionKind::PostSmallBlind, ActionKind::PostBigBlind]);
}

#[test]
fn out_of_turn_action_is_rejected() {
    let (mut table, mut hand) = started(&[1000, 1000, 1000]);
    let err = act(&mut table, &mut hand, 1, PlayerActionKind::Call, &StandardEvaluator).unwrap_err();
    assert_eq!(err, EngineError::NotYourTurn(1));
}

#[test]
fn check_facing_a_bet_is_rejected() {
    let (mut table, mut hand) = started(&[1000, 1000, 1000]);
    let err = act(&mut table, &mut hand, 0, PlayerActionKind::Check, &StandardEvaluator).unwrap_err();
    assert_eq!(err, EngineError::CannotCheck);
}

#[test]
fn call_with_nothing_to_call_is_rejected() {
    let (mut table, mut hand) = started(&[1000, 1000, 1000]);
    let ev = StandardEvaluator;
    act(&mut table, &mut hand, 0, PlayerActionKind::Call, &ev).unwrap();
    act(&mut table, &mut hand, 1, PlayerActionKind::Call, &ev).unwrap();

    // BB уже уравнял: у него есть только check или рейз.
    assert_eq!(hand.current_actor, Some(2));
    let err = act(&mut table, &mut hand, 2, PlayerActionKind::Call, &ev).unwrap_err();
    assert_eq!(err, EngineError::CannotCall);
}

#[test]
fn raise_below_minimum_is_rejected() {
    let (mut table, mut hand) = started(&[1000, 1000, 1000]);
    let err = act(&mut table, &mut hand, 0, PlayerActionKind::Raise(Chips(15)), &StandardEvaluator)
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::RaiseTooSmall {
            total: Chips(15),
            min_total: Chips(20)
        }
    );
}

#[test]
fn raise_beyond_stack_is_rejected() {
    let (mut table, mut hand) = started(&[1000, 1000, 1000]);
    let err = act(&mut table, &mut hand, 0, PlayerActionKind::Raise(Chips(5000)), &StandardEvaluator)
        .unwrap_err();
    assert_eq!(err, EngineError::NotEnoughChips);
}

#[test]
fn rejected_action_changes_nothing() {
    let (mut table, mut hand) = started(&[1000, 1000, 1000]);
    let table_before = table.clone();
    let log_before = hand.log.clone();
    let betting_before = hand.betting.clone();
    let seq_before = hand.turn_seq;

    for (seat, kind) in [
        (0, PlayerActionKind::Check),
        (0, PlayerActionKind::Raise(Chips(11))),
        (2, PlayerActionKind::Fold),
        (5, PlayerActionKind::Call),
    ] {
        assert!(act(&mut table, &mut hand, seat, kind, &StandardEvaluator).is_err());
    }

    assert_eq!(table, table_before);
    assert_eq!(hand.log, log_before);
    assert_eq!(hand.betting, betting_before);
    assert_eq!(hand.turn_seq, seq_before);
}

#[test]
fn repeated_invalid_action_gets_identical_rejection() {
    let (mut table, mut hand) = started(&[1000, 1000, 1000]);
    let log_len = hand.log.len();

    for kind in [
        PlayerActionKind::Check,
        PlayerActionKind::Raise(Chips(15)),
        PlayerActionKind::Raise(Chips(5000)),
    ] {
        let first = act(&mut table, &mut hand, 0, kind, &StandardEvaluator).unwrap_err();
        let second = act(&mut table, &mut hand, 0, kind, &StandardEvaluator).unwrap_err();
        assert_eq!(first, second);
        assert_eq!(ApiError::from(first), ApiError::from(second));
    }
    assert_eq!(hand.log.len(), log_len, "отказы не пишутся в журнал");
    assert_eq!(hand.current_actor, Some(0));
}

#[test]
fn duplicate_submission_is_applied_once() {
    let (mut table, mut hand) = started(&[1000, 1000, 1000]);
    let ev = StandardEvaluator;
    act(&mut table, &mut hand, 0, PlayerActionKind::Call, &ev).unwrap();
    let log_len = hand.log.len();

    // Повтор того же запроса: ход уже ушёл дальше.
    let err = act(&mut table, &mut hand, 0, PlayerActionKind::Call, &ev).unwrap_err();
    assert_eq!(err, EngineError::NotYourTurn(0));
    assert_eq!(hand.log.len(), log_len);
    assert_eq!(table.seat(0).map(|p| p.stack), Some(Chips(1000 - BB)));
}

#[test]
fn full_raise_reopens_action_and_sets_min_raise() {
    let (mut table, mut hand) = started(&[1000, 1000, 1000]);
    let ev = StandardEvaluator;
    act(&mut table, &mut hand, 0, PlayerActionKind::Call, &ev).unwrap();
    act(&mut table, &mut hand, 1, PlayerActionKind::Raise(Chips(50)), &ev).unwrap();

    assert_eq!(hand.betting.current_bet, Chips(50));
    assert_eq!(hand.betting.min_raise, Chips(40));
    assert_eq!(hand.betting.to_act, vec![2, 0]);
    assert_eq!(hand.current_actor, Some(2));

    let err = act(&mut table, &mut hand, 2, PlayerActionKind::Raise(Chips(80)), &ev).unwrap_err();
    assert_eq!(
        err,
        EngineError::RaiseTooSmall {
            total: Chips(80),
            min_total: Chips(90)
        }
    );
}

#[test]
fn short_all_in_requires_call_but_does_not_reopen_raising() {
    // Место 1 (SB) может дойти только до 150.
    let (mut table, mut hand) = started(&[1000, 150, 1000]);
    let ev = StandardEvaluator;

    act(&mut table, &mut hand, 0, PlayerActionKind::Raise(Chips(100)), &ev).unwrap();
    assert_eq!(hand.betting.min_raise, Chips(90));

    // Олл-ин до 150: прирост 50 меньше минимального рейза 90.
    act(&mut table, &mut hand, 1, PlayerActionKind::AllIn, &ev).unwrap();
    assert_eq!(hand.betting.current_bet, Chips(150));
    assert_eq!(hand.betting.min_raise, Chips(90));
    assert_eq!(hand.betting.to_act, vec![2, 0], "место 0 должно доуравнять");
    assert_eq!(hand.seat(1).map(|s| s.status), Some(PlayerStatus::AllIn));
    assert!(hand.betting.may_raise(2), "BB ещё не ходил");
    assert!(!hand.betting.may_raise(0));

    act(&mut table, &mut hand, 2, PlayerActionKind::Call, &ev).unwrap();
    assert_eq!(hand.phase, Phase::Preflop, "раунд не закрыт, пока место 0 не уравняло");
    assert_eq!(hand.current_actor, Some(0));

    // Рейзить месту 0 уже нельзя, ни обычным рейзом, ни олл-ином.
    let log_len = hand.log.len();
    for kind in [PlayerActionKind::Raise(Chips(300)), PlayerActionKind::AllIn] {
        let err = act(&mut table, &mut hand, 0, kind, &ev).unwrap_err();
        assert_eq!(err, EngineError::IllegalAction);
    }
    assert_eq!(hand.log.len(), log_len);

    let status = act(&mut table, &mut hand, 0, PlayerActionKind::Call, &ev).unwrap();
    assert_eq!(status, HandStatus::Ongoing);
    assert_eq!(hand.phase, Phase::Flop);
    assert_eq!(hand.seat(0).map(|s| s.committed_total), Some(Chips(150)));
    assert_eq!(hand.seat(2).map(|s| s.committed_total), Some(Chips(150)));
    assert_eq!(hand.current_actor, Some(2), "на флопе первым ходит место после кнопки");
}

#[test]
fn short_all_in_caller_may_still_fold() {
    let (mut table, mut hand) = started(&[1000, 150, 1000]);
    let ev = StandardEvaluator;
    act(&mut table, &mut hand, 0, PlayerActionKind::Raise(Chips(100)), &ev).unwrap();
    act(&mut table, &mut hand, 1, PlayerActionKind::AllIn, &ev).unwrap();
    act(&mut table, &mut hand, 2, PlayerActionKind::Call, &ev).unwrap();

    // Против олл-ина остаётся один активный: доска докладывается до конца.
    let status = act(&mut table, &mut hand, 0, PlayerActionKind::Fold, &ev).unwrap();
    assert!(matches!(status, HandStatus::Finished(ref o) if o.went_to_showdown));
    assert_eq!(hand.seat(0).map(|s| s.status), Some(PlayerStatus::Folded));
    assert_eq!(hand.seat(0).map(|s| s.committed_total), Some(Chips(100)));
}

#[test]
fn full_raise_after_short_all_in_reopens_raising() {
    let (mut table, mut hand) = started(&[1000, 150, 1000]);
    let ev = StandardEvaluator;
    act(&mut table, &mut hand, 0, PlayerActionKind::Raise(Chips(100)), &ev).unwrap();
    act(&mut table, &mut hand, 1, PlayerActionKind::AllIn, &ev).unwrap();

    // BB ещё не ходил и рейзит полноценно: до 150 + 90.
    act(&mut table, &mut hand, 2, PlayerActionKind::Raise(Chips(240)), &ev).unwrap();
    assert_eq!(hand.betting.to_act, vec![0]);
    assert!(hand.betting.may_raise(0));
    act(&mut table, &mut hand, 0, PlayerActionKind::Raise(Chips(400)), &ev).unwrap();
    assert_eq!(hand.betting.current_bet, Chips(400));
}

#[test]
fn raise_for_whole_stack_becomes_all_in() {
    let (mut table, mut hand) = started(&[1000, 1000, 1000]);
    act(&mut table, &mut hand, 0, PlayerActionKind::Raise(Chips(1000)), &StandardEvaluator).unwrap();

    let last = hand.log.last().expect("entry");
    assert_eq!(last.kind, ActionKind::AllIn);
    assert_eq!(last.amount, Chips(1000));
    assert_eq!(hand.seat(0).map(|s| s.status), Some(PlayerStatus::AllIn));
    assert_eq!(table.seat(0).map(|p| p.stack), Some(Chips(0)));
}

#[test]
fn capped_call_becomes_all_in() {
    let (mut table, mut hand) = started(&[1000, 1000, 60]);
    let ev = StandardEvaluator;
    act(&mut table, &mut hand, 0, PlayerActionKind::Raise(Chips(200)), &ev).unwrap();
    act(&mut table, &mut hand, 1, PlayerActionKind::Fold, &ev).unwrap();
    act(&mut table, &mut hand, 2, PlayerActionKind::Call, &ev).unwrap();

    let entry = hand
        .log
        .entries()
        .iter()
        .rev()
        .find(|e| e.seat == 2)
        .expect("BB entry");
    assert_eq!(entry.kind, ActionKind::AllIn);
    assert_eq!(entry.amount, Chips(50));
    assert_eq!(entry.round_total, Chips(60));
}

#[test]
fn log_sequence_is_gapless() {
    let (mut table, mut hand) = started(&[1000, 1000, 1000]);
    let ev = StandardEvaluator;
    act(&mut table, &mut hand, 0, PlayerActionKind::Call, &ev).unwrap();
    act(&mut table, &mut hand, 1, PlayerActionKind::Call, &ev).unwrap();
    act(&mut table, &mut hand, 2, PlayerActionKind::Check, &ev).unwrap();

    let seqs: Vec<u32> = hand.log.entries().iter().map(|e| e.seq).collect();
    assert_eq!(seqs, (0..seqs.len() as u32).collect::<Vec<_>>());
    assert_eq!(hand.phase, Phase::Flop);
    assert_eq!(hand.board.len(), 3);
}

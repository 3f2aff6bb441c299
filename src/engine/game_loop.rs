use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::{HandRank, Phase};
use crate::domain::player::PlayerStatus;
use crate::domain::table::{SeatIndex, Table};
use crate::domain::{HandId, PlayerId, TableId};
use crate::engine::actions::{ActionSource, PlayerAction, PlayerActionKind};
use crate::engine::betting::{BetLevelChange, BettingState};
use crate::engine::errors::EngineError;
use crate::engine::hand_history::{ActionKind, ActionLog, ActionLogEntry, NewEntry};
use crate::engine::positions::{assign_blinds, seats_in_order_after, BlindPositions};
use crate::engine::pot::Pot;
use crate::engine::settlement::{award_pots, PotAward};
use crate::engine::side_pots::{compute_side_pots, Contribution, SidePot};
use crate::engine::validation::{diff_to_call, validate_action};
use crate::eval::HandEvaluator;
use crate::infra::rng::new_shuffled_deck;
use crate::infra::rng_seed::RngSeed;

/// Участник раздачи на конкретном месте.
///
/// Карманные карты хранятся всегда целиком; скрываются только в проекции.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandSeat {
    pub player_id: PlayerId,
    pub status: PlayerStatus,
    pub hole_cards: [Card; 2],
    /// Ставка на текущей улице.
    pub committed_round: Chips,
    /// Всего внесено за раздачу.
    pub committed_total: Chips,
}

/// Карты, показанные на шоудауне.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevealedHand {
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub hole_cards: [Card; 2],
    pub rank: HandRank,
}

/// Итог завершённой раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandOutcome {
    pub table_id: TableId,
    pub hand_id: HandId,
    pub board: Vec<Card>,
    /// Разбивка по потам: основной, затем сайд-поты.
    pub pots: Vec<PotAward>,
    /// Суммарный выигрыш по местам.
    pub winnings: Vec<(SeatIndex, Chips)>,
    /// Пусто, если раздача закончилась без шоудауна.
    pub revealed: Vec<RevealedHand>,
    pub went_to_showdown: bool,
    /// Сид раскрывается только здесь, после расчёта.
    pub seed_hex: String,
    /// Полный порядок колоды для проверки честности.
    pub deck_order: Vec<Card>,
    pub log: Vec<ActionLogEntry>,
    pub final_stacks: Vec<(SeatIndex, PlayerId, Chips)>,
}

/// Раздача аннулирована из-за ошибки целостности, стеки откатаны.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandVoided {
    pub table_id: TableId,
    pub hand_id: HandId,
    pub reason: String,
    pub restored_stacks: Vec<(SeatIndex, Chips)>,
    pub log: Vec<ActionLogEntry>,
}

/// Статус раздачи для внешнего кода.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandStatus {
    Ongoing,
    Finished(Box<HandOutcome>),
    Voided(HandVoided),
}

/// Внутреннее состояние раздачи.
#[derive(Clone, Debug)]
pub struct HandEngine {
    pub table_id: TableId,
    pub hand_id: HandId,
    pub phase: Phase,
    pub seed: RngSeed,
    pub deck: Deck,
    /// Открытые карты борда (0, 3, 4 или 5).
    pub board: Vec<Card>,
    /// Индекс = SeatIndex. None — место не участвует в раздаче.
    pub seats: Vec<Option<HandSeat>>,
    pub betting: BettingState,
    pub pot: Pot,
    /// Заполняется при расчёте.
    pub side_pots: Vec<SidePot>,
    pub positions: BlindPositions,
    /// Чей сейчас ход.
    pub current_actor: Option<SeatIndex>,
    /// Растёт с каждым новым ходом; таймер привязан к (hand_id, turn_seq).
    pub turn_seq: u64,
    pub log: ActionLog,
    /// Стеки участников до блайндов, для отката.
    pub starting_stacks: Vec<(SeatIndex, Chips)>,
    pub chips_at_start: Chips,
    /// Дошли до вскрытия: карты не сфолдивших можно показывать всем.
    pub showdown_reached: bool,
    pub finished: bool,
}

impl HandEngine {
    pub fn seat(&self, index: SeatIndex) -> Option<&HandSeat> {
        self.seats.get(index as usize).and_then(|s| s.as_ref())
    }

    fn seat_mut(&mut self, index: SeatIndex) -> Option<&mut HandSeat> {
        self.seats.get_mut(index as usize).and_then(|s| s.as_mut())
    }

    /// Места с заданным статусом, по возрастанию индекса.
    pub fn seats_with_status(&self, status: PlayerStatus) -> Vec<SeatIndex> {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(idx, s)| match s {
                Some(hs) if hs.status == status => Some(idx as SeatIndex),
                _ => None,
            })
            .collect()
    }

    /// Не сфолдившие участники.
    pub fn live_seats(&self) -> Vec<SeatIndex> {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(idx, s)| match s {
                Some(hs) if hs.status != PlayerStatus::Folded => Some(idx as SeatIndex),
                _ => None,
            })
            .collect()
    }

    /// Сколько нужно доставить месту, чтобы уравнять.
    pub fn call_amount(&self, seat: SeatIndex) -> Chips {
        self.seat(seat)
            .map(|hs| diff_to_call(hs.committed_round, &self.betting))
            .unwrap_or(Chips::ZERO)
    }

    /// Текущая ставка места за улицу.
    pub fn committed_round(&self, seat: SeatIndex) -> Chips {
        self.seat(seat).map(|hs| hs.committed_round).unwrap_or(Chips::ZERO)
    }

    /// Банк вместе с уже выделенными сайд-потами.
    pub fn pot_total(&self) -> Chips {
        self.pot.total + self.side_pots.iter().map(|p| p.amount).sum::<Chips>()
    }

    fn next_turn(&mut self) {
        self.current_actor = self.betting.next_to_act();
        self.turn_seq += 1;
    }

    /// Выкинуть из очереди тех, кто уже не может ходить. Если активный
    /// игрок остался один и ставку уже уравнял, торговаться не с кем.
    fn prune_queue(&mut self) {
        let active = self.seats_with_status(PlayerStatus::Active);
        self.betting.to_act.retain(|s| active.contains(s));
        let all_matched = active
            .iter()
            .all(|&s| self.committed_round(s) >= self.betting.current_bet);
        if active.len() <= 1 && all_matched {
            self.betting.to_act.clear();
        }
    }

    fn deal_board(&mut self, count: usize) -> Result<(), EngineError> {
        for _ in 0..count {
            let card = self
                .deck
                .draw_one()
                .ok_or(EngineError::Internal("колода закончилась"))?;
            self.board.push(card);
        }
        Ok(())
    }
}

/// Фишки участников раздачи: стеки + банк + сайд-поты.
/// На протяжении всей раздачи равно `chips_at_start`.
pub fn chips_in_play(table: &Table, hand: &HandEngine) -> Chips {
    participant_stacks(table, hand) + hand.pot_total()
}

fn participant_stacks(table: &Table, hand: &HandEngine) -> Chips {
    hand.starting_stacks
        .iter()
        .map(|(seat, _)| table.seat(*seat).map(|p| p.stack).unwrap_or(Chips::ZERO))
        .sum()
}

/// Старт новой раздачи:
/// - выбирает кнопку и блайнды;
/// - тасует колоду по сиду и раздаёт по 2 карты;
/// - постит блайнды (короткий блайнд = олл-ин);
/// - настраивает префлоп и первого ходящего.
///
/// Если после блайндов торговаться некому, раунд уже закрыт — вызывающий
/// код сразу зовёт `advance_if_needed`.
pub fn start_hand(
    table: &mut Table,
    hand_id: HandId,
    seed: RngSeed,
    now_ms: u64,
) -> Result<HandEngine, EngineError> {
    if table.phase.is_betting() || table.phase == Phase::Showdown {
        return Err(EngineError::HandAlreadyInProgress);
    }

    let participants = table.eligible_seats();
    let positions =
        assign_blinds(&participants, table.dealer_button).ok_or(EngineError::NotEnoughPlayers)?;

    let starting_stacks: Vec<(SeatIndex, Chips)> = participants
        .iter()
        .filter_map(|&s| table.seat(s).map(|p| (s, p.stack)))
        .collect();
    let chips_at_start = starting_stacks.iter().map(|(_, c)| *c).sum();

    let big_blind = table.config.big_blind;
    let mut hand = HandEngine {
        table_id: table.id,
        hand_id,
        phase: Phase::Preflop,
        deck: new_shuffled_deck(&seed),
        seed,
        board: Vec::with_capacity(5),
        seats: vec![None; table.seats.len()],
        betting: BettingState::new(Phase::Preflop, big_blind, big_blind, Vec::new()),
        pot: Pot::new(),
        side_pots: Vec::new(),
        positions,
        current_actor: None,
        turn_seq: 0,
        log: ActionLog::new(hand_id),
        starting_stacks,
        chips_at_start,
        showdown_reached: false,
        finished: false,
    };

    // По карте за круг, начиная с места после кнопки.
    let order = seats_in_order_after(&participants, positions.dealer);
    let first: Vec<Card> = hand.deck.draw_n(order.len());
    let second: Vec<Card> = hand.deck.draw_n(order.len());
    if first.len() != order.len() || second.len() != order.len() {
        return Err(EngineError::Internal("колода закончилась"));
    }
    for (i, &seat) in order.iter().enumerate() {
        let player_id = table
            .seat(seat)
            .map(|p| p.player_id)
            .ok_or(EngineError::Internal("участник без игрока"))?;
        hand.seats[seat as usize] = Some(HandSeat {
            player_id,
            status: PlayerStatus::Active,
            hole_cards: [first[i], second[i]],
            committed_round: Chips::ZERO,
            committed_total: Chips::ZERO,
        });
    }

    let small_blind = table.config.small_blind;
    post_blind(table, &mut hand, positions.small_blind, small_blind, ActionKind::PostSmallBlind, now_ms)?;
    post_blind(table, &mut hand, positions.big_blind, big_blind, ActionKind::PostBigBlind, now_ms)?;

    let active = hand.seats_with_status(PlayerStatus::Active);
    hand.betting.to_act = seats_in_order_after(&active, positions.big_blind);
    hand.prune_queue();
    hand.next_turn();
    table.phase = Phase::Preflop;

    info!(
        table_id = table.id,
        hand_id,
        dealer = positions.dealer,
        players = participants.len(),
        "hand started"
    );
    Ok(hand)
}

/// Блайнд: не больше стека; если стека не хватило, игрок в олл-ине.
fn post_blind(
    table: &mut Table,
    hand: &mut HandEngine,
    seat: SeatIndex,
    amount: Chips,
    kind: ActionKind,
    now_ms: u64,
) -> Result<(), EngineError> {
    let player = table
        .seat_mut(seat)
        .ok_or(EngineError::Internal("блайнд с пустого места"))?;
    let posted = amount.min(player.stack);
    player.stack = player.stack.saturating_sub(posted);
    let all_in = player.stack.is_zero();
    let player_id = player.player_id;

    let hs = hand
        .seat_mut(seat)
        .ok_or(EngineError::Internal("блайнд вне раздачи"))?;
    hs.committed_round += posted;
    hs.committed_total += posted;
    if all_in {
        hs.status = PlayerStatus::AllIn;
    }
    let round_total = hs.committed_round;
    hand.pot.add(posted);

    hand.log.push(NewEntry {
        timestamp_ms: now_ms,
        seat,
        player_id,
        kind,
        amount: posted,
        round_total,
        phase: Phase::Preflop,
        source: ActionSource::Blind,
    });
    Ok(())
}

/// Применить действие игрока. Возвращает статус раздачи (идёт / закончилась).
///
/// Отклонённое действие ничего не меняет: ни фишек, ни журнала.
pub fn apply_action(
    table: &mut Table,
    hand: &mut HandEngine,
    action: PlayerAction,
    source: ActionSource,
    now_ms: u64,
    evaluator: &dyn HandEvaluator,
) -> Result<HandStatus, EngineError> {
    if hand.finished {
        return Err(EngineError::NoActiveHand);
    }
    if !action.kind.is_legal_in(hand.phase) {
        return Err(EngineError::WrongPhase(hand.phase));
    }

    let seat = action.seat;
    if hand.current_actor != Some(seat) {
        return Err(EngineError::NotYourTurn(seat));
    }
    let hs = hand.seat(seat).ok_or(EngineError::SeatNotInHand(seat))?;
    if hs.player_id != action.player_id {
        return Err(EngineError::SeatNotInHand(seat));
    }
    let stack = table
        .seat(seat)
        .map(|p| p.stack)
        .ok_or(EngineError::SeatNotInHand(seat))?;

    let resolved = validate_action(seat, hs, stack, &action.kind, &hand.betting)?;
    let change = if resolved.kind == ActionKind::Fold {
        BetLevelChange::None
    } else {
        hand.betting.classify(resolved.new_total)
    };

    // Дальше только применение: валидация пройдена.
    let player = table
        .seat_mut(seat)
        .ok_or(EngineError::SeatNotInHand(seat))?;
    player.stack = player
        .stack
        .checked_sub(resolved.chips_in)
        .ok_or(EngineError::NotEnoughChips)?;

    let phase = hand.phase;
    let hs = hand
        .seat_mut(seat)
        .ok_or(EngineError::SeatNotInHand(seat))?;
    hs.committed_round = resolved.new_total;
    hs.committed_total += resolved.chips_in;
    if resolved.kind == ActionKind::Fold {
        hs.status = PlayerStatus::Folded;
    } else if resolved.all_in {
        hs.status = PlayerStatus::AllIn;
    }
    hand.pot.add(resolved.chips_in);

    match change {
        BetLevelChange::FullRaise => {
            let active: Vec<SeatIndex> = hand
                .seats_with_status(PlayerStatus::Active)
                .into_iter()
                .filter(|&s| s != seat)
                .collect();
            let queue = seats_in_order_after(&active, seat);
            hand.betting.on_full_raise(resolved.new_total, queue);
        }
        BetLevelChange::ShortAllIn => {
            // Очередь + все активные, кто теперь недоуравнял.
            let pending: Vec<SeatIndex> = hand
                .seats_with_status(PlayerStatus::Active)
                .into_iter()
                .filter(|&s| s != seat)
                .filter(|&s| {
                    hand.betting.to_act.contains(&s)
                        || hand.committed_round(s) < resolved.new_total
                })
                .collect();
            let queue = seats_in_order_after(&pending, seat);
            hand.betting.on_short_all_in(seat, resolved.new_total, queue);
        }
        BetLevelChange::None => hand.betting.mark_acted(seat),
    }

    let entry = hand.log.push(NewEntry {
        timestamp_ms: now_ms,
        seat,
        player_id: action.player_id,
        kind: resolved.kind,
        amount: resolved.chips_in,
        round_total: resolved.new_total,
        phase,
        source,
    });
    debug!(
        table_id = hand.table_id,
        hand_id = hand.hand_id,
        seat,
        seq = entry.seq,
        kind = ?entry.kind,
        amount = %entry.amount,
        source = ?source,
        "action accepted"
    );

    hand.prune_queue();
    hand.next_turn();
    advance_if_needed(table, hand, evaluator)
}

/// Истёк таймер хода: check, если можно, иначе fold.
pub fn apply_timeout(
    table: &mut Table,
    hand: &mut HandEngine,
    now_ms: u64,
    evaluator: &dyn HandEvaluator,
) -> Result<HandStatus, EngineError> {
    let seat = hand.current_actor.ok_or(EngineError::NoActiveHand)?;
    let hs = hand.seat(seat).ok_or(EngineError::SeatNotInHand(seat))?;
    let kind = if hs.committed_round == hand.betting.current_bet {
        PlayerActionKind::Check
    } else {
        PlayerActionKind::Fold
    };
    info!(table_id = hand.table_id, hand_id = hand.hand_id, seat, kind = ?kind, "turn timed out");
    let action = PlayerAction {
        player_id: hs.player_id,
        seat,
        kind,
    };
    apply_action(table, hand, action, ActionSource::Timeout, now_ms, evaluator)
}

/// Игрок ушёл посреди раздачи: сразу fold, даже не в свой ход.
/// Внесённые фишки остаются в банке.
///
/// Таймер текущего хода сбрасывается, только если уходит ходящий.
pub fn forfeit_seat(
    table: &mut Table,
    hand: &mut HandEngine,
    seat: SeatIndex,
    now_ms: u64,
    evaluator: &dyn HandEvaluator,
) -> Result<HandStatus, EngineError> {
    if hand.finished {
        return Err(EngineError::NoActiveHand);
    }
    let phase = hand.phase;
    let hs = hand
        .seat_mut(seat)
        .ok_or(EngineError::SeatNotInHand(seat))?;
    if hs.status == PlayerStatus::Folded {
        return Ok(HandStatus::Ongoing);
    }
    hs.status = PlayerStatus::Folded;
    let player_id = hs.player_id;
    let round_total = hs.committed_round;

    hand.log.push(NewEntry {
        timestamp_ms: now_ms,
        seat,
        player_id,
        kind: ActionKind::Fold,
        amount: Chips::ZERO,
        round_total,
        phase,
        source: ActionSource::Forfeit,
    });
    info!(table_id = hand.table_id, hand_id = hand.hand_id, seat, "seat forfeited");

    hand.betting.mark_acted(seat);
    hand.prune_queue();
    if hand.current_actor == Some(seat) {
        hand.next_turn();
    } else {
        hand.current_actor = hand.betting.next_to_act();
    }
    advance_if_needed(table, hand, evaluator)
}

/// Переход улиц / шоудаун / завершение раздачи.
pub fn advance_if_needed(
    table: &mut Table,
    hand: &mut HandEngine,
    evaluator: &dyn HandEvaluator,
) -> Result<HandStatus, EngineError> {
    if hand.finished {
        return Err(EngineError::NoActiveHand);
    }

    loop {
        if hand.live_seats().len() <= 1 {
            return Ok(finish(table, hand, evaluator, false));
        }
        if !hand.betting.is_round_complete() {
            return Ok(HandStatus::Ongoing);
        }

        let active = hand.seats_with_status(PlayerStatus::Active);
        let next = hand.phase.next_street();

        match next {
            None => return Ok(finish(table, hand, evaluator, true)),
            Some(_) if active.len() <= 1 => {
                run_out_board(table, hand)?;
                return Ok(finish(table, hand, evaluator, true));
            }
            Some((street, cards)) => {
                open_street(table, hand, street, cards)?;
                let active = hand.seats_with_status(PlayerStatus::Active);
                hand.betting.to_act = seats_in_order_after(&active, hand.positions.dealer);
                hand.prune_queue();
                hand.next_turn();
            }
        }
    }
}

/// Продвижение сразу после старта. Блайнды уже в банке, поэтому
/// любая ошибка аннулирует раздачу с возвратом стеков.
pub fn advance_or_void(
    table: &mut Table,
    hand: &mut HandEngine,
    evaluator: &dyn HandEvaluator,
) -> HandStatus {
    match advance_if_needed(table, hand, evaluator) {
        Ok(status) => status,
        Err(err) => HandStatus::Voided(void_hand(table, hand, &err)),
    }
}

/// Новая улица: открыть карты, обнулить ставки раунда.
fn open_street(
    table: &mut Table,
    hand: &mut HandEngine,
    street: Phase,
    cards: usize,
) -> Result<(), EngineError> {
    hand.deal_board(cards)?;
    hand.phase = street;
    table.phase = street;
    for hs in hand.seats.iter_mut().flatten() {
        hs.committed_round = Chips::ZERO;
    }
    hand.betting = BettingState::new(street, Chips::ZERO, table.config.big_blind, Vec::new());
    debug!(
        table_id = hand.table_id,
        hand_id = hand.hand_id,
        street = ?street,
        board = hand.board.len(),
        "street opened"
    );
    Ok(())
}

/// Все, кто может ставить, в олл-ине: докладываем борд до ривера без торговли.
fn run_out_board(table: &mut Table, hand: &mut HandEngine) -> Result<(), EngineError> {
    while let Some((street, cards)) = hand.phase.next_street() {
        open_street(table, hand, street, cards)?;
    }
    hand.betting.to_act.clear();
    hand.current_actor = None;
    Ok(())
}

/// Расчёт. Ошибка целостности аннулирует раздачу.
fn finish(
    table: &mut Table,
    hand: &mut HandEngine,
    evaluator: &dyn HandEvaluator,
    showdown: bool,
) -> HandStatus {
    hand.current_actor = None;
    hand.betting.to_act.clear();

    match settle(table, hand, evaluator, showdown) {
        Ok(outcome) => {
            hand.finished = true;
            table.dealer_button = Some(hand.positions.dealer);
            table.hands_played += 1;
            table.phase = Phase::Waiting;
            info!(
                table_id = hand.table_id,
                hand_id = hand.hand_id,
                showdown,
                pots = outcome.pots.len(),
                "hand settled"
            );
            HandStatus::Finished(Box::new(outcome))
        }
        Err(err) => HandStatus::Voided(void_hand(table, hand, &err)),
    }
}

fn settle(
    table: &mut Table,
    hand: &mut HandEngine,
    evaluator: &dyn HandEvaluator,
    showdown: bool,
) -> Result<HandOutcome, EngineError> {
    let contributions: Vec<Contribution> = hand
        .seats
        .iter()
        .enumerate()
        .filter_map(|(idx, s)| {
            s.as_ref().map(|hs| Contribution {
                seat: idx as SeatIndex,
                amount: hs.committed_total,
                folded: hs.status == PlayerStatus::Folded,
                all_in: hs.status == PlayerStatus::AllIn,
            })
        })
        .collect();

    let pots = compute_side_pots(&contributions);
    let collected = hand.pot.take();
    let pots_total: Chips = pots.iter().map(|p| p.amount).sum();
    if pots_total != collected {
        return Err(EngineError::IntegrityConservation {
            expected: collected,
            actual: pots_total,
        });
    }
    hand.side_pots = pots;

    let mut ranks: HashMap<SeatIndex, HandRank> = HashMap::new();
    let mut revealed = Vec::new();
    if showdown {
        hand.phase = Phase::Showdown;
        hand.showdown_reached = true;
        table.phase = Phase::Showdown;

        let board: [Card; 5] = hand
            .board
            .as_slice()
            .try_into()
            .map_err(|_| EngineError::Internal("борд не полный на шоудауне"))?;
        for seat in hand.live_seats() {
            let Some(hs) = hand.seat(seat) else { continue };
            let cards = [
                hs.hole_cards[0],
                hs.hole_cards[1],
                board[0],
                board[1],
                board[2],
                board[3],
                board[4],
            ];
            let rank = evaluator.evaluate(&cards);
            ranks.insert(seat, rank);
            revealed.push(RevealedHand {
                seat,
                player_id: hs.player_id,
                hole_cards: hs.hole_cards,
                rank,
            });
        }
    }

    let awards = award_pots(&hand.side_pots, &ranks, hand.positions.dealer);
    let mut winnings: Vec<(SeatIndex, Chips)> = Vec::new();
    for award in &awards {
        for &(seat, amount) in &award.shares {
            let player = table
                .seat_mut(seat)
                .ok_or(EngineError::Internal("выигрыш пустому месту"))?;
            player.stack += amount;
            match winnings.iter_mut().find(|(s, _)| *s == seat) {
                Some((_, total)) => *total += amount,
                None => winnings.push((seat, amount)),
            }
        }
    }

    let after = participant_stacks(table, hand);
    if after != hand.chips_at_start {
        return Err(EngineError::IntegrityConservation {
            expected: hand.chips_at_start,
            actual: after,
        });
    }

    let final_stacks = hand
        .starting_stacks
        .iter()
        .filter_map(|(seat, _)| table.seat(*seat).map(|p| (*seat, p.player_id, p.stack)))
        .collect();

    Ok(HandOutcome {
        table_id: hand.table_id,
        hand_id: hand.hand_id,
        board: hand.board.clone(),
        pots: awards,
        winnings,
        revealed,
        went_to_showdown: showdown,
        seed_hex: hand.seed.to_hex(),
        deck_order: hand.deck.order().to_vec(),
        log: hand.log.entries().to_vec(),
        final_stacks,
    })
}

/// Аннулировать раздачу: стеки участников возвращаются к значениям до блайндов,
/// стол уходит в `Waiting`.
pub fn void_hand(table: &mut Table, hand: &mut HandEngine, err: &EngineError) -> HandVoided {
    error!(
        table_id = hand.table_id,
        hand_id = hand.hand_id,
        error = %err,
        "integrity failure, hand voided"
    );

    for &(seat, stack) in &hand.starting_stacks {
        if let Some(player) = table.seat_mut(seat) {
            player.stack = stack;
        }
    }
    hand.pot = Pot::new();
    hand.side_pots.clear();
    hand.current_actor = None;
    hand.betting.to_act.clear();
    hand.finished = true;
    table.phase = Phase::Waiting;

    HandVoided {
        table_id: hand.table_id,
        hand_id: hand.hand_id,
        reason: err.to_string(),
        restored_stacks: hand.starting_stacks.clone(),
        log: hand.log.entries().to_vec(),
    }
}

//! Рантайм одного стола: рассадка, старт раздач, действия, таймеры,
//! переподключения. Всё синхронно; очередь и реальное время даёт
//! `server::actor`, сюда приходит только `now_ms`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::player::{ConnectionStatus, SeatedPlayer};
use crate::domain::table::{SeatIndex, Table};
use crate::domain::{HandId, PlayerId};
use crate::engine::actions::{ActionSource, PlayerAction, PlayerActionKind};
use crate::engine::errors::EngineError;
use crate::engine::game_loop::{
    advance_or_void, apply_action, apply_timeout, forfeit_seat, start_hand, HandEngine,
    HandOutcome, HandStatus, HandVoided,
};
use crate::engine::hand_history::ActionLogEntry;
use crate::eval::{HandEvaluator, StandardEvaluator};
use crate::infra::ids::IdGenerator;
use crate::infra::persistence::{ArchiveError, ArchivedHand, HandArchive, InMemoryHandArchive};
use crate::infra::rng::{OsSeedSource, SeedSource};
use crate::time_ctrl::{AutoActionDecision, ReconnectOutcome, TimeController, TimeRules};

/// Параметры хода для клиента.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnInfo {
    pub hand_id: HandId,
    pub turn_seq: u64,
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub deadline_ms: u64,
    pub call_amount: Chips,
    /// Минимальный «рейз до» (или олл-ин, если стека меньше).
    pub min_raise_to: Chips,
    /// Максимум за раунд: текущая ставка + весь стек.
    pub max_raise_to: Chips,
    /// false — после короткого олл-ина остались только call/fold.
    pub can_raise: bool,
}

/// Что изменилось на столе после команды или тика.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableEvent {
    PlayerJoined {
        seat: SeatIndex,
        player_id: PlayerId,
        display_name: String,
        stack: Chips,
    },
    /// Место освобождено, стек ушёл игроку.
    PlayerLeft {
        seat: SeatIndex,
        player_id: PlayerId,
        cash_out: Chips,
    },
    CountdownStarted {
        starts_at_ms: u64,
    },
    HandStarted {
        hand_id: HandId,
        dealer: SeatIndex,
    },
    TurnStarted(TurnInfo),
    ActionAccepted(ActionLogEntry),
    HandFinished(Box<HandOutcome>),
    HandVoided(HandVoided),
    ConnectionChanged {
        seat: SeatIndex,
        player_id: PlayerId,
        connected: bool,
    },
    SittingOutChanged {
        seat: SeatIndex,
        player_id: PlayerId,
        sitting_out: bool,
    },
}

/// Стол + текущая раздача + таймеры.
pub struct TableRuntime {
    table: Table,
    hand: Option<HandEngine>,
    /// Последняя раздача, дошедшая до шоудауна. Видна в снапшотах
    /// до начала следующей раздачи.
    last_showdown: Option<HandEngine>,
    time: TimeController,
    seeds: Box<dyn SeedSource>,
    archive: Box<dyn HandArchive>,
    evaluator: Arc<dyn HandEvaluator>,
    ids: Arc<IdGenerator>,
    /// Растёт при каждом изменении, уходит в снапшоты.
    version: u64,
}

impl TableRuntime {
    pub fn new(table: Table, rules: TimeRules, ids: Arc<IdGenerator>) -> Self {
        Self {
            table,
            hand: None,
            last_showdown: None,
            time: TimeController::new(rules),
            seeds: Box::new(OsSeedSource::new()),
            archive: Box::new(InMemoryHandArchive::new()),
            evaluator: Arc::new(StandardEvaluator),
            ids,
            version: 0,
        }
    }

    pub fn with_seed_source(mut self, seeds: Box<dyn SeedSource>) -> Self {
        self.seeds = seeds;
        self
    }

    pub fn with_archive(mut self, archive: Box<dyn HandArchive>) -> Self {
        self.archive = archive;
        self
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn HandEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn hand(&self) -> Option<&HandEngine> {
        self.hand.as_ref()
    }

    /// Раздача для проекции: текущая, а между раздачами — последний шоудаун.
    pub fn projected_hand(&self) -> Option<&HandEngine> {
        self.hand.as_ref().or(self.last_showdown.as_ref())
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn time(&self) -> &TimeController {
        &self.time
    }

    /// Дедлайн текущего хода, если он взведён.
    pub fn turn_deadline(&self) -> Option<u64> {
        self.time.clock.current().map(|d| d.deadline_ms)
    }

    /// Когда рантайм нужно разбудить `tick`.
    pub fn next_wakeup(&self) -> Option<u64> {
        self.time.next_wakeup()
    }

    /// Текущий ход (для turn-start при подключении наблюдателя).
    pub fn current_turn(&self) -> Option<TurnInfo> {
        let hand = self.hand.as_ref()?;
        let deadline = self.time.clock.current()?;
        turn_info(&self.table, hand, deadline.deadline_ms)
    }

    // ------------------------------------------------------------------
    // Рассадка
    // ------------------------------------------------------------------

    /// Посадить игрока. Посреди раздачи он ждёт следующую.
    pub fn sit(
        &mut self,
        player_id: PlayerId,
        display_name: impl Into<String>,
        seat: Option<SeatIndex>,
        buy_in: Chips,
        now_ms: u64,
    ) -> Result<(SeatIndex, Vec<TableEvent>), EngineError> {
        if self.table.seat_of(player_id).is_some() {
            return Err(EngineError::AlreadySeated(player_id));
        }
        let cfg = &self.table.config;
        if buy_in < cfg.min_buy_in || buy_in > cfg.max_buy_in {
            return Err(EngineError::BuyInOutOfRange {
                amount: buy_in,
                min: cfg.min_buy_in,
                max: cfg.max_buy_in,
            });
        }
        let index = match seat {
            Some(index) if index >= self.table.max_seats() => {
                return Err(EngineError::InvalidSeat(index))
            }
            Some(index) if !self.table.is_seat_empty(index) => {
                return Err(EngineError::SeatTaken(index))
            }
            Some(index) => index,
            None => self.table.first_empty_seat().ok_or(EngineError::TableFull)?,
        };

        let player = SeatedPlayer::new(player_id, display_name, buy_in);
        let display_name = player.display_name.clone();
        self.table.seats[index as usize] = Some(player);
        info!(table_id = self.table.id, seat = index, player_id, buy_in = %buy_in, "player seated");

        let mut events = vec![TableEvent::PlayerJoined {
            seat: index,
            player_id,
            display_name,
            stack: buy_in,
        }];
        self.maybe_start_countdown(now_ms, &mut events);
        Ok((index, self.commit(events)))
    }

    /// Уйти из-за стола. В раздаче — немедленный fold, место освобождается
    /// после расчёта.
    pub fn leave(&mut self, player_id: PlayerId, now_ms: u64) -> Result<Vec<TableEvent>, EngineError> {
        let seat = self
            .table
            .seat_of(player_id)
            .ok_or(EngineError::PlayerNotAtTable(player_id))?;
        self.time.reconnect.forget(player_id);
        let mut events = Vec::new();

        let in_hand = self
            .hand
            .as_ref()
            .map(|h| h.seat(seat).is_some())
            .unwrap_or(false);

        if in_hand {
            if let Some(p) = self.table.seat_mut(seat) {
                p.leaving = true;
            }
            let evaluator = Arc::clone(&self.evaluator);
            if let Some(hand) = self.hand.as_mut() {
                let before = hand.log.len();
                let status = forfeit_seat(&mut self.table, hand, seat, now_ms, evaluator.as_ref())?;
                push_new_log_entries(hand, before, &mut events);
                self.after_status(status, now_ms, &mut events);
            }
        } else {
            self.remove_seat(seat, &mut events);
            self.maybe_start_countdown(now_ms, &mut events);
        }

        Ok(self.commit(events))
    }

    pub fn set_sitting_out(
        &mut self,
        player_id: PlayerId,
        sitting_out: bool,
        now_ms: u64,
    ) -> Result<Vec<TableEvent>, EngineError> {
        let seat = self
            .table
            .seat_of(player_id)
            .ok_or(EngineError::PlayerNotAtTable(player_id))?;
        let mut events = Vec::new();
        if let Some(p) = self.table.seat_mut(seat) {
            if p.sitting_out != sitting_out {
                p.sitting_out = sitting_out;
                events.push(TableEvent::SittingOutChanged {
                    seat,
                    player_id,
                    sitting_out,
                });
            }
        }
        self.maybe_start_countdown(now_ms, &mut events);
        Ok(self.commit(events))
    }

    // ------------------------------------------------------------------
    // Соединение
    // ------------------------------------------------------------------

    /// Игрок отключился. Место, стек и карты не трогаем.
    pub fn disconnect(&mut self, player_id: PlayerId, now_ms: u64) -> Vec<TableEvent> {
        let Some(seat) = self.table.seat_of(player_id) else {
            return Vec::new();
        };
        let mut events = Vec::new();
        if let Some(p) = self.table.seat_mut(seat) {
            if p.connection.is_connected() {
                p.connection = ConnectionStatus::Disconnected { since_ms: now_ms };
                let until = self.time.reconnect.on_disconnect(player_id, now_ms, &self.time.rules);
                info!(table_id = self.table.id, seat, player_id, grace_until_ms = until, "player disconnected");
                events.push(TableEvent::ConnectionChanged {
                    seat,
                    player_id,
                    connected: false,
                });
            }
        }
        self.commit(events)
    }

    /// Возвращение игрока. Стек, карты и статус в раздаче не меняются.
    pub fn reconnect(
        &mut self,
        player_id: PlayerId,
    ) -> Result<(ReconnectOutcome, Vec<TableEvent>), EngineError> {
        let seat = self
            .table
            .seat_of(player_id)
            .ok_or(EngineError::PlayerNotAtTable(player_id))?;
        let outcome = self.time.reconnect.on_reconnect(player_id);
        let mut events = Vec::new();
        if let Some(p) = self.table.seat_mut(seat) {
            if !p.connection.is_connected() {
                p.connection = ConnectionStatus::Connected;
                events.push(TableEvent::ConnectionChanged {
                    seat,
                    player_id,
                    connected: true,
                });
            }
        }
        info!(table_id = self.table.id, seat, player_id, outcome = ?outcome, "player reconnected");
        Ok((outcome, self.commit(events)))
    }

    // ------------------------------------------------------------------
    // Игра
    // ------------------------------------------------------------------

    pub fn act(
        &mut self,
        player_id: PlayerId,
        kind: PlayerActionKind,
        now_ms: u64,
    ) -> Result<Vec<TableEvent>, EngineError> {
        let seat = self
            .table
            .seat_of(player_id)
            .ok_or(EngineError::PlayerNotAtTable(player_id))?;
        let evaluator = Arc::clone(&self.evaluator);
        let hand = self.hand.as_mut().ok_or(EngineError::NoActiveHand)?;

        let before = hand.log.len();
        let action = PlayerAction {
            player_id,
            seat,
            kind,
        };
        let status = apply_action(
            &mut self.table,
            hand,
            action,
            ActionSource::Player,
            now_ms,
            evaluator.as_ref(),
        )?;

        let mut events = Vec::new();
        push_new_log_entries(hand, before, &mut events);
        self.after_status(status, now_ms, &mut events);
        Ok(self.commit(events))
    }

    /// Обработать всё, что наступило к `now_ms`: истёкшие окна
    /// переподключения, таймаут хода, конец отсчёта.
    pub fn tick(&mut self, now_ms: u64) -> Vec<TableEvent> {
        let mut events = Vec::new();

        for player_id in self.time.expired_reconnects(now_ms) {
            let Some(seat) = self.table.seat_of(player_id) else {
                continue;
            };
            if let Some(p) = self.table.seat_mut(seat) {
                if !p.sitting_out {
                    p.sitting_out = true;
                    info!(table_id = self.table.id, seat, player_id, "reconnect window lapsed, sitting out");
                    events.push(TableEvent::SittingOutChanged {
                        seat,
                        player_id,
                        sitting_out: true,
                    });
                }
            }
        }

        if let AutoActionDecision::TimeoutCheckOrFold(deadline) = self.time.on_time_passed(now_ms) {
            self.time.clock.cancel();
            let evaluator = Arc::clone(&self.evaluator);
            let current = self.hand.as_mut().filter(|h| {
                h.hand_id == deadline.hand_id
                    && h.turn_seq == deadline.turn_seq
                    && h.current_actor == Some(deadline.seat)
            });
            let status = match current {
                Some(hand) => {
                    let before = hand.log.len();
                    match apply_timeout(&mut self.table, hand, now_ms, evaluator.as_ref()) {
                        Ok(status) => {
                            push_new_log_entries(hand, before, &mut events);
                            status
                        }
                        Err(err) => {
                            warn!(table_id = self.table.id, error = %err, "timeout action rejected");
                            HandStatus::Ongoing
                        }
                    }
                }
                None => HandStatus::Ongoing,
            };
            // Ongoing заново взводит таймер текущего хода.
            self.after_status(status, now_ms, &mut events);
        }

        if self.time.take_countdown_elapsed(now_ms) {
            self.start_next_hand(now_ms, &mut events);
        }

        self.commit(events)
    }

    /// Закрытие стола: таймеры отменяются, архив сбрасывается на диск.
    pub fn teardown(&mut self) -> Result<(), ArchiveError> {
        self.time.cancel_all();
        info!(table_id = self.table.id, "table teardown");
        self.archive.flush()
    }

    // ------------------------------------------------------------------
    // Внутреннее
    // ------------------------------------------------------------------

    fn commit(&mut self, events: Vec<TableEvent>) -> Vec<TableEvent> {
        if !events.is_empty() {
            self.version += 1;
        }
        events
    }

    fn maybe_start_countdown(&mut self, now_ms: u64, events: &mut Vec<TableEvent>) {
        if self.hand.is_some() {
            return;
        }
        if self.table.eligible_seats().len() < 2 {
            self.time.cancel_countdown();
            self.table.phase = Phase::Waiting;
            return;
        }
        if self.time.countdown_deadline().is_none() {
            let starts_at_ms = self.time.start_countdown(now_ms);
            self.table.phase = Phase::Countdown;
            events.push(TableEvent::CountdownStarted { starts_at_ms });
        }
    }

    fn start_next_hand(&mut self, now_ms: u64, events: &mut Vec<TableEvent>) {
        if self.hand.is_some() {
            return;
        }
        if self.table.eligible_seats().len() < 2 {
            self.table.phase = Phase::Waiting;
            return;
        }

        let hand_id = self.ids.next_hand_id();
        let seed = match self.seeds.next_seed(self.table.id, hand_id) {
            Ok(seed) => seed,
            Err(err) => {
                // Без сида раздачи нет; повтор — только по следующему событию стола.
                error!(table_id = self.table.id, hand_id, error = %err, "seed generation failed, hand not started");
                self.table.phase = Phase::Waiting;
                events.push(TableEvent::HandVoided(HandVoided {
                    table_id: self.table.id,
                    hand_id,
                    reason: EngineError::IntegritySeed(err.to_string()).to_string(),
                    restored_stacks: self
                        .table
                        .eligible_seats()
                        .into_iter()
                        .filter_map(|s| self.table.seat(s).map(|p| (s, p.stack)))
                        .collect(),
                    log: Vec::new(),
                }));
                return;
            }
        };

        let mut hand = match start_hand(&mut self.table, hand_id, seed, now_ms) {
            Ok(hand) => hand,
            Err(err) => {
                warn!(table_id = self.table.id, error = %err, "hand not started");
                self.table.phase = Phase::Waiting;
                return;
            }
        };

        self.last_showdown = None;
        events.push(TableEvent::HandStarted {
            hand_id,
            dealer: hand.positions.dealer,
        });
        push_new_log_entries(&hand, 0, events);

        let status = advance_or_void(&mut self.table, &mut hand, self.evaluator.as_ref());
        self.hand = Some(hand);
        self.after_status(status, now_ms, events);
    }

    /// Общий хвост после любого изменения раздачи.
    fn after_status(&mut self, status: HandStatus, now_ms: u64, events: &mut Vec<TableEvent>) {
        match status {
            HandStatus::Ongoing => {
                let Some(hand) = self.hand.as_ref() else { return };
                let armed = self.time.clock.sync(
                    hand.hand_id,
                    hand.turn_seq,
                    hand.current_actor,
                    now_ms,
                    &self.time.rules,
                );
                if let Some(deadline) = armed {
                    if let Some(info) = turn_info(&self.table, hand, deadline.deadline_ms) {
                        events.push(TableEvent::TurnStarted(info));
                    }
                }
            }
            HandStatus::Finished(outcome) => {
                self.archive_hand(ArchivedHand::Finished((*outcome).clone()));
                self.end_hand(now_ms, events, TableEvent::HandFinished(outcome));
            }
            HandStatus::Voided(voided) => {
                self.archive_hand(ArchivedHand::Voided(voided.clone()));
                self.end_hand(now_ms, events, TableEvent::HandVoided(voided));
            }
        }
    }

    fn end_hand(&mut self, now_ms: u64, events: &mut Vec<TableEvent>, result: TableEvent) {
        self.time.clock.cancel();
        let finished = self.hand.take();
        self.last_showdown = match &result {
            TableEvent::HandFinished(_) => finished.filter(|h| h.showdown_reached),
            _ => None,
        };
        events.push(result);

        let leaving: Vec<SeatIndex> = self
            .table
            .seats
            .iter()
            .enumerate()
            .filter_map(|(idx, s)| match s {
                Some(p) if p.leaving => Some(idx as SeatIndex),
                _ => None,
            })
            .collect();
        for seat in leaving {
            self.remove_seat(seat, events);
        }

        self.maybe_start_countdown(now_ms, events);
    }

    fn remove_seat(&mut self, seat: SeatIndex, events: &mut Vec<TableEvent>) {
        if let Some(player) = self.table.seats.get_mut(seat as usize).and_then(Option::take) {
            self.time.reconnect.forget(player.player_id);
            info!(table_id = self.table.id, seat, player_id = player.player_id, cash_out = %player.stack, "player left");
            events.push(TableEvent::PlayerLeft {
                seat,
                player_id: player.player_id,
                cash_out: player.stack,
            });
        }
    }

    fn archive_hand(&mut self, record: ArchivedHand) {
        let hand_id = record.hand_id();
        if let Err(err) = self.archive.record(record) {
            error!(table_id = self.table.id, hand_id, error = %err, "failed to archive hand");
        }
    }
}

fn push_new_log_entries(hand: &HandEngine, from: usize, events: &mut Vec<TableEvent>) {
    events.extend(
        hand.log.entries()[from.min(hand.log.len())..]
            .iter()
            .cloned()
            .map(TableEvent::ActionAccepted),
    );
}

fn turn_info(table: &Table, hand: &HandEngine, deadline_ms: u64) -> Option<TurnInfo> {
    let seat = hand.current_actor?;
    let hs = hand.seat(seat)?;
    let stack = table.seat(seat)?.stack;
    let max_raise_to = hs.committed_round + stack;
    Some(TurnInfo {
        hand_id: hand.hand_id,
        turn_seq: hand.turn_seq,
        seat,
        player_id: hs.player_id,
        deadline_ms,
        call_amount: hand.call_amount(seat).min(stack),
        min_raise_to: hand.betting.min_raise_total().min(max_raise_to),
        max_raise_to,
        can_raise: hand.betting.may_raise(seat),
    })
}

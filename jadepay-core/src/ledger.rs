//! Per-deal settlement ledger.
//!
//! `DealLedger` is what the game controller holds while a deal is in play:
//! the running score vector, which seats have already won, and an audit
//! trail of every settlement with its before/after vectors. Events are routed
//! through `jadepay-engine`; blood-battle tables get the exemption-aware
//! variants automatically.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use jadepay_engine::{
    apply_event, payment_summary, Fan, PaymentLine, ScoreVector, Seat, SeatFlags, SettleError,
    SettleResult, SettlementEvent, SettlementRule, TenpaiFlags, WonFlags, NUM_PLAYERS,
};

/// One applied settlement with the vectors on either side of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub event: SettlementEvent,
    pub before: ScoreVector,
    pub after: ScoreVector,
}

impl SettlementRecord {
    pub fn deltas(&self) -> [i64; NUM_PLAYERS] {
        self.before.deltas(&self.after)
    }

    pub fn summary<S: AsRef<str>>(
        &self,
        names: &[S; NUM_PLAYERS],
    ) -> [PaymentLine; NUM_PLAYERS] {
        payment_summary(&self.before, &self.after, names)
    }
}

/// How the deal ended, once it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealOutcome {
    /// Standard table: the single winner took the deal.
    Won,
    /// Blood battle: all but one seat has won.
    BloodBattleFinished,
    /// The wall ran out.
    Drawn,
}

#[derive(Debug, Clone)]
pub struct DealLedger {
    rule: SettlementRule,
    scores: ScoreVector,
    won: WonFlags,
    winners: Vec<Seat>,
    history: Vec<SettlementRecord>,
    drawn: bool,
}

impl DealLedger {
    /// Fresh deal with every seat at the rule's starting score.
    pub fn new(rule: SettlementRule) -> Self {
        Self::with_scores(rule, ScoreVector::uniform(rule.starting_score))
    }

    /// Fresh deal continuing from balances carried over from earlier deals.
    pub fn with_scores(rule: SettlementRule, scores: ScoreVector) -> Self {
        Self {
            rule,
            scores,
            won: WonFlags::none(),
            winners: Vec::new(),
            history: Vec::new(),
            drawn: false,
        }
    }

    /// Starts the next deal from this one's final balances.
    pub fn next_deal(&self) -> Self {
        Self::with_scores(self.rule, self.scores)
    }

    pub fn rule(&self) -> &SettlementRule {
        &self.rule
    }

    pub fn scores(&self) -> ScoreVector {
        self.scores
    }

    pub fn won(&self) -> WonFlags {
        self.won
    }

    /// Winning seats in the order they won.
    pub fn winners(&self) -> &[Seat] {
        &self.winners
    }

    pub fn history(&self) -> &[SettlementRecord] {
        &self.history
    }

    pub fn last(&self) -> Option<&SettlementRecord> {
        self.history.last()
    }

    pub fn outcome(&self) -> Option<DealOutcome> {
        if self.drawn {
            Some(DealOutcome::Drawn)
        } else if self.rule.blood_battle {
            (self.winners.len() >= NUM_PLAYERS - 1).then_some(DealOutcome::BloodBattleFinished)
        } else {
            (!self.winners.is_empty()).then_some(DealOutcome::Won)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.outcome().is_some()
    }

    /// Seats still playing for a win.
    pub fn active_seats(&self) -> impl Iterator<Item = Seat> + '_ {
        Seat::ALL.into_iter().filter(|&s| !self.won.is_set(s))
    }

    /// Popup lines for the most recent settlement.
    pub fn summary<S: AsRef<str>>(
        &self,
        names: &[S; NUM_PLAYERS],
    ) -> Option<[PaymentLine; NUM_PLAYERS]> {
        self.last().map(|r| r.summary(names))
    }
}

impl DealLedger {
    /// Discard win for a hand of `fan` tiers.
    pub fn ron(
        &mut self,
        winner: Seat,
        discarder: Seat,
        fan: Fan,
    ) -> SettleResult<&SettlementRecord> {
        let points = self.rule.ron_points(fan);
        let event = if self.rule.blood_battle {
            SettlementEvent::SichuanRon {
                winner,
                discarder,
                points,
            }
        } else {
            SettlementEvent::Ron {
                winner,
                discarder,
                points,
            }
        };
        self.apply(event)
    }

    /// Self-draw win for a hand of `fan` tiers.
    pub fn tsumo(&mut self, winner: Seat, fan: Fan) -> SettleResult<&SettlementRecord> {
        let points = self.rule.points_for_fan(fan);
        let event = if self.rule.blood_battle {
            SettlementEvent::SichuanTsumo {
                winner,
                points,
                has_won: self.won,
            }
        } else {
            SettlementEvent::Tsumo { winner, points }
        };
        self.apply(event)
    }

    /// Exhaustive draw. On a blood-battle table seats that already won sit out.
    pub fn draw_game(&mut self, tenpai: TenpaiFlags) -> SettleResult<&SettlementRecord> {
        let participants = if self.rule.blood_battle {
            self.won.complement()
        } else {
            SeatFlags::all()
        };
        self.apply(SettlementEvent::DrawGame {
            tenpai,
            penalty: self.rule.draw_penalty,
            rounding: self.rule.draw_rounding,
            participants,
        })
    }

    /// Applies an event and records it.
    ///
    /// On a blood-battle table the event is first rewritten against the
    /// ledger's own won flags, so a raw `Ron`/`Tsumo`/`DrawGame` cannot charge
    /// or pay a seat that already won.
    pub fn apply(&mut self, event: SettlementEvent) -> SettleResult<&SettlementRecord> {
        let event = self.normalize(event);
        if let Err(err) = self.check_event(&event) {
            warn!(event = event.kind(), error = %err, "rejected settlement");
            return Err(err);
        }

        let before = self.scores;
        let after = apply_event(&before, &event).inspect_err(|err| {
            warn!(event = event.kind(), error = %err, "settlement failed");
        })?;

        debug!(
            event = event.kind(),
            winner = ?event.winner().map(Seat::id),
            before = ?before.as_array(),
            after = ?after.as_array(),
            "settled"
        );

        self.scores = after;
        match event.winner() {
            Some(winner) => {
                self.won.set(winner, true);
                self.winners.push(winner);
            }
            None => self.drawn = true,
        }
        self.history.push(SettlementRecord {
            event,
            before,
            after,
        });

        if let Some(outcome) = self.outcome() {
            info!(
                ?outcome,
                winners = ?self.winners.iter().map(|s| s.id()).collect::<Vec<_>>(),
                scores = ?self.scores.as_array(),
                "deal complete"
            );
        }

        Ok(&self.history[self.history.len() - 1])
    }

    fn normalize(&self, event: SettlementEvent) -> SettlementEvent {
        if !self.rule.blood_battle {
            return event;
        }
        match event {
            SettlementEvent::Ron {
                winner,
                discarder,
                points,
            }
            | SettlementEvent::SichuanRon {
                winner,
                discarder,
                points,
            } => SettlementEvent::SichuanRon {
                winner,
                discarder,
                points,
            },
            SettlementEvent::Tsumo { winner, points }
            | SettlementEvent::SichuanTsumo { winner, points, .. } => {
                SettlementEvent::SichuanTsumo {
                    winner,
                    points,
                    has_won: self.won,
                }
            }
            SettlementEvent::DrawGame {
                tenpai,
                penalty,
                rounding,
                participants,
            } => SettlementEvent::DrawGame {
                tenpai,
                penalty,
                rounding,
                participants: participants.intersection(&self.won.complement()),
            },
        }
    }

    fn check_event(&self, event: &SettlementEvent) -> SettleResult<()> {
        if self.is_complete() {
            return Err(SettleError::precondition(format!(
                "deal already complete, cannot apply {}",
                event.kind()
            )));
        }
        if let Some(winner) = event.winner() {
            if self.won.is_set(winner) {
                return Err(SettleError::precondition(format!(
                    "{} has already won this deal",
                    winner
                )));
            }
        }
        if let SettlementEvent::Ron { discarder, .. }
        | SettlementEvent::SichuanRon { discarder, .. } = *event
        {
            if self.won.is_set(discarder) {
                return Err(SettleError::precondition(format!(
                    "{} already won and cannot discard",
                    discarder
                )));
            }
        }
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

use crate::errors::SettleResult;
use crate::rounding::RoundingStrategy;
use crate::settlement::{
    settle_draw_game_with, settle_ron, settle_sichuan_ron, settle_sichuan_tsumo, settle_tsumo,
    DrawPenalty,
};
use crate::types::{Points, ScoreVector, Seat, SeatFlags, TenpaiFlags, WonFlags};

/// A settlement request as submitted by the game controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SettlementEvent {
    Ron {
        winner: Seat,
        discarder: Seat,
        points: Points,
    },
    Tsumo {
        winner: Seat,
        points: Points,
    },
    SichuanRon {
        winner: Seat,
        discarder: Seat,
        points: Points,
    },
    SichuanTsumo {
        winner: Seat,
        points: Points,
        has_won: WonFlags,
    },
    DrawGame {
        tenpai: TenpaiFlags,
        #[serde(default)]
        penalty: DrawPenalty,
        #[serde(default)]
        rounding: RoundingStrategy,
        #[serde(default = "SeatFlags::all")]
        participants: SeatFlags,
    },
}

impl SettlementEvent {
    /// Drawn game with every seat taking part and the default per-pair penalty.
    pub fn draw(tenpai: TenpaiFlags) -> Self {
        SettlementEvent::DrawGame {
            tenpai,
            penalty: DrawPenalty::default(),
            rounding: RoundingStrategy::default(),
            participants: SeatFlags::all(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SettlementEvent::Ron { .. } => "ron",
            SettlementEvent::Tsumo { .. } => "tsumo",
            SettlementEvent::SichuanRon { .. } => "sichuan_ron",
            SettlementEvent::SichuanTsumo { .. } => "sichuan_tsumo",
            SettlementEvent::DrawGame { .. } => "draw_game",
        }
    }

    /// The winning seat, or `None` for a drawn game.
    pub fn winner(&self) -> Option<Seat> {
        match *self {
            SettlementEvent::Ron { winner, .. }
            | SettlementEvent::Tsumo { winner, .. }
            | SettlementEvent::SichuanRon { winner, .. }
            | SettlementEvent::SichuanTsumo { winner, .. } => Some(winner),
            SettlementEvent::DrawGame { .. } => None,
        }
    }

    pub fn apply(&self, scores: &ScoreVector) -> SettleResult<ScoreVector> {
        apply_event(scores, self)
    }
}

/// Dispatches an event to the matching settlement function.
pub fn apply_event(scores: &ScoreVector, event: &SettlementEvent) -> SettleResult<ScoreVector> {
    match *event {
        SettlementEvent::Ron {
            winner,
            discarder,
            points,
        } => settle_ron(scores, winner, discarder, points),
        SettlementEvent::Tsumo { winner, points } => settle_tsumo(scores, winner, points),
        SettlementEvent::SichuanRon {
            winner,
            discarder,
            points,
        } => settle_sichuan_ron(scores, winner, discarder, points),
        SettlementEvent::SichuanTsumo {
            winner,
            points,
            has_won,
        } => settle_sichuan_tsumo(scores, winner, points, &has_won),
        SettlementEvent::DrawGame {
            tenpai,
            penalty,
            rounding,
            participants,
        } => settle_draw_game_with(scores, &tenpai, penalty, rounding, &participants),
    }
}

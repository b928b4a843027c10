//! Settlement core for four-player mahjong.
//!
//! Pure functions that turn a score vector plus a win or drawn-game event
//! into a new score vector. Fan itself is computed elsewhere; this crate only
//! decides who pays whom.

pub mod errors;
pub mod event;
pub mod rounding;
pub mod rule;
pub mod score;
pub mod settlement;
pub mod summary;
pub mod types;

pub use errors::{SettleError, SettleResult};
pub use event::{apply_event, SettlementEvent};
pub use rounding::RoundingStrategy;
pub use rule::SettlementRule;
pub use score::{fan_to_points, DEFAULT_BASE_UNIT, FAN_CAP};
pub use settlement::{
    settle_draw_game, settle_draw_game_with, settle_ron, settle_sichuan_ron,
    settle_sichuan_tsumo, settle_tsumo, settle_win, DrawPenalty, PayerExemption,
};
pub use summary::{format_delta, payment_summary, PaymentLine};
pub use types::{Fan, Points, ScoreVector, Seat, SeatFlags, TenpaiFlags, WonFlags, NUM_PLAYERS};

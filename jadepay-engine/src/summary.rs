use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{SettleError, SettleResult};
use crate::types::{ScoreVector, NUM_PLAYERS};

/// Renders a score change with an explicit sign: `+1000`, `-500`, `+0`.
pub fn format_delta(delta: i64) -> String {
    if delta >= 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}

/// One seat's line in a settlement popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLine {
    pub name: String,
    pub delta: i64,
}

impl fmt::Display for PaymentLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, format_delta(self.delta))
    }
}

/// Seat-ordered `{name, delta}` records between two score vectors.
pub fn payment_summary<S: AsRef<str>>(
    before: &ScoreVector,
    after: &ScoreVector,
    names: &[S; NUM_PLAYERS],
) -> [PaymentLine; NUM_PLAYERS] {
    let deltas = before.deltas(after);
    std::array::from_fn(|i| PaymentLine {
        name: names[i].as_ref().to_string(),
        delta: deltas[i],
    })
}

/// Slice form of [`payment_summary`] for callers holding plain vectors.
/// All three inputs must have exactly four entries.
pub fn payment_summary_from_slices<S: AsRef<str>>(
    before: &[i32],
    after: &[i32],
    names: &[S],
) -> SettleResult<Vec<PaymentLine>> {
    let before = ScoreVector::from_slice(before)?;
    let after = ScoreVector::from_slice(after)?;
    let names: &[S; NUM_PLAYERS] = names.try_into().map_err(|_| {
        SettleError::precondition(format!(
            "expected {} player names, got {}",
            NUM_PLAYERS,
            names.len()
        ))
    })?;
    Ok(payment_summary(&before, &after, names).to_vec())
}

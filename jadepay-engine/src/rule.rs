#[cfg(feature = "python")]
use pyo3::{pyclass, pymethods, PyResult};
use serde::{Deserialize, Serialize};

use crate::errors::{SettleError, SettleResult};
use crate::rounding::RoundingStrategy;
use crate::score::{fan_to_points_capped, DEFAULT_BASE_UNIT, FAN_CAP};
use crate::settlement::{DrawPenalty, DEFAULT_PENALTY_PER_PAIR};
use crate::types::{Fan, Points};

/// Tunable constants for one table. Unknown JSON fields are rejected so a
/// typo in a rule file fails loudly instead of silently using a default.
#[cfg_attr(
    feature = "python",
    pyclass(module = "jadepay._jadepay", frozen)
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettlementRule {
    pub base_unit: Points,
    pub fan_cap: Fan,
    pub draw_penalty: DrawPenalty,
    pub draw_rounding: RoundingStrategy,

    /// Factor applied to a discard-win payment. The shipped Beijing table
    /// doubles it so a discarder pays about what three self-draw payers would.
    pub ron_multiplier: u32,

    /// Deal keeps going after a win until all but one seat has won.
    pub blood_battle: bool,

    pub starting_score: i32,
}

impl Default for SettlementRule {
    fn default() -> Self {
        Self::default_plain()
    }
}

impl SettlementRule {
    /// Bare engine contract: one base unit per tier, ron pays the table amount.
    pub fn default_plain() -> Self {
        Self {
            base_unit: DEFAULT_BASE_UNIT,
            fan_cap: FAN_CAP,
            draw_penalty: DrawPenalty::PerPair(DEFAULT_PENALTY_PER_PAIR),
            draw_rounding: RoundingStrategy::Exact,
            ron_multiplier: 1,
            blood_battle: false,
            starting_score: 25_000,
        }
    }

    pub fn default_beijing() -> Self {
        Self {
            base_unit: DEFAULT_BASE_UNIT,
            fan_cap: FAN_CAP,
            draw_penalty: DrawPenalty::PerPair(DEFAULT_PENALTY_PER_PAIR),
            draw_rounding: RoundingStrategy::Exact,
            ron_multiplier: 2,
            blood_battle: false,
            starting_score: 25_000,
        }
    }

    pub fn default_sichuan() -> Self {
        Self {
            base_unit: DEFAULT_BASE_UNIT,
            fan_cap: FAN_CAP,
            draw_penalty: DrawPenalty::PerPair(DEFAULT_PENALTY_PER_PAIR),
            draw_rounding: RoundingStrategy::Exact,
            ron_multiplier: 1,
            blood_battle: true,
            starting_score: 25_000,
        }
    }

    /// Looks up a preset by name (`plain`, `beijing`, `sichuan`).
    pub fn preset(name: &str) -> SettleResult<Self> {
        match name {
            "plain" => Ok(Self::default_plain()),
            "beijing" => Ok(Self::default_beijing()),
            "sichuan" => Ok(Self::default_sichuan()),
            other => Err(SettleError::config(format!("unknown rule preset '{}'", other))),
        }
    }

    /// Parses and validates a rule. Missing fields fall back to `default_plain`.
    pub fn from_json(json: &str) -> SettleResult<Self> {
        let rule: SettlementRule = serde_json::from_str(json)?;
        rule.validate()?;
        Ok(rule)
    }

    pub fn to_json(&self) -> SettleResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> SettleResult<()> {
        if self.base_unit == 0 {
            return Err(SettleError::config("base_unit must be positive"));
        }
        if !(0..=31).contains(&self.fan_cap) {
            return Err(SettleError::config(format!(
                "fan_cap {} outside 0..=31",
                self.fan_cap
            )));
        }
        if self.ron_multiplier == 0 {
            return Err(SettleError::config("ron_multiplier must be positive"));
        }
        Ok(())
    }

    /// Per-payer amount for a hand of the given tier under this rule.
    pub fn points_for_fan(&self, fan: Fan) -> Points {
        fan_to_points_capped(fan, self.base_unit, self.fan_cap)
    }

    /// Amount a discarder pays for a hand of the given tier.
    pub fn ron_points(&self, fan: Fan) -> Points {
        self.points_for_fan(fan).saturating_mul(self.ron_multiplier)
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl SettlementRule {
    #[staticmethod]
    #[pyo3(name = "default_plain")]
    pub fn py_default_plain() -> Self {
        Self::default_plain()
    }

    #[staticmethod]
    #[pyo3(name = "default_beijing")]
    pub fn py_default_beijing() -> Self {
        Self::default_beijing()
    }

    #[staticmethod]
    #[pyo3(name = "default_sichuan")]
    pub fn py_default_sichuan() -> Self {
        Self::default_sichuan()
    }

    #[staticmethod]
    #[pyo3(name = "preset")]
    pub fn py_preset(name: &str) -> PyResult<Self> {
        Ok(Self::preset(name)?)
    }

    #[staticmethod]
    #[pyo3(name = "from_json")]
    pub fn py_from_json(json: &str) -> PyResult<Self> {
        Ok(Self::from_json(json)?)
    }

    #[pyo3(name = "to_json")]
    pub fn py_to_json(&self) -> PyResult<String> {
        Ok(self.to_json()?)
    }

    #[pyo3(name = "points_for_fan")]
    pub fn py_points_for_fan(&self, fan: Fan) -> Points {
        self.points_for_fan(fan)
    }

    #[pyo3(name = "ron_points")]
    pub fn py_ron_points(&self, fan: Fan) -> Points {
        self.ron_points(fan)
    }

    #[getter]
    fn base_unit(&self) -> Points {
        self.base_unit
    }

    #[getter]
    fn fan_cap(&self) -> Fan {
        self.fan_cap
    }

    #[getter]
    fn draw_rounding(&self) -> RoundingStrategy {
        self.draw_rounding
    }

    #[getter]
    fn ron_multiplier(&self) -> u32 {
        self.ron_multiplier
    }

    #[getter]
    fn blood_battle(&self) -> bool {
        self.blood_battle
    }

    #[getter]
    fn starting_score(&self) -> i32 {
        self.starting_score
    }

    fn __repr__(&self) -> String {
        format!(
            "SettlementRule(base_unit={}, fan_cap={}, draw_penalty={:?}, draw_rounding={:?}, \
             ron_multiplier={}, blood_battle={}, starting_score={})",
            self.base_unit,
            self.fan_cap,
            self.draw_penalty,
            self.draw_rounding,
            self.ron_multiplier,
            self.blood_battle,
            self.starting_score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for name in ["plain", "beijing", "sichuan"] {
            SettlementRule::preset(name).unwrap().validate().unwrap();
        }
        assert!(SettlementRule::preset("tenhou").is_err());
    }

    #[test]
    fn from_json_fills_defaults() {
        let rule = SettlementRule::from_json(r#"{"base_unit": 50, "blood_battle": true}"#).unwrap();
        assert_eq!(rule.base_unit, 50);
        assert!(rule.blood_battle);
        assert_eq!(rule.fan_cap, FAN_CAP);
        assert_eq!(rule.points_for_fan(2), 200);
    }

    #[test]
    fn from_json_rejects_unknown_and_invalid() {
        assert!(matches!(
            SettlementRule::from_json(r#"{"base_unt": 50}"#),
            Err(SettleError::Config { .. })
        ));
        assert!(SettlementRule::from_json(r#"{"base_unit": 0}"#).is_err());
        assert!(SettlementRule::from_json(r#"{"ron_multiplier": 0}"#).is_err());
    }

    #[test]
    fn json_round_trip_keeps_draw_penalty() {
        let mut rule = SettlementRule::default_sichuan();
        rule.draw_penalty = DrawPenalty::FixedPool(3000);
        rule.draw_rounding = RoundingStrategy::Bankers;
        let back = SettlementRule::from_json(&rule.to_json().unwrap()).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn beijing_ron_doubles() {
        let rule = SettlementRule::default_beijing();
        assert_eq!(rule.points_for_fan(3), 800);
        assert_eq!(rule.ron_points(3), 1600);
    }
}

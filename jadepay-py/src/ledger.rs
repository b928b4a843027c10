//! `DealLedger` wrapper for a Python game controller.

use pyo3::prelude::*;

use jadepay_core::ledger::DealLedger;
use jadepay_engine::{ScoreVector, Seat, SeatFlags, SettlementRule};

/// One deal's running scores, won flags and settlement history.
#[pyclass(name = "DealLedger")]
pub struct PyDealLedger {
    inner: DealLedger,
}

#[pymethods]
impl PyDealLedger {
    /// `rule` is a preset name (`plain`, `beijing`, `sichuan`) or a JSON rule object.
    #[new]
    #[pyo3(signature = (rule="plain", scores=None))]
    fn new(rule: &str, scores: Option<Vec<i32>>) -> PyResult<Self> {
        let rule = if rule.trim_start().starts_with('{') {
            SettlementRule::from_json(rule)?
        } else {
            SettlementRule::preset(rule)?
        };
        Self::with_rule(rule, scores)
    }

    /// Builds a ledger from a `SettlementRule` object instead of a name.
    #[staticmethod]
    #[pyo3(signature = (rule, scores=None))]
    fn with_rule(rule: SettlementRule, scores: Option<Vec<i32>>) -> PyResult<Self> {
        rule.validate()?;
        let inner = match scores {
            Some(s) => DealLedger::with_scores(rule, ScoreVector::from_slice(&s)?),
            None => DealLedger::new(rule),
        };
        Ok(Self { inner })
    }

    /// Returns the per-seat deltas of the applied settlement.
    fn ron(&mut self, winner: u8, discarder: u8, fan: i32) -> PyResult<Vec<i64>> {
        let record = self.inner.ron(Seat::new(winner)?, Seat::new(discarder)?, fan)?;
        Ok(record.deltas().to_vec())
    }

    fn tsumo(&mut self, winner: u8, fan: i32) -> PyResult<Vec<i64>> {
        let record = self.inner.tsumo(Seat::new(winner)?, fan)?;
        Ok(record.deltas().to_vec())
    }

    fn draw_game(&mut self, tenpai: Vec<bool>) -> PyResult<Vec<i64>> {
        let record = self.inner.draw_game(SeatFlags::from_slice(&tenpai)?)?;
        Ok(record.deltas().to_vec())
    }

    /// Applies a JSON-encoded settlement event.
    fn apply_json(&mut self, event: &str) -> PyResult<Vec<i64>> {
        let event = serde_json::from_str(event)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
        let record = self.inner.apply(event)?;
        Ok(record.deltas().to_vec())
    }

    fn next_deal(&self) -> Self {
        Self {
            inner: self.inner.next_deal(),
        }
    }

    #[getter]
    fn rule(&self) -> SettlementRule {
        *self.inner.rule()
    }

    #[getter]
    fn scores(&self) -> Vec<i32> {
        self.inner.scores().into_array().to_vec()
    }

    #[getter]
    fn won(&self) -> Vec<bool> {
        self.inner.won().as_array().to_vec()
    }

    #[getter]
    fn winners(&self) -> Vec<u8> {
        self.inner.winners().iter().map(|s| s.id()).collect()
    }

    fn is_complete(&self) -> bool {
        self.inner.is_complete()
    }

    /// `[(name, delta), ...]` for the latest settlement, or `None` before any.
    fn summary(&self, names: [String; 4]) -> Option<Vec<(String, i64)>> {
        self.inner
            .summary(&names)
            .map(|lines| lines.into_iter().map(|l| (l.name, l.delta)).collect())
    }

    /// Settlement history as a JSON array of `{event, before, after}`.
    fn history_json(&self) -> PyResult<String> {
        serde_json::to_string(self.inner.history())
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
    }

    fn __repr__(&self) -> String {
        format!(
            "DealLedger(scores={:?}, winners={:?}, complete={})",
            self.inner.scores().as_array(),
            self.winners(),
            self.inner.is_complete()
        )
    }
}

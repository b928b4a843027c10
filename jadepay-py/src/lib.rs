//! Python bindings for the jadepay settlement engine.

use pyo3::prelude::*;

mod ledger;
mod settle;

#[pymodule]
fn _jadepay(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ledger::PyDealLedger>()?;
    m.add_class::<jadepay_engine::SettlementRule>()?;
    m.add_class::<jadepay_engine::RoundingStrategy>()?;
    settle::register(m)?;
    Ok(())
}
